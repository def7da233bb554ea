use crate::cli::InsightsView;
use crate::domain::constants::DAYS_PER_YEAR;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: ConfigPaths,
    #[serde(default)]
    pub dataset: ConfigDataset,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigPaths {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigDataset {
    #[serde(default)]
    pub delimiter: Option<char>,
}

#[derive(Serialize)]
pub struct ModelReport {
    pub path: String,
    pub kind: ModelKind,
    pub classes: Vec<i64>,
    pub estimators: usize,
    pub features: Vec<String>,
}

#[derive(Serialize)]
pub struct ClassCount {
    pub value: u8,
    pub count: usize,
    pub percent: f64,
}

#[derive(Serialize)]
pub struct CrossCount {
    pub value: u8,
    pub negative: usize,
    pub positive: usize,
}

#[derive(Serialize)]
pub struct ClassMeans {
    pub cardio: u8,
    pub count: usize,
    pub mean_height: f64,
    pub mean_weight: f64,
    pub mean_bmi: f64,
}

#[derive(Serialize)]
pub struct AgeBin {
    pub start: f64,
    pub end: f64,
    pub negative: usize,
    pub positive: usize,
}

#[derive(Serialize, Default)]
pub struct InsightsReport {
    pub total_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<CardioRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_distribution: Option<Vec<ClassCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_distribution: Option<Vec<ClassCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol_by_cardio: Option<Vec<CrossCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_by_cardio: Option<Vec<ClassMeans>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_histogram: Option<Vec<AgeBin>>,
}

impl InsightsReport {
    pub fn view_name(view: InsightsView) -> &'static str {
        match view {
            InsightsView::All => "all",
            InsightsView::Overview => "overview",
            InsightsView::Distribution => "distribution",
            InsightsView::Correlations => "correlations",
            InsightsView::Age => "age",
        }
    }
}

#[derive(Serialize)]
pub struct AboutReport {
    pub name: String,
    pub version: String,
    pub objective: String,
    pub model: String,
    pub dataset: String,
    pub disclaimer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    LogisticRegression,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::RandomForest => write!(f, "random_forest"),
            ModelKind::LogisticRegression => write!(f, "logistic_regression"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    High,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "Low Risk"),
            RiskLabel::High => write!(f, "High Risk"),
        }
    }
}

/// One row of the dataset. `age` is in days.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CardioRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub age: u32,
    pub gender: u8,
    pub height: f64,
    pub weight: f64,
    pub ap_hi: i32,
    pub ap_lo: i32,
    pub cholesterol: u8,
    pub gluc: u8,
    pub smoke: u8,
    pub alco: u8,
    pub active: u8,
    pub cardio: u8,
}

impl CardioRecord {
    pub fn age_years(&self) -> u32 {
        (f64::from(self.age) / DAYS_PER_YEAR).round() as u32
    }

    pub fn bmi(&self) -> f64 {
        let m = self.height / 100.0;
        self.weight / (m * m)
    }
}
