use crate::domain::patient::{Gender, Level, PatientInput};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cardio", version, about = "Cardiovascular disease risk predictor")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Model artifact path (default: config file, then cardio_rf_model.json)"
    )]
    pub model: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Dataset CSV path (default: config file, then cardio_train.csv)"
    )]
    pub dataset: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess one patient profile given as flags
    Predict(VitalsArgs),
    /// Fill in the patient form interactively
    Session,
    /// Show the loaded model and its feature schema
    Model,
    /// Summary tables over the dataset
    Insights {
        #[arg(long, value_enum, default_value_t = InsightsView::All)]
        view: InsightsView,
    },
    /// Project objective and disclaimer
    About,
}

#[derive(Args, Debug, Clone)]
pub struct VitalsArgs {
    #[arg(long, default_value_t = 50, help = "Age in years (1-120)")]
    pub age: u32,
    #[arg(long, value_enum, default_value_t = Gender::Male)]
    pub gender: Gender,
    #[arg(long, default_value_t = 170.0, help = "Height in cm (100-250)")]
    pub height: f64,
    #[arg(long, default_value_t = 75.0, help = "Weight in kg (30-200)")]
    pub weight: f64,
    #[arg(long, default_value_t = 120, help = "Systolic blood pressure (80-250)")]
    pub ap_hi: u32,
    #[arg(long, default_value_t = 80, help = "Diastolic blood pressure (40-150)")]
    pub ap_lo: u32,
    #[arg(long, default_value = "1", value_parser = parse_level, help = "1 normal, 2 above normal, 3 high")]
    pub cholesterol: Level,
    #[arg(long, default_value = "1", value_parser = parse_level, help = "1 normal, 2 above normal, 3 high")]
    pub glucose: Level,
    #[arg(long, default_value_t = false)]
    pub smoke: bool,
    #[arg(long, default_value_t = false)]
    pub alco: bool,
    #[arg(long, default_value_t = false, help = "Patient is not physically active")]
    pub inactive: bool,
}

fn parse_level(s: &str) -> Result<Level, String> {
    s.parse()
}

impl From<&VitalsArgs> for PatientInput {
    fn from(a: &VitalsArgs) -> Self {
        PatientInput {
            age_years: a.age,
            gender: a.gender,
            height_cm: a.height,
            weight_kg: a.weight,
            systolic_bp: a.ap_hi,
            diastolic_bp: a.ap_lo,
            cholesterol: a.cholesterol,
            glucose: a.glucose,
            smoker: a.smoke,
            alcohol: a.alco,
            physically_active: !a.inactive,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsightsView {
    All,
    Overview,
    Distribution,
    Correlations,
    Age,
}
