use crate::domain::constants::{
    AGE_RANGE, DIASTOLIC_RANGE, HEIGHT_RANGE, SYSTOLIC_RANGE, WEIGHT_RANGE,
};
use crate::domain::errors::CardioError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Training-data convention: Male -> 1, Female -> 2.
    pub fn code(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 2.0,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{}' (expected male or female)", other)),
        }
    }
}

/// Cholesterol and glucose readings are recorded on a three-step scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    Normal = 1,
    AboveNormal = 2,
    High = 3,
}

impl Level {
    pub fn value(self) -> f64 {
        f64::from(u8::from(self))
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Normal => "Normal",
            Level::AboveNormal => "Above Normal",
            Level::High => "High",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Level::Normal),
            2 => Ok(Level::AboveNormal),
            3 => Ok(Level::High),
            other => Err(format!("level {} must be 1, 2 or 3", other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(l: Level) -> u8 {
        l as u8
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("level '{}' must be 1, 2 or 3", s.trim()))?;
        Level::try_from(n)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", u8::from(*self), self.label())
    }
}

/// Raw patient fields as collected from the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub age_years: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub cholesterol: Level,
    pub glucose: Level,
    pub smoker: bool,
    pub alcohol: bool,
    pub physically_active: bool,
}

impl Default for PatientInput {
    fn default() -> Self {
        Self {
            age_years: 50,
            gender: Gender::Male,
            height_cm: 170.0,
            weight_kg: 75.0,
            systolic_bp: 120,
            diastolic_bp: 80,
            cholesterol: Level::Normal,
            glucose: Level::Normal,
            smoker: false,
            alcohol: false,
            physically_active: true,
        }
    }
}

impl PatientInput {
    /// Checks every bounded field and reports all violations at once.
    pub fn validate(&self) -> Result<(), CardioError> {
        let mut errors = Vec::new();

        check_int(&mut errors, "age", self.age_years, AGE_RANGE);
        check_float(&mut errors, "height", self.height_cm, HEIGHT_RANGE);
        check_float(&mut errors, "weight", self.weight_kg, WEIGHT_RANGE);
        check_int(&mut errors, "systolic bp", self.systolic_bp, SYSTOLIC_RANGE);
        check_int(&mut errors, "diastolic bp", self.diastolic_bp, DIASTOLIC_RANGE);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CardioError::InvalidInput(errors))
        }
    }

    pub fn bmi(&self) -> f64 {
        let meters = self.height_cm / 100.0;
        self.weight_kg / (meters * meters)
    }
}

fn check_int(errors: &mut Vec<String>, name: &str, v: u32, (lo, hi): (u32, u32)) {
    if !(lo..=hi).contains(&v) {
        errors.push(format!("{} {} out of range [{}, {}]", name, v, lo, hi));
    }
}

fn check_float(errors: &mut Vec<String>, name: &str, v: f64, (lo, hi): (f64, f64)) {
    // NaN fails `contains`, so it is reported too.
    if !(lo..=hi).contains(&v) {
        errors.push(format!("{} {} out of range [{}, {}]", name, v, lo, hi));
    }
}
