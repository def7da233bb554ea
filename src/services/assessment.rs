use crate::domain::constants::{BMI_NORMAL_MAX, BMI_NORMAL_MIN};
use crate::domain::errors::CardioError;
use crate::domain::models::RiskLabel;
use crate::domain::patient::PatientInput;
use crate::services::artifact::ModelArtifact;
use crate::services::features::FeatureVector;
use crate::services::inference::predict;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RiskReport {
    pub label: RiskLabel,
    pub headline: String,
    pub probability: f64,
    pub probability_display: String,
    pub bmi: f64,
    pub bmi_indicator: String,
    pub advice: String,
    pub input: PatientInput,
    pub features: FeatureVector,
}

/// Validate, transform, predict, and phrase the result for display.
pub fn assess(artifact: &ModelArtifact, input: &PatientInput) -> Result<RiskReport, CardioError> {
    input.validate()?;
    let features = artifact.schema.project(input);
    let result = predict(artifact, &features)?;
    let bmi = input.bmi();

    let (headline, advice) = match result.label {
        RiskLabel::High => (
            "Action Required",
            "The model suggests a high likelihood of cardiovascular issues. Please consult a cardiologist.",
        ),
        RiskLabel::Low => (
            "Keep it up!",
            "The model suggests a low likelihood of cardiovascular issues. Maintain a healthy lifestyle.",
        ),
    };

    Ok(RiskReport {
        label: result.label,
        headline: headline.to_string(),
        probability: result.probability,
        probability_display: format!("Calculated Probability: {:.1}%", result.probability * 100.0),
        bmi,
        bmi_indicator: bmi_indicator(bmi).to_string(),
        advice: advice.to_string(),
        input: input.clone(),
        features,
    })
}

pub fn bmi_indicator(bmi: f64) -> &'static str {
    if (BMI_NORMAL_MIN..=BMI_NORMAL_MAX).contains(&bmi) {
        "Normal"
    } else {
        "Check BMI chart"
    }
}

pub fn render_report(r: &RiskReport) -> String {
    format!(
        "{} - {}\n{}\nBMI Indicator: {:.1} - {}\n{}",
        r.label, r.headline, r.probability_display, r.bmi, r.bmi_indicator, r.advice
    )
}
