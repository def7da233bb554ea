//! Interactive form loop. Every failure is reported inside the loop; only
//! I/O errors on the terminal itself end the session early.

use crate::domain::constants::{
    AGE_RANGE, DIASTOLIC_RANGE, HEIGHT_RANGE, SYSTOLIC_RANGE, WEIGHT_RANGE,
};
use crate::domain::errors::CardioError;
use crate::domain::patient::{Gender, Level, PatientInput};
use crate::services::artifact::ArtifactCache;
use crate::services::assessment::{assess, render_report};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub assessed: usize,
    pub failed: usize,
}

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// `None` means end of input.
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask<T: Display>(
        &mut self,
        label: &str,
        default: T,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> std::io::Result<Option<T>> {
        loop {
            write!(self.out, "{} [{}]: ", label, default)?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(default));
            }
            match parse(&line) {
                Ok(v) => return Ok(Some(v)),
                Err(msg) => writeln!(self.out, "  {}", msg)?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        write!(self.out, "{} [y/N]: ", question)?;
        self.out.flush()?;
        Ok(matches!(
            self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    fn form(&mut self) -> std::io::Result<Option<PatientInput>> {
        let d = PatientInput::default();
        macro_rules! field {
            ($label:expr, $default:expr, $parse:expr) => {
                match self.ask($label, $default, $parse)? {
                    Some(v) => v,
                    None => return Ok(None),
                }
            };
        }

        writeln!(self.out, "Patient Vitals")?;
        let age_years = field!("Age (years)", d.age_years, |s| ranged(s, "age", AGE_RANGE));
        let gender = field!("Gender (male/female)", GenderChoice(d.gender), |s| {
            s.parse().map(GenderChoice)
        })
        .0;
        let height_cm = field!("Height (cm)", d.height_cm, |s| ranged(s, "height", HEIGHT_RANGE));
        let weight_kg = field!("Weight (kg)", d.weight_kg, |s| ranged(s, "weight", WEIGHT_RANGE));
        let systolic_bp = field!("Systolic BP (High)", d.systolic_bp, |s| {
            ranged(s, "systolic bp", SYSTOLIC_RANGE)
        });
        let diastolic_bp = field!("Diastolic BP (Low)", d.diastolic_bp, |s| {
            ranged(s, "diastolic bp", DIASTOLIC_RANGE)
        });
        let cholesterol = field!("Cholesterol Level (1-3)", d.cholesterol, Level::from_str);
        let glucose = field!("Glucose Level (1-3)", d.glucose, Level::from_str);
        let smoker = field!("Smoker (y/n)", YesNo(d.smoker), parse_yes_no).0;
        let alcohol = field!("Alcohol Consumer (y/n)", YesNo(d.alcohol), parse_yes_no).0;
        let physically_active =
            field!("Physically Active (y/n)", YesNo(d.physically_active), parse_yes_no).0;

        Ok(Some(PatientInput {
            age_years,
            gender,
            height_cm,
            weight_kg,
            systolic_bp,
            diastolic_bp,
            cholesterol,
            glucose,
            smoker,
            alcohol,
            physically_active,
        }))
    }
}

fn ranged<T>(s: &str, name: &str, (lo, hi): (T, T)) -> Result<T, String>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let v: T = s
        .parse()
        .map_err(|_| format!("{} must be a number between {} and {}", name, lo, hi))?;
    if !(lo..=hi).contains(&v) {
        return Err(format!("{} must be between {} and {}", name, lo, hi));
    }
    Ok(v)
}

struct GenderChoice(Gender);

impl Display for GenderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

struct YesNo(bool);

impl Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.0 { "y" } else { "n" })
    }
}

fn parse_yes_no(s: &str) -> Result<YesNo, String> {
    match s.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(YesNo(true)),
        "n" | "no" | "false" | "0" => Ok(YesNo(false)),
        other => Err(format!("answer '{}' must be y or n", other)),
    }
}

pub fn run_session<R: BufRead, W: Write>(
    input: R,
    out: W,
    cache: &ArtifactCache,
    model_path: &Path,
) -> std::io::Result<SessionSummary> {
    let mut p = Prompter { input, out };
    let mut summary = SessionSummary::default();

    loop {
        let Some(patient) = p.form()? else {
            break;
        };

        let outcome = cache
            .get_or_load(model_path)
            .and_then(|artifact| assess(artifact, &patient));
        match outcome {
            Ok(report) => {
                summary.assessed += 1;
                writeln!(p.out, "\nRisk Assessment Result\n{}\n", render_report(&report))?;
            }
            Err(err) => {
                summary.failed += 1;
                tracing::debug!(code = err.code(), "assessment failed: {}", err);
                writeln!(p.out, "\nerror: {}", err)?;
                if let CardioError::ArtifactNotFound { .. } = err {
                    writeln!(
                        p.out,
                        "Place the model artifact at {} and submit again.",
                        model_path.display()
                    )?;
                }
                writeln!(p.out)?;
            }
        }

        if !p.confirm("Analyze another profile?")? {
            break;
        }
    }

    writeln!(
        p.out,
        "session ended: {} assessed, {} failed",
        summary.assessed, summary.failed
    )?;
    Ok(summary)
}
