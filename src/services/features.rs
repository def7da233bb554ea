//! Projection of a typed `PatientInput` onto the feature order a model was
//! trained with.

use crate::domain::constants::DAYS_PER_YEAR;
use crate::domain::errors::CardioError;
use crate::domain::patient::PatientInput;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::str::FromStr;

/// Every column the transform knows how to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Age,
    AgeYears,
    Gender,
    Height,
    Weight,
    ApHi,
    ApLo,
    Cholesterol,
    Gluc,
    Smoke,
    Alco,
    Active,
    Bmi,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::Age,
        Feature::AgeYears,
        Feature::Gender,
        Feature::Height,
        Feature::Weight,
        Feature::ApHi,
        Feature::ApLo,
        Feature::Cholesterol,
        Feature::Gluc,
        Feature::Smoke,
        Feature::Alco,
        Feature::Active,
        Feature::Bmi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::AgeYears => "age_years",
            Feature::Gender => "gender",
            Feature::Height => "height",
            Feature::Weight => "weight",
            Feature::ApHi => "ap_hi",
            Feature::ApLo => "ap_lo",
            Feature::Cholesterol => "cholesterol",
            Feature::Gluc => "gluc",
            Feature::Smoke => "smoke",
            Feature::Alco => "alco",
            Feature::Active => "active",
            Feature::Bmi => "bmi",
        }
    }

    pub fn value(self, input: &PatientInput) -> f64 {
        match self {
            Feature::Age => f64::from(input.age_years) * DAYS_PER_YEAR,
            Feature::AgeYears => f64::from(input.age_years),
            Feature::Gender => input.gender.code(),
            Feature::Height => input.height_cm,
            Feature::Weight => input.weight_kg,
            Feature::ApHi => f64::from(input.systolic_bp),
            Feature::ApLo => f64::from(input.diastolic_bp),
            Feature::Cholesterol => input.cholesterol.value(),
            Feature::Gluc => input.glucose.value(),
            Feature::Smoke => flag(input.smoker),
            Feature::Alco => flag(input.alcohol),
            Feature::Active => flag(input.physically_active),
            Feature::Bmi => input.bmi(),
        }
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl FromStr for Feature {
    type Err = CardioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| CardioError::SchemaMismatch(format!("unknown feature '{}'", s)))
    }
}

/// An ordered, duplicate-free list of features, parsed once from the names
/// an artifact declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    order: Vec<Feature>,
}

impl FeatureSchema {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CardioError> {
        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let feature: Feature = name.as_ref().parse()?;
            if !seen.insert(feature) {
                return Err(CardioError::SchemaMismatch(format!(
                    "duplicate feature '{}'",
                    feature.name()
                )));
            }
            order.push(feature);
        }
        Ok(Self { order })
    }

    pub fn feature_count(&self) -> usize {
        self.order.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.order.iter().map(|f| f.name()).collect()
    }

    pub fn project(&self, input: &PatientInput) -> FeatureVector {
        FeatureVector {
            entries: self.order.iter().map(|&f| (f, f.value(input))).collect(),
        }
    }
}

/// Feature values in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(Feature, f64)>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| f.name() == name)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(f, _)| f.name()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (f, v) in &self.entries {
            map.serialize_entry(f.name(), v)?;
        }
        map.end()
    }
}

pub fn build_features<S: AsRef<str>>(
    input: &PatientInput,
    feature_order: &[S],
) -> Result<FeatureVector, CardioError> {
    Ok(FeatureSchema::from_names(feature_order)?.project(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::{Gender, Level};
    use proptest::prelude::*;

    const TRAINING_ORDER: [&str; 13] = [
        "age",
        "gender",
        "height",
        "weight",
        "ap_hi",
        "ap_lo",
        "cholesterol",
        "gluc",
        "smoke",
        "alco",
        "active",
        "age_years",
        "bmi",
    ];

    #[test]
    fn reference_patient_builds_expected_vector() {
        let v = build_features(&PatientInput::default(), &TRAINING_ORDER).unwrap();
        assert_eq!(v.names(), TRAINING_ORDER.to_vec());
        assert_eq!(v.get("age"), Some(18262.5));
        assert_eq!(v.get("age_years"), Some(50.0));
        assert_eq!(v.get("gender"), Some(1.0));
        assert_eq!(v.get("height"), Some(170.0));
        assert_eq!(v.get("ap_hi"), Some(120.0));
        assert_eq!(v.get("ap_lo"), Some(80.0));
        assert_eq!(v.get("cholesterol"), Some(1.0));
        assert_eq!(v.get("gluc"), Some(1.0));
        assert_eq!(v.get("smoke"), Some(0.0));
        assert_eq!(v.get("alco"), Some(0.0));
        assert_eq!(v.get("active"), Some(1.0));
        let bmi = v.get("bmi").unwrap();
        assert!((bmi - 25.95).abs() < 0.01, "bmi was {}", bmi);
    }

    #[test]
    fn unknown_name_is_a_schema_mismatch() {
        let err = build_features(&PatientInput::default(), &["age", "unknown_field"]).unwrap_err();
        assert!(matches!(err, CardioError::SchemaMismatch(ref m) if m.contains("unknown_field")));
    }

    #[test]
    fn duplicate_name_is_a_schema_mismatch() {
        let err = FeatureSchema::from_names(&["bmi", "age", "bmi"]).unwrap_err();
        assert!(matches!(err, CardioError::SchemaMismatch(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn vector_follows_requested_order_and_subset() {
        let v = build_features(&PatientInput::default(), &["bmi", "gender"]).unwrap();
        assert_eq!(v.names(), vec!["bmi", "gender"]);
        assert_eq!(v.values().len(), 2);
        assert_eq!(v.get("age"), None);
    }

    #[test]
    fn female_maps_to_two() {
        let p = PatientInput {
            gender: Gender::Female,
            ..PatientInput::default()
        };
        assert_eq!(Feature::Gender.value(&p), 2.0);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let v = build_features(&PatientInput::default(), &["smoke", "age_years"]).unwrap();
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"smoke":0.0,"age_years":50.0}"#
        );
    }

    fn level() -> impl Strategy<Value = Level> {
        prop_oneof![
            Just(Level::Normal),
            Just(Level::AboveNormal),
            Just(Level::High)
        ]
    }

    prop_compose! {
        fn valid_patient()(
            age_years in 1u32..=120,
            male in any::<bool>(),
            height_cm in 100.0f64..=250.0,
            weight_kg in 30.0f64..=200.0,
            systolic_bp in 80u32..=250,
            diastolic_bp in 40u32..=150,
            cholesterol in level(),
            glucose in level(),
            smoker in any::<bool>(),
            alcohol in any::<bool>(),
            physically_active in any::<bool>(),
        ) -> PatientInput {
            PatientInput {
                age_years,
                gender: if male { Gender::Male } else { Gender::Female },
                height_cm,
                weight_kg,
                systolic_bp,
                diastolic_bp,
                cholesterol,
                glucose,
                smoker,
                alcohol,
                physically_active,
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn key_set_equals_requested_order(p in valid_patient(), order in Just(TRAINING_ORDER.to_vec()).prop_shuffle()) {
            let v = build_features(&p, &order).unwrap();
            prop_assert_eq!(v.names(), order.clone());
        }

        #[test]
        fn age_is_exact_days(p in valid_patient()) {
            let v = build_features(&p, &["age"]).unwrap();
            prop_assert_eq!(v.get("age"), Some(f64::from(p.age_years) * 365.25));
        }

        #[test]
        fn gender_code_is_one_iff_male(p in valid_patient()) {
            let g = build_features(&p, &["gender"]).unwrap().get("gender").unwrap();
            prop_assert!(g == 1.0 || g == 2.0);
            prop_assert_eq!(g == 1.0, p.gender == Gender::Male);
        }

        #[test]
        fn bmi_is_finite_and_positive(p in valid_patient()) {
            let bmi = build_features(&p, &["bmi"]).unwrap().get("bmi").unwrap();
            let m = p.height_cm / 100.0;
            prop_assert!(bmi.is_finite() && bmi > 0.0);
            prop_assert_eq!(bmi, p.weight_kg / (m * m));
        }

        #[test]
        fn flags_are_zero_or_one(p in valid_patient()) {
            let v = build_features(&p, &["smoke", "alco", "active"]).unwrap();
            for x in v.values() {
                prop_assert!(x == 0.0 || x == 1.0);
            }
            prop_assert_eq!(v.get("smoke") == Some(1.0), p.smoker);
            prop_assert_eq!(v.get("alco") == Some(1.0), p.alcohol);
            prop_assert_eq!(v.get("active") == Some(1.0), p.physically_active);
        }
    }
}
