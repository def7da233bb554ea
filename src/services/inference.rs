//! Classifier evaluation over exported model parameters.
//!
//! The artifact stores a fitted model as plain data: a random forest in
//! flat array tree form, or a logistic regression. Evaluation follows the
//! usual probabilistic classifier contract: `predict_proba` yields one
//! probability per entry of `classes`, `predict` returns the class with the
//! highest probability (first one on ties).

use crate::domain::constants::POSITIVE_CLASS;
use crate::domain::errors::CardioError;
use crate::domain::models::{ModelKind, RiskLabel};
use crate::services::artifact::ModelArtifact;
use crate::services::features::FeatureVector;
use serde::{Deserialize, Serialize};

pub trait Classifier {
    fn classes(&self) -> &[i64];

    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, String>;

    fn predict(&self, x: &[f64]) -> Result<i64, String> {
        argmax_class(self.classes(), &self.predict_proba(x)?)
    }
}

/// Class with the highest probability; the first one wins on ties.
fn argmax_class(classes: &[i64], proba: &[f64]) -> Result<i64, String> {
    let mut best = 0;
    for (i, p) in proba.iter().enumerate() {
        if *p > proba[best] {
            best = i;
        }
    }
    classes
        .get(best)
        .copied()
        .ok_or_else(|| "classifier returned no probabilities".to_string())
}

/// One fitted tree. Node `i` is a leaf when `children_left[i] == -1`;
/// otherwise samples with `x[feature[i]] <= threshold[i]` go left.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Structural checks done once at load time. Children always point
    /// forward, so a traversal of a checked tree terminates.
    pub fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree arrays differ in length".to_string());
        }
        for i in 0..n {
            let (l, r) = (self.children_left[i], self.children_right[i]);
            if l == -1 || r == -1 {
                if l != r {
                    return Err(format!("node {} has a single child", i));
                }
                let row = &self.value[i];
                if row.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        i,
                        row.len(),
                        n_classes
                    ));
                }
                if row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {} has invalid class weights", i));
                }
                if row.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {} has zero total weight", i));
                }
                continue;
            }
            for child in [l, r] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} has out-of-order child {}", i, child));
                }
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!("node {} splits on unknown feature index {}", i, f));
            }
            if self.threshold[i].is_nan() {
                return Err(format!("node {} has a NaN threshold", i));
            }
        }
        Ok(())
    }

    fn leaf_distribution(&self, x: &[f64]) -> Result<Vec<f64>, String> {
        let mut node = 0usize;
        loop {
            let left = *self
                .children_left
                .get(node)
                .ok_or_else(|| format!("traversal reached missing node {}", node))?;
            if left == -1 {
                let row = &self.value[node];
                let total: f64 = row.iter().sum();
                return Ok(row.iter().map(|w| w / total).collect());
            }
            let f = self.feature[node] as usize;
            let v = *x
                .get(f)
                .ok_or_else(|| format!("input has no feature at index {}", f))?;
            node = if v <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    RandomForest {
        classes: Vec<i64>,
        trees: Vec<Tree>,
    },
    LogisticRegression {
        classes: Vec<i64>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::RandomForest { .. } => ModelKind::RandomForest,
            Model::LogisticRegression { .. } => ModelKind::LogisticRegression,
        }
    }

    pub fn estimator_count(&self) -> usize {
        match self {
            Model::RandomForest { trees, .. } => trees.len(),
            Model::LogisticRegression { .. } => 1,
        }
    }

    pub fn check(&self, n_features: usize) -> Result<(), String> {
        let classes = self.classes();
        if classes.len() != 2 || classes[0] == classes[1] {
            return Err(format!(
                "expected two distinct classes, got {:?}",
                classes
            ));
        }
        if !classes.contains(&POSITIVE_CLASS) {
            return Err(format!(
                "positive class {} missing from {:?}",
                POSITIVE_CLASS, classes
            ));
        }
        match self {
            Model::RandomForest { trees, .. } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                for (i, t) in trees.iter().enumerate() {
                    t.check(n_features, classes.len())
                        .map_err(|e| format!("tree {}: {}", i, e))?;
                }
            }
            Model::LogisticRegression {
                coefficients,
                intercept,
                ..
            } => {
                if coefficients.len() != n_features {
                    return Err(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        n_features
                    ));
                }
                if coefficients.iter().chain([intercept]).any(|c| !c.is_finite()) {
                    return Err("non-finite coefficient".to_string());
                }
            }
        }
        Ok(())
    }
}

impl Classifier for Model {
    fn classes(&self) -> &[i64] {
        match self {
            Model::RandomForest { classes, .. } | Model::LogisticRegression { classes, .. } => {
                classes
            }
        }
    }

    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, String> {
        match self {
            Model::RandomForest { classes, trees } => {
                let mut acc = vec![0.0; classes.len()];
                for (i, tree) in trees.iter().enumerate() {
                    let dist = tree
                        .leaf_distribution(x)
                        .map_err(|e| format!("tree {}: {}", i, e))?;
                    for (a, p) in acc.iter_mut().zip(dist) {
                        *a += p;
                    }
                }
                let n = trees.len() as f64;
                Ok(acc.into_iter().map(|a| a / n).collect())
            }
            Model::LogisticRegression {
                classes,
                coefficients,
                intercept,
            } => {
                if x.len() != coefficients.len() {
                    return Err(format!(
                        "expected {} features, got {}",
                        coefficients.len(),
                        x.len()
                    ));
                }
                let z: f64 = coefficients.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
                    + intercept;
                let p = 1.0 / (1.0 + (-z).exp());
                // Probabilities follow `classes` order.
                Ok(classes
                    .iter()
                    .map(|c| if *c == POSITIVE_CLASS { p } else { 1.0 - p })
                    .collect())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: RiskLabel,
    pub probability: f64,
}

pub fn predict(
    artifact: &ModelArtifact,
    vector: &FeatureVector,
) -> Result<PredictionResult, CardioError> {
    if vector.names() != artifact.schema.names() {
        return Err(CardioError::SchemaMismatch(format!(
            "vector has features [{}], artifact expects [{}]",
            vector.names().join(", "),
            artifact.schema.names().join(", ")
        )));
    }
    classify(&artifact.model, &vector.values())
}

/// Runs any classifier and maps its output onto a risk label.
pub fn classify<C: Classifier>(model: &C, x: &[f64]) -> Result<PredictionResult, CardioError> {
    let proba = model.predict_proba(x).map_err(CardioError::PredictionFailure)?;
    let class = argmax_class(model.classes(), &proba).map_err(CardioError::PredictionFailure)?;

    let idx = model
        .classes()
        .iter()
        .position(|c| *c == POSITIVE_CLASS)
        .ok_or_else(|| {
            CardioError::PredictionFailure(format!(
                "positive class {} not among model classes",
                POSITIVE_CLASS
            ))
        })?;
    let probability = *proba.get(idx).ok_or_else(|| {
        CardioError::PredictionFailure(format!(
            "model returned {} probabilities for {} classes",
            proba.len(),
            model.classes().len()
        ))
    })?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(CardioError::PredictionFailure(format!(
            "probability {} outside [0, 1]",
            probability
        )));
    }

    tracing::debug!(class, probability, "classified");
    let label = if class == POSITIVE_CLASS {
        RiskLabel::High
    } else {
        RiskLabel::Low
    };
    Ok(PredictionResult { label, probability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::PatientInput;
    use crate::services::features::FeatureSchema;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Splits on feature 0 at 0.5: left leaf mostly class 0, right mostly class 1.
    fn stump(left: [f64; 2], right: [f64; 2]) -> Tree {
        Tree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![0.0, 0.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest() -> Model {
        Model::RandomForest {
            classes: vec![0, 1],
            trees: vec![stump([9.0, 1.0], [2.0, 8.0]), stump([7.0, 3.0], [0.0, 4.0])],
        }
    }

    #[test]
    fn forest_averages_normalized_leaf_weights() {
        let m = forest();
        let low = m.predict_proba(&[0.0]).unwrap();
        assert!((low[1] - 0.2).abs() < 1e-12);
        let high = m.predict_proba(&[1.0]).unwrap();
        assert!((high[1] - 0.9).abs() < 1e-12);
        assert_eq!(m.predict(&[0.0]).unwrap(), 0);
        assert_eq!(m.predict(&[1.0]).unwrap(), 1);
    }

    #[test]
    fn threshold_is_inclusive_to_the_left() {
        let m = forest();
        assert_eq!(m.predict(&[0.5]).unwrap(), 0);
    }

    #[test]
    fn classify_maps_positive_class_to_high() {
        let r = classify(&forest(), &[1.0]).unwrap();
        assert_eq!(r.label, RiskLabel::High);
        assert!((r.probability - 0.9).abs() < 1e-12);
        let r = classify(&forest(), &[0.0]).unwrap();
        assert_eq!(r.label, RiskLabel::Low);
    }

    #[test]
    fn classify_is_deterministic() {
        let m = forest();
        let first = classify(&m, &[0.7]).unwrap();
        for _ in 0..10 {
            assert_eq!(classify(&m, &[0.7]).unwrap(), first);
        }
    }

    #[test]
    fn logistic_regression_uses_sigmoid() {
        let m = Model::LogisticRegression {
            classes: vec![0, 1],
            coefficients: vec![2.0, -1.0],
            intercept: 0.0,
        };
        let p = m.predict_proba(&[1.0, 2.0]).unwrap();
        assert!((p[1] - 0.5).abs() < 1e-12);
        let r = classify(&m, &[3.0, 0.0]).unwrap();
        assert_eq!(r.label, RiskLabel::High);
        assert!(m.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn check_rejects_backward_children() {
        let mut t = stump([1.0, 0.0], [0.0, 1.0]);
        t.children_left[0] = 0;
        assert!(t.check(1, 2).unwrap_err().contains("out-of-order"));
    }

    #[test]
    fn check_rejects_unknown_feature_index() {
        let t = stump([1.0, 0.0], [0.0, 1.0]);
        assert!(t.check(0, 2).unwrap_err().contains("unknown feature"));
    }

    #[test]
    fn check_rejects_wrong_class_width() {
        let t = stump([1.0, 0.0], [0.0, 1.0]);
        assert!(t.check(1, 3).is_err());
    }

    #[test]
    fn model_check_requires_positive_class() {
        let m = Model::LogisticRegression {
            classes: vec![0, 2],
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(m.check(1).unwrap_err().contains("positive class"));
    }

    struct Broken;

    impl Classifier for Broken {
        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict_proba(&self, _x: &[f64]) -> Result<Vec<f64>, String> {
            Err("model exploded".to_string())
        }
    }

    struct OutOfRange;

    impl Classifier for OutOfRange {
        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict_proba(&self, _x: &[f64]) -> Result<Vec<f64>, String> {
            Ok(vec![-0.5, 1.5])
        }
    }

    #[test]
    fn model_errors_become_prediction_failures() {
        let err = classify(&Broken, &[]).unwrap_err();
        assert!(matches!(err, CardioError::PredictionFailure(ref m) if m == "model exploded"));
        let err = classify(&OutOfRange, &[]).unwrap_err();
        assert!(matches!(err, CardioError::PredictionFailure(_)));
    }

    #[test]
    fn argmax_tie_goes_to_the_first_class() {
        assert_eq!(argmax_class(&[0, 1], &[0.5, 0.5]).unwrap(), 0);
        assert!(argmax_class(&[], &[]).is_err());
    }

    struct Counting {
        calls: Cell<usize>,
    }

    impl Classifier for Counting {
        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict_proba(&self, _x: &[f64]) -> Result<Vec<f64>, String> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![0.25, 0.75])
        }
    }

    #[test]
    fn classify_evaluates_the_model_once() {
        let m = Counting { calls: Cell::new(0) };
        let r = classify(&m, &[]).unwrap();
        assert_eq!(r.label, RiskLabel::High);
        assert_eq!(m.calls.get(), 1);
    }

    fn age_bmi_artifact() -> ModelArtifact {
        ModelArtifact {
            path: PathBuf::from("model.json"),
            features: vec!["age".to_string(), "bmi".to_string()],
            schema: FeatureSchema::from_names(&["age", "bmi"]).unwrap(),
            model: Model::LogisticRegression {
                classes: vec![0, 1],
                coefficients: vec![0.0, 0.0],
                intercept: 0.0,
            },
        }
    }

    fn vector(names: &[&str]) -> FeatureVector {
        FeatureSchema::from_names(names)
            .unwrap()
            .project(&PatientInput::default())
    }

    #[test]
    fn predict_rejects_vectors_that_differ_from_the_schema() {
        let artifact = age_bmi_artifact();
        assert!(predict(&artifact, &vector(&["age", "bmi"])).is_ok());

        for names in [&["bmi", "age"][..], &["age"][..], &["age", "bmi", "gender"][..]] {
            let err = predict(&artifact, &vector(names)).unwrap_err();
            assert!(
                matches!(err, CardioError::SchemaMismatch(ref m) if m.contains("artifact expects [age, bmi]")),
                "{:?} gave {:?}",
                names,
                err
            );
        }
    }
}
