//! Summary tables over the training dataset, for display only.

use crate::cli::InsightsView;
use crate::domain::constants::{AGE_HISTOGRAM_BINS, DATASET_PREVIEW_ROWS};
use crate::domain::errors::CardioError;
use crate::domain::models::{
    AgeBin, CardioRecord, ClassCount, ClassMeans, CrossCount, InsightsReport,
};
use std::collections::BTreeMap;
use std::path::Path;

pub fn load_dataset(path: &Path, delimiter: char) -> Result<Vec<CardioRecord>, CardioError> {
    let unavailable = |reason: String| CardioError::DatasetUnavailable {
        path: path.to_path_buf(),
        reason,
    };
    if !delimiter.is_ascii() {
        return Err(unavailable(format!(
            "delimiter {:?} is not a single ASCII character",
            delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| unavailable(format!("not found ({}). Visualization unavailable.", e)))?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CardioRecord>().enumerate() {
        // Header is line 1.
        let rec = row.map_err(|e| unavailable(format!("row {}: {}", i + 2, e)))?;
        records.push(rec);
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded dataset");
    Ok(records)
}

pub fn build_insights(records: &[CardioRecord], view: InsightsView) -> InsightsReport {
    let wants = |v: InsightsView| view == InsightsView::All || view == v;

    let mut report = InsightsReport {
        total_records: records.len(),
        ..InsightsReport::default()
    };
    if wants(InsightsView::Overview) {
        report.preview = Some(records.iter().take(DATASET_PREVIEW_ROWS).cloned().collect());
    }
    if wants(InsightsView::Distribution) {
        report.target_distribution = Some(value_counts(records, |r| r.cardio));
        report.gender_distribution = Some(value_counts(records, |r| r.gender));
    }
    if wants(InsightsView::Correlations) {
        report.cholesterol_by_cardio = Some(cross_counts(records, |r| r.cholesterol));
        report.body_by_cardio = Some(class_means(records));
    }
    if wants(InsightsView::Age) {
        report.age_histogram = Some(age_histogram(records, AGE_HISTOGRAM_BINS));
    }
    report
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn value_counts(records: &[CardioRecord], key: impl Fn(&CardioRecord) -> u8) -> Vec<ClassCount> {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(key(r)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| ClassCount {
            value,
            count,
            percent: percent(count, records.len()),
        })
        .collect()
}

fn cross_counts(records: &[CardioRecord], key: impl Fn(&CardioRecord) -> u8) -> Vec<CrossCount> {
    let mut counts: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
    for r in records {
        let entry = counts.entry(key(r)).or_insert((0, 0));
        if r.cardio == 1 {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(value, (negative, positive))| CrossCount {
            value,
            negative,
            positive,
        })
        .collect()
}

fn class_means(records: &[CardioRecord]) -> Vec<ClassMeans> {
    let mut sums: BTreeMap<u8, (usize, f64, f64, f64)> = BTreeMap::new();
    for r in records {
        let e = sums.entry(r.cardio).or_insert((0, 0.0, 0.0, 0.0));
        e.0 += 1;
        e.1 += r.height;
        e.2 += r.weight;
        e.3 += r.bmi();
    }
    sums.into_iter()
        .map(|(cardio, (count, h, w, b))| {
            let n = count as f64;
            ClassMeans {
                cardio,
                count,
                mean_height: h / n,
                mean_weight: w / n,
                mean_bmi: b / n,
            }
        })
        .collect()
}

/// Equal-width bins over the observed age range in years; the last bin is
/// closed on the right.
fn age_histogram(records: &[CardioRecord], bins: usize) -> Vec<AgeBin> {
    let ages: Vec<(u32, u8)> = records.iter().map(|r| (r.age_years(), r.cardio)).collect();
    let (Some(min), Some(max)) = (
        ages.iter().map(|(a, _)| *a).min(),
        ages.iter().map(|(a, _)| *a).max(),
    ) else {
        return Vec::new();
    };

    let lo = f64::from(min);
    let span = f64::from(max - min).max(1.0);
    let width = span / bins as f64;
    let mut out: Vec<AgeBin> = (0..bins)
        .map(|i| AgeBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            negative: 0,
            positive: 0,
        })
        .collect();

    for (age, cardio) in ages {
        let idx = (((f64::from(age) - lo) / width) as usize).min(bins - 1);
        if cardio == 1 {
            out[idx].positive += 1;
        } else {
            out[idx].negative += 1;
        }
    }
    out
}
