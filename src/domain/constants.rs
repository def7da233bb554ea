pub const DEFAULT_MODEL_PATH: &str = "cardio_rf_model.json";
pub const DEFAULT_DATASET_PATH: &str = "cardio_train.csv";
pub const DEFAULT_DATASET_DELIMITER: char = ';';

/// Days per year used by the training data's age-in-days column.
pub const DAYS_PER_YEAR: f64 = 365.25;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Class label the classifier uses for "disease present".
pub const POSITIVE_CLASS: i64 = 1;

pub const BMI_NORMAL_MIN: f64 = 18.5;
pub const BMI_NORMAL_MAX: f64 = 25.0;

pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const HEIGHT_RANGE: (f64, f64) = (100.0, 250.0);
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 200.0);
pub const SYSTOLIC_RANGE: (u32, u32) = (80, 250);
pub const DIASTOLIC_RANGE: (u32, u32) = (40, 150);

pub const AGE_HISTOGRAM_BINS: usize = 20;
pub const DATASET_PREVIEW_ROWS: usize = 5;
