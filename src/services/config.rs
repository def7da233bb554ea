use crate::domain::constants::{
    DEFAULT_DATASET_DELIMITER, DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH,
};
use crate::domain::models::ConfigFile;
use std::path::{Path, PathBuf};

/// Paths and options after applying flag > config file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub delimiter: char,
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/cardio/config.toml"))
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    // No HOME means no config file, not an error.
    let Ok(path) = config_path() else {
        return Ok(ConfigFile::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let cfg: ConfigFile = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

pub fn resolve_settings(
    cfg: &ConfigFile,
    model_flag: Option<&Path>,
    dataset_flag: Option<&Path>,
) -> Settings {
    let model_path = model_flag
        .map(Path::to_path_buf)
        .or_else(|| cfg.paths.model.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
    let dataset_path = dataset_flag
        .map(Path::to_path_buf)
        .or_else(|| cfg.paths.dataset.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
    Settings {
        model_path,
        dataset_path,
        delimiter: cfg.dataset.delimiter.unwrap_or(DEFAULT_DATASET_DELIMITER),
    }
}
