use crate::domain::constants::ARTIFACT_FORMAT_VERSION;
use crate::domain::errors::CardioError;
use crate::services::features::FeatureSchema;
use crate::services::inference::Model;
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct ArtifactFile {
    format_version: u32,
    features: Vec<String>,
    model: Model,
}

/// A loaded, validated model bundle. Never mutated after load.
#[derive(Debug)]
pub struct ModelArtifact {
    pub path: PathBuf,
    pub features: Vec<String>,
    pub schema: FeatureSchema,
    pub model: Model,
}

pub fn load_artifact(path: &Path) -> Result<ModelArtifact, CardioError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CardioError::ArtifactNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let invalid = |reason: String| CardioError::InvalidArtifact {
        path: path.to_path_buf(),
        reason,
    };

    let file: ArtifactFile = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
    if file.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(invalid(format!(
            "unsupported format_version {} (expected {})",
            file.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }
    if file.features.is_empty() {
        return Err(invalid("feature list is empty".to_string()));
    }

    let schema = FeatureSchema::from_names(&file.features)?;
    file.model.check(schema.feature_count()).map_err(invalid)?;

    tracing::info!(
        path = %path.display(),
        kind = %file.model.kind(),
        estimators = file.model.estimator_count(),
        features = schema.feature_count(),
        "loaded model artifact"
    );
    Ok(ModelArtifact {
        path: path.to_path_buf(),
        features: file.features,
        schema,
        model: file.model,
    })
}

/// Load-once holder for the artifact. A failed load leaves the cache empty.
#[derive(Default)]
pub struct ArtifactCache {
    cell: OnceCell<ModelArtifact>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, path: &Path) -> Result<&ModelArtifact, CardioError> {
        let artifact = self.cell.get_or_try_init(|| load_artifact(path))?;
        if artifact.path != path {
            tracing::warn!(
                requested = %path.display(),
                cached = %artifact.path.display(),
                "model artifact already loaded from another path; using cached artifact"
            );
        }
        Ok(artifact)
    }

    pub fn get(&self) -> Option<&ModelArtifact> {
        self.cell.get()
    }
}

static SHARED: Lazy<ArtifactCache> = Lazy::new(ArtifactCache::new);

pub fn shared_cache() -> &'static ArtifactCache {
    &SHARED
}

/// Process-wide artifact lookup.
pub fn shared_artifact(path: &Path) -> Result<&'static ModelArtifact, CardioError> {
    shared_cache().get_or_load(path)
}
