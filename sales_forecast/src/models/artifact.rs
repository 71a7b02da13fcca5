//! On-disk model artifact
//!
//! The artifact is a JSON document wrapping the trained model with a format
//! version. Writes go to a sibling temporary file that is then renamed over
//! the target, so readers never observe a partially written artifact.

use crate::error::{ForecastError, Result};
use crate::models::TrainedRandomForest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Bumped whenever the serialized layout changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    model: &'a TrainedRandomForest,
}

/// A model read back from disk
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub model: TrainedRandomForest,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `model` to `path`, replacing any previous artifact
pub fn save_model(model: &TrainedRandomForest, path: &Path) -> Result<()> {
    let artifact = ArtifactRef {
        format_version: ARTIFACT_FORMAT_VERSION,
        saved_at: Utc::now(),
        model,
    };
    let bytes =
        serde_json::to_vec(&artifact).map_err(|e| ForecastError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read the artifact at `path`.
///
/// Anything that stops the file from yielding a usable model, including a
/// read failure, is a `Deserialization` error.
pub fn load_model(path: &Path) -> Result<ModelArtifact> {
    let bytes = fs::read(path)
        .map_err(|e| ForecastError::Deserialization(format!("{}: {}", path.display(), e)))?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|e| {
        ForecastError::Deserialization(format!("{}: {}", path.display(), e))
    })?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ForecastError::Deserialization(format!(
            "{}: unsupported artifact version {} (expected {})",
            path.display(),
            artifact.format_version,
            ARTIFACT_FORMAT_VERSION
        )));
    }

    artifact
        .model
        .validate()
        .map_err(|e| match e {
            ForecastError::Deserialization(msg) => {
                ForecastError::Deserialization(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

    Ok(artifact)
}

/// Whether an artifact exists at `path`.
///
/// Only a missing file counts as absent; other metadata failures are errors.
pub fn artifact_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ForecastError::Deserialization(format!(
            "{}: {}",
            path.display(),
            e
        ))),
    }
}
