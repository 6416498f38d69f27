use std::fs;
use std::path::{Path, PathBuf};

use super::ArtifactBundle;
use crate::constants::APP_NAME;
use crate::logic::error::ArtifactError;

/// Get default bundle path
pub fn default_bundle_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("bundle_v1.json")
}

/// Save bundle to disk
pub fn save_bundle(bundle: &ArtifactBundle, path: &Path) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(bundle)?;
    fs::write(path, json)?;
    log::info!("Artifact bundle {} saved to {}", bundle.metadata.id, path.display());
    Ok(())
}

/// Load bundle from disk with validation
pub fn load_bundle(path: &Path) -> Result<ArtifactBundle, ArtifactError> {
    let data = fs::read(path)?;
    let bundle: ArtifactBundle = serde_json::from_slice(&data)?;

    bundle.check_consistency()?;

    log::info!(
        "Artifact bundle {} loaded from {} (layout {:08x})",
        bundle.metadata.id,
        path.display(),
        bundle.schema.layout_hash()
    );
    Ok(bundle)
}
