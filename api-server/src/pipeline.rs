//! Bundle lifecycle at startup and on retrain

use premium_core::logic::artifacts::{load_bundle, save_bundle};
use premium_core::{ArtifactBundle, PipelineError, Trainer};

use crate::config::Config;

/// Load the saved bundle if one exists, otherwise train from the dataset and save
pub fn load_or_train(config: &Config) -> Result<ArtifactBundle, PipelineError> {
    if let Some(path) = config.artifacts_path.as_deref().filter(|p| p.exists()) {
        tracing::info!("Loading artifact bundle from {}", path.display());
        return Ok(load_bundle(path)?);
    }

    let bundle = train(config)?;
    persist(config, &bundle);
    Ok(bundle)
}

/// Train from `DATASET_PATH`; writes nothing
pub fn train(config: &Config) -> Result<ArtifactBundle, PipelineError> {
    tracing::info!("Training from {}", config.dataset_path.display());

    let trainer = Trainer::new(config.trainer_config())?;
    Ok(trainer.train_file(&config.dataset_path)?)
}

/// Save to `ARTIFACTS_PATH` when configured
pub fn persist(config: &Config, bundle: &ArtifactBundle) {
    let Some(path) = config.artifacts_path.as_deref() else {
        return;
    };

    // The fitted bundle is still usable without a copy on disk
    if let Err(e) = save_bundle(bundle, path) {
        tracing::warn!("Could not save artifact bundle to {}: {}", path.display(), e);
    }
}
