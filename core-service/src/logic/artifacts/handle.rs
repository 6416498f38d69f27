//! Shared, swappable reference to the bundle in service
//!
//! Readers clone the inner `Arc` and keep using that bundle even if a
//! retrain swaps in a new one mid-request; a prediction never sees a mix
//! of two bundles.

use std::sync::Arc;

use parking_lot::RwLock;

use super::ArtifactBundle;

#[derive(Debug)]
pub struct ArtifactHandle {
    current: RwLock<Arc<ArtifactBundle>>,
}

impl ArtifactHandle {
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self {
            current: RwLock::new(Arc::new(bundle)),
        }
    }

    /// Snapshot of the bundle in service
    pub fn current(&self) -> Arc<ArtifactBundle> {
        Arc::clone(&self.current.read())
    }

    /// Atomically replace the bundle; returns the previous one
    pub fn replace(&self, bundle: ArtifactBundle) -> Arc<ArtifactBundle> {
        let next = Arc::new(bundle);
        log::info!("Swapping artifact bundle to {}", next.metadata.id);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
