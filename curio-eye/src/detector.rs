//! Lazy-loading detection adapter

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::models::{Detection, ModelFetcher, YoloModel};
use opencv::core::Mat;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Detection adapter owning the single model instance for the process
///
/// The model is fetched and loaded on first use and then reused for the
/// life of the process; it is never reloaded or unloaded.
pub struct Detector {
    fetcher: ModelFetcher,
    model: RwLock<Option<Arc<YoloModel>>>,
}

impl Detector {
    pub fn new(config: Arc<VisionConfig>) -> Self {
        Self {
            fetcher: ModelFetcher::new(config),
            model: RwLock::new(None),
        }
    }

    /// Whether the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.model.read().is_some()
    }

    /// Load the pretrained model on first call; later calls are no-ops
    ///
    /// A failed load is returned to the caller and not retried here; the
    /// next call starts over from fetch.
    pub async fn ensure_loaded(&self) -> Result<(), VisionError> {
        if self.is_loaded() {
            return Ok(());
        }

        info!("Loading detection model...");
        let path = self.fetcher.detection_model().await?;
        let model = YoloModel::load(&path)?;

        let mut slot = self.model.write();
        if slot.is_none() {
            *slot = Some(Arc::new(model));
        }
        info!("Detection model ready");
        Ok(())
    }

    /// Run inference on a captured frame
    ///
    /// Returns every detection the model keeps; the scan-level threshold
    /// and top-pick selection belong to the caller.
    pub fn detect(&self, frame: &Mat) -> Result<Vec<Detection>, VisionError> {
        let model = self
            .model
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| VisionError::Model("Detection model is not loaded".to_string()))?;
        model.detect(frame)
    }
}
