//! Application state.

use std::sync::Arc;

use facemark_storage::UploadStore;
use facemark_vision::{load_label_font, FaceDetector, RedactionPipeline, SeetaFaceDetector};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything here is read-only after startup: the config, the pipeline
/// (parsed cascade model + label font) and the upload store root.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<RedactionPipeline>,
    pub store: Arc<UploadStore>,
}

impl AppState {
    /// Create application state, loading the cascade model and label font.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let detector =
            SeetaFaceDetector::from_file(&config.model_path, config.detector.clone())?;
        Self::with_detector(config, Arc::new(detector))
    }

    /// Create application state around an already-built detector.
    ///
    /// This is the seam handler tests use to run without the model file.
    pub fn with_detector(
        config: ApiConfig,
        detector: Arc<dyn FaceDetector>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let font = load_label_font(config.font_path.as_deref())?;
        let pipeline = RedactionPipeline::new(detector, font);
        let store = UploadStore::new(&config.uploads_dir)?;

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            store: Arc::new(store),
        })
    }
}
