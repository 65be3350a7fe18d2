//! API configuration.

use std::path::PathBuf;

use facemark_models::MAX_UPLOAD_BYTES;
use facemark_vision::DetectorConfig;

/// How result images are returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Write originals and results under the public uploads directory and
    /// return relative URLs.
    #[default]
    Disk,
    /// Return marked/blurred images inline as Base64 JPEG strings and
    /// write nothing to disk (the serverless shape).
    Inline,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Public uploads directory (disk mode)
    pub uploads_dir: PathBuf,
    /// Result delivery mode
    pub output_mode: OutputMode,
    /// Path of the SeetaFace cascade model
    pub model_path: PathBuf,
    /// Explicit label font path; system fonts are probed when unset
    pub font_path: Option<PathBuf>,
    /// Cascade scan parameters
    pub detector: DetectorConfig,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: MAX_UPLOAD_BYTES,
            uploads_dir: PathBuf::from("static/uploads"),
            output_mode: OutputMode::Disk,
            model_path: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
            font_path: None,
            detector: DetectorConfig::default(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let detector_defaults = DetectorConfig::default();

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: std::env::var("FACEMARK_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            uploads_dir: std::env::var("FACEMARK_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            output_mode: match std::env::var("FACEMARK_OUTPUT_MODE").as_deref() {
                Ok("inline") => OutputMode::Inline,
                _ => OutputMode::Disk,
            },
            model_path: std::env::var("FACEMARK_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            font_path: std::env::var("FACEMARK_FONT_PATH").ok().map(PathBuf::from),
            detector: DetectorConfig {
                scale_factor: std::env::var("FACEMARK_SCALE_FACTOR")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(detector_defaults.scale_factor),
                min_neighbors: std::env::var("FACEMARK_MIN_NEIGHBORS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(detector_defaults.min_neighbors),
                min_face_size: std::env::var("FACEMARK_MIN_FACE_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(detector_defaults.min_face_size),
            },
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
