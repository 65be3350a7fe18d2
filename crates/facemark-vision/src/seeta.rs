//! SeetaFace (rustface) detector backend.

use std::io::Cursor;
use std::path::Path;

use rustface::Detector;

use crate::detector::{DetectorConfig, FaceDetector, RawFace};
use crate::error::{VisionError, VisionResult};

/// Detector score per `min_neighbors` step.
///
/// The funnel cascade reports a confidence score instead of OpenCV-style
/// neighbor voting; the default of 5 neighbors lands on the threshold of
/// 2.0 that rustface deployments run with.
const SCORE_PER_NEIGHBOR: f64 = 0.4;

/// Horizontal/vertical sliding window step in pixels.
const SLIDE_WINDOW_STEP: u32 = 4;

/// Face detector backed by the `rustface` crate (SeetaFace funnel cascade).
///
/// The model is parsed once, at construction, and is immutable afterwards.
/// rustface's detector object carries per-scan state, so each `detect` call
/// builds one from a clone of the shared model; the parsed model is the
/// process-wide read-only part.
pub struct SeetaFaceDetector {
    model: rustface::Model,
    config: DetectorConfig,
}

impl SeetaFaceDetector {
    /// Load the cascade model from a file path.
    pub fn from_file(path: impl AsRef<Path>, config: DetectorConfig) -> VisionResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|_| VisionError::ModelNotFound(path.to_path_buf()))?;
        Self::from_bytes(&data, config)
    }

    /// Load the cascade model from raw bytes.
    pub fn from_bytes(data: &[u8], config: DetectorConfig) -> VisionResult<Self> {
        let model = rustface::read_model(Cursor::new(data))
            .map_err(|e| VisionError::ModelInvalid(e.to_string()))?;
        Ok(Self { model, config })
    }
}

/// Map the OpenCV-style scale step (> 1) to rustface's pyramid shrink
/// factor (< 1).
fn pyramid_factor(scale_factor: f32) -> f32 {
    (1.0 / scale_factor.max(1.01)).clamp(0.1, 0.99)
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<RawFace> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.config.min_face_size);
        detector.set_score_thresh(f64::from(self.config.min_neighbors) * SCORE_PER_NEIGHBOR);
        detector.set_pyramid_scale_factor(pyramid_factor(self.config.scale_factor));
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let mut image = rustface::ImageData::new(gray, width, height);
        detector
            .detect(&mut image)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                RawFace {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pyramid_factor_inverts_scale_step() {
        let f = pyramid_factor(1.1);
        assert!((f - 1.0 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn pyramid_factor_clamps_degenerate_steps() {
        // A scale step at or below 1.0 would never shrink the pyramid.
        assert!(pyramid_factor(1.0) < 1.0);
        assert!(pyramid_factor(0.5) < 1.0);
        assert!(pyramid_factor(1000.0) >= 0.1);
    }

    #[test]
    fn default_neighbors_map_to_standard_threshold() {
        let cfg = DetectorConfig::default();
        let thresh = f64::from(cfg.min_neighbors) * SCORE_PER_NEIGHBOR;
        assert!((thresh - 2.0).abs() < 1e-9);
    }

    #[test]
    fn garbage_model_bytes_are_rejected() {
        let err = SeetaFaceDetector::from_bytes(b"not a model", DetectorConfig::default())
            .err()
            .expect("must fail");
        assert!(matches!(err, VisionError::ModelInvalid(_)));
    }

    #[test]
    fn missing_model_file_is_a_distinct_error() {
        let err = SeetaFaceDetector::from_file(
            "/nonexistent/seeta_fd_frontal_v1.0.bin",
            DetectorConfig::default(),
        )
        .err()
        .expect("must fail");
        assert!(matches!(err, VisionError::ModelNotFound(_)));
    }
}
