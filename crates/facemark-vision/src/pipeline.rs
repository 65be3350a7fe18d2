//! The detection-and-redaction pipeline.

use std::sync::Arc;

use ab_glyph::FontArc;
use image::RgbImage;
use tracing::debug;

use facemark_models::FaceBox;

use crate::decode::decode_image;
use crate::detector::FaceDetector;
use crate::error::VisionResult;
use crate::render;

/// Result of one pipeline run.
///
/// `faces` is ordered as the detector emitted the boxes (1-based ids);
/// both images have the input's dimensions.
#[derive(Debug)]
pub struct Redaction {
    pub faces: Vec<FaceBox>,
    pub marked: RgbImage,
    pub blurred: RgbImage,
}

impl Redaction {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Decode → detect → render, as a single synchronous pass.
///
/// Holds only process-wide read-only state (the detector's parsed model and
/// the label font), so one pipeline instance is shared across requests.
pub struct RedactionPipeline {
    detector: Arc<dyn FaceDetector>,
    font: FontArc,
}

impl RedactionPipeline {
    pub fn new(detector: Arc<dyn FaceDetector>, font: FontArc) -> Self {
        Self { detector, font }
    }

    /// Run the full pipeline over raw upload bytes.
    ///
    /// Zero detections is a valid outcome: both output images are then
    /// untouched clones of the input. Undecodable bytes fail before the
    /// detector runs.
    pub fn run(&self, bytes: &[u8]) -> VisionResult<Redaction> {
        let rgb = decode_image(bytes)?;
        let (width, height) = rgb.dimensions();

        // Detection is luminance-based; color is kept for rendering only.
        let gray = image::imageops::grayscale(&rgb);
        let raw = self.detector.detect(gray.as_raw(), width, height);

        let mut faces = Vec::with_capacity(raw.len());
        for r in raw {
            let id = faces.len() as u32 + 1;
            if let Some(face) = FaceBox::clamped(id, r.x, r.y, r.width, r.height, width, height) {
                faces.push(face);
            }
        }

        debug!(width, height, face_count = faces.len(), "detection complete");

        let marked = render::mark_faces(&rgb, &faces, &self.font);
        let blurred = render::blur_faces(&rgb, &faces);

        Ok(Redaction {
            faces,
            marked,
            blurred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::RawFace;
    use crate::error::VisionError;
    use crate::fonts::load_label_font;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, Rgb};

    /// Deterministic detector returning a fixed set of rectangles.
    struct FixedDetector(Vec<RawFace>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Vec<RawFace> {
            self.0.clone()
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 251) as u8, (y % 241) as u8, ((x * y) % 239) as u8])
        });
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buf
    }

    fn pipeline_with(faces: Vec<RawFace>) -> Option<RedactionPipeline> {
        let Ok(font) = load_label_font(None) else {
            eprintln!("no system font installed, skipping");
            return None;
        };
        Some(RedactionPipeline::new(Arc::new(FixedDetector(faces)), font))
    }

    #[test]
    fn zero_faces_yields_identity_copies() {
        let Some(pipeline) = pipeline_with(vec![]) else {
            return;
        };
        let bytes = png_bytes(80, 60);
        let result = pipeline.run(&bytes).unwrap();

        assert_eq!(result.face_count(), 0);
        assert!(result.faces.is_empty());

        let source = decode_image(&bytes).unwrap();
        assert_eq!(result.marked.as_raw(), source.as_raw());
        assert_eq!(result.blurred.as_raw(), source.as_raw());
    }

    #[test]
    fn boxes_are_clamped_and_renumbered() {
        let Some(pipeline) = pipeline_with(vec![
            // Pokes past the left border: clamped.
            RawFace { x: -10, y: 20, width: 30, height: 30 },
            // Entirely outside: dropped.
            RawFace { x: 500, y: 500, width: 30, height: 30 },
            // Interior box.
            RawFace { x: 40, y: 10, width: 20, height: 20 },
        ]) else {
            return;
        };
        let result = pipeline.run(&png_bytes(100, 80)).unwrap();

        assert_eq!(result.face_count(), 2);
        let ids: Vec<u32> = result.faces.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let first = &result.faces[0];
        assert_eq!((first.x, first.y), (0, 20));
        assert_eq!(first.width, 20);

        for face in &result.faces {
            assert!(face.right() <= 100);
            assert!(face.bottom() <= 80);
            assert!(face.width > 0 && face.height > 0);
        }
    }

    #[test]
    fn outputs_keep_input_dimensions() {
        let Some(pipeline) = pipeline_with(vec![RawFace { x: 10, y: 30, width: 25, height: 25 }])
        else {
            return;
        };
        let result = pipeline.run(&png_bytes(120, 90)).unwrap();
        assert_eq!(result.marked.dimensions(), (120, 90));
        assert_eq!(result.blurred.dimensions(), (120, 90));
    }

    #[test]
    fn detection_is_deterministic_across_runs() {
        let Some(pipeline) = pipeline_with(vec![RawFace { x: 12, y: 18, width: 24, height: 24 }])
        else {
            return;
        };
        let bytes = png_bytes(64, 64);
        let a = pipeline.run(&bytes).unwrap();
        let b = pipeline.run(&bytes).unwrap();
        assert_eq!(a.faces, b.faces);
        assert_eq!(a.face_count(), b.face_count());
    }

    #[test]
    fn unreadable_bytes_fail_before_detection() {
        let Some(pipeline) = pipeline_with(vec![]) else {
            return;
        };
        let err = pipeline.run(b"plain text pretending to be a jpg").unwrap_err();
        assert!(matches!(err, VisionError::Decode(_)));
    }
}
