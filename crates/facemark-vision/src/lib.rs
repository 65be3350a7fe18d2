#![deny(unreachable_patterns)]
//! Face detection and redaction pipeline.
//!
//! This crate provides:
//! - Image decoding with a distinct "unreadable image" failure
//! - A pluggable [`FaceDetector`] seam with a SeetaFace cascade backend
//! - Redaction rendering: outlined + labeled copy, face-blurred copy
//! - JPEG encoding at the fixed output quality

pub mod decode;
pub mod detector;
pub mod encode;
pub mod error;
pub mod fonts;
pub mod pipeline;
pub mod render;
pub mod seeta;

pub use decode::decode_image;
pub use detector::{DetectorConfig, FaceDetector, RawFace};
pub use encode::encode_jpeg;
pub use error::{VisionError, VisionResult};
pub use fonts::load_label_font;
pub use pipeline::{Redaction, RedactionPipeline};
pub use seeta::SeetaFaceDetector;
