//! Axum HTTP API server.
//!
//! This crate provides:
//! - The `/upload` face detection endpoint (disk and inline output modes)
//! - Static serving of generated images
//! - Request logging, security headers and CORS
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, OutputMode};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
