//! # nubo-api
//!
//! HTTP API layer for Nubo, built on Axum. Routes are organized by
//! domain and mounted under `/api`. Handlers stay thin: they parse the
//! request, call into `nubo-service`, and shape the response.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
