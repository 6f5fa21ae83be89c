//! Storage usage accounting.

pub mod service;

pub use service::UsageService;
