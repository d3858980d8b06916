//! Cost projection and the per-query forecasting service.

pub mod projector;
pub mod service;

pub use projector::*;
pub use service::*;
