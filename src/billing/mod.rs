//! Billing history: 30-day usage normalization and provider rates.

pub mod normalize;
pub mod rates;

pub use normalize::*;
pub use rates::*;
