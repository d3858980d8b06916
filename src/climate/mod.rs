//! Temperature aggregation: daily means and billing-window averages.

pub mod window;

pub use window::*;
