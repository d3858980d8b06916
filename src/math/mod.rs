//! Mathematical utilities: regressor scaling and least squares.

pub mod ols;
pub mod scale;

pub use ols::*;
pub use scale::*;
