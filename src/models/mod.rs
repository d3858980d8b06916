//! Regression model of 30-day usage against billing-cycle temperature.

pub mod quadratic;

pub use quadratic::*;
