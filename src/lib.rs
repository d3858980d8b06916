//! `kwh-forecast` library crate.
//!
//! The binary (`kwh`) is a thin wrapper around this library so that:
//!
//! - the forecasting core is testable without spawning processes
//! - the core (climate, billing, models, forecast) never touches stdin/stdout
//! - presentation (cli, report, plot) can change without touching the math

pub mod app;
pub mod billing;
pub mod cli;
pub mod climate;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
