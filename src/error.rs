//! Error types.
//!
//! Two layers:
//!
//! - `ForecastError`: typed failures of the forecasting core (alignment,
//!   normalization, rates, regression, projection). Every core operation
//!   returns one of these instead of producing NaN and carrying on.
//! - `AppError`: what the binary reports, a message plus a process exit code.
//!
//! Exit codes:
//! - `2` bad input (missing files/columns, unknown provider, invalid month)
//! - `3` no usable rows after ingest
//! - `4` model/data failure (empty window, degenerate fit, ...)

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::ProviderId;

/// Failures of the forecasting core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("No daily climate records fall within {start}..={end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },

    #[error("Billing period {start}..{end} has a non-positive duration ({days} days)")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
        days: i64,
    },

    #[error("Provider '{0}' has zero accumulated usage; its rate is undefined")]
    ZeroUsage(ProviderId),

    #[error(
        "Not enough data to fit a quadratic: {samples} sample(s), {distinct} distinct temperature(s) (need at least 3)"
    )]
    InsufficientData { samples: usize, distinct: usize },

    #[error("Fitted curve has no quadratic term (a = {a:e}); it has no critical point")]
    DegenerateModel { a: f64 },

    #[error("Fitted curve is concave (a = {a:e}); the critical point is a maximum")]
    NonConvexModel { a: f64 },

    #[error("Unknown provider '{0}'")]
    UnknownProvider(ProviderId),

    #[error("Invalid month {0}; expected 1-12")]
    InvalidMonth(u32),
}

impl ForecastError {
    /// Exit code used when this error ends the process.
    pub fn exit_code(&self) -> u8 {
        match self {
            ForecastError::UnknownProvider(_) | ForecastError::InvalidMonth(_) => 2,
            _ => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
