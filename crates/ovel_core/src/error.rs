//! Error types for the simulation core.
//!
//! The core is pure in-memory computation, so the only failures are inputs
//! rejected at the boundary before any state is touched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Seed was not a finite integer representable without loss.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Step delta was negative or not finite.
    #[error("Invalid step delta: {0}")]
    InvalidDelta(f64),

    /// Preset failed validation.
    #[error("Invalid preset: {0}")]
    InvalidPreset(String),

    #[error("Probe index {index} out of range (probe count {count})")]
    ProbeOutOfRange { index: usize, count: usize },

    #[error("Non-finite {0}")]
    NonFinite(&'static str),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid_seed<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSeed(msg.into())
    }

    #[must_use]
    pub fn invalid_preset<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPreset(msg.into())
    }
}

impl From<anyhow::Error> for SimError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_preset(err.to_string())
    }
}
