//! # Ovel IO
//!
//! Persistence layer for the Ovel simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON file helpers and preset loading
//! - Append-only telemetry logs with gzip archiving
//! - Replay manifests: the only state persisted between runs

/// Error types and result aliases for I/O operations
pub mod error;
/// Replay manifests recording how to rebuild a run from its seed
pub mod replay;
/// Validated serialization helpers for JSON and TOML presets
pub mod serialization;
/// Telemetry logging to JSONL files
pub mod telemetry;

pub use error::{IoError, Result};
pub use replay::ReplayManifest;
pub use serialization::{
    from_json, load_preset, read_json_file, to_json, to_json_pretty, write_json_file,
};
pub use telemetry::{TelemetryLogger, TelemetryRecord};
