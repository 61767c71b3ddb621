//! Error types for the zonetext library.
//!
//! Reconstruction itself never fails. Only the configuration surface
//! (templates, field types, threshold overrides, page files) is fallible.

use thiserror::Error;

/// Primary error type for configuration and input loading.
#[derive(Error, Debug)]
pub enum ZoneTextError {
    #[error("unknown field type: {0:?} (expected PERSON_NAME or NORMAL_TEXT)")]
    UnknownFieldType(String),

    #[error("invalid parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: f64 },

    #[error("invalid zone {key:?}: {reason}")]
    InvalidZone { key: String, reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for ZoneTextError.
pub type Result<T> = std::result::Result<T, ZoneTextError>;
