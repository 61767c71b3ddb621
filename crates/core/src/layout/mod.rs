//! Layout reconstruction module for OCR tokens.
//!
//! This module contains:
//! - Reconstruction parameters (MergeParams)
//! - Token-to-word merging
//! - Word-to-line merging for the page reading order
//! - Per-field row reconstruction and formatting

pub mod lines;
pub mod params;
pub mod rows;
pub mod words;

// Re-export params
pub use params::*;

pub use lines::{merge_lines, merge_token_lines};
pub use rows::{format_field, group_rows, reconstruct_rows};
pub use words::{MergeRule, merge_tokens};
