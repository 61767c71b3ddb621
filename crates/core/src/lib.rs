//! zonetext - Rebuild words, lines and field values from OCR tokens.
//!
//! The recognizer hands over a flat, unordered set of text fragments with
//! pixel boxes. This crate merges them back into words and reading-order
//! lines, and turns the content of user-drawn zones into export-ready
//! field strings, including a fixed given-name/surname split for name
//! fields. Everything here is synchronous, pure and total.

pub mod error;
pub mod layout;
pub mod model;
pub mod names;
pub mod pipeline;
pub mod utils;
pub mod zone;

pub use error::{Result, ZoneTextError};
pub use layout::MergeParams;
pub use model::{ConnectedWord, Item, Line, Row, Token};
pub use names::{NameInput, NameItem, normalize_names, normalize_row, normalize_rows};
pub use pipeline::{
    FieldConfig, PageInput, PageReconstruction, Template, extract_field, extract_fields,
    extract_fields_par, reconstruct_page,
};
pub use zone::{FieldType, Zone, ZoneMapper};
