//! Personal-name normalization.
//!
//! Each row of name tokens becomes `"<given> <surname>"`: every token but
//! the last is concatenated with no separator, then one space, then the last
//! token. The rule is positional only. It performs no dictionary lookup and
//! no reordering, and it does not inspect the script of the tokens.

use serde::Deserialize;

use crate::model::Row;
use crate::utils::{key_f64, lenient_f64, lenient_string};

/// A positioned name fragment for callers that have not built rows yet.
///
/// Coordinates read like token coordinates: missing, `null` or unparsable
/// values become 0.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NameItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: f64,
}

impl NameItem {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// The two accepted input shapes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NameInput {
    /// Rows already ordered top to bottom, tokens left to right.
    Rows(Vec<Row>),
    /// Flat fragments, grouped into rows by `y` before normalization.
    Items(Vec<NameItem>),
}

/// Formats one row, or `None` when it has no non-blank tokens.
///
/// Blank or whitespace-only tokens are dropped before the split, so the
/// surname is the last token that carries text: `["A", "B", " "]` gives
/// `"A B"`. Remaining tokens are used verbatim.
pub fn normalize_row<S: AsRef<str>>(row: &[S]) -> Option<String> {
    let tokens: Vec<&str> = row
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.trim().is_empty())
        .collect();

    match tokens.split_last() {
        None => None,
        Some((only, [])) => Some((*only).to_string()),
        Some((surname, given)) => Some(format!("{} {}", given.concat(), surname)),
    }
}

/// Formats every row, dropping empty ones.
pub fn normalize_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<String> {
    rows.iter().filter_map(|row| normalize_row(row)).collect()
}

/// Groups flat fragments into rows.
///
/// Fragments are stably sorted by `y` then `x`; a row is opened by its first
/// fragment and collects every following fragment whose `y` is within
/// `y_threshold` of the opener. Each row is then ordered by `x`.
pub fn group_name_items(items: &[NameItem], y_threshold: f64) -> Vec<Row> {
    let mut sorted: Vec<&NameItem> = items.iter().collect();
    sorted.sort_by_key(|i| (key_f64(i.y), key_f64(i.x)));

    let mut rows: Vec<Vec<&NameItem>> = Vec::new();
    for item in sorted {
        match rows.last_mut() {
            Some(row) if (item.y - row[0].y).abs() <= y_threshold => row.push(item),
            _ => rows.push(vec![item]),
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by_key(|i| key_f64(i.x));
            row.into_iter().map(|i| i.text.clone()).collect()
        })
        .collect()
}

/// Normalizes names from either input shape.
pub fn normalize_names(input: &NameInput, y_threshold: f64) -> Vec<String> {
    match input {
        NameInput::Rows(rows) => normalize_rows(rows),
        NameInput::Items(items) => normalize_rows(&group_name_items(items, y_threshold)),
    }
}
