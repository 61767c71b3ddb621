//! High-level entry points: page + template in, field strings out.
//!
//! Every call recomputes from the raw tokens. Nothing is cached between
//! calls, so editing a zone and calling again is always consistent.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{MergeParams, format_field, merge_lines, merge_tokens};
use crate::model::{ConnectedWord, Item, Line, Token};
use crate::utils::{lenient_f64, lenient_vec};
use crate::zone::{FieldType, Zone, ZoneMapper};

/// One recognized page: pixel size plus its raw tokens.
///
/// A `tokens` value that is not an array reads as no tokens, and entries
/// that are not token objects are skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: f64,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tokens: Vec<Token>,
}

impl PageInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn mapper(&self) -> ZoneMapper {
        ZoneMapper::new(self.width, self.height)
    }
}

/// A user-defined field: where to look and how to format what is found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub zone: Zone,
    #[serde(default)]
    pub field_type: FieldType,
}

impl FieldConfig {
    pub fn new(zone: Zone, field_type: FieldType) -> Self {
        Self { zone, field_type }
    }
}

/// Field definitions for a page layout, in export column order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub fields: IndexMap<String, FieldConfig>,
    #[serde(default)]
    pub params: MergeParams,
}

impl Template {
    /// Parses and validates a template.
    pub fn from_json(json: &str) -> Result<Self> {
        let template: Template = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        for (key, field) in &self.fields {
            field.zone.validate(key)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, field: FieldConfig) {
        self.fields.insert(key.into(), field);
    }
}

/// Intermediate page structures, for inspection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageReconstruction {
    pub words: Vec<ConnectedWord>,
    pub lines: Vec<Line>,
}

/// Formats the tokens of a single field.
pub fn extract_field<'a, I>(tokens: I, field_type: FieldType, params: &MergeParams) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    let items: Vec<Item> = merge_tokens(tokens, params)
        .into_iter()
        .map(Item::Word)
        .collect();
    format_field(&items, field_type, params)
}

fn extract_one(
    page: &PageInput,
    mapper: &ZoneMapper,
    key: &str,
    field: &FieldConfig,
    params: &MergeParams,
) -> String {
    let members = mapper.members(&field.zone, &page.tokens);
    tracing::debug!(
        field = key,
        field_type = %field.field_type,
        tokens = members.len(),
        "extracting field"
    );
    extract_field(members, field.field_type, params)
}

/// Formatted value for every template field, in template order.
///
/// A field whose zone holds no tokens maps to an empty string.
pub fn extract_fields(page: &PageInput, template: &Template) -> IndexMap<String, String> {
    let mapper = page.mapper();
    template
        .fields
        .iter()
        .map(|(key, field)| {
            let value = extract_one(page, &mapper, key, field, &template.params);
            (key.clone(), value)
        })
        .collect()
}

/// Same result as [`extract_fields`], computing fields in parallel.
pub fn extract_fields_par(page: &PageInput, template: &Template) -> IndexMap<String, String> {
    let mapper = page.mapper();
    let fields: Vec<(&String, &FieldConfig)> = template.fields.iter().collect();
    let values: Vec<String> = fields
        .par_iter()
        .map(|(key, field)| extract_one(page, &mapper, key, field, &template.params))
        .collect();
    fields
        .into_iter()
        .zip(values)
        .map(|((key, _), value)| (key.clone(), value))
        .collect()
}

/// Page-wide words and reading-order lines.
pub fn reconstruct_page(page: &PageInput, params: &MergeParams) -> PageReconstruction {
    let words = merge_tokens(&page.tokens, params);
    let lines = merge_lines(words.clone(), params);
    tracing::debug!(
        tokens = page.tokens.len(),
        words = words.len(),
        lines = lines.len(),
        "page reconstructed"
    );
    PageReconstruction { words, lines }
}
