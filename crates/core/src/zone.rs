//! Zones: page-relative rectangles and token membership.
//!
//! A zone is stored as fractions of the page size so that it survives
//! re-rendering at a different resolution. Membership is an overlap test,
//! not containment: a token straddling the zone edge belongs to it.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneTextError};
use crate::model::Token;
use crate::utils::{BBox, HasBBox};

/// A rectangle with every component relative to the page (`0..=1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
}

impl Zone {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Absolute pixel rectangle for a page of the given size.
    pub fn to_pixels(&self, page_width: f64, page_height: f64) -> BBox {
        BBox::new(
            self.x * page_width,
            self.y * page_height,
            self.w * page_width,
            self.h * page_height,
        )
    }

    /// Checks that every component is finite and within `0..=1`.
    pub fn validate(&self, key: &str) -> Result<()> {
        for (name, value) in [("x", self.x), ("y", self.y), ("w", self.w), ("h", self.h)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ZoneTextError::InvalidZone {
                    key: key.to_string(),
                    reason: format!("{name} = {value} is outside 0..=1"),
                });
            }
        }
        Ok(())
    }
}

/// Formatting policy for a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    PersonName,
    #[default]
    NormalText,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::PersonName => "PERSON_NAME",
            FieldType::NormalText => "NORMAL_TEXT",
        }
    }
}

impl FromStr for FieldType {
    type Err = ZoneTextError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PERSON_NAME" => Ok(FieldType::PersonName),
            "NORMAL_TEXT" => Ok(FieldType::NormalText),
            other => Err(ZoneTextError::UnknownFieldType(other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps page-relative zones onto a page of known pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneMapper {
    pub page_width: f64,
    pub page_height: f64,
}

impl ZoneMapper {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
        }
    }

    pub fn to_pixels(&self, zone: &Zone) -> BBox {
        zone.to_pixels(self.page_width, self.page_height)
    }

    /// True when the token is not entirely outside `rect` on any side.
    pub fn is_member(token: &Token, rect: &BBox) -> bool {
        token.bbox().overlaps(rect)
    }

    /// Tokens overlapping `zone`, in input order.
    pub fn members<'a>(&self, zone: &Zone, tokens: &'a [Token]) -> Vec<&'a Token> {
        let rect = self.to_pixels(zone);
        tokens
            .iter()
            .filter(|t| Self::is_member(t, &rect))
            .collect()
    }

    /// Members for every zone key. A token may appear under several keys.
    pub fn map_zones<'a, K>(
        &self,
        zones: &IndexMap<K, Zone>,
        tokens: &'a [Token],
    ) -> IndexMap<K, Vec<&'a Token>>
    where
        K: Clone + Eq + Hash,
    {
        zones
            .iter()
            .map(|(key, zone)| (key.clone(), self.members(zone, tokens)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_scales_to_pixels() {
        let zone = Zone::new(0.1, 0.2, 0.5, 0.25);
        assert_eq!(
            zone.to_pixels(1000.0, 2000.0),
            BBox::new(100.0, 400.0, 500.0, 500.0)
        );
    }

    #[test]
    fn field_type_round_trips_through_str() {
        assert_eq!("PERSON_NAME".parse::<FieldType>().unwrap(), FieldType::PersonName);
        assert_eq!(FieldType::NormalText.to_string(), "NORMAL_TEXT");
        assert!(matches!(
            "person_name".parse::<FieldType>(),
            Err(ZoneTextError::UnknownFieldType(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(Zone::new(0.0, 0.0, 1.0, 1.0).validate("a").is_ok());
        assert!(Zone::new(0.0, 0.0, 1.2, 1.0).validate("a").is_err());
        assert!(Zone::new(f64::NAN, 0.0, 0.5, 0.5).validate("a").is_err());
    }

    #[test]
    fn empty_token_list_gives_empty_members() {
        let mapper = ZoneMapper::new(100.0, 100.0);
        let mut zones = IndexMap::new();
        zones.insert("a", Zone::new(0.0, 0.0, 0.5, 0.5));
        zones.insert("b", Zone::new(0.5, 0.5, 0.5, 0.5));
        let members = mapper.map_zones(&zones, &[]);
        assert_eq!(members.len(), 2);
        assert!(members.values().all(|m| m.is_empty()));
    }
}
