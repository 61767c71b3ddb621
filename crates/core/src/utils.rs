//! Geometry primitives shared by every reconstruction stage.
//!
//! Provides:
//! - `BBox`, an axis-aligned pixel rectangle with union and overlap tests
//! - `HasBBox`, the uniform accessor trait for tokens, words, lines and items
//! - Ordering helpers used by the grouping stages (`sort_reading_order`)
//!
//! Coordinates are page pixels with a top-left origin: `y` grows downwards.

use ordered_float::OrderedFloat;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

/// Sort key for float coordinates. Gives a total order so sorts never panic.
pub(crate) type KeyF64 = OrderedFloat<f64>;

pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

/// Replaces NaN and infinities with 0.0.
#[inline]
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Reads a coordinate from a number or a numeric string. Anything else,
/// including `null`, reads as 0.0.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(finite_or_zero(v))
}

/// Reads text from a string or a number. Anything else reads as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Reads a list, keeping the elements that parse. A non-array reads as empty.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        tracing::debug!("non-array list input read as empty");
        return Ok(Vec::new());
    };
    let total = values.len();
    let parsed: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if parsed.len() < total {
        tracing::debug!(skipped = total - parsed.len(), "malformed list entries skipped");
    }
    Ok(parsed)
}

/// An axis-aligned rectangle in page pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            w: finite_or_zero(w).max(0.0),
            h: finite_or_zero(h).max(0.0),
        }
    }

    /// Builds a box from its edges.
    pub fn from_edges(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Axis-aligned overlap test. Touching edges count as overlap.
    pub fn overlaps(&self, other: &BBox) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }

    /// Length of the shared vertical extent, 0.0 when disjoint.
    pub fn vertical_overlap(&self, other: &BBox) -> f64 {
        (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0)
    }
}

/// Uniform geometry accessors for anything placed on the page.
pub trait HasBBox {
    fn bbox(&self) -> BBox;

    fn x(&self) -> f64 {
        self.bbox().x
    }

    fn y(&self) -> f64 {
        self.bbox().y
    }

    fn w(&self) -> f64 {
        self.bbox().w
    }

    fn h(&self) -> f64 {
        self.bbox().h
    }

    fn right(&self) -> f64 {
        self.bbox().right()
    }

    fn center_y(&self) -> f64 {
        self.bbox().center_y()
    }
}

impl HasBBox for BBox {
    fn bbox(&self) -> BBox {
        *self
    }
}

impl<T: HasBBox + ?Sized> HasBBox for &T {
    fn bbox(&self) -> BBox {
        (**self).bbox()
    }
}

/// Union of all boxes, or `None` for an empty slice.
pub fn union_bbox<T: HasBBox>(items: &[T]) -> Option<BBox> {
    let mut iter = items.iter();
    let first = iter.next()?.bbox();
    Some(iter.fold(first, |acc, item| acc.union(&item.bbox())))
}

/// Mean height of the items, 0.0 for an empty slice.
pub fn average_height<T: HasBBox>(items: &[T]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|i| i.h()).sum::<f64>() / items.len() as f64
}

/// Distance between the smallest and largest top edge.
pub fn y_spread<T: HasBBox>(items: &[T]) -> f64 {
    let (min, max) = items
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), i| {
            (lo.min(i.y()), hi.max(i.y()))
        });
    if items.is_empty() { 0.0 } else { max - min }
}

/// True when a stable sort by `x` would leave the items in their given order.
pub fn is_x_sorted<T: HasBBox>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].x() <= pair[1].x())
}

/// True when every item starts strictly right of its predecessor.
pub fn is_strictly_x_ascending<T: HasBBox>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].x() < pair[1].x())
}

/// Stable sort by left edge.
pub fn sort_by_x<T: HasBBox>(items: &mut [T]) {
    items.sort_by_key(|i| key_f64(i.x()));
}

/// Orders items top-to-bottom in bands, left-to-right within each band.
///
/// Items are first stably sorted by vertical center. A band is opened by its
/// topmost item; a later item joins the band while its center lies within
/// `ratio` times the running average height of the items already in the
/// band. Each band is then stably sorted by `x`. Equal keys keep their input
/// order throughout.
pub fn sort_reading_order<T: HasBBox>(mut items: Vec<T>, ratio: f64) -> Vec<T> {
    items.sort_by_key(|i| key_f64(i.center_y()));

    let mut bands: Vec<Vec<T>> = Vec::new();
    for item in items {
        match bands.last_mut() {
            Some(band) if within_band(band, &item, ratio) => band.push(item),
            _ => bands.push(vec![item]),
        }
    }

    bands
        .into_iter()
        .flat_map(|mut band| {
            sort_by_x(&mut band);
            band
        })
        .collect()
}

fn within_band<T: HasBBox>(band: &[T], item: &T, ratio: f64) -> bool {
    let anchor = band[0].center_y();
    (item.center_y() - anchor).abs() <= average_height(band) * ratio
}
