//! Page content types: raw tokens and the structures derived from them.

use serde::{Deserialize, Serialize};

use crate::utils::{BBox, HasBBox, finite_or_zero, lenient_f64, lenient_string};

/// A single raw text detection from the recognizer.
///
/// Numeric fields that are missing, `null` or unparsable default to 0, and
/// numeric strings are accepted. Non-finite values become 0 and negative
/// sizes are clamped to 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawToken")]
pub struct Token {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Deserialize)]
struct RawToken {
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    y: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    w: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    h: f64,
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Token::new(raw.text, raw.x, raw.y, raw.w, raw.h)
    }
}

impl Token {
    pub fn new(text: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            text: text.into(),
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            w: finite_or_zero(w).max(0.0),
            h: finite_or_zero(h).max(0.0),
        }
    }
}

impl HasBBox for Token {
    fn bbox(&self) -> BBox {
        BBox::new(self.x, self.y, self.w, self.h)
    }
}

/// One or more tokens merged into a single logical word or fragment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectedWord {
    pub text: String,
    pub bbox: BBox,
    /// Source tokens in merge order.
    pub tokens: Vec<Token>,
}

impl ConnectedWord {
    /// Wraps a single token unchanged.
    pub fn from_token(token: Token) -> Self {
        Self {
            text: token.text.clone(),
            bbox: token.bbox(),
            tokens: vec![token],
        }
    }
}

impl HasBBox for ConnectedWord {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Words sharing a horizontal band, ordered left to right.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    /// Word texts joined by a single space.
    pub text: String,
    pub bbox: BBox,
    pub words: Vec<ConnectedWord>,
}

impl HasBBox for Line {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Anything a field can contain: a merged word or a whole line.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Word(ConnectedWord),
    Line(Line),
}

impl Item {
    pub fn text(&self) -> &str {
        match self {
            Item::Word(w) => &w.text,
            Item::Line(l) => &l.text,
        }
    }

    /// Source tokens in stored order.
    pub fn tokens(&self) -> Vec<&Token> {
        match self {
            Item::Word(w) => w.tokens.iter().collect(),
            Item::Line(l) => l.words.iter().flat_map(|w| w.tokens.iter()).collect(),
        }
    }
}

impl HasBBox for Item {
    fn bbox(&self) -> BBox {
        match self {
            Item::Word(w) => w.bbox,
            Item::Line(l) => l.bbox,
        }
    }
}

impl From<ConnectedWord> for Item {
    fn from(word: ConnectedWord) -> Self {
        Item::Word(word)
    }
}

impl From<Line> for Item {
    fn from(line: Line) -> Self {
        Item::Line(line)
    }
}

/// Token texts of one printed line within a field, left to right.
pub type Row = Vec<String>;
