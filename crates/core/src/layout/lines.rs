//! Word-to-line merging for the page-wide reading-order view.
//!
//! Uses a fixed pixel threshold on vertical centers. Field extraction does
//! not reuse these lines; see `rows` for the per-field grouping.

use itertools::Itertools;

use crate::model::{ConnectedWord, Line, Token};
use crate::utils::{BBox, HasBBox, key_f64, sort_by_x};

use super::params::MergeParams;

struct LineBuilder {
    words: Vec<ConnectedWord>,
    bbox: BBox,
}

impl LineBuilder {
    fn new(word: ConnectedWord) -> Self {
        Self {
            bbox: word.bbox,
            words: vec![word],
        }
    }

    fn push(&mut self, word: ConnectedWord) {
        self.bbox = self.bbox.union(&word.bbox);
        self.words.push(word);
    }

    fn finish(mut self) -> Line {
        sort_by_x(&mut self.words);
        Line {
            text: self.words.iter().map(|w| w.text.as_str()).join(" "),
            bbox: self.bbox,
            words: self.words,
        }
    }
}

/// Groups words into lines ordered top-to-bottom, then left-to-right.
///
/// Each word joins the first existing line whose vertical center lies within
/// `params.line_threshold` pixels of its own; otherwise it opens a new line.
pub fn merge_lines(words: Vec<ConnectedWord>, params: &MergeParams) -> Vec<Line> {
    let mut builders: Vec<LineBuilder> = Vec::new();

    for word in words {
        let center = word.center_y();
        let target = builders
            .iter_mut()
            .find(|b| (b.bbox.center_y() - center).abs() <= params.line_threshold);
        match target {
            Some(builder) => builder.push(word),
            None => builders.push(LineBuilder::new(word)),
        }
    }

    let mut lines: Vec<Line> = builders.into_iter().map(LineBuilder::finish).collect();
    lines.sort_by_key(|l| (key_f64(l.y()), key_f64(l.x())));

    tracing::debug!(lines = lines.len(), "words merged into lines");
    lines
}

/// Groups raw tokens into lines, treating each token as its own word.
pub fn merge_token_lines<'a, I>(tokens: I, params: &MergeParams) -> Vec<Line>
where
    I: IntoIterator<Item = &'a Token>,
{
    let words = tokens
        .into_iter()
        .cloned()
        .map(ConnectedWord::from_token)
        .collect();
    merge_lines(words, params)
}
