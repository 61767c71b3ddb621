//! Token-to-word merging.
//!
//! The recognizer frequently over-splits a printed word (or a title plus a
//! name) into several tokens. `merge_tokens` collapses such runs back into
//! `ConnectedWord`s using distance thresholds that adapt to the height of
//! the word being built.

use itertools::Itertools;

use crate::model::{ConnectedWord, Token};
use crate::utils::{BBox, HasBBox, average_height, is_x_sorted, sort_reading_order, y_spread};

use super::params::MergeParams;

/// Which rule accepted a token into the current word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeRule {
    /// Close horizontally and on the same row.
    Standard,
    /// Right of the word, close horizontally, loosely aligned vertically.
    LenientHorizontal,
    /// Right of the word's left edge, close horizontally, any vertical overlap.
    HorizontalFallback,
}

/// A word under construction.
struct WordGroup<'a> {
    tokens: Vec<&'a Token>,
    bbox: BBox,
}

impl<'a> WordGroup<'a> {
    fn new(token: &'a Token) -> Self {
        Self {
            tokens: vec![token],
            bbox: token.bbox(),
        }
    }

    fn push(&mut self, token: &'a Token) {
        self.bbox = self.bbox.union(&token.bbox());
        self.tokens.push(token);
    }

    fn average_height(&self) -> f64 {
        average_height(&self.tokens)
    }

    fn into_word(self, separator: &str) -> ConnectedWord {
        ConnectedWord {
            text: self.tokens.iter().map(|t| t.text.as_str()).join(separator),
            bbox: self.bbox,
            tokens: self.tokens.into_iter().cloned().collect(),
        }
    }
}

/// Decides whether `token` continues `group`, trying the rules in order.
fn merge_rule(group: &WordGroup<'_>, token: &Token, params: &MergeParams) -> Option<MergeRule> {
    let gbox = group.bbox;
    let tbox = token.bbox();
    let avg_h = group.average_height();

    let dx = tbox.x - gbox.right();
    let dy = (tbox.center_y() - gbox.center_y()).abs();
    let overlap = gbox.vertical_overlap(&tbox);
    let min_h = gbox.h.min(tbox.h);
    let overlap_ratio = if min_h > 0.0 { overlap / min_h } else { 0.0 };
    let close = dx <= params.word_gap;

    if close && dy <= avg_h * params.same_row_ratio {
        return Some(MergeRule::Standard);
    }
    if close
        && dx >= 0.0
        && (dy <= avg_h * params.lenient_dy_ratio || overlap_ratio > params.lenient_overlap_ratio)
    {
        return Some(MergeRule::LenientHorizontal);
    }
    if close && tbox.x > gbox.x && overlap > 0.0 {
        return Some(MergeRule::HorizontalFallback);
    }
    None
}

/// True when the whole token set should collapse into a single word.
fn whole_set_shortcut(tokens: &[&Token], params: &MergeParams) -> bool {
    params.shortcut_applies(tokens.len())
        && is_x_sorted(tokens)
        && y_spread(tokens) <= params.word_shortcut_spread * average_height(tokens)
}

/// Merges one page's (or one zone's) tokens into connected words.
///
/// Short, left-to-right runs on a single visual line collapse into one word
/// joined by spaces. Otherwise tokens are walked in reading order and each
/// one either extends the current word (texts concatenated with no
/// separator) or starts a new one. Every input token ends up in exactly one
/// output word.
pub fn merge_tokens<'a, I>(tokens: I, params: &MergeParams) -> Vec<ConnectedWord>
where
    I: IntoIterator<Item = &'a Token>,
{
    let tokens: Vec<&Token> = tokens.into_iter().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    if whole_set_shortcut(&tokens, params) {
        tracing::trace!(count = tokens.len(), "whole token set merged into one word");
        let mut group = WordGroup::new(tokens[0]);
        tokens[1..].iter().for_each(|&t| group.push(t));
        return vec![group.into_word(" ")];
    }

    let sorted = sort_reading_order(tokens, params.same_row_ratio);
    let mut words = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return words;
    };
    let mut group = WordGroup::new(first);

    for token in iter {
        match merge_rule(&group, token, params) {
            Some(rule) => {
                tracing::trace!(?rule, text = %token.text, "token merged");
                group.push(token);
            }
            None => {
                let done = std::mem::replace(&mut group, WordGroup::new(token));
                words.push(done.into_word(""));
            }
        }
    }
    words.push(group.into_word(""));

    tracing::debug!(words = words.len(), "tokens merged into words");
    words
}
