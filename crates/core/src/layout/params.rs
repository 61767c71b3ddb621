//! Reconstruction parameters.
//!
//! Contains the MergeParams struct holding every tuned threshold used by the
//! word, line, row and name stages.

use serde::Deserialize;

use crate::error::{Result, ZoneTextError};

/// Maximum horizontal gap (px) between a word and the next fragment.
pub const DEFAULT_WORD_GAP: f64 = 60.0;
/// Same-row window as a fraction of the running average height.
pub const DEFAULT_SAME_ROW_RATIO: f64 = 0.5;
/// Lenient vertical window for right-hand fragments, in average heights.
pub const DEFAULT_LENIENT_DY_RATIO: f64 = 5.0;
/// Minimum vertical overlap ratio accepted by the lenient rule.
pub const DEFAULT_LENIENT_OVERLAP_RATIO: f64 = 0.10;
/// Vertical spread allowed by the whole-set word shortcut, in average heights.
pub const DEFAULT_WORD_SHORTCUT_SPREAD: f64 = 3.0;
/// Smallest item count eligible for a whole-set shortcut.
pub const DEFAULT_SHORTCUT_MIN: usize = 2;
/// Largest item count eligible for a whole-set shortcut.
pub const DEFAULT_SHORTCUT_MAX: usize = 5;
/// Fixed vertical-center threshold (px) used for page lines.
pub const DEFAULT_LINE_THRESHOLD: f64 = 5.0;
/// Vertical spread allowed by the whole-group row shortcut, in average heights.
pub const DEFAULT_ROW_SHORTCUT_SPREAD: f64 = 2.0;
/// Vertical window for right-hand items in name rows, in average heights.
pub const DEFAULT_ROW_LENIENT_RATIO: f64 = 1.5;
/// Longest strictly x-ascending run merged into one name row.
pub const DEFAULT_ROW_SEQUENCE_MAX: usize = 5;
/// Row window (px) used when names are grouped from flat positioned items.
pub const DEFAULT_NAME_Y_THRESHOLD: f64 = 8.0;

/// Parameters for token, line and row reconstruction.
///
/// Every field can be overridden from a template; missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeParams {
    /// If the gap between a word's right edge and the next fragment's left
    /// edge is at most this many pixels the fragment may join the word.
    pub word_gap: f64,

    /// Two items are on the same row when their vertical centers are closer
    /// than this fraction of the running average height.
    pub same_row_ratio: f64,

    /// Right-hand fragments may join a word when their vertical center is
    /// within this many average heights.
    pub lenient_dy_ratio: f64,

    /// Right-hand fragments whose vertical overlap (relative to the smaller
    /// height) exceeds this ratio may join a word.
    pub lenient_overlap_ratio: f64,

    /// Vertical spread allowed when a whole token set collapses into one word.
    pub word_shortcut_spread: f64,

    /// Item count window `shortcut_min..=shortcut_max` for the shortcuts.
    pub shortcut_min: usize,
    pub shortcut_max: usize,

    /// Fixed vertical-center distance, in pixels, for page lines.
    pub line_threshold: f64,

    /// Vertical spread allowed when a whole name group becomes one row.
    pub row_shortcut_spread: f64,

    /// Vertical window for right-hand items in name rows.
    pub row_lenient_ratio: f64,

    /// Longest strictly x-ascending sequence merged into one name row.
    pub row_sequence_max: usize,

    /// Row window for names built from flat positioned items.
    pub name_y_threshold: f64,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            word_gap: DEFAULT_WORD_GAP,
            same_row_ratio: DEFAULT_SAME_ROW_RATIO,
            lenient_dy_ratio: DEFAULT_LENIENT_DY_RATIO,
            lenient_overlap_ratio: DEFAULT_LENIENT_OVERLAP_RATIO,
            word_shortcut_spread: DEFAULT_WORD_SHORTCUT_SPREAD,
            shortcut_min: DEFAULT_SHORTCUT_MIN,
            shortcut_max: DEFAULT_SHORTCUT_MAX,
            line_threshold: DEFAULT_LINE_THRESHOLD,
            row_shortcut_spread: DEFAULT_ROW_SHORTCUT_SPREAD,
            row_lenient_ratio: DEFAULT_ROW_LENIENT_RATIO,
            row_sequence_max: DEFAULT_ROW_SEQUENCE_MAX,
            name_y_threshold: DEFAULT_NAME_Y_THRESHOLD,
        }
    }
}

impl MergeParams {
    /// Checks that every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("wordGap", self.word_gap),
            ("sameRowRatio", self.same_row_ratio),
            ("lenientDyRatio", self.lenient_dy_ratio),
            ("lenientOverlapRatio", self.lenient_overlap_ratio),
            ("wordShortcutSpread", self.word_shortcut_spread),
            ("lineThreshold", self.line_threshold),
            ("rowShortcutSpread", self.row_shortcut_spread),
            ("rowLenientRatio", self.row_lenient_ratio),
            ("nameYThreshold", self.name_y_threshold),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ZoneTextError::InvalidParam { name, value });
            }
        }
        if self.shortcut_min > self.shortcut_max {
            return Err(ZoneTextError::InvalidParam {
                name: "shortcutMin",
                value: self.shortcut_min as f64,
            });
        }
        Ok(())
    }

    /// True when `count` items are eligible for a whole-set shortcut.
    pub(crate) fn shortcut_applies(&self, count: usize) -> bool {
        (self.shortcut_min..=self.shortcut_max).contains(&count)
    }
}
