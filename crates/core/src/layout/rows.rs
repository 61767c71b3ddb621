//! Row reconstruction inside a single field.
//!
//! A field's rows are derived from that field's own content, so the row
//! window scales with the height of the text in the zone rather than with
//! the whole page. `PERSON_NAME` and `NORMAL_TEXT` fields take separate
//! paths: name rows are rebuilt from the raw tokens behind the items, while
//! normal text rows are built from the items themselves.

use itertools::Itertools;

use crate::model::{Item, Row};
use crate::names::normalize_rows;
use crate::utils::{
    HasBBox, average_height, is_strictly_x_ascending, is_x_sorted, sort_by_x, sort_reading_order,
    union_bbox, y_spread,
};
use crate::zone::FieldType;

use super::params::MergeParams;

/// True when a name group should be taken as a single row.
fn whole_group_shortcut<T: HasBBox>(items: &[T], params: &MergeParams) -> bool {
    params.shortcut_applies(items.len())
        && is_x_sorted(items)
        && y_spread(items) <= params.row_shortcut_spread * average_height(items)
}

/// Decides whether `item` continues `row`.
fn joins_row<T: HasBBox>(row: &[T], item: &T, field_type: FieldType, params: &MergeParams) -> bool {
    let Some(row_box) = union_bbox(row) else {
        return false;
    };
    let avg_h = average_height(row);
    let dy = (item.center_y() - row_box.center_y()).abs();

    if dy <= avg_h * params.same_row_ratio {
        return true;
    }
    if field_type != FieldType::PersonName {
        return false;
    }

    // Printed name lines are sometimes detected with vertical jitter.
    let rightmost_x = row.iter().map(|i| i.x()).fold(f64::NEG_INFINITY, f64::max);
    if item.x() > rightmost_x && dy <= avg_h * params.row_lenient_ratio {
        return true;
    }

    row.len() < params.row_sequence_max
        && is_strictly_x_ascending(row)
        && row.last().is_some_and(|last| last.x() < item.x())
}

/// Groups items into rows, top to bottom, each row ordered left to right.
pub fn group_rows<T: HasBBox>(items: Vec<T>, field_type: FieldType, params: &MergeParams) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    if field_type == FieldType::PersonName && whole_group_shortcut(&items, params) {
        tracing::trace!(count = items.len(), "whole group taken as one row");
        return vec![items];
    }

    let mut rows: Vec<Vec<T>> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    for item in sort_reading_order(items, params.same_row_ratio) {
        if current.is_empty() || joins_row(&current, &item, field_type, params) {
            current.push(item);
        } else {
            rows.push(std::mem::replace(&mut current, vec![item]));
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    for row in &mut rows {
        sort_by_x(row);
    }
    rows
}

/// Token texts of each printed line in the field, top to bottom.
///
/// For `PERSON_NAME` the rows are rebuilt from the raw tokens behind the
/// items; for `NORMAL_TEXT` each item stays whole.
pub fn reconstruct_rows(items: &[Item], field_type: FieldType, params: &MergeParams) -> Vec<Row> {
    match field_type {
        FieldType::PersonName => {
            let tokens = items.iter().flat_map(Item::tokens).collect_vec();
            group_rows(tokens, field_type, params)
                .into_iter()
                .map(|row| row.into_iter().map(|t| t.text.clone()).collect())
                .collect()
        }
        FieldType::NormalText => group_rows(items.iter().collect_vec(), field_type, params)
            .into_iter()
            .map(|row| row.into_iter().map(|i| i.text().to_string()).collect())
            .collect(),
    }
}

/// Final string for a field: one line per row, blank lines dropped.
pub fn format_field(items: &[Item], field_type: FieldType, params: &MergeParams) -> String {
    let rows = reconstruct_rows(items, field_type, params);
    tracing::debug!(%field_type, items = items.len(), rows = rows.len(), "field rows rebuilt");

    let lines: Vec<String> = match field_type {
        FieldType::PersonName => normalize_rows(&rows),
        FieldType::NormalText => rows.iter().map(|row| row.join(" ")).collect(),
    };
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectedWord, Token};
    use crate::utils::BBox;

    fn word(text: &str, x: f64, y: f64) -> Item {
        Item::Word(ConnectedWord::from_token(Token::new(text, x, y, 40.0, 20.0)))
    }

    #[test]
    fn normal_text_rows_joined_by_newline() {
        let items = vec![
            word("line", 0.0, 50.0),
            word("two", 60.0, 52.0),
            word("line", 0.0, 0.0),
            word("one", 60.0, 1.0),
        ];
        let text = format_field(&items, FieldType::NormalText, &MergeParams::default());
        assert_eq!(text, "line one\nline two");
    }

    #[test]
    fn normal_text_drops_blank_rows() {
        let items = vec![word("  ", 0.0, 0.0), word("kept", 0.0, 100.0)];
        let text = format_field(&items, FieldType::NormalText, &MergeParams::default());
        assert_eq!(text, "kept");
    }

    #[test]
    fn normal_text_has_no_leniency() {
        // Right of the row and within 1.5 heights, but above the strict window.
        let rows = group_rows(
            vec![BBox::new(0.0, 0.0, 10.0, 20.0), BBox::new(50.0, 25.0, 10.0, 20.0)],
            FieldType::NormalText,
            &MergeParams::default(),
        );
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn person_name_right_jitter_is_merged() {
        let params = MergeParams {
            shortcut_max: 0,
            row_sequence_max: 0,
            ..MergeParams::default()
        };
        let rows = group_rows(
            vec![BBox::new(0.0, 0.0, 10.0, 20.0), BBox::new(50.0, 25.0, 10.0, 20.0)],
            FieldType::PersonName,
            &params,
        );
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn person_name_ascending_sequence_is_merged() {
        let params = MergeParams {
            shortcut_max: 0,
            ..MergeParams::default()
        };
        // Far below, but continues a strictly ascending run of x.
        let rows = group_rows(
            vec![BBox::new(0.0, 0.0, 10.0, 20.0), BBox::new(50.0, 200.0, 10.0, 20.0)],
            FieldType::PersonName,
            &params,
        );
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn person_name_shortcut_alone_merges_stacked_items() {
        // Equal x rules out both leniencies, so only the shortcut can merge.
        let params = MergeParams::default();
        let within = group_rows(
            vec![BBox::new(0.0, 0.0, 10.0, 20.0), BBox::new(0.0, 40.0, 10.0, 20.0)],
            FieldType::PersonName,
            &params,
        );
        assert_eq!(within.len(), 1);

        let beyond = group_rows(
            vec![BBox::new(0.0, 0.0, 10.0, 20.0), BBox::new(0.0, 41.0, 10.0, 20.0)],
            FieldType::PersonName,
            &params,
        );
        assert_eq!(beyond.len(), 2);
    }

    #[test]
    fn person_name_ascending_sequence_is_capped() {
        let params = MergeParams {
            shortcut_max: 0,
            ..MergeParams::default()
        };
        let items: Vec<BBox> = (0..6)
            .map(|i| BBox::new(i as f64 * 50.0, i as f64 * 200.0, 10.0, 20.0))
            .collect();
        let rows = group_rows(items, FieldType::PersonName, &params);
        let lens: Vec<usize> = rows.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![5, 1]);
        assert_eq!(rows[1][0].x, 250.0);
    }

    #[test]
    fn person_name_rows_split_when_x_restarts() {
        let items = vec![
            word("นาย", 0.0, 0.0),
            word("สมชาย", 50.0, 0.0),
            word("ใจดี", 100.0, 0.0),
            word("นาง", 0.0, 100.0),
            word("สมศรี", 50.0, 100.0),
            word("ใจงาม", 100.0, 100.0),
        ];
        let text = format_field(&items, FieldType::PersonName, &MergeParams::default());
        assert_eq!(text, "นายสมชาย ใจดี\nนางสมศรี ใจงาม");
    }

    #[test]
    fn person_name_rebuilds_rows_from_tokens() {
        let merged = ConnectedWord {
            text: "น.ส.กิตนก".into(),
            bbox: BBox::new(0.0, 0.0, 60.0, 20.0),
            tokens: vec![
                Token::new("น.", 0.0, 0.0, 20.0, 20.0),
                Token::new("ส.กิตนก", 20.0, 0.0, 40.0, 20.0),
            ],
        };
        let items = vec![Item::Word(merged), word("แถวสายทอง", 70.0, 0.0)];
        let rows = reconstruct_rows(&items, FieldType::PersonName, &MergeParams::default());
        assert_eq!(rows, vec![vec!["น.", "ส.กิตนก", "แถวสายทอง"]]);
        let text = format_field(&items, FieldType::PersonName, &MergeParams::default());
        assert_eq!(text, "น.ส.กิตนก แถวสายทอง");
    }

    #[test]
    fn empty_field_formats_to_empty_string() {
        assert_eq!(format_field(&[], FieldType::PersonName, &MergeParams::default()), "");
        assert_eq!(format_field(&[], FieldType::NormalText, &MergeParams::default()), "");
    }
}
