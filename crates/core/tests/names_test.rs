//! Golden cases for the given-name / surname split.

use zonetext_core::{NameInput, NameItem, normalize_names, normalize_rows};

fn rows(input: &[&[&str]]) -> Vec<Vec<String>> {
    input
        .iter()
        .map(|row| row.iter().map(|t| t.to_string()).collect())
        .collect()
}

// ============================================================================
// Positional rule
// ============================================================================

#[test]
fn test_title_fragment_sticks_to_given_name() {
    let out = normalize_rows(&rows(&[&["น.", "ส.กิตนก", "แถวสายทอง"]]));
    assert_eq!(out, vec!["น.ส.กิตนก แถวสายทอง"]);
}

#[test]
fn test_separate_title_token() {
    let out = normalize_rows(&rows(&[&["นาย", "หัสดี", "ชมอินทร"]]));
    assert_eq!(out, vec!["นายหัสดี ชมอินทร"]);
}

#[test]
fn test_last_token_is_surname_even_when_short() {
    let out = normalize_rows(&rows(&[&["นายสนม", "ค", "เกร็ง"]]));
    assert_eq!(out, vec!["นายสนมค เกร็ง"]);
}

#[test]
fn test_two_tokens() {
    let out = normalize_rows(&rows(&[&["น.ส.สุคนธ์ทิพย์", "บำรุงสุข"]]));
    assert_eq!(out, vec!["น.ส.สุคนธ์ทิพย์ บำรุงสุข"]);
}

#[test]
fn test_single_token_row() {
    assert_eq!(normalize_rows(&rows(&[&["Solo"]])), vec!["Solo"]);
}

#[test]
fn test_empty_row_dropped() {
    assert!(normalize_rows(&rows(&[&[]])).is_empty());
    let out = normalize_rows(&rows(&[&["a", "b"], &[], &["c"]]));
    assert_eq!(out, vec!["a b", "c"]);
}

#[test]
fn test_same_input_same_output() {
    let input = rows(&[&["นาย", "หัสดี", "ชมอินทร"], &["Solo"]]);
    assert_eq!(normalize_rows(&input), normalize_rows(&input));
}

// ============================================================================
// Flat positioned input
// ============================================================================

#[test]
fn test_flat_items_match_row_form() {
    let items = vec![
        NameItem::new("หัสดี", 40.0, 102.0),
        NameItem::new("ชมอินทร", 90.0, 99.0),
        NameItem::new("นาย", 0.0, 100.0),
    ];
    let flat = normalize_names(&NameInput::Items(items), 8.0);
    let direct = normalize_names(
        &NameInput::Rows(rows(&[&["นาย", "หัสดี", "ชมอินทร"]])),
        8.0,
    );
    assert_eq!(flat, direct);
}

#[test]
fn test_flat_items_split_beyond_threshold() {
    let items = vec![NameItem::new("a", 0.0, 0.0), NameItem::new("b", 50.0, 9.0)];
    assert_eq!(normalize_names(&NameInput::Items(items), 8.0), vec!["a", "b"]);
}

#[test]
fn test_empty_inputs() {
    assert!(normalize_names(&NameInput::Items(Vec::new()), 8.0).is_empty());
    assert!(normalize_names(&NameInput::Rows(Vec::new()), 8.0).is_empty());
}
