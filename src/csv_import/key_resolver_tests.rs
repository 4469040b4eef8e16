use super::*;

fn row(scryfall_id: &str, finish: &str, quantity: u32) -> CsvRow {
    CsvRow {
        quantity,
        name: "Sol Ring".to_string(),
        finish: finish.to_string(),
        edition_code: "C21".to_string(),
        scryfall_id: scryfall_id.to_string(),
        collector_number: "263".to_string(),
    }
}

#[test]
fn single_finish_keeps_bare_id() {
    let rows = vec![row("abc", "Foil", 1)];
    let resolver = KeyResolver::from_rows(&rows);

    // only one finish for this ID, no conflict, no composite key
    assert!(!resolver.is_conflicted("abc"));
    assert_eq!(resolver.resolve(&rows[0]), "abc");
}

#[test]
fn conflicted_id_splits_non_normal_finish() {
    let rows = vec![row("abc", "Normal", 2), row("abc", "Foil", 1)];
    let resolver = KeyResolver::from_rows(&rows);

    assert!(resolver.is_conflicted("abc"));
    // normal keeps the bare ID, foil gets the composite key
    assert_eq!(resolver.resolve(&rows[0]), "abc");
    assert_eq!(resolver.resolve(&rows[1]), "abc:foil");
}

#[test]
fn composite_key_lowercases_finish() {
    let rows = vec![row("abc", "Normal", 1), row("abc", "Etched", 1)];
    let resolver = KeyResolver::from_rows(&rows);
    assert_eq!(resolver.resolve(&rows[1]), "abc:etched");
}

#[test]
fn finish_comparison_is_case_insensitive() {
    // "Foil" and "foil" are the same finish, not a conflict
    let rows = vec![row("abc", "Foil", 1), row("abc", "foil", 1)];
    let resolver = KeyResolver::from_rows(&rows);
    assert!(!resolver.is_conflicted("abc"));
}

#[test]
fn conflicts_are_listed_in_id_order() {
    let rows = vec![
        row("zzz", "Normal", 1),
        row("zzz", "Foil", 1),
        row("aaa", "Normal", 1),
        row("aaa", "Etched", 1),
        row("mmm", "Normal", 4),
    ];
    let resolver = KeyResolver::from_rows(&rows);
    assert_eq!(resolver.conflicts(), vec!["aaa", "zzz"]);
}

#[test]
fn unknown_id_is_not_conflicted() {
    let resolver = KeyResolver::from_rows(&[]);
    assert!(!resolver.is_conflicted("ghost"));
    assert!(resolver.finishes("ghost").is_empty());
}
