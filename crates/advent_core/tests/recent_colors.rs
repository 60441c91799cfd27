use advent_core::db::{open_db, open_db_in_memory};
use advent_core::{
    ColorCategory, InMemoryPreferenceStore, PreferenceError, RecentColors, SqlitePreferenceStore,
};
use tempfile::TempDir;

#[test]
fn categories_keep_independent_lists() {
    let colors = RecentColors::new(InMemoryPreferenceStore::default());

    colors.record_color(ColorCategory::Text, "#111111").unwrap();
    colors
        .record_color(ColorCategory::Background, "#ffffff")
        .unwrap();
    colors.record_color(ColorCategory::Text, "#222222").unwrap();

    assert_eq!(
        colors.recent_colors(ColorCategory::Text).unwrap(),
        vec!["#222222", "#111111"]
    );
    assert_eq!(
        colors.recent_colors(ColorCategory::Background).unwrap(),
        vec!["#ffffff"]
    );
}

#[test]
fn blank_colors_are_rejected() {
    let colors = RecentColors::new(InMemoryPreferenceStore::default());
    assert!(matches!(
        colors.record_color(ColorCategory::Text, "   "),
        Err(PreferenceError::EmptyColor)
    ));
    assert!(colors.recent_colors(ColorCategory::Text).unwrap().is_empty());
}

#[test]
fn sqlite_store_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("advent.db");

    {
        let conn = open_db(&path).unwrap();
        let colors = RecentColors::new(SqlitePreferenceStore::new(&conn));
        for color in ["#a", "#b", "#c", "#a"] {
            colors.record_color(ColorCategory::Text, color).unwrap();
        }
    }

    let conn = open_db(&path).unwrap();
    let colors = RecentColors::new(SqlitePreferenceStore::new(&conn));
    assert_eq!(
        colors.recent_colors(ColorCategory::Text).unwrap(),
        vec!["#a", "#c", "#b"]
    );
}

#[test]
fn undecodable_stored_value_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES ('recent_colors.text', 'oops');",
        [],
    )
    .unwrap();

    let colors = RecentColors::new(SqlitePreferenceStore::new(&conn));
    assert!(colors.recent_colors(ColorCategory::Text).unwrap().is_empty());

    let updated = colors.record_color(ColorCategory::Text, "#123456").unwrap();
    assert_eq!(updated, vec!["#123456"]);
}
