use advent_core::db::open_db_in_memory;
use advent_core::{
    BlockDraft, BlockType, DisplaySettings, EditorError, EditorService, FixedClock, MemoryDraft,
    MemoryService, RetrievalError, SqliteMemoryRepository, TextFormatting,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_draft() -> MemoryDraft {
    let mut title = BlockDraft::new(BlockType::Title, "Our first trip");
    title.id = Some("title-1".to_string());
    title.formatting = TextFormatting {
        color: Some("#be185d".to_string()),
        ..TextFormatting::default()
    };

    let mut photo = BlockDraft::new(BlockType::Image, "/uploads/beach.jpg");
    photo.formatting.image_width = Some("400px".to_string());

    MemoryDraft {
        release_date: date(2025, 12, 1),
        display_settings: DisplaySettings {
            image_size: Some("75%".to_string()),
            ..DisplaySettings::default()
        },
        blocks: vec![
            title,
            photo,
            BlockDraft::new(BlockType::Quote, "Sand everywhere"),
        ],
    }
}

#[test]
fn save_then_get_returns_the_same_page() {
    let conn = open_db_in_memory().unwrap();
    let editor = EditorService::new(SqliteMemoryRepository::new(&conn));
    let saved = editor.save_memory(1, &sample_draft()).unwrap();

    assert_eq!(saved.blocks.len(), 3);
    assert_eq!(saved.blocks[0].id, "title-1");
    assert!(!saved.blocks[1].id.is_empty());
    assert_eq!(saved.blocks[1].sort_order, 1);
    assert_eq!(
        saved.blocks[1].formatting.image_width.as_deref(),
        Some("400px")
    );

    let reader = MemoryService::with_clock(
        SqliteMemoryRepository::new(&conn),
        FixedClock(date(2025, 12, 24)),
    );
    let loaded = reader.get_memory(1, false).unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn save_replaces_previous_blocks_and_settings() {
    let conn = open_db_in_memory().unwrap();
    let editor = EditorService::new(SqliteMemoryRepository::new(&conn));
    editor.save_memory(2, &sample_draft()).unwrap();

    let replacement = MemoryDraft {
        release_date: date(2025, 12, 2),
        display_settings: DisplaySettings::default(),
        blocks: vec![BlockDraft::new(BlockType::Paragraph, "Rewritten")],
    };
    let saved = editor.save_memory(2, &replacement).unwrap();

    assert_eq!(saved.release_date, date(2025, 12, 2));
    assert_eq!(saved.display_settings, DisplaySettings::default());
    assert_eq!(saved.blocks.len(), 1);
    assert_eq!(saved.blocks[0].content, "Rewritten");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_blocks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn invalid_formatting_is_rejected_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let editor = EditorService::new(SqliteMemoryRepository::new(&conn));

    let mut block = BlockDraft::new(BlockType::Paragraph, "text");
    block.formatting.direction = Some("sideways".to_string());
    let draft = MemoryDraft {
        release_date: date(2025, 12, 3),
        display_settings: DisplaySettings::default(),
        blocks: vec![block],
    };

    let err = editor.save_memory(3, &draft).unwrap_err();
    assert!(matches!(err, EditorError::InvalidFormatting(ref e) if e.field == "direction"));
    assert!(err.is_validation());

    let reader = MemoryService::new(SqliteMemoryRepository::new(&conn));
    assert!(matches!(
        reader.get_memory(3, true),
        Err(RetrievalError::NotFound(3))
    ));
}

#[test]
fn css_breaking_values_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let editor = EditorService::new(SqliteMemoryRepository::new(&conn));

    let mut block = BlockDraft::new(BlockType::Title, "title");
    block.formatting.color = Some("red; position: fixed".to_string());
    let draft = MemoryDraft {
        release_date: date(2025, 12, 6),
        display_settings: DisplaySettings::default(),
        blocks: vec![block],
    };
    let err = editor.save_memory(6, &draft).unwrap_err();
    assert!(matches!(err, EditorError::InvalidFormatting(ref e) if e.field == "color"));

    let draft = MemoryDraft {
        release_date: date(2025, 12, 6),
        display_settings: DisplaySettings {
            image_size: Some("50%}".to_string()),
            ..DisplaySettings::default()
        },
        blocks: Vec::new(),
    };
    let err = editor.save_memory(6, &draft).unwrap_err();
    assert!(matches!(err, EditorError::InvalidFormatting(ref e) if e.field == "imageSize"));
    assert!(err.is_validation());
}

#[test]
fn delete_removes_memory_and_reports_missing_days() {
    let conn = open_db_in_memory().unwrap();
    let editor = EditorService::new(SqliteMemoryRepository::new(&conn));
    editor.save_memory(4, &sample_draft()).unwrap();

    editor.delete_memory(4).unwrap();
    assert!(matches!(
        editor.delete_memory(4),
        Err(EditorError::NotFound(4))
    ));

    let reader = MemoryService::new(SqliteMemoryRepository::new(&conn));
    assert!(matches!(
        reader.get_memory(4, true),
        Err(RetrievalError::NotFound(4))
    ));
}

#[test]
fn draft_deserializes_from_editor_payload() {
    let payload = r##"{
        "release_date": "2025-12-05",
        "display_settings": {"quoteFontSize": "2rem"},
        "blocks": [
            {"block_type": "quote", "content": "Hi", "formatting": {"fontStyle": "normal"}},
            {"id": "m1", "block_type": "media", "content": "clip.mp4", "sort_order": 9}
        ]
    }"##;

    let draft: MemoryDraft = serde_json::from_str(payload).unwrap();
    assert_eq!(draft.release_date, date(2025, 12, 5));
    assert_eq!(draft.display_settings.quote_font_size.as_deref(), Some("2rem"));
    assert_eq!(draft.blocks[0].id, None);
    assert_eq!(draft.blocks[0].sort_order, None);
    assert_eq!(draft.blocks[1].block_type, BlockType::Media);
    assert_eq!(draft.blocks[1].sort_order, Some(9));
}
