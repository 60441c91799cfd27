//! Core domain logic for the advent memories calendar.
//! This crate owns storage, release gating, editing and block rendering.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockType};
pub use model::formatting::{DisplaySettings, FormattingValidationError, TextFormatting};
pub use model::memory::{CalendarEntry, DayNumber, Memory};
pub use render::{render_block, render_page, MediaKind, ResolvedStyle, VisualNode};
pub use repo::memory_repo::{MemoryRepository, RepoError, RepoResult, SqliteMemoryRepository};
pub use repo::preference_repo::SqlitePreferenceStore;
pub use service::color_service::{
    ColorCategory, InMemoryPreferenceStore, PreferenceError, PreferenceStore, RecentColors,
};
pub use service::editor_service::{BlockDraft, EditorError, EditorService, MemoryDraft};
pub use service::memory_service::{
    Clock, FixedClock, MemoryService, RetrievalError, SystemClock,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
