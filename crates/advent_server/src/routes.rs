use std::sync::Arc;

use advent_core::{
    CalendarEntry, ColorCategory, DayNumber, EditorService, Memory, MemoryDraft, MemoryService,
    RecentColors, SqliteMemoryRepository, SqlitePreferenceStore,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct MemoryQuery {
    preview: Option<String>,
}

impl MemoryQuery {
    /// Preview is on only for the literal value `true`.
    pub fn is_preview(&self) -> bool {
        self.preview.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize)]
pub struct RecentColorsResponse {
    pub category: ColorCategory,
    pub colors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordColorRequest {
    pub color: String,
}

/// Non-numeric day segments are reported as missing memories.
pub fn parse_day(raw: &str) -> Result<DayNumber, ApiError> {
    raw.parse::<DayNumber>()
        .map_err(|_| ApiError::MemoryNotFound)
}

/// Loads one memory through the release gate.
pub async fn load_memory(
    state: &AppState,
    day: DayNumber,
    preview: bool,
) -> Result<Memory, ApiError> {
    let clock = state.clock();
    state
        .with_connection(move |conn| {
            let service = MemoryService::with_clock(SqliteMemoryRepository::new(conn), clock);
            Ok(service.get_memory(day, preview)?)
        })
        .await
}

pub async fn get_memory_handler(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
    query: Result<Query<MemoryQuery>, QueryRejection>,
) -> Result<Json<Memory>, ApiError> {
    let day = parse_day(&day)?;
    let Query(query) = query?;
    let memory = load_memory(&state, day, query.is_preview()).await?;
    Ok(Json(memory))
}

pub async fn list_memories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CalendarEntry>>, ApiError> {
    let clock = state.clock();
    let entries = state
        .with_connection(move |conn| {
            let service = MemoryService::with_clock(SqliteMemoryRepository::new(conn), clock);
            Ok(service.list_calendar()?)
        })
        .await?;
    Ok(Json(entries))
}

pub async fn put_memory_handler(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
    payload: Result<Json<MemoryDraft>, JsonRejection>,
) -> Result<Json<Memory>, ApiError> {
    let day = parse_day(&day)?;
    let Json(draft) = payload?;

    let memory = state
        .with_connection(move |conn| {
            let editor = EditorService::new(SqliteMemoryRepository::new(conn));
            Ok(editor.save_memory(day, &draft)?)
        })
        .await?;

    info!(
        "event=memory_save module=server status=ok day={day} blocks={}",
        memory.blocks.len()
    );
    Ok(Json(memory))
}

pub async fn delete_memory_handler(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> Result<StatusCode, ApiError> {
    let day = parse_day(&day)?;
    state
        .with_connection(move |conn| {
            let editor = EditorService::new(SqliteMemoryRepository::new(conn));
            Ok(editor.delete_memory(day)?)
        })
        .await?;

    info!("event=memory_delete module=server status=ok day={day}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_recent_colors_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<RecentColorsResponse>, ApiError> {
    let category = category.parse::<ColorCategory>()?;
    let colors = state
        .with_connection(move |conn| {
            let colors = RecentColors::new(SqlitePreferenceStore::new(conn));
            Ok(colors.recent_colors(category)?)
        })
        .await?;

    Ok(Json(RecentColorsResponse { category, colors }))
}

pub async fn record_recent_color_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    payload: Result<Json<RecordColorRequest>, JsonRejection>,
) -> Result<Json<RecentColorsResponse>, ApiError> {
    let category = category.parse::<ColorCategory>()?;
    let Json(request) = payload?;

    let colors = state
        .with_connection(move |conn| {
            let colors = RecentColors::new(SqlitePreferenceStore::new(conn));
            Ok(colors.record_color(category, &request.color)?)
        })
        .await?;

    debug!(
        "event=recent_color_record module=server status=ok category={}",
        category.as_str()
    );
    Ok(Json(RecentColorsResponse { category, colors }))
}

#[cfg(test)]
mod tests {
    use super::{MemoryQuery, parse_day};

    #[test]
    fn preview_requires_literal_true() {
        let on = MemoryQuery {
            preview: Some("true".to_string()),
        };
        let off = MemoryQuery {
            preview: Some("1".to_string()),
        };
        assert!(on.is_preview());
        assert!(!off.is_preview());
        assert!(!MemoryQuery::default().is_preview());
    }

    #[test]
    fn non_numeric_day_is_not_found() {
        assert!(parse_day("abc").is_err());
        assert!(parse_day("-1").is_err());
        assert_eq!(parse_day("24").unwrap(), 24);
    }
}
