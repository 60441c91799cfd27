use std::sync::Arc;

use advent_core::render::escape_html;
use advent_core::{Memory, render_page};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{
    error::ApiError,
    routes::{load_memory, parse_day},
    state::AppState,
};

const PAGE_STYLE: &str = "body { margin: 0; min-height: 100vh; background: linear-gradient(135deg, #fdf2f8, #fce7f3); font-family: Arial, sans-serif; } \
main { display: flex; flex-direction: column; align-items: center; padding: 3rem 1.5rem; } \
.memory-card { width: 100%; max-width: 56rem; background: rgba(255, 255, 255, 0.8); border-radius: 1rem; box-shadow: 0 25px 50px -12px rgba(0, 0, 0, 0.25); padding: 2.5rem; } \
.memory-media { display: block; max-width: 100%; margin: 1rem auto; border-radius: 0.5rem; } \
.preview-banner { color: #db2777; font-weight: 600; margin-bottom: 1rem; }";

pub async fn memory_page_handler(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> Response {
    match fetch(&state, &day, false).await {
        Ok(memory) => Html(document(
            &format!("Day {}", memory.day_number),
            &memory_card(&memory, None),
        ))
        .into_response(),
        Err(err) => error_page(err),
    }
}

pub async fn preview_page_handler(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> Response {
    match fetch(&state, &day, true).await {
        Ok(memory) => {
            let banner = format!(
                r#"<a href="/admin" class="preview-banner">&larr; Back to Editor</a><p class="preview-banner">Preview &middot; releases {}</p>"#,
                memory.release_date.format("%B %-d, %Y")
            );
            Html(document(
                &format!("Preview: Day {}", memory.day_number),
                &memory_card(&memory, Some(&banner)),
            ))
            .into_response()
        }
        Err(err) => error_page(err),
    }
}

async fn fetch(state: &AppState, raw_day: &str, preview: bool) -> Result<Memory, ApiError> {
    let day = parse_day(raw_day)?;
    load_memory(state, day, preview).await
}

fn memory_card(memory: &Memory, banner: Option<&str>) -> String {
    format!(
        r#"<div class="memory-card">{}<div class="memory-blocks">
{}
</div></div>"#,
        banner.unwrap_or_default(),
        render_page(memory)
    )
}

fn error_page(err: ApiError) -> Response {
    err.log_cause();
    let (title, message) = match err {
        ApiError::Locked => (
            "Memory Locked",
            "This memory isn't unlocked yet. Come back when it's time!",
        ),
        ApiError::MemoryNotFound | ApiError::UnknownCategory => (
            "Memory Not Found",
            "There is no memory for this day.",
        ),
        ApiError::BadRequest(_) | ApiError::Unexpected(_) => (
            "Something Went Wrong",
            "An unexpected error occurred",
        ),
    };

    let body = format!(
        r#"<div class="memory-card"><h1 class="memory-title">{}</h1><p class="memory-paragraph">{}</p></div>"#,
        escape_html(title),
        escape_html(message)
    );
    (err.status(), Html(document(title, &body))).into_response()
}

/// Wraps a body fragment in a standalone HTML document.
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use super::{document, error_page};
    use crate::error::ApiError;
    use axum::http::StatusCode;

    #[test]
    fn document_escapes_title() {
        let html = document("<Day 1>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;Day 1&gt;</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[test]
    fn locked_page_uses_forbidden_status() {
        let response = error_page(ApiError::Locked);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_page_uses_not_found_status() {
        let response = error_page(ApiError::MemoryNotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
