//! HTTP surface for the advent memories calendar.
//!
//! # Routes
//! - `GET /api/memories` calendar of stored days with their unlock state
//! - `GET /api/memories/{day}?preview=true` one memory, gated on its release date
//! - `PUT /api/memories/{day}` editor save, replacing the whole page
//! - `DELETE /api/memories/{day}` editor delete
//! - `GET|POST /api/preferences/recent-colors/{category}` recent editor colors
//! - `GET /memories/{day}` rendered memory page
//! - `GET /admin/preview/{day}` rendered page ignoring the release date
//!
//! # Errors
//! JSON routes answer failures with `{"error": "..."}`: 403 for locked
//! memories, 404 for unknown days, 400 for rejected editor input and 500
//! for everything else. The cause of a 500 is logged, never returned.
//!
//! # Storage
//! Each request opens its own store connection on a blocking worker and
//! drops it when the request ends. Nothing but configuration is shared.

use std::{sync::Arc, time::Duration};

use advent_core::AppConfig;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use log::{error, info};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::CorsLayer;

pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

use pages::{memory_page_handler, preview_page_handler};
use routes::{
    delete_memory_handler, get_memory_handler, get_recent_colors_handler, list_memories_handler,
    put_memory_handler, record_recent_color_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/memories", get(list_memories_handler))
        .route(
            "/api/memories/{day}",
            get(get_memory_handler)
                .put(put_memory_handler)
                .delete(delete_memory_handler),
        )
        .route(
            "/api/preferences/recent-colors/{category}",
            get(get_recent_colors_handler).post(record_recent_color_handler),
        )
        .route("/memories/{day}", get(memory_page_handler))
        .route("/admin/preview/{day}", get(preview_page_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and serves until Ctrl+C or SIGTERM.
pub async fn start_server(config: AppConfig) -> std::io::Result<()> {
    let address = config.listen_address();
    info!(
        "event=server_start module=server status=start address={address} database={}",
        config.database.database
    );

    let app = router(AppState::new(config));
    let listener = TcpListener::bind(&address).await?;
    info!("event=server_start module=server status=ok address={address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=server status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=server status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=server status=ok signal=terminate");
            }
            Err(err) => {
                error!(
                    "event=shutdown_signal module=server status=error signal=terminate error={err}"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
