// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web UI for the review loop

pub mod error;

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::WebConfig;
use crate::organizer::Organizer;
use crate::review::{Reply, ReviewState};
pub use error::{ApiError, ApiResult};

/// Review page; the client script reads `path` from its own URL
pub const REVIEW_PAGE: &str = include_str!("review.html");

/// Shared application state
pub struct AppState {
    pub organizer: Arc<Organizer>,
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(review_page).post(submit_disposition))
        .route("/file", get(serve_pending_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct PathQuery {
    path: Option<String>,
}

#[derive(Deserialize)]
struct DispositionQuery {
    path: Option<String>,
    year: Option<String>,
}

/// Body of a successful disposition
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextPath {
    pub path: Option<String>,
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing query parameter: {}", name)))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Run filesystem work off the async workers
async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker failed: {}", e)))?
        .map_err(ApiError::from)
}

/// `302 Found` to `/?path=<next>`, with an empty value once nothing is left
fn redirect_to(next: Option<&Path>) -> ApiResult<Response> {
    let value = next.map(path_string).unwrap_or_default();
    let query = serde_urlencoded::to_string([("path", value.as_str())])
        .map_err(|e| ApiError::Internal(format!("cannot encode redirect: {}", e)))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, format!("/?{}", query))]).into_response())
}

// === Handlers ===

async fn review_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Response> {
    let current = ReviewState::from_query(query.path.as_deref());
    let organizer = Arc::clone(&state.organizer);
    let transition = blocking(move || current.fetch(&organizer)).await?;

    match transition.reply {
        Reply::Redirect(next) => redirect_to(next.as_deref()),
        _ => Ok(Html(REVIEW_PAGE).into_response()),
    }
}

async fn submit_disposition(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DispositionQuery>,
) -> ApiResult<Json<NextPath>> {
    let path = PathBuf::from(required(query.path, "path")?);
    let category = required(query.year, "year")?;

    let current = ReviewState::ShowingPath(path.clone());
    let organizer = Arc::clone(&state.organizer);
    let transition = blocking(move || current.submit(&organizer, &path, &category)).await?;

    let next = match transition.state {
        ReviewState::ShowingPath(next) => Some(path_string(&next)),
        _ => None,
    };
    Ok(Json(NextPath { path: next }))
}

async fn serve_pending_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
    request: Request,
) -> ApiResult<Response> {
    let path = PathBuf::from(required(query.path, "path")?);
    if !state.organizer.is_pending_path(&path) {
        return Err(ApiError::NotFound(format!("{} is not under the input directory", path.display())));
    }

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

/// Start the review server
pub async fn start_server(web: &WebConfig, organizer: Organizer) -> crate::Result<()> {
    let state = Arc::new(AppState {
        organizer: Arc::new(organizer),
    });

    let addr = format!("{}:{}", web.host, web.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Review UI available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
