//! Live HTTP view of the spreadsheet.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET /` | fetch the sheet, render the page template, answer 200 |
//! | `GET /public/*` | files from the public directory, prefix stripped |
//!
//! Every request to `/` runs the whole fetch → decode → render pipeline. The
//! only shared state is the [`AppState`] built at startup, which is read-only.
//! Fetch failures are shown as a banner with status 200; template failures
//! answer 500 with the error text as the body.

use crate::page::PageData;
use crate::render::{load_template, render_to_string};
use crate::sheet::{SheetUrl, fetch_sheet};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use reqwest::Client;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub sheet_url: SheetUrl,
    /// Page template, re-read on every request.
    pub template: PathBuf,
    /// Directory served under `/public/`.
    pub public_dir: PathBuf,
}

/// Startup-time state shared by all requests.
#[derive(Debug)]
pub struct AppState {
    client: Client,
    sheet_url: SheetUrl,
    template: PathBuf,
}

pub fn router(client: Client, options: ServeOptions) -> Router {
    let state = Arc::new(AppState {
        client,
        sheet_url: options.sheet_url,
        template: options.template,
    });

    Router::new()
        .route("/", get(index))
        .nest_service("/public", ServeDir::new(options.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    debug!(url = %state.sheet_url, "fetching sheet");
    let data = PageData::from_fetch(fetch_sheet(&state.client, &state.sheet_url).await);
    if data.has_error() {
        warn!(error = %data.error, "rendering error banner");
    }

    let page = load_template(&state.template)
        .and_then(|template| render_to_string(&template, &data));
    match page {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(template = %state.template.display(), %err, "could not render page");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    client: Client,
    options: ServeOptions,
) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!(
        addr = %listener.local_addr()?,
        public_dir = %options.public_dir.display(),
        "serving sheet"
    );

    axum::serve(listener, router(client, options)).await?;
    Ok(())
}
