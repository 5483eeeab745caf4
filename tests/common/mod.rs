//! Shared helpers for integration tests: a local stand-in for the spreadsheet
//! export endpoint.

#![allow(dead_code)]

use axum::Router;
use axum::http::{StatusCode, Uri, header};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const SAMPLE_CSV: &str = "Header1,Header2\nRow1Col1,Row1Col2\nRow2Col1,Row2Col2\n";

/// A running stub. `requests` records the path and query of every hit.
pub struct Upstream {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    pub fn hits(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `body` with `status` for any path on an ephemeral local port.
pub async fn upstream(status: StatusCode, body: &'static str) -> Upstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    let app = Router::new().fallback(move |uri: Uri| {
        let seen = seen.clone();
        async move {
            seen.lock().unwrap().push(uri.to_string());
            (status, [(header::CONTENT_TYPE, "text/csv")], body)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
