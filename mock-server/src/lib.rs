use std::{collections::BTreeMap, convert::Infallible, time::Duration};

use axum::{
    body::{Body, Bytes},
    extract::Path,
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get, post},
    Form, Json, Router,
};
use futures_util::stream;
use tokio::net::TcpListener;

/// How long `GET /slow` waits before answering, and how long
/// `GET /slow-body` stalls between its two chunks.
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/echo", post(echo).put(echo).patch(echo))
        .route("/method", any(method_name))
        .route("/headers", get(headers))
        .route("/slow", get(slow))
        .route("/slow-body", get(slow_body))
        .route("/form", post(form))
        .route("/status/{code}", any(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> &'static str {
    "hello"
}

async fn echo(body: Bytes) -> Bytes {
    body
}

async fn method_name(method: Method) -> String {
    method.to_string()
}

async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(header_map(&headers))
}

async fn slow() -> &'static str {
    tokio::time::sleep(SLOW_DELAY).await;
    "slow"
}

/// Sends `he` right away, then `llo` after `SLOW_DELAY`.
async fn slow_body() -> Body {
    let chunks = stream::unfold(0u8, |step| async move {
        match step {
            0 => Some((Ok::<_, Infallible>(Bytes::from_static(b"he")), 1)),
            1 => {
                tokio::time::sleep(SLOW_DELAY).await;
                Some((Ok(Bytes::from_static(b"llo")), 2))
            }
            _ => None,
        }
    });
    Body::from_stream(chunks)
}

async fn form(Form(fields): Form<Vec<(String, String)>>) -> Json<Vec<(String, String)>> {
    Json(fields)
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

/// Header names to values. Non-UTF-8 values are skipped; for repeated
/// names the last value wins.
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
