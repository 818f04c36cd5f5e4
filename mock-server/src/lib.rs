use std::time::Duration;

use axum::{
    extract::{Path, RawQuery},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Payload returned by `GET /service`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub status: String,
}

/// What the server saw of a request sent to `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/service", get(service_info))
        .route("/ok", get(ok))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/empty", any(empty))
        .route("/blank", get(blank))
        .route("/latin1", get(latin1))
        .route("/slow/{millis}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "mock-server".to_string(),
        status: "UP".to_string(),
    })
}

async fn ok() -> impl IntoResponse {
    ([("content-type", "application/json")], r#"{"ok":true}"#)
}

async fn echo(method: Method, headers: HeaderMap, RawQuery(query): RawQuery, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        query,
        headers,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    if status.is_informational() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let reason = status.canonical_reason().unwrap_or("Unknown");
    Ok((status, format!("status {code}: {reason}")))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn blank() -> StatusCode {
    StatusCode::OK
}

async fn latin1() -> Vec<u8> {
    // "café" encoded as ISO-8859-1
    vec![0x63, 0x61, 0x66, 0xE9]
}

async fn slow(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}
