//! Blocking HTTP helper over a shared, pooled `ureq` agent.
//!
//! # Design
//! `HttpUtil` is a cheap handle around one `ureq::Agent`; clones share the
//! connection pool. Every named operation builds an `HttpRequest`, sends it
//! with `send`, then runs the response through `check_status`. Calls block
//! until the whole body has been read.
//!
//! The agent never turns status codes into errors and never follows
//! redirects, so every status ≥300 reaches `check_status` and fails the same
//! way.

use std::sync::LazyLock;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::HttpError;
use crate::http::{can_have_body, to_owned_pairs, HttpMethod, HttpRequest, HttpResponse, RequestOptions};

static SHARED: LazyLock<HttpUtil> = LazyLock::new(|| HttpUtil::new(HttpConfig::default()));

/// Settings for the pooled agent.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Upper bound for a whole call, connect through body. `None` waits
    /// indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpUtil {
    agent: ureq::Agent,
}

impl HttpUtil {
    pub fn new(config: HttpConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Process-wide instance with the default config, created on first use.
    pub fn shared() -> &'static HttpUtil {
        &SHARED
    }

    /// Releases this handle. Pooled connections close once every clone is
    /// gone.
    pub fn shutdown(self) {
        debug!("http client handle shut down");
        drop(self.agent);
    }

    pub fn get(&self, url: &str) -> Result<Option<String>, HttpError> {
        self.get_with(url, &[], &[])
    }

    pub fn get_with_headers(&self, url: &str, headers: &[(&str, &str)]) -> Result<Option<String>, HttpError> {
        self.get_with(url, headers, &[])
    }

    pub fn get_with(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
    ) -> Result<Option<String>, HttpError> {
        let options = RequestOptions::new().with_headers(headers).with_params(params);
        self.execute(&HttpRequest::get(url, &options)?)
    }

    pub fn post_form(&self, url: &str, params: &[(&str, &str)]) -> Result<Option<String>, HttpError> {
        self.post_form_with_headers(url, &[], params)
    }

    pub fn post_form_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
    ) -> Result<Option<String>, HttpError> {
        let options = RequestOptions::new().with_headers(headers).with_params(params);
        self.execute(&HttpRequest::post_form(url, &options)?)
    }

    /// POST `json` verbatim with `content-type: application/json`.
    pub fn post_json(&self, url: &str, json: &str) -> Result<Option<String>, HttpError> {
        self.post_json_with_headers(url, &[], json)
    }

    pub fn post_json_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json: &str,
    ) -> Result<Option<String>, HttpError> {
        self.execute(&HttpRequest::post_json(url, &to_owned_pairs(headers), json)?)
    }

    /// Serialize `value` with serde_json and POST it.
    pub fn post_json_value<T: Serialize + ?Sized>(&self, url: &str, value: &T) -> Result<Option<String>, HttpError> {
        let json = serde_json::to_string(value)?;
        self.post_json(url, &json)
    }

    /// Send `request` and return its body, failing on any status ≥300.
    pub fn execute(&self, request: &HttpRequest) -> Result<Option<String>, HttpError> {
        let response = self.send(request)?;
        check_status(request, response)
    }

    /// Send `request` and read the full response, whatever its status.
    ///
    /// Only transport failures are errors here.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let uri = request.uri();
        debug!(method = request.method.as_str(), uri, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(uri);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(uri);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| transport_failure(request, e))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = if can_have_body(status.as_u16()) {
            let bytes = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
                .map_err(|e| transport_failure(request, e))?;
            Some(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            None
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Map a status ≥300 to `HttpError::Status`, logging the request first.
fn check_status(request: &HttpRequest, response: HttpResponse) -> Result<Option<String>, HttpError> {
    if response.is_success() {
        return Ok(response.body);
    }
    warn!(
        uri = request.uri(),
        body = request.body.as_deref(),
        status = response.status,
        "HTTP status code error"
    );
    Err(HttpError::Status {
        status: response.status,
        reason: response.reason,
    })
}

fn transport_failure(request: &HttpRequest, source: ureq::Error) -> HttpError {
    let err = HttpError::transport(request.uri(), source);
    error!(
        method = request.method.as_str(),
        url = request.uri(),
        error = %err,
        "request failed"
    );
    err
}
