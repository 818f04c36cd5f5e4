//! Blocking HTTP helper and service client.
//!
//! # Overview
//! `HttpUtil` performs GET and POST (form or JSON) calls over one pooled
//! `ureq` agent and turns any status ≥300 into `HttpError::Status` after
//! logging the request. `ServiceClient` reads `service.url` from
//! `ServiceConfig` and calls the fixed `/service` endpoint.
//!
//! # Design
//! - Requests are plain data (`HttpRequest`) built before any I/O, so the
//!   encoding of query strings, form bodies and headers is testable offline.
//! - `HttpUtil` is a cloneable handle; clones share one connection pool.
//!   `HttpUtil::shared()` is the process-wide default.
//! - Every call blocks until the body is read. Bodies are decoded as UTF-8,
//!   lossily.

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod util;

pub use config::ServiceConfig;
pub use error::{ConfigError, HttpError, TransportKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use service::ServiceClient;
pub use util::{HttpConfig, HttpUtil};
