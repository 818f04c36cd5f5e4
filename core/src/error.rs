//! Error types for the HTTP helper and service client.
//!
//! # Design
//! A status failure (the server answered with ≥300) and a transport failure
//! (no usable answer at all) are separate variants so callers can tell them
//! apart without inspecting messages. Transport failures keep the original
//! `ureq` error as their source and carry a coarse `TransportKind`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The call exceeded the configured timeout.
    Timeout,
    /// No connection could be established: refused, unreachable, DNS.
    Connect,
    /// Any other I/O or protocol failure during the exchange.
    Io,
}

impl TransportKind {
    pub fn classify(err: &ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => TransportKind::Timeout,
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportKind::Connect,
            ureq::Error::Io(e) => match e.kind() {
                io::ErrorKind::TimedOut => TransportKind::Timeout,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable => TransportKind::Connect,
                _ => TransportKind::Io,
            },
            _ => TransportKind::Io,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Timeout => write!(f, "timeout"),
            TransportKind::Connect => write!(f, "connect"),
            TransportKind::Io => write!(f, "io"),
        }
    }
}

/// Errors returned by `HttpUtil` and `ServiceClient`.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a status code of 300 or above.
    ///
    /// `reason` is the canonical phrase for `status`, not the phrase on the
    /// wire; it is empty for codes without one.
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request could not be sent or the response could not be read.
    #[error("{kind} error calling {url}: {source}")]
    Transport {
        kind: TransportKind,
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header name {name:?}: {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    #[error("invalid value for header {name:?}: {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HttpError {
    /// Status code of a status failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            HttpError::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub(crate) fn transport(url: &str, source: ureq::Error) -> Self {
        HttpError::Transport {
            kind: TransportKind::classify(&source),
            url: url.to_string(),
            source,
        }
    }
}

/// Errors raised while loading `ServiceConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Neither the file nor the environment supplied `service.url`.
    #[error("service.url is not configured")]
    MissingUrl,
}
