//! HTTP request and response types.
//!
//! # Design
//! Requests are described as plain data and built before any I/O happens:
//! the URL already carries its query string, form bodies are already encoded
//! and the content-type sits in the header list next to the caller's headers.
//! `HttpUtil::execute` sends exactly what is described here, so tests can
//! assert on a request without touching the network.

use http::header::{HeaderName, HeaderValue};
use url::form_urlencoded;
use url::Url;

use crate::error::HttpError;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Optional parts of a request. Both lists default to empty and keep the
/// caller's order.
///
/// `params` become the query string of a GET and the form body of a POST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.headers.extend(to_owned_pairs(headers));
        self
    }

    pub fn with_params(mut self, params: &[(&str, &str)]) -> Self {
        self.params.extend(to_owned_pairs(params));
        self
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// GET with the options' params appended to the query string.
    pub fn get(url: &str, options: &RequestOptions) -> Result<Self, HttpError> {
        let mut url = parse_url(url)?;
        validate_headers(&options.headers)?;
        if !options.params.is_empty() {
            url.query_pairs_mut().extend_pairs(options.params.iter());
        }
        Ok(Self {
            method: HttpMethod::Get,
            url,
            headers: options.headers.clone(),
            body: None,
        })
    }

    /// POST with the options' params URL-encoded as the body. No params means
    /// no body at all.
    pub fn post_form(url: &str, options: &RequestOptions) -> Result<Self, HttpError> {
        let url = parse_url(url)?;
        validate_headers(&options.headers)?;
        let mut headers = options.headers.clone();
        let body = if options.params.is_empty() {
            None
        } else {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(options.params.iter())
                .finish();
            if !has_header(&headers, CONTENT_TYPE) {
                headers.push((CONTENT_TYPE.to_string(), APPLICATION_FORM.to_string()));
            }
            Some(encoded)
        };
        Ok(Self {
            method: HttpMethod::Post,
            url,
            headers,
            body,
        })
    }

    /// POST with `json` sent as-is.
    pub fn post_json(url: &str, headers: &[(String, String)], json: &str) -> Result<Self, HttpError> {
        let url = parse_url(url)?;
        validate_headers(headers)?;
        let mut headers = headers.to_vec();
        if !has_header(&headers, CONTENT_TYPE) {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        Ok(Self {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(json.to_string()),
        })
    }

    pub fn uri(&self) -> &str {
        self.url.as_str()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `body` is `None` when the response cannot carry an entity (1xx, 204, 304),
/// and `Some("")` for an empty entity on any other status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Whether a response with this status may have a body at all.
pub fn can_have_body(status: u16) -> bool {
    status >= 200 && status != 204 && status != 304
}

fn parse_url(url: &str) -> Result<Url, HttpError> {
    Url::parse(url).map_err(|source| HttpError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Reject header names and values that cannot go on the wire.
fn validate_headers(headers: &[(String, String)]) -> Result<(), HttpError> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|source| HttpError::InvalidHeaderName {
            name: name.clone(),
            source,
        })?;
        HeaderValue::from_str(value).map_err(|source| HttpError::InvalidHeaderValue {
            name: name.clone(),
            source,
        })?;
    }
    Ok(())
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

pub(crate) fn to_owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "http://localhost:3000";

    #[test]
    fn get_without_options_keeps_url() {
        let req = HttpRequest::get(&format!("{BASE_URL}/service"), &RequestOptions::new()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.uri(), "http://localhost:3000/service");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn get_appends_params_to_query_in_order() {
        let options = RequestOptions::new().param("q", "a b").param("page", "2");
        let req = HttpRequest::get(&format!("{BASE_URL}/search"), &options).unwrap();
        assert_eq!(req.uri(), "http://localhost:3000/search?q=a+b&page=2");
        assert!(req.body.is_none());
    }

    #[test]
    fn get_keeps_existing_query() {
        let options = RequestOptions::new().param("b", "2");
        let req = HttpRequest::get(&format!("{BASE_URL}/x?a=1"), &options).unwrap();
        assert_eq!(req.uri(), "http://localhost:3000/x?a=1&b=2");
    }

    #[test]
    fn get_copies_headers_verbatim() {
        let options = RequestOptions::new().with_headers(&[("X-Trace-Id", "abc"), ("Accept", "text/plain")]);
        let req = HttpRequest::get(BASE_URL, &options).unwrap();
        assert_eq!(
            req.headers,
            vec![
                ("X-Trace-Id".to_string(), "abc".to_string()),
                ("Accept".to_string(), "text/plain".to_string()),
            ]
        );
    }

    #[test]
    fn post_form_encodes_params() {
        let options = RequestOptions::new().with_params(&[("name", "Zoë"), ("tag", "a&b")]);
        let req = HttpRequest::post_form(&format!("{BASE_URL}/form"), &options).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some("name=Zo%C3%AB&tag=a%26b"));
        assert_eq!(req.header("Content-Type"), Some(APPLICATION_FORM));
        assert_eq!(req.uri(), "http://localhost:3000/form");
    }

    #[test]
    fn post_form_without_params_has_no_body() {
        let req = HttpRequest::post_form(BASE_URL, &RequestOptions::new()).unwrap();
        assert!(req.body.is_none());
        assert!(req.header(CONTENT_TYPE).is_none());
    }

    #[test]
    fn post_json_sets_content_type() {
        let req = HttpRequest::post_json(BASE_URL, &[], r#"{"a":1}"#).unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(req.header(CONTENT_TYPE), Some(APPLICATION_JSON));
    }

    #[test]
    fn post_json_respects_caller_content_type() {
        let headers = vec![("Content-Type".to_string(), "application/vnd.api+json".to_string())];
        let req = HttpRequest::post_json(BASE_URL, &headers, "{}").unwrap();
        assert_eq!(req.headers, headers);
    }

    #[test]
    fn invalid_url_is_rejected_before_io() {
        let err = HttpRequest::get("not a url", &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { ref url, .. } if url == "not a url"));
    }

    #[test]
    fn invalid_header_name_is_rejected_before_io() {
        let options = RequestOptions::new().header("Bad Header", "x");
        let err = HttpRequest::get(BASE_URL, &options).unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName { ref name, .. } if name == "Bad Header"));

        let err = HttpRequest::post_form(BASE_URL, &options.clone().param("a", "1")).unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName { .. }));

        let headers = vec![("X:Colon".to_string(), "x".to_string())];
        let err = HttpRequest::post_json(BASE_URL, &headers, "{}").unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName { ref name, .. } if name == "X:Colon"));
    }

    #[test]
    fn header_value_with_newline_is_rejected() {
        let options = RequestOptions::new().header("X-Trace-Id", "a\r\nInjected: 1");
        let err = HttpRequest::get(BASE_URL, &options).unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderValue { ref name, .. } if name == "X-Trace-Id"));
    }

    #[test]
    fn bodyless_statuses() {
        assert!(!can_have_body(100));
        assert!(!can_have_body(204));
        assert!(!can_have_body(304));
        assert!(can_have_body(200));
        assert!(can_have_body(404));
    }
}
