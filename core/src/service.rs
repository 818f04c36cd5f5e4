//! Client for the remote service's info endpoint.

use crate::config::ServiceConfig;
use crate::error::{ConfigError, HttpError};
use crate::util::HttpUtil;

pub const SERVICE_INFO_PATH: &str = "/service";

/// Calls `GET {service.url}/service` through a shared `HttpUtil`.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service_url: String,
    http: HttpUtil,
}

impl ServiceClient {
    pub fn new(config: &ServiceConfig, http: HttpUtil) -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: config.service_url()?.to_string(),
            http,
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// The base URL and path are joined as-is, without slash normalization.
    pub fn service_info_url(&self) -> String {
        format!("{}{}", self.service_url, SERVICE_INFO_PATH)
    }

    pub fn get_service_info(&self) -> Result<Option<String>, HttpError> {
        self.http.get(&self.service_info_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::HttpConfig;

    fn client(url: &str) -> ServiceClient {
        ServiceClient::new(&ServiceConfig::new(url), HttpUtil::new(HttpConfig::default())).unwrap()
    }

    #[test]
    fn appends_fixed_path() {
        assert_eq!(client("http://localhost:3000").service_info_url(), "http://localhost:3000/service");
    }

    #[test]
    fn keeps_base_path() {
        assert_eq!(client("http://localhost:3000/api").service_info_url(), "http://localhost:3000/api/service");
    }

    #[test]
    fn does_not_normalize_trailing_slash() {
        assert_eq!(client("http://localhost:3000/").service_info_url(), "http://localhost:3000//service");
    }

    #[test]
    fn requires_configured_url() {
        let err = ServiceClient::new(&ServiceConfig::default(), HttpUtil::new(HttpConfig::default())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingUrl));
    }
}
