//! Blocking HTTP client for the Stud.IP REST API

use std::io::Write;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use tracing::debug;

use super::RemoteApi;
use crate::config::Config;
use crate::error::{Error, Result};

/// Name of the Stud.IP session cookie
const SESSION_COOKIE: &str = "Seminar_Session";

/// Cookie-authenticated client bound to one Stud.IP host
pub struct StudipClient {
    client: Client,
    base_url: String,
    prefix: String,
}

impl StudipClient {
    /// Build a client for the configured host using the given session token
    pub fn new(config: &Config, session_cookie: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut cookie = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, session_cookie))
            .map_err(|_| Error::Config("Session cookie contains invalid characters".into()))?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("studip-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
            prefix: config.api_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an API path, with or without the API prefix
    fn url(&self, path: &str) -> String {
        let path = if self.prefix.is_empty() {
            path
        } else {
            path.strip_prefix(self.prefix.as_str()).unwrap_or(path)
        };
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl RemoteApi for StudipClient {
    fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.send(path)?.json()?)
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut response = self.send(path)?;
        Ok(response.copy_to(sink)?)
    }
}
