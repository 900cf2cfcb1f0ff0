use crate::error::FixCheckError;
use crate::models::Settings;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::io::Read;
use std::time::Duration;

/// Blocking GET returning the response body as a reader.
///
/// Validators only see this trait, so tests can serve canned catalogs.
#[cfg_attr(test, mockall::automock)]
pub trait HttpFetch {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FixCheckError>;
}

/// [`HttpFetch`] backed by a `reqwest` blocking client.
///
/// The client keeps its connection pool for as long as it lives, so a
/// fetcher created for one stage reuses a single connection per host and
/// releases it when dropped.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Client for the bulk catalog requests: explicit timeout plus the
    /// browser headers upstream WAFs expect.
    pub fn bulk(settings: &Settings) -> Result<Self, FixCheckError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", &settings.user_agent)?);
        headers.insert(ACCEPT, header_value("Accept", &settings.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("Accept-Language", &settings.accept_language)?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(FixCheckError::Client)?;

        tracing::debug!("Bulk HTTP client ready (timeout {}s)", settings.timeout_secs);
        Ok(Self { client })
    }

    /// Client for the per-ID fallback queries, holding one idle connection.
    pub fn session(settings: &Settings) -> Result<Self, FixCheckError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .pool_max_idle_per_host(1)
            .build()
            .map_err(FixCheckError::Client)?;

        tracing::debug!("Opened fallback HTTP session");
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FixCheckError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FixCheckError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FixCheckError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Box::new(response))
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, FixCheckError> {
    HeaderValue::from_str(value).map_err(|_| FixCheckError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}
