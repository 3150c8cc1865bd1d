//! Authenticated single-attempt calls against the upstream game API

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::credential::ApiKey;
use super::http_client::create_http_client_with_timeout;
use super::urls::HostResolver;
use crate::config::Config;
use crate::constants::CREDENTIAL_HEADER;
use crate::error::AppError;

/// Thin typed wrapper around `reqwest` that injects the credential header and
/// maps transport outcomes onto the error taxonomy.
///
/// It never retries. Retry and pacing live in [`crate::scheduler::Scheduler`].
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    api_key: ApiKey,
    hosts: HostResolver,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if config.api_key.is_blank() {
            return Err(AppError::config_error(
                "Upstream API key is missing; set RIOT_API_KEY",
            ));
        }
        let http = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::with_http(
            http,
            config.api_key.clone(),
            HostResolver::new(config.host_template.clone()),
        ))
    }

    pub fn with_http(http: Client, api_key: ApiKey, hosts: HostResolver) -> Self {
        Self {
            http,
            api_key,
            hosts,
        }
    }

    pub fn hosts(&self) -> &HostResolver {
        &self.hosts
    }

    /// Issues one authenticated GET and returns the JSON body.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn call(&self, url: Url) -> Result<Value, AppError> {
        debug!("Calling upstream");

        let response = match self
            .http
            .get(url.clone())
            .header(CREDENTIAL_HEADER, self.api_key.expose())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Request failed for URL {}: {}", url, e);
                return Err(if e.is_timeout() {
                    AppError::network_timeout(url.as_str())
                } else if e.is_connect() {
                    AppError::network_connection(url.as_str(), e.to_string())
                } else {
                    AppError::ApiFetch(e.without_url())
                });
            }
        };

        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            let err = status_to_error(status.as_u16(), response.headers(), url.as_str());
            if err.is_fatal() {
                error!(
                    "Upstream rejected credential {} with {}: {}",
                    self.api_key, status, url
                );
            } else if err.is_not_found() {
                debug!("Upstream returned 404 for {url}");
            } else {
                warn!("Upstream returned {} for {}", status, url);
            }
            return Err(err);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AppError::network_timeout(url.as_str())
            } else {
                AppError::ApiFetch(e.without_url())
            }
        })?;
        debug!("Response length: {} bytes", body.len());

        if body.trim().is_empty() {
            return Err(AppError::api_unexpected_structure(
                "Response body is empty",
                url.as_str(),
            ));
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            AppError::api_unexpected_structure(e.to_string(), url.as_str())
        })
    }

    /// Same as [`call`](Self::call) but decodes into a typed model.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        let location = url.to_string();
        let value = self.call(url).await?;
        serde_json::from_value(value).map_err(|e| {
            error!("Unexpected structure from {}: {}", location, e);
            AppError::api_unexpected_structure(e.to_string(), location)
        })
    }
}

/// Maps a non-success HTTP status to the error taxonomy.
pub fn status_to_error(status: u16, headers: &HeaderMap, url: &str) -> AppError {
    match status {
        401 => AppError::api_unauthorized(url),
        403 => AppError::api_forbidden(url),
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(parse_retry_after(headers), url),
        500..=599 => AppError::api_server_error(
            status,
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown error"),
            url,
        ),
        _ => AppError::api_client_error(
            status,
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown error"),
            url,
        ),
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::upstream::http_client::create_test_http_client;
    use crate::upstream::routing::Platform;
    use crate::upstream::urls::summoner_by_puuid_url;
    use reqwest::header::HeaderValue;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn client_for(server: &MockServer) -> UpstreamClient {
        UpstreamClient::with_http(
            create_test_http_client(),
            ApiKey::new("RGAPI-test-key-000111"),
            HostResolver::new(format!("{}/{{host}}", server.uri())),
        )
    }

    #[tokio::test]
    async fn test_call_injects_credential_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/la1/lol/summoner/v4/summoners/by-puuid/p1"))
            .and(header("X-Riot-Token", "RGAPI-test-key-000111"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "s1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = summoner_by_puuid_url(client.hosts(), Platform::La1, "p1").unwrap();
        let value = client.call(url).await.unwrap();
        assert_eq!(value["id"], "s1");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_taxonomy() {
        let server = MockServer::start().await;
        let cases = [
            ("p404", ResponseTemplate::new(404), ErrorKind::NotFound),
            ("p401", ResponseTemplate::new(401), ErrorKind::Unauthorized),
            ("p403", ResponseTemplate::new(403), ErrorKind::Forbidden),
            ("p500", ResponseTemplate::new(500), ErrorKind::ServerError),
            (
                "p429",
                ResponseTemplate::new(429).insert_header("Retry-After", "3"),
                ErrorKind::RateLimited,
            ),
        ];
        for (puuid, template, _) in &cases {
            Mock::given(method("GET"))
                .and(path(format!("/la1/lol/summoner/v4/summoners/by-puuid/{puuid}")))
                .respond_with(template.clone())
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        for (puuid, _, kind) in cases {
            let url = summoner_by_puuid_url(client.hosts(), Platform::La1, puuid).unwrap();
            let err = client.call(url).await.unwrap_err();
            assert_eq!(err.kind(), kind, "status for {puuid}");
            if kind == ErrorKind::RateLimited {
                assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
            }
        }
    }

    #[tokio::test]
    async fn test_exceeded_deadline_is_retryable_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "s1"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = UpstreamClient::with_http(
            create_http_client_with_timeout(1).unwrap(),
            ApiKey::new("RGAPI-test-key-000111"),
            HostResolver::new(format!("{}/{{host}}", server.uri())),
        );
        let url = summoner_by_puuid_url(client.hosts(), Platform::La1, "slow").unwrap();
        let err = client.call(url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_retryable());
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_errors_never_contain_the_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = summoner_by_puuid_url(client.hosts(), Platform::Kr, "p").unwrap();
        let err = client.call(url).await.unwrap_err();
        assert!(!err.to_string().contains("RGAPI-test-key"));
        assert!(!format!("{err:?}").contains("RGAPI-test-key"));
    }

    #[tokio::test]
    async fn test_empty_body_is_unexpected_structure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = summoner_by_puuid_url(client.hosts(), Platform::Kr, "p").unwrap();
        let err = client.call(url).await.unwrap_err();
        assert!(matches!(err, AppError::ApiUnexpectedStructure { .. }));
    }

    #[test]
    fn test_missing_retry_after_defaults_to_one_second() {
        let err = status_to_error(429, &HeaderMap::new(), "url");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(1)));

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("not-a-number"));
        let err = status_to_error(429, &headers, "url");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_other_client_errors() {
        let err = status_to_error(400, &HeaderMap::new(), "url");
        assert!(matches!(err, AppError::ApiClientError { status: 400, .. }));
    }
}
