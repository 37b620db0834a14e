use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AppConfig;

/// Errors surfaced by upstream calls. Mapping to HTTP responses happens in
/// the handlers.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream answered {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Read-only third-party lookups behind one seam so handlers can run against
/// a fake in tests.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn github_repos(&self, username: &str) -> Result<Value, UpstreamError>;
    async fn spotify_profile(&self) -> Result<Value, UpstreamError>;
}

const USER_AGENT: &str = concat!("devconnect/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const GITHUB_REPOS_PER_PAGE: &str = "5";

pub struct HttpUpstream {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl HttpUpstream {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[async_trait]
impl Upstream for HttpUpstream {
    /// Up to five repositories, oldest first by creation date.
    async fn github_repos(&self, username: &str) -> Result<Value, UpstreamError> {
        let gh = &self.config.github;
        let url = format!("{}/users/{}/repos", gh.api_base, username);
        let mut query: Vec<(&str, String)> = vec![
            ("per_page", GITHUB_REPOS_PER_PAGE.into()),
            ("sort", "created".into()),
            ("direction", "asc".into()),
        ];
        if let (Some(id), Some(secret)) = (&gh.client_id, &gh.client_secret) {
            query.push(("client_id", id.clone()));
            query.push(("client_secret", secret.clone()));
        }

        debug!(%username, "fetching github repos");
        let response = self.http.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), %username, "github answered non-success");
            return Err(UpstreamError::Status(response.status()));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn spotify_profile(&self) -> Result<Value, UpstreamError> {
        let sp = &self.config.spotify;

        let token_url = format!("{}/api/token", sp.accounts_base);
        let response = self
            .http
            .post(&token_url)
            .basic_auth(&sp.client_id, Some(&sp.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "spotify token exchange failed");
            return Err(UpstreamError::Status(response.status()));
        }
        let token = response.json::<TokenResponse>().await?;

        let url = format!("{}/v1/users/{}", sp.api_base, sp.profile_user);
        debug!(user = %sp.profile_user, "fetching spotify profile");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "spotify profile fetch failed");
            return Err(UpstreamError::Status(response.status()));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubConfig, JwtConfig, SpotifyConfig};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with(github_base: &str, accounts_base: &str, api_base: &str) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            database_url: "postgres://localhost/unused".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            },
            github: GithubConfig {
                api_base: github_base.into(),
                client_id: None,
                client_secret: None,
            },
            spotify: SpotifyConfig {
                accounts_base: accounts_base.into(),
                api_base: api_base.into(),
                client_id: "client-id".into(),
                client_secret: "client-secret".into(),
                profile_user: "demo".into(),
            },
        })
    }

    #[tokio::test]
    async fn github_success_passes_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("per_page", "5"))
            .and(query_param("sort", "created"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "name": "hello-world" }])),
            )
            .mount(&server)
            .await;

        let upstream =
            HttpUpstream::new(config_with(&server.uri(), "http://unused.invalid", "http://unused.invalid"))
                .unwrap();
        let repos = upstream.github_repos("octocat").await.unwrap();
        assert_eq!(repos[0]["name"], "hello-world");
    }

    #[tokio::test]
    async fn github_non_success_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let upstream =
            HttpUpstream::new(config_with(&server.uri(), "http://unused.invalid", "http://unused.invalid"))
                .unwrap();
        let err = upstream.github_repos("ghost").await.unwrap_err();
        match err {
            UpstreamError::Status(status) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn github_server_error_also_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/flaky/repos"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let upstream =
            HttpUpstream::new(config_with(&server.uri(), "http://unused.invalid", "http://unused.invalid"))
                .unwrap();
        let err = upstream.github_repos("flaky").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status(_)));
    }

    #[tokio::test]
    async fn spotify_exchanges_token_then_fetches_profile() {
        let accounts = MockServer::start().await;
        let api = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&accounts)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users/demo"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "demo" })))
            .mount(&api)
            .await;

        let upstream =
            HttpUpstream::new(config_with("http://unused.invalid", &accounts.uri(), &api.uri()))
                .unwrap();
        let profile = upstream.spotify_profile().await.unwrap();
        assert_eq!(profile["id"], "demo");
    }

    #[tokio::test]
    async fn spotify_failed_token_exchange_is_a_status_error() {
        let accounts = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&accounts)
            .await;

        let upstream =
            HttpUpstream::new(config_with("http://unused.invalid", &accounts.uri(), "http://unused.invalid"))
                .unwrap();
        let err = upstream.spotify_profile().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status(_)));
    }
}
