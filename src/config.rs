use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub api_base: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyConfig {
    pub accounts_base: String,
    pub api_base: String,
    pub client_id: String,
    pub client_secret: String,
    /// The demo profile endpoint is pinned to one username.
    pub profile_user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
    pub spotify: SpotifyConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "devconnect".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "devconnect-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let github = GithubConfig {
            api_base: std::env::var("GITHUB_API_BASE")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            client_id: std::env::var("GITHUB_CLIENT_ID").ok(),
            client_secret: std::env::var("GITHUB_CLIENT_SECRET").ok(),
        };
        let spotify = SpotifyConfig {
            accounts_base: std::env::var("SPOTIFY_ACCOUNTS_BASE")
                .unwrap_or_else(|_| "https://accounts.spotify.com".into()),
            api_base: std::env::var("SPOTIFY_API_BASE")
                .unwrap_or_else(|_| "https://api.spotify.com".into()),
            client_id: std::env::var("SPOTIFY_CLIENT_ID")?,
            client_secret: std::env::var("SPOTIFY_CLIENT_SECRET")?,
            profile_user: std::env::var("SPOTIFY_PROFILE_USER")
                .unwrap_or_else(|_| "sillysalamander".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            github,
            spotify,
        })
    }
}
