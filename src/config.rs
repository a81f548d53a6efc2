//! Configuration types for gw-leaderboard

use crate::error::{Error, Result};
use crate::types::FavoriteLeague;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use utoipa::ToSchema;

/// Remote fantasy API settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoteConfig {
    /// Base URL of the fantasy API (default: "https://fantasy.premierleague.com/api/")
    ///
    /// Endpoint paths are appended to this value; a missing trailing slash is added.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single page or history fetch (default: 10 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub request_timeout: Duration,

    /// User-Agent header sent with every remote request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Aggregation behavior (concurrency cap, pagination ceiling, progress reporting)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AggregationConfig {
    /// Maximum member history fetches in flight at once (default: 20)
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Optional ceiling on standings pages fetched per league (None = follow `has_next`)
    ///
    /// The remote API's continuation flag is the only stop condition when this
    /// is unset, so a feed that always reports another page is followed forever.
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Emit a progress log line and event every N processed members (default: 50)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            max_pages: None,
            progress_interval: default_progress_interval(),
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// Worker REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Worker REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5001)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Proxy settings: where the worker lives and how long to wait for it
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProxyConfig {
    /// Address the proxy API binds to (default: 127.0.0.1:5000)
    #[serde(default = "default_proxy_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Base URL of the worker (default: "http://localhost:5001")
    #[serde(default = "default_worker_url")]
    pub worker_url: String,

    /// Outer deadline for one leaderboard computation (default: 300 seconds)
    #[serde(default = "default_proxy_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub request_timeout: Duration,

    /// Timeout for the worker health ping (default: 5 seconds)
    #[serde(default = "default_health_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub health_timeout: Duration,

    /// League offered first in the favorites list (default: 208271)
    #[serde(default = "default_league_id")]
    pub default_league_id: u64,

    /// Additional leagues offered to the user
    ///
    /// Accepts a list of `{"id", "name"}` objects or the compact
    /// `"id:name,id:name"` string.
    #[serde(default, deserialize_with = "favorites_serde::deserialize")]
    pub favorite_leagues: Vec<FavoriteLeague>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_address: default_proxy_bind_address(),
            worker_url: default_worker_url(),
            request_timeout: default_proxy_timeout(),
            health_timeout: default_health_timeout(),
            default_league_id: default_league_id(),
            favorite_leagues: Vec::new(),
        }
    }
}

/// Operator alerting configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AlertConfig {
    /// Webhooks notified when the worker is unreachable or times out
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

/// Webhook configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookConfig {
    /// URL to POST to
    pub url: String,

    /// Optional authentication header value
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Timeout for webhook requests (default: 30 seconds)
    #[serde(default = "default_webhook_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub timeout: Duration,
}

/// Main configuration
///
/// Fields are organized into logical sub-configs:
/// - [`remote`](RemoteConfig) - fantasy API location and per-call timeout
/// - [`aggregation`](AggregationConfig) - concurrency cap and pagination ceiling
/// - [`server`](ServerIntegrationConfig) - worker REST API
/// - [`proxy`](ProxyConfig) - worker location, outer deadline, favorite leagues
/// - [`alerts`](AlertConfig) - operator webhooks
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Remote fantasy API settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Aggregation settings
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Worker API settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,

    /// Proxy settings
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Operator alert settings
    #[serde(default)]
    pub alerts: AlertConfig,
}

impl Config {
    /// Load a JSON configuration file; omitted fields take their defaults.
    ///
    /// The result is validated before it is returned.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise fail at request time.
    pub fn validate(&self) -> Result<()> {
        if self.aggregation.max_concurrent_fetches == 0 {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                key: Some("aggregation.max_concurrent_fetches".to_string()),
            });
        }

        if self.aggregation.max_pages == Some(0) {
            return Err(Error::Config {
                message: "max_pages must be at least 1 when set".to_string(),
                key: Some("aggregation.max_pages".to_string()),
            });
        }

        url::Url::parse(&self.remote.base_url).map_err(|e| Error::Config {
            message: format!("invalid base_url '{}': {}", self.remote.base_url, e),
            key: Some("remote.base_url".to_string()),
        })?;

        url::Url::parse(&self.proxy.worker_url).map_err(|e| Error::Config {
            message: format!("invalid worker_url '{}': {}", self.proxy.worker_url, e),
            key: Some("proxy.worker_url".to_string()),
        })?;

        for webhook in &self.alerts.webhooks {
            url::Url::parse(&webhook.url).map_err(|e| Error::Config {
                message: format!("invalid webhook url '{}': {}", webhook.url, e),
                key: Some("alerts.webhooks".to_string()),
            })?;
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://fantasy.premierleague.com/api/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("gw-leaderboard/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_concurrent_fetches() -> usize {
    20
}

fn default_progress_interval() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5001))
}

fn default_proxy_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_worker_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_proxy_timeout() -> Duration {
    Duration::from_secs(300) // 5 minutes
}

fn default_health_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_league_id() -> u64 {
    208271
}

fn default_webhook_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Favorite leagues: either a list or the compact string form
mod favorites_serde {
    use crate::types::{FavoriteLeague, parse_favorite_leagues};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Favorites {
        List(Vec<FavoriteLeague>),
        Compact(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<FavoriteLeague>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Favorites::deserialize(deserializer)? {
            Favorites::List(leagues) => leagues,
            Favorites::Compact(raw) => parse_favorite_leagues(&raw),
        })
    }
}
