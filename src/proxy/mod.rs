//! Proxy in front of the worker
//!
//! The proxy is the process end users talk to. It forwards leaderboard
//! requests to the worker's `/process` endpoint under an outer deadline,
//! turns transport failures into distinct user-facing errors, pings the
//! worker for health, and serves the favorite-league list.

use crate::alerts::AlertNotifier;
use crate::config::{Config, ProxyConfig};
use crate::error::{Error, Result, SimpleError};
use crate::types::{FavoriteLeague, ProcessRequest, ProcessResponse};
use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod routes;

/// Warning reported by `/health` when the worker does not answer
pub const WORKER_UNAVAILABLE_WARNING: &str = "Worker server is not responding";

/// Proxy health report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProxyHealth {
    /// Always "ok" while the proxy itself serves
    pub status: String,
    /// Worker base URL
    pub worker_url: String,
    /// Whether the worker answered its health check
    pub worker_reachable: bool,
    /// The worker's own health body, or `{"status": "unreachable"}`
    #[schema(value_type = Object)]
    pub worker: serde_json::Value,
    /// Set when the worker is unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// HTTP client for the worker API
#[derive(Clone, Debug)]
pub struct ProxyClient {
    client: reqwest::Client,
    worker_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
    alerts: AlertNotifier,
}

impl ProxyClient {
    /// Create a client for the worker described by `config`
    pub fn new(config: &ProxyConfig, alerts: AlertNotifier) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            worker_url: config.worker_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
            health_timeout: config.health_timeout,
            alerts,
        })
    }

    /// Worker base URL without a trailing slash
    pub fn worker_url(&self) -> &str {
        &self.worker_url
    }

    /// Ask the worker for a leaderboard.
    ///
    /// # Errors
    ///
    /// - [`Error::UpstreamTimeout`] when the worker exceeds the outer deadline
    /// - [`Error::UpstreamUnreachable`] when no connection can be made
    /// - [`Error::Worker`] when the worker answers with a non-success status
    ///
    /// The first two also raise an operator alert.
    pub async fn leaderboard(&self, league_id: u64, gameweek: u32) -> Result<ProcessResponse> {
        let url = format!("{}/process", self.worker_url);
        tracing::info!(league_id, gameweek, worker_url = %self.worker_url, "Forwarding leaderboard request");

        let result = self.request_leaderboard(&url, league_id, gameweek).await;

        if let Err(e) = &result {
            tracing::warn!(league_id, gameweek, error = %e, "Leaderboard request to worker failed");
            self.alerts.notify_for_error(e, &self.worker_url);
        }
        result
    }

    async fn request_leaderboard(
        &self,
        url: &str,
        league_id: u64,
        gameweek: u32,
    ) -> Result<ProcessResponse> {
        let response = self
            .client
            .post(url)
            .json(&ProcessRequest {
                gameweek,
                league_id,
            })
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ProcessResponse>()
                .await
                .map_err(|e| self.classify(e));
        }

        let message = match response.json::<SimpleError>().await {
            Ok(body) => body.error,
            Err(_) => "Unknown error".to_string(),
        };
        Err(Error::Worker {
            status: status.as_u16(),
            message,
        })
    }

    /// Map a transport failure onto the proxy's error kinds
    fn classify(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::UpstreamTimeout {
                after: self.request_timeout,
            }
        } else if error.is_connect() {
            Error::UpstreamUnreachable {
                url: self.worker_url.clone(),
                reason: error.to_string(),
            }
        } else {
            Error::Network(error)
        }
    }

    /// Ping the worker's health endpoint.
    ///
    /// Never fails: an unreachable worker is reported in the body.
    pub async fn health(&self) -> ProxyHealth {
        let url = format!("{}/health", self.worker_url);

        let reply = match self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.json::<serde_json::Value>().await.ok(),
            Err(e) => {
                tracing::warn!(worker_url = %self.worker_url, error = %e, "Worker health check failed");
                None
            }
        };

        let worker_reachable = reply.is_some();
        ProxyHealth {
            status: "ok".to_string(),
            worker_url: self.worker_url.clone(),
            worker_reachable,
            worker: reply.unwrap_or_else(|| serde_json::json!({"status": "unreachable"})),
            warning: (!worker_reachable).then(|| WORKER_UNAVAILABLE_WARNING.to_string()),
        }
    }
}

/// Leagues offered to the user: the default league first, then the favorites
pub fn favorite_leagues(config: &ProxyConfig) -> Vec<FavoriteLeague> {
    let default = FavoriteLeague {
        id: config.default_league_id,
        name: format!("Default League ({})", config.default_league_id),
    };

    std::iter::once(default)
        .chain(
            config
                .favorite_leagues
                .iter()
                .filter(|league| league.id != config.default_league_id)
                .cloned(),
        )
        .collect()
}

/// Shared state of the proxy router
#[derive(Clone)]
pub struct ProxyState {
    /// Worker client
    pub client: Arc<ProxyClient>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

/// Create the proxy router
///
/// # Routes
///
/// - `POST /leaderboard` - Forward a leaderboard request to the worker
/// - `GET /health` - Proxy health including worker reachability
/// - `GET /favorite-leagues` - Leagues offered for quick selection
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_proxy_router(client: Arc<ProxyClient>, config: Arc<Config>) -> Router {
    let state = ProxyState {
        client,
        config: config.clone(),
    };

    let router = Router::new()
        .route("/leaderboard", post(routes::get_leaderboard))
        .route("/health", get(routes::proxy_health))
        .route("/favorite-leagues", get(routes::list_favorite_leagues));

    let router = if config.server.api.swagger_ui {
        router.merge(
            SwaggerUi::new("/swagger-ui").url(
                "/api-docs/openapi.json",
                crate::api::openapi::ProxyApiDoc::openapi(),
            ),
        )
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        router.layer(crate::api::build_cors_layer(&config.server.api.cors_origins))
    } else {
        router
    }
}

/// Start the proxy server on `config.proxy.bind_address`.
///
/// Runs until `shutdown` is cancelled.
pub async fn start_proxy_server(config: Arc<Config>, shutdown: CancellationToken) -> Result<()> {
    let alerts = AlertNotifier::new(&config.alerts);
    let client = Arc::new(ProxyClient::new(&config.proxy, alerts)?);
    let bind_address = config.proxy.bind_address;

    tracing::info!(
        address = %bind_address,
        worker_url = %client.worker_url(),
        "Starting proxy server"
    );

    let app = create_proxy_router(client, config);

    let listener = TcpListener::bind(bind_address).await.map_err(Error::Io)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| Error::ApiServerError(e.to_string()))?;

    tracing::info!("Proxy server stopped");
    Ok(())
}
