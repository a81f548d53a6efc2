//! OpenAPI documentation and schema generation
//!
//! Specifications for the worker API and the proxy API, generated at compile
//! time with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the worker API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gw-leaderboard worker API",
        version = "0.1.0",
        description = "Computes gameweek leaderboards for Fantasy Premier League classic leagues",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5001", description = "Local worker")
    ),
    paths(
        crate::api::routes::process,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        crate::types::LeagueId,
        crate::types::TeamId,
        crate::types::LeaderboardRow,
        crate::types::ProcessRequest,
        crate::types::ProcessResponse,
        crate::types::WorkerHealth,
        crate::types::Event,

        crate::config::Config,
        crate::config::RemoteConfig,
        crate::config::AggregationConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,
        crate::config::ProxyConfig,
        crate::config::AlertConfig,
        crate::config::WebhookConfig,

        crate::error::ApiError,
        crate::error::ErrorDetail,
        crate::error::SimpleError,
    )),
    tags(
        (name = "leaderboard", description = "Leaderboard computation"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the proxy API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gw-leaderboard proxy API",
        version = "0.1.0",
        description = "Forwards leaderboard requests to a worker and reports worker health",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local proxy")
    ),
    paths(
        crate::proxy::routes::get_leaderboard,
        crate::proxy::routes::proxy_health,
        crate::proxy::routes::list_favorite_leagues,
    ),
    components(schemas(
        crate::types::ProcessRequest,
        crate::types::ProcessResponse,
        crate::types::FavoriteLeague,
        crate::proxy::ProxyHealth,
        crate::error::SimpleError,
    )),
    tags(
        (name = "leaderboard", description = "Leaderboard requests forwarded to the worker"),
        (name = "system", description = "Proxy and worker health"),
    )
)]
pub struct ProxyApiDoc;
