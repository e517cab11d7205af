//! API route definitions

use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    self, CreateCityRequest, ErrorResponse, HealthResponse, TimezonesResponse,
};
use crate::config::Config;
use crate::error::Result;
use crate::store::CityRegistry;
use crate::timezone::{TimezoneCatalog, WorldTimeClient};
use crate::types::{City, CityDetails};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "citytime API",
        version = "0.1.0",
        description = "Cities and their current local time"
    ),
    tags(
        (name = "cities", description = "City registry"),
        (name = "timezones", description = "Accepted timezones"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::list_cities,
        handlers::get_city,
        handlers::create_city,
        handlers::delete_city,
        handlers::list_timezones,
    ),
    components(schemas(
        City,
        CityDetails,
        CreateCityRequest,
        TimezonesResponse,
        HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CityRegistry>,
    pub catalog: Arc<TimezoneCatalog>,
    pub clock: Arc<WorldTimeClient>,
    /// Upper bound on enrichment calls in flight for one list request
    pub enrich_concurrency: usize,
}

impl AppState {
    pub fn new(
        registry: CityRegistry,
        catalog: TimezoneCatalog,
        clock: WorldTimeClient,
        enrich_concurrency: usize,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            catalog: Arc::new(catalog),
            clock: Arc::new(clock),
            enrich_concurrency: enrich_concurrency.max(1),
        }
    }

    /// Load the timezone catalog and seed the registry
    ///
    /// Fails when the catalog cannot be fetched or a seed city names an
    /// unknown timezone; the server must not start in either case.
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;

        let clock = WorldTimeClient::new(&config.upstream)?;
        let catalog = TimezoneCatalog::load(&clock).await?;

        let seed = config
            .seed
            .iter()
            .map(|s| City::validated(s.name.clone(), s.timezone.clone(), &catalog))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!("Seeded registry with {} cities", seed.len());

        Ok(Self::new(
            CityRegistry::with_cities(seed),
            catalog,
            clock,
            config.upstream.max_concurrency,
        ))
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        // Cities CRUD
        .route("/cities", get(handlers::list_cities).post(handlers::create_city))
        .route("/cities/{id}", get(handlers::get_city).delete(handlers::delete_city))

        // Catalog
        .route("/timezones", get(handlers::list_timezones))

        // Health
        .route("/health", get(handlers::health))

        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
