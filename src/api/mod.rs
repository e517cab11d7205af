//! HTTP API layer

mod routes;
mod handlers;

pub use handlers::{CreateCityRequest, ErrorResponse, HealthResponse, TimezonesResponse};
pub use routes::{create_router, ApiDoc, AppState};
