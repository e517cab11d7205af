//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::routes::AppState;
use crate::error::Error;
use crate::types::{City, CityDetails};

type ApiError = (StatusCode, Json<ErrorResponse>);

// Request bodies

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCityRequest {
    /// City name
    pub name: String,
    /// IANA timezone identifier; must be listed by `/timezones`
    pub timezone: String,
}

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct TimezonesResponse {
    /// Every accepted timezone identifier, sorted
    pub timezones: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Offending request field, for validation errors
    pub field: Option<String>,
}

fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::CityNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidId(_) | Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Upstream(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let field = match &err {
        Error::Validation { field, .. } => Some(field.clone()),
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            field,
        }),
    )
}

/// Parse a path id
///
/// Any integer is accepted; one that is below 1 or too large for `usize`
/// can never match a city and is reported as not found.
fn parse_id(raw: &str) -> Result<usize, Error> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidId(raw.to_string()));
    }

    if negative {
        return Err(Error::CityNotFound(raw.to_string()));
    }

    digits
        .parse::<usize>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| Error::CityNotFound(raw.to_string()))
}

fn log_enrich_failure(what: &str, err: &Error) {
    if err.is_upstream() {
        tracing::warn!("World-time service failed for {}: {}", what, err);
    } else {
        tracing::error!("Failed to enrich {}: {}", what, err);
    }
}

async fn enrich(state: &AppState, city: City) -> Result<CityDetails, Error> {
    let datetime = state.clock.fetch_datetime(&city.timezone).await?;
    Ok(CityDetails::new(city, Some(datetime)))
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// List all cities with their current datetime
#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = 200, description = "All cities in registry order", body = [CityDetails]),
        (status = 502, description = "World-time service failed", body = ErrorResponse)
    ),
    tag = "cities"
)]
pub async fn list_cities(
    State(state): State<AppState>,
) -> Result<Json<Vec<CityDetails>>, ApiError> {
    let cities = state.registry.list_all().await;
    tracing::debug!("Enriching {} cities", cities.len());

    let details: Vec<CityDetails> = stream::iter(cities)
        .map(|city| enrich(&state, city))
        .buffered(state.enrich_concurrency)
        .try_collect()
        .await
        .map_err(|e| {
            log_enrich_failure("city list", &e);
            error_response(e)
        })?;

    Ok(Json(details))
}

/// Get a single city by its 1-based position
#[utoipa::path(
    get,
    path = "/cities/{id}",
    params(
        ("id" = i64, Path, description = "1-based position; shifts when earlier cities are deleted")
    ),
    responses(
        (status = 200, description = "City found", body = CityDetails),
        (status = 422, description = "City ID is not an integer", body = ErrorResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 502, description = "World-time service failed", body = ErrorResponse)
    ),
    tag = "cities"
)]
pub async fn get_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CityDetails>, ApiError> {
    let index = parse_id(&id).map_err(error_response)?;
    let city = state.registry.get(index).await.map_err(error_response)?;

    let details = enrich(&state, city).await.map_err(|e| {
        log_enrich_failure(&format!("city {}", id), &e);
        error_response(e)
    })?;

    Ok(Json(details))
}

/// Add a city to the end of the registry
#[utoipa::path(
    post,
    path = "/cities",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Missing field or unknown timezone", body = ErrorResponse)
    ),
    tag = "cities"
)]
pub async fn create_city(
    State(state): State<AppState>,
    payload: Result<Json<CreateCityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<City>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
                field: None,
            }),
        )
    })?;

    let city = City::validated(req.name, req.timezone, &state.catalog).map_err(error_response)?;
    let (id, city) = state.registry.append(city).await;
    tracing::info!("Created city {} ({}) at id {}", city.name, city.timezone, id);

    Ok((StatusCode::CREATED, Json(city)))
}

/// Remove a city; later cities move up one position
#[utoipa::path(
    delete,
    path = "/cities/{id}",
    params(
        ("id" = i64, Path, description = "1-based position")
    ),
    responses(
        (status = 204, description = "City deleted"),
        (status = 422, description = "City ID is not an integer", body = ErrorResponse),
        (status = 404, description = "City not found", body = ErrorResponse)
    ),
    tag = "cities"
)]
pub async fn delete_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let index = parse_id(&id).map_err(error_response)?;
    let removed = state.registry.remove(index).await.map_err(error_response)?;
    tracing::info!("Deleted city {} at id {}", removed.name, index);

    Ok(StatusCode::NO_CONTENT)
}

/// List the accepted timezone identifiers
#[utoipa::path(
    get,
    path = "/timezones",
    responses(
        (status = 200, description = "Accepted timezones", body = TimezonesResponse)
    ),
    tag = "timezones"
)]
pub async fn list_timezones(State(state): State<AppState>) -> Json<TimezonesResponse> {
    let timezones = state
        .catalog
        .sorted()
        .into_iter()
        .map(String::from)
        .collect();

    Json(TimezonesResponse { timezones })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("0"), Err(Error::CityNotFound(_))));
        assert!(matches!(parse_id("-3"), Err(Error::CityNotFound(_))));
        assert_eq!(parse_id("+2").unwrap(), 2);
        assert!(matches!(parse_id("99999999999999999999"), Err(Error::CityNotFound(_))));
        assert!(matches!(parse_id("-99999999999999999999"), Err(Error::CityNotFound(_))));
        assert!(matches!(parse_id("abc"), Err(Error::InvalidId(_))));
        assert!(matches!(parse_id("1.5"), Err(Error::InvalidId(_))));
        assert!(matches!(parse_id("-"), Err(Error::InvalidId(_))));
    }

    #[test]
    fn test_error_status_mapping() {
        let (status, Json(body)) = error_response(Error::validation("timezone", "bad"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.field.as_deref(), Some("timezone"));

        let (status, _) = error_response(Error::CityNotFound("9".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(Error::InvalidId("abc".into()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = error_response(Error::Upstream("down".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
