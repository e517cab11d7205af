//! Core types for citytime

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::timezone::TimezoneCatalog;

/// A city and the IANA timezone it lives in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct City {
    /// City name
    pub name: String,
    /// IANA timezone identifier, e.g. `Europe/London`
    pub timezone: String,
}

impl City {
    /// Build a city, checking the timezone against the catalog
    pub fn validated(
        name: impl Into<String>,
        timezone: impl Into<String>,
        catalog: &TimezoneCatalog,
    ) -> Result<Self> {
        let name = name.into();
        let timezone = timezone.into();

        if name.trim().is_empty() {
            return Err(Error::validation("name", "name must not be empty"));
        }
        if !catalog.contains(&timezone) {
            return Err(Error::validation(
                "timezone",
                format!("{} is not a valid timezone", timezone),
            ));
        }

        Ok(Self { name, timezone })
    }
}

/// A city together with its current local datetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CityDetails {
    /// City name
    pub name: String,
    /// IANA timezone identifier
    pub timezone: String,
    /// Current datetime in the city's timezone, as reported upstream
    pub datetimezone: Option<String>,
}

impl CityDetails {
    pub fn new(city: City, datetime: Option<String>) -> Self {
        Self {
            name: city.name,
            timezone: city.timezone,
            datetimezone: datetime,
        }
    }
}
