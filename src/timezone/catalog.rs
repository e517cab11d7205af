//! The set of timezone identifiers accepted for new cities

use std::collections::HashSet;

use super::client::WorldTimeClient;
use crate::error::Result;

/// Immutable set of valid timezone identifiers
///
/// Loaded once at startup and shared read-only with the handlers.
#[derive(Debug, Clone, Default)]
pub struct TimezoneCatalog {
    zones: HashSet<String>,
}

impl TimezoneCatalog {
    /// Fetch the catalog from the world-time service
    pub async fn load(client: &WorldTimeClient) -> Result<Self> {
        let zones = client.list_timezones().await?;
        let catalog = Self::from_iter(zones);
        tracing::info!(
            "Loaded {} timezones from {}",
            catalog.len(),
            client.base_url()
        );
        Ok(catalog)
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.zones.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// All identifiers in lexical order
    pub fn sorted(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = self.zones.iter().map(String::as_str).collect();
        zones.sort_unstable();
        zones
    }
}

impl<S: Into<String>> FromIterator<S> for TimezoneCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().map(Into::into).collect(),
        }
    }
}
