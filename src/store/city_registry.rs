//! In-memory, ordered city registry with 1-based positional ids

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::City;

/// Ordered list of cities guarded by a single lock
///
/// A city's id is its 1-based position. Removing a city shifts the ids of
/// every city after it down by one.
#[derive(Debug, Default)]
pub struct CityRegistry {
    cities: RwLock<Vec<City>>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given cities in order
    pub fn with_cities(cities: Vec<City>) -> Self {
        Self {
            cities: RwLock::new(cities),
        }
    }

    /// Snapshot of all cities in insertion order
    pub async fn list_all(&self) -> Vec<City> {
        self.cities.read().await.clone()
    }

    /// Look up a city by its 1-based id
    pub async fn get(&self, id: usize) -> Result<City> {
        let cities = self.cities.read().await;
        let index = position(id, cities.len())?;
        Ok(cities[index].clone())
    }

    /// Add a city to the end, returning the stored record and its id
    pub async fn append(&self, city: City) -> (usize, City) {
        let mut cities = self.cities.write().await;
        cities.push(city.clone());
        (cities.len(), city)
    }

    /// Remove the city with the given 1-based id
    pub async fn remove(&self, id: usize) -> Result<City> {
        let mut cities = self.cities.write().await;
        let index = position(id, cities.len())?;
        Ok(cities.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.cities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cities.read().await.is_empty()
    }
}

fn position(id: usize, len: usize) -> Result<usize> {
    if id == 0 || id > len {
        return Err(Error::CityNotFound(id.to_string()));
    }
    Ok(id - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, timezone: &str) -> City {
        City {
            name: name.into(),
            timezone: timezone.into(),
        }
    }

    fn seeded() -> CityRegistry {
        CityRegistry::with_cities(vec![
            city("London", "Europe/London"),
            city("Paris", "Europe/Paris"),
        ])
    }

    #[tokio::test]
    async fn test_get_is_one_based() {
        let registry = seeded();

        assert_eq!(registry.get(1).await.unwrap().name, "London");
        assert_eq!(registry.get(2).await.unwrap().name, "Paris");
        assert!(matches!(registry.get(0).await, Err(Error::CityNotFound(_))));
        assert!(matches!(registry.get(3).await, Err(Error::CityNotFound(_))));
    }

    #[tokio::test]
    async fn test_append_returns_new_id() {
        let registry = seeded();

        let (id, stored) = registry.append(city("Tokyo", "Asia/Tokyo")).await;
        assert_eq!(id, 3);
        assert_eq!(stored.name, "Tokyo");
        assert_eq!(registry.len().await, 3);
        assert_eq!(registry.get(3).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_remove_shifts_ids() {
        let registry = seeded();

        let removed = registry.remove(1).await.unwrap();
        assert_eq!(removed.name, "London");
        assert_eq!(registry.get(1).await.unwrap().name, "Paris");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_leaves_registry() {
        let registry = seeded();

        assert!(registry.remove(5).await.is_err());
        assert!(registry.remove(0).await.is_err());
        assert_eq!(
            registry.list_all().await,
            vec![city("London", "Europe/London"), city("Paris", "Europe/Paris")]
        );
    }

    #[tokio::test]
    async fn test_duplicates_allowed() {
        let registry = CityRegistry::new();
        assert!(registry.is_empty().await);

        registry.append(city("Paris", "Europe/Paris")).await;
        registry.append(city("Paris", "Europe/Paris")).await;
        assert_eq!(registry.len().await, 2);
    }
}
