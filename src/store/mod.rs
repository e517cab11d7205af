//! In-memory storage for cities

mod city_registry;

pub use city_registry::CityRegistry;
