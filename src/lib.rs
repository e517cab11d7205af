//! citytime - a small city registry that reports the current time in each city

pub mod config;
pub mod error;
pub mod types;

pub mod store;
pub mod timezone;
pub mod api;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
