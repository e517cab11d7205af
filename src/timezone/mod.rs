//! Timezone catalog and world-time client

mod catalog;
mod client;

pub use catalog::TimezoneCatalog;
pub use client::WorldTimeClient;
