/// surfsup_service: read-only query service over the Hawaii climate dataset.
///
/// # Module structure
///
/// ```text
/// surfsup_service
/// ├── model       — statically declared records (Measurement, Station, TemperatureStats)
/// ├── window      — anchor date constant and rolling window arithmetic
/// ├── store       — immutable Dataset, initialize-once Store, scoped ReadHandle
/// ├── repository  — the four read operations over the dataset
/// ├── query       — use-cases: precipitation, stations, tobs series, temperature stats
/// ├── response    — external JSON payload shapes
/// ├── config      — service configuration loader (surfsup.toml)
/// ├── db          — loads the dataset once from SQLite or PostgreSQL
/// ├── endpoint    — HTTP routing and worker pool
/// └── fixtures (test only) — small representative dataset
/// ```

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod query;
pub mod repository;
pub mod response;
pub mod store;
pub mod window;

#[cfg(test)]
pub(crate) mod fixtures;
