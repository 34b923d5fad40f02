/// Query use-cases over the climate dataset.
///
/// Each use-case is a free function over any `Repository`, so it can be
/// exercised against a hand-built dataset. `QueryEngine` wraps them for the
/// service: it acquires a `ReadHandle` from the shared `Store` for the
/// duration of a single call.
///
/// Empty results (unknown station, nothing in range) are successful
/// results. The only failures are malformed date input and an unloaded
/// store.

use crate::model::{Station, TemperatureStats};
use crate::repository::Repository;
use crate::store::{Store, StoreError};
use crate::window::{self, DEFAULT_WINDOW_DAYS};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QueryError {
    /// A date parameter did not parse as `YYYY-MM-DD`.
    #[error("invalid {field} date '{value}': expected YYYY-MM-DD ({source})")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// True for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::InvalidDate { .. })
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Parameters of the rolling time-series window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuerySettings {
    /// The date treated as "most recent".
    pub anchor_date: NaiveDate,
    /// Length of the trailing window, in days.
    pub window_days: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            anchor_date: window::default_anchor(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl QuerySettings {
    pub fn window_start(&self) -> NaiveDate {
        window::window_start(self.anchor_date, self.window_days)
    }
}

// ---------------------------------------------------------------------------
// Use-cases
// ---------------------------------------------------------------------------

/// `date -> precipitation` over the trailing window.
///
/// When several measurements share a date, the one that comes last in the
/// repository's ordering overwrites the others. No error is raised for the
/// dropped values.
pub fn precipitation_series<R: Repository + ?Sized>(
    repo: &R,
    settings: &QuerySettings,
) -> BTreeMap<String, Option<f64>> {
    repo.list_precipitation(settings.window_start())
        .into_iter()
        .collect()
}

/// Every station, in storage order.
pub fn station_catalog<R: Repository + ?Sized>(repo: &R) -> Vec<Station> {
    repo.list_stations().to_vec()
}

/// Raw tobs values for one station over the trailing window, oldest first.
pub fn station_temperature_series<R: Repository + ?Sized>(
    repo: &R,
    settings: &QuerySettings,
    station_id: &str,
) -> Vec<f64> {
    repo.list_temperatures(station_id, settings.window_start())
}

/// min / avg / max tobs from `start` (inclusive) to `end` (inclusive, optional).
pub fn temperature_range_stats<R: Repository + ?Sized>(
    repo: &R,
    start: &str,
    end: Option<&str>,
) -> Result<TemperatureStats, QueryError> {
    let start = parse_query_date("start", start)?;
    let end = end.map(|e| parse_query_date("end", e)).transpose()?;

    Ok(repo.aggregate_temperature(start, end))
}

/// Parses a caller-supplied date, naming the offending parameter on failure.
pub fn parse_query_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    window::parse_date(value).map_err(|source| QueryError::InvalidDate {
        field,
        value: value.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs use-cases against the shared store, one read handle per call.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<Store>,
    settings: QuerySettings,
}

impl QueryEngine {
    pub fn new(store: Arc<Store>, settings: QuerySettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn precipitation_series(&self) -> Result<BTreeMap<String, Option<f64>>, QueryError> {
        let data = self.store.acquire()?;
        Ok(precipitation_series(&*data, &self.settings))
    }

    pub fn station_catalog(&self) -> Result<Vec<Station>, QueryError> {
        let data = self.store.acquire()?;
        Ok(station_catalog(&*data))
    }

    pub fn station_temperature_series(&self, station_id: &str) -> Result<Vec<f64>, QueryError> {
        let data = self.store.acquire()?;
        Ok(station_temperature_series(&*data, &self.settings, station_id))
    }

    pub fn temperature_range_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, QueryError> {
        let data = self.store.acquire()?;
        temperature_range_stats(&*data, start, end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
