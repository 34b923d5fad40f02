/// Shared record types for the climate dataset.
///
/// These replace runtime table reflection: the loader maps the `measurement`
/// and `station` tables onto these structs explicitly, and nothing else in
/// the crate needs to know how the backing store is laid out.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single daily observation recorded at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Station identifier, e.g. "USC00519397". References `Station::station_id`.
    pub station_id: String,
    /// ISO-8601 date (`YYYY-MM-DD`). Plain string ordering is date ordering.
    pub date: String,
    /// Daily precipitation in inches. Missing for some station-days.
    pub precipitation: Option<f64>,
    /// Temperature observation (tobs) in degrees Fahrenheit.
    pub temperature_observation: f64,
}

/// Station metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Min / average / max over a set of temperature observations.
///
/// All three fields are `None` when no observations matched. That is the
/// "no data" result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// The "no data" result.
    pub const EMPTY: TemperatureStats = TemperatureStats {
        min: None,
        avg: None,
        max: None,
    };

    /// Folds observations into min / avg / max in a single pass.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self::EMPTY;
        }

        TemperatureStats {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }

    /// Positional `[min, avg, max]`. Order is part of the external contract.
    pub fn as_triple(&self) -> [Option<f64>; 3] {
        [self.min, self.avg, self.max]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
