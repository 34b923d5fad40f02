/// Read operations over the climate dataset.
///
/// The query layer depends only on the `Repository` trait. `Dataset`
/// implements it with plain filters over the in-memory collections; the
/// dates are compared as `YYYY-MM-DD` strings, which sort the same way as
/// the dates they represent.
///
/// Ordering: results that are "ordered by date" use a stable sort, so rows
/// sharing a date keep their storage order.

use crate::model::{Station, TemperatureStats};
use crate::store::Dataset;
use crate::window::format_date;
use chrono::NaiveDate;

/// Read-only access to measurements and stations.
pub trait Repository {
    /// `(date, precipitation)` for every measurement with `date >= date_from`,
    /// ascending by date.
    fn list_precipitation(&self, date_from: NaiveDate) -> Vec<(String, Option<f64>)>;

    /// All stations in storage order.
    fn list_stations(&self) -> &[Station];

    /// tobs values for `station_id` with `date >= date_from`, ascending by date.
    /// An unknown station yields an empty list.
    fn list_temperatures(&self, station_id: &str, date_from: NaiveDate) -> Vec<f64>;

    /// min / avg / max tobs over `date_from <= date <= date_to` (both inclusive;
    /// open-ended when `date_to` is `None`). `TemperatureStats::EMPTY` if
    /// nothing matched.
    fn aggregate_temperature(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> TemperatureStats;
}

impl Repository for Dataset {
    fn list_precipitation(&self, date_from: NaiveDate) -> Vec<(String, Option<f64>)> {
        let from = format_date(date_from);

        let mut rows: Vec<(String, Option<f64>)> = self
            .measurements()
            .iter()
            .filter(|m| m.date.as_str() >= from.as_str())
            .map(|m| (m.date.clone(), m.precipitation))
            .collect();

        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    fn list_stations(&self) -> &[Station] {
        self.stations()
    }

    fn list_temperatures(&self, station_id: &str, date_from: NaiveDate) -> Vec<f64> {
        let from = format_date(date_from);

        let mut rows: Vec<(&str, f64)> = self
            .measurements()
            .iter()
            .filter(|m| m.station_id == station_id && m.date.as_str() >= from.as_str())
            .map(|m| (m.date.as_str(), m.temperature_observation))
            .collect();

        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows.into_iter().map(|(_, tobs)| tobs).collect()
    }

    fn aggregate_temperature(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> TemperatureStats {
        let from = format_date(date_from);
        let to = date_to.map(format_date);

        TemperatureStats::from_values(
            self.measurements()
                .iter()
                .filter(|m| m.date.as_str() >= from.as_str())
                .filter(|m| to.as_deref().is_none_or(|to| m.date.as_str() <= to))
                .map(|m| m.temperature_observation),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
