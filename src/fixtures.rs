/// Test fixtures: a small dataset shaped like the Hawaii climate database.
///
/// Three real station records and eight measurements, deliberately stored
/// out of date order. Notable rows:
///   - 2016-08-01 falls before the 365-day window ending 2017-08-23.
///   - 2016-08-23 is the window start (inclusive) and appears twice,
///     with the USC00513117 row (prcp 0.15) stored second.
///   - 2016-12-25 has no precipitation value.
///   - 2017-08-23 appears twice, USC00519281 (prcp 0.45) stored second.
///
/// tobs over all rows: min 66, avg 75.5, max 81.

use crate::model::{Measurement, Station};
use crate::store::Dataset;

pub(crate) const WAIKIKI: &str = "USC00519397";
pub(crate) const KANEOHE: &str = "USC00513117";
pub(crate) const WAIHEE: &str = "USC00519281";

pub(crate) fn measurement(
    station_id: &str,
    date: &str,
    precipitation: Option<f64>,
    tobs: f64,
) -> Measurement {
    Measurement {
        station_id: station_id.to_string(),
        date: date.to_string(),
        precipitation,
        temperature_observation: tobs,
    }
}

pub(crate) fn fixture_stations() -> Vec<Station> {
    vec![
        Station {
            station_id: WAIKIKI.to_string(),
            name: "WAIKIKI 717.2, HI US".to_string(),
            latitude: 21.2716,
            longitude: -157.8168,
            elevation: 3.0,
        },
        Station {
            station_id: KANEOHE.to_string(),
            name: "KANEOHE 838.1, HI US".to_string(),
            latitude: 21.4234,
            longitude: -157.8015,
            elevation: 14.6,
        },
        Station {
            station_id: WAIHEE.to_string(),
            name: "WAIHEE 837.5, HI US".to_string(),
            latitude: 21.45167,
            longitude: -157.84889,
            elevation: 32.9,
        },
    ]
}

pub(crate) fn fixture_measurements() -> Vec<Measurement> {
    vec![
        measurement(WAIKIKI, "2016-08-01", Some(0.08), 77.0),
        measurement(WAIKIKI, "2016-08-23", Some(0.00), 81.0),
        measurement(KANEOHE, "2016-08-23", Some(0.15), 76.0),
        measurement(WAIHEE, "2017-01-01", Some(0.02), 66.0),
        measurement(WAIKIKI, "2016-12-25", None, 70.0),
        measurement(WAIKIKI, "2017-04-10", Some(0.30), 75.0),
        measurement(WAIKIKI, "2017-08-23", Some(0.00), 80.0),
        measurement(WAIHEE, "2017-08-23", Some(0.45), 79.0),
    ]
}

pub(crate) fn fixture_dataset() -> Dataset {
    Dataset::new(fixture_measurements(), fixture_stations())
}
