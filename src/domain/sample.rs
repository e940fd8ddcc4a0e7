//! Weather samples and the observable schema

use super::ids::StationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical quantity measured by an observable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Pressure,
    Temperature,
    Percent,
    Speed,
    Direction,
    Rate,
    Amount,
}

impl Quantity {
    /// Unit of this quantity in the archive
    pub fn archive_unit(&self) -> &'static str {
        match self {
            Quantity::Pressure => "hPa",
            Quantity::Temperature => "deg C",
            Quantity::Percent => "%",
            Quantity::Speed => "km/h",
            Quantity::Direction => "deg",
            Quantity::Rate => "mm/hr",
            Quantity::Amount => "mm",
        }
    }
}

/// One column of the station archive table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observable {
    /// Column name in the source and dataset name in the archive
    pub name: &'static str,
    pub quantity: Quantity,
}

/// Observables in column order; `Sample::values` follows this order
pub const OBSERVABLES: [Observable; 16] = [
    Observable { name: "barometer", quantity: Quantity::Pressure },
    Observable { name: "pressure", quantity: Quantity::Pressure },
    Observable { name: "altimeter", quantity: Quantity::Pressure },
    Observable { name: "inTemp", quantity: Quantity::Temperature },
    Observable { name: "outTemp", quantity: Quantity::Temperature },
    Observable { name: "inHumidity", quantity: Quantity::Percent },
    Observable { name: "outHumidity", quantity: Quantity::Percent },
    Observable { name: "windSpeed", quantity: Quantity::Speed },
    Observable { name: "windDir", quantity: Quantity::Direction },
    Observable { name: "windGust", quantity: Quantity::Speed },
    Observable { name: "windGustDir", quantity: Quantity::Direction },
    Observable { name: "rainRate", quantity: Quantity::Rate },
    Observable { name: "rain", quantity: Quantity::Amount },
    Observable { name: "dewpoint", quantity: Quantity::Temperature },
    Observable { name: "windchill", quantity: Quantity::Temperature },
    Observable { name: "heatindex", quantity: Quantity::Temperature },
];

/// Unit system a sample was recorded in (wview/weewx `usUnits`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// inHg, deg F, mph, in, in/hr
    Us,
    /// mbar, deg C, km/h, cm, cm/hr
    Metric,
    /// mbar, deg C, m/s, mm, mm/hr
    MetricWx,
}

impl UnitSystem {
    /// Decode a `usUnits` column value
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(UnitSystem::Us),
            16 => Some(UnitSystem::Metric),
            17 => Some(UnitSystem::MetricWx),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            UnitSystem::Us => 1,
            UnitSystem::Metric => 16,
            UnitSystem::MetricWx => 17,
        }
    }
}

/// One timestamped row from a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub unit_system: UnitSystem,
    /// One value per entry of [`OBSERVABLES`]; `None` where the source has NULL
    pub values: Vec<Option<f64>>,
}

impl Sample {
    /// A sample with every observable missing
    pub fn empty(timestamp: DateTime<Utc>, unit_system: UnitSystem) -> Self {
        Self {
            timestamp,
            unit_system,
            values: vec![None; OBSERVABLES.len()],
        }
    }

    /// Value of the named observable
    pub fn value(&self, name: &str) -> Option<f64> {
        OBSERVABLES
            .iter()
            .position(|o| o.name == name)
            .and_then(|i| self.values.get(i).copied().flatten())
    }
}

/// All samples of one station for one day
#[derive(Debug, Clone, PartialEq)]
pub struct StationSamples {
    pub station: StationId,
    pub samples: Vec<Sample>,
}

impl StationSamples {
    pub fn new(station: StationId, samples: Vec<Sample>) -> Self {
        Self { station, samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unit_system_codes() {
        for system in [UnitSystem::Us, UnitSystem::Metric, UnitSystem::MetricWx] {
            assert_eq!(UnitSystem::from_code(system.code()), Some(system));
        }
        assert_eq!(UnitSystem::from_code(0), None);
        assert_eq!(UnitSystem::from_code(2), None);
    }

    #[test]
    fn test_sample_value_lookup() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let mut sample = Sample::empty(ts, UnitSystem::Metric);
        sample.values[4] = Some(12.5);

        assert_eq!(sample.value("outTemp"), Some(12.5));
        assert_eq!(sample.value("inTemp"), None);
        assert_eq!(sample.value("not_a_column"), None);
    }

    #[test]
    fn test_observable_names_unique() {
        let mut names: Vec<_> = OBSERVABLES.iter().map(|o| o.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OBSERVABLES.len());
    }
}
