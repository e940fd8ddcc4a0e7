//! Row layout of a wview-style archive table
//!
//! The table holds one row per sample: `"dateTime"` in epoch seconds,
//! `"usUnits"` and one nullable numeric column per observable.

use crate::domain::{QueryError, Sample, StationId, UnitSystem, OBSERVABLES};
use chrono::DateTime;
use tokio_postgres::Row;

/// Column list shared by every sample query, in [`OBSERVABLES`] order
///
/// Columns are cast so integer or real wview schemas decode the same way.
pub fn select_columns() -> String {
    std::iter::once("\"dateTime\"::bigint")
        .chain(std::iter::once("\"usUnits\"::integer"))
        .map(str::to_string)
        .chain(
            OBSERVABLES
                .iter()
                .map(|o| format!("\"{}\"::double precision", o.name)),
        )
        .collect::<Vec<_>>()
        .join(", ")
}

/// SQL for one day of samples from `table`; binds `$1` start and `$2` end (exclusive)
pub fn day_query(table: &str) -> String {
    format!(
        "SELECT {} FROM \"{}\" WHERE \"dateTime\" >= $1::bigint AND \"dateTime\" < $2::bigint ORDER BY \"dateTime\"",
        select_columns(),
        table
    )
}

/// SQL for the oldest timestamp in `table`
pub fn earliest_query(table: &str) -> String {
    format!("SELECT MIN(\"dateTime\")::bigint FROM \"{table}\"")
}

/// One decoded archive row
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRow {
    pub date_time: i64,
    pub us_units: i32,
    pub values: Vec<Option<f64>>,
}

impl ArchiveRow {
    /// Decode a row produced by [`day_query`]
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or has an unexpected type.
    pub fn from_row(station: &StationId, row: &Row) -> Result<Self, QueryError> {
        let malformed = |e: tokio_postgres::Error| QueryError::MalformedRow {
            station: station.to_string(),
            message: e.to_string(),
        };

        let date_time: i64 = row.try_get(0).map_err(malformed)?;
        let us_units: i32 = row.try_get(1).map_err(malformed)?;
        let values = (0..OBSERVABLES.len())
            .map(|i| row.try_get::<_, Option<f64>>(i + 2).map_err(malformed))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            date_time,
            us_units,
            values,
        })
    }

    /// Convert into a domain sample
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp or unit system is not representable.
    pub fn into_sample(self, station: &StationId) -> Result<Sample, QueryError> {
        let timestamp =
            DateTime::from_timestamp(self.date_time, 0).ok_or(QueryError::MalformedTimestamp {
                station: station.to_string(),
                value: self.date_time,
            })?;

        let unit_system =
            UnitSystem::from_code(self.us_units).ok_or(QueryError::UnknownUnitSystem {
                station: station.to_string(),
                code: self.us_units,
            })?;

        if self.values.len() != OBSERVABLES.len() {
            return Err(QueryError::MalformedRow {
                station: station.to_string(),
                message: format!(
                    "expected {} values, got {}",
                    OBSERVABLES.len(),
                    self.values.len()
                ),
            });
        }

        Ok(Sample {
            timestamp,
            unit_system,
            values: self.values,
        })
    }
}
