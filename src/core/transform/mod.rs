//! Sample transformation
//!
//! Turns a station's row-oriented samples for one day into the columnar
//! layout of an archive file: a sorted time axis plus one column per
//! observable, converted to archive units.

pub mod units;

use crate::domain::{StationSamples, UtcDay, OBSERVABLES};

pub use units::{archive_values, to_archive_unit};

/// One station's day in columnar form
#[derive(Debug, Clone, PartialEq)]
pub struct StationColumns {
    /// Sample times as epoch seconds, ascending
    pub times: Vec<i64>,
    /// One column per entry of [`OBSERVABLES`], each as long as `times`
    pub columns: Vec<Vec<Option<f64>>>,
}

impl StationColumns {
    /// No samples, one empty column per observable
    pub fn empty() -> Self {
        Self {
            times: Vec::new(),
            columns: vec![Vec::new(); OBSERVABLES.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Pivot `station`'s samples inside `day` into columns
///
/// Samples outside the day are dropped. Duplicates are kept in time order.
pub fn to_columns(day: UtcDay, station: &StationSamples) -> StationColumns {
    let mut samples: Vec<_> = station
        .samples
        .iter()
        .filter(|s| day.contains(s.timestamp))
        .collect();
    samples.sort_by_key(|s| s.timestamp);

    let mut columns = vec![Vec::with_capacity(samples.len()); OBSERVABLES.len()];
    let mut times = Vec::with_capacity(samples.len());

    for sample in samples {
        times.push(sample.timestamp.timestamp());
        for (column, value) in columns.iter_mut().zip(archive_values(sample)) {
            column.push(value);
        }
    }

    StationColumns { times, columns }
}
