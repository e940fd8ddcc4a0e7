//! Unit normalisation
//!
//! Archives store every observable in one unit per quantity (see
//! [`Quantity::archive_unit`]). Stations may record in any wview unit system.

use crate::domain::{Quantity, Sample, UnitSystem, OBSERVABLES};

const HPA_PER_INHG: f64 = 33.863_886;
const KMH_PER_MPH: f64 = 1.609_344;
const KMH_PER_MS: f64 = 3.6;
const MM_PER_INCH: f64 = 25.4;
const MM_PER_CM: f64 = 10.0;

/// Convert one value of `quantity` recorded in `system` to the archive unit
pub fn to_archive_unit(quantity: Quantity, system: UnitSystem, value: f64) -> f64 {
    match (system, quantity) {
        (UnitSystem::Us, Quantity::Pressure) => value * HPA_PER_INHG,
        (UnitSystem::Us, Quantity::Temperature) => (value - 32.0) * 5.0 / 9.0,
        (UnitSystem::Us, Quantity::Speed) => value * KMH_PER_MPH,
        (UnitSystem::Us, Quantity::Rate | Quantity::Amount) => value * MM_PER_INCH,
        (UnitSystem::Metric, Quantity::Rate | Quantity::Amount) => value * MM_PER_CM,
        (UnitSystem::MetricWx, Quantity::Speed) => value * KMH_PER_MS,
        _ => value,
    }
}

/// Values of `sample` in archive units, in [`OBSERVABLES`] order
pub fn archive_values(sample: &Sample) -> Vec<Option<f64>> {
    OBSERVABLES
        .iter()
        .zip(&sample.values)
        .map(|(observable, value)| {
            value.map(|v| to_archive_unit(observable.quantity, sample.unit_system, v))
        })
        .collect()
}
