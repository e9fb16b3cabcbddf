use thiserror::Error;

/// Crate-wide error type for transit-core.
///
/// All fallible operations in this library surface one of these variants.
/// Every error is local-recoverable: the worst outcome for a caller is a
/// rejected operation and a stale or clamped time value.
#[derive(Error, Debug)]
pub enum TransitError {
    #[error("Invalid time value (non-finite Julian Date): {0}")]
    InvalidTimeValue(f64),

    #[error("Invalid playback speed (non-finite): {0}")]
    InvalidSpeed(f64),

    #[error("Empty time range: start {start} is not before end {end}")]
    EmptyTimeRange { start: f64, end: f64 },

    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),

    #[error("No transit recorded for year {0}")]
    UnknownTransitYear(i32),

    #[error("Observer site geometry contains NaN")]
    NanSiteGeometry(#[from] ordered_float::FloatIsNan),

    #[error("Unable to parse the historical observer table: {0}")]
    ObserverTableError(#[from] csv::Error),
}

impl PartialEq for TransitError {
    fn eq(&self, other: &Self) -> bool {
        use TransitError::*;
        match (self, other) {
            (InvalidTimeValue(a), InvalidTimeValue(b)) => a.to_bits() == b.to_bits(),
            (InvalidSpeed(a), InvalidSpeed(b)) => a.to_bits() == b.to_bits(),
            (
                EmptyTimeRange { start: s1, end: e1 },
                EmptyTimeRange { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            (InvalidOrbitalElements(a), InvalidOrbitalElements(b)) => a == b,
            (UnknownTransitYear(a), UnknownTransitYear(b)) => a == b,

            // Wrapped foreign errors are compared by variant only
            (NanSiteGeometry(_), NanSiteGeometry(_)) => true,
            (ObserverTableError(_), ObserverTableError(_)) => true,

            _ => false,
        }
    }
}
