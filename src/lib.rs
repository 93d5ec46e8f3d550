#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod algebra;
pub mod config;
pub mod error;
pub mod features;
pub mod probe;
pub mod store;

pub use error::ProbeError;

pub type Result<T> = ::std::result::Result<T, ProbeError>;

/// Resolve a probe and run a single prediction against it.
///
/// Convenience wrapper over [`probe::Probe::from_store`] and
/// [`probe::Probe::predict`]; construct a [`probe::Probe`] directly to
/// amortise the store read over many samples.
///
/// # Errors
/// Propagates every failure of probe resolution, coefficient loading
/// and prediction unchanged.
pub fn predict<S: store::CalibrationStore>(
    store: &S,
    rake_serial: &str,
    height: i64,
    pressures: &[f64],
) -> Result<probe::Prediction> {
    probe::Probe::from_store(store, rake_serial, height)?.predict(pressures)
}
