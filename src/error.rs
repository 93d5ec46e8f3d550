use thiserror::Error;

use crate::store::CoefficientFamily;

/// Failure modes of the prediction pipeline.
///
/// Every variant is fatal to the operation that raised it; nothing in the
/// crate retries or returns a partial result. Non-finite floating-point
/// values are deliberately not represented here: a sample whose impact
/// pressure equals the peripheral mean produces non-finite coefficients,
/// not an error, and callers who care must test for finiteness.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A pressure sample did not hold exactly five port values.
    #[error("expected 5 port pressures, found {actual}")]
    InvalidInput { actual: usize },

    /// No probe is stored against the requested rake serial and height.
    #[error("no probe found for rake {rake_serial} at height {height}")]
    ProbeNotFound { rake_serial: String, height: i64 },

    /// Several probes are stored against the requested rake serial and height.
    #[error("{count} probes found for rake {rake_serial} at height {height}")]
    AmbiguousProbe {
        rake_serial: String,
        height: i64,
        count: usize,
    },

    /// A stored coefficient vector does not match the length of its
    /// family's feature expansion. The calibration data is unusable.
    #[error("{family} coefficient vector holds {actual} terms where the expansion yields {expected}")]
    CoefficientDimensionMismatch {
        family: CoefficientFamily,
        expected: usize,
        actual: usize,
    },

    /// The calibration store rejected a query.
    #[error("calibration store query failed")]
    Store(#[from] rusqlite::Error),

    /// A configuration file could not be read.
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("malformed configuration")]
    Config(#[from] toml::de::Error),
}
