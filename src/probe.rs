//! The per-probe calibration model.
//!
//! A [`Probe`] is built once from a store snapshot and is immutable
//! afterwards; separate probes share nothing and can be used from
//! separate threads without coordination.

use ndarray::Array1;
use tracing::debug;

use crate::algebra::{self, PressureSample};
use crate::error::ProbeError;
use crate::features;
use crate::store::{CalibrationStore, CoefficientFamily};
use crate::Result;

/// The store row a probe was resolved from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeIdentity {
    pub rake_serial: String,
    pub height: i64,
    pub id: i64,
}

/// One probe's calibration surfaces, one coefficient vector per family,
/// each sorted ascending by term index at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientSet {
    alpha: Array1<f64>,
    beta: Array1<f64>,
    mach: Array1<f64>,
    static_pressure: Array1<f64>,
    total_pressure: Array1<f64>,
}

impl CoefficientSet {
    /// The stored coefficient vector for `family`.
    #[must_use]
    pub const fn family(&self, family: CoefficientFamily) -> &Array1<f64> {
        match family {
            CoefficientFamily::Alpha => &self.alpha,
            CoefficientFamily::Beta => &self.beta,
            CoefficientFamily::Mach => &self.mach,
            CoefficientFamily::StaticPressure => &self.static_pressure,
            CoefficientFamily::TotalPressure => &self.total_pressure,
        }
    }
}

/// Flow quantities predicted from one pressure sample.
///
/// `total` and `static_pressure` are absolute pressures in the units of
/// the input sample; `mach` is a Mach number and `alpha` and `beta` are
/// flow angles in the units the calibration was fitted in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub total: f64,
    pub static_pressure: f64,
    pub mach: f64,
    pub alpha: f64,
    pub beta: f64,
}

/// A calibrated probe, resolved from the store by rake serial and
/// height.
#[derive(Clone, Debug)]
pub struct Probe {
    identity: ProbeIdentity,
    coefficients: CoefficientSet,
}

impl Probe {
    /// Resolve a probe and load its five coefficient vectors.
    ///
    /// This is the only store access the model ever performs; the
    /// returned probe holds no reference to `store`.
    ///
    /// # Errors
    /// [`ProbeError::ProbeNotFound`] or [`ProbeError::AmbiguousProbe`]
    /// when the (rake serial, height) key does not resolve to exactly
    /// one probe, and any store-level failure unchanged.
    pub fn from_store<S: CalibrationStore + ?Sized>(
        store: &S,
        rake_serial: &str,
        height: i64,
    ) -> Result<Self> {
        let id = store.resolve_probe_id(rake_serial, height)?;
        debug!(rake_serial, height, id, "resolved probe");

        let coefficients = CoefficientSet {
            alpha: load_family(store, id, CoefficientFamily::Alpha)?,
            beta: load_family(store, id, CoefficientFamily::Beta)?,
            mach: load_family(store, id, CoefficientFamily::Mach)?,
            static_pressure: load_family(store, id, CoefficientFamily::StaticPressure)?,
            total_pressure: load_family(store, id, CoefficientFamily::TotalPressure)?,
        };

        Ok(Self {
            identity: ProbeIdentity {
                rake_serial: rake_serial.to_owned(),
                height,
                id,
            },
            coefficients,
        })
    }

    #[must_use]
    pub const fn identity(&self) -> &ProbeIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// Predict flow quantities from five port pressures.
    ///
    /// The pressures must be referenced to the same baseline the
    /// calibration was recorded against. A sample whose impact pressure
    /// equals the peripheral mean yields non-finite outputs rather than
    /// an error.
    ///
    /// # Errors
    /// [`ProbeError::InvalidInput`] unless exactly five pressures are
    /// given, and [`ProbeError::CoefficientDimensionMismatch`] when a
    /// stored vector does not match its family's expansion length.
    pub fn predict(&self, pressures: &[f64]) -> Result<Prediction> {
        let sample = PressureSample::new(pressures)?;
        let inputs = [
            algebra::cp_mach(&sample),
            algebra::cp_alpha(&sample),
            algebra::cp_beta(&sample),
        ];

        let cp_total = self.response(CoefficientFamily::TotalPressure, &inputs)?;
        let cp_static = self.response(CoefficientFamily::StaticPressure, &inputs)?;
        let mach = self.response(CoefficientFamily::Mach, &inputs)?;
        let alpha = self.response(CoefficientFamily::Alpha, &inputs)?;
        let beta = self.response(CoefficientFamily::Beta, &inputs)?;

        Ok(Prediction {
            total: algebra::total_pressure(&sample, cp_total),
            static_pressure: algebra::static_pressure(&sample, cp_static),
            mach,
            alpha,
            beta,
        })
    }

    /// Dot one family's coefficient vector against the feature expansion
    /// of the inputs at that family's degree.
    fn response(&self, family: CoefficientFamily, inputs: &[f64; 3]) -> Result<f64> {
        let features = features::expand(inputs, family.degree());
        let coefficients = self.coefficients.family(family);

        if coefficients.len() != features.len() {
            return Err(ProbeError::CoefficientDimensionMismatch {
                family,
                expected: features.len(),
                actual: coefficients.len(),
            });
        }

        Ok(coefficients.dot(&features))
    }
}

fn load_family<S: CalibrationStore + ?Sized>(
    store: &S,
    probe_id: i64,
    family: CoefficientFamily,
) -> Result<Array1<f64>> {
    let mut rows = store.fetch_coefficients(probe_id, family)?;
    // Term order is significant: the vector must line up with the
    // expansion, whatever order the store returned.
    rows.sort_by_key(|&(term, _)| term);
    debug!(probe_id, %family, terms = rows.len(), "loaded coefficient vector");
    Ok(rows.into_iter().map(|(_, value)| value).collect())
}
