//! Pressure-coefficient algebra for a five-port probe head.
//!
//! All functions here are pure: no state, no store access, and
//! bitwise-reproducible results for identical inputs. Division by a zero
//! dynamic head and NaN inputs are not intercepted; they surface as the
//! native IEEE result.

use num_traits::Float;

use crate::error::ProbeError;
use crate::Result;

/// A validated sample of five port pressures from one probe head.
///
/// Port 1 is the central impact port; ports 2 to 5 are the symmetric
/// peripheral ports at 90° spacing. All pressures must already be
/// referenced to the common baseline they were recorded against.
///
/// Construction checks arity only. Non-finite pressures, or a sample
/// whose impact pressure equals the peripheral mean, flow through the
/// algebra and come out as non-finite coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureSample<E> {
    ports: [E; 5],
}

impl<E: Float> PressureSample<E> {
    /// Wrap a slice of port pressures, checking that exactly five are
    /// present.
    ///
    /// # Errors
    /// Returns [`ProbeError::InvalidInput`] when `pressures` holds any
    /// other number of values.
    pub fn new(pressures: &[E]) -> Result<Self> {
        let ports = <[E; 5]>::try_from(pressures).map_err(|_| ProbeError::InvalidInput {
            actual: pressures.len(),
        })?;
        Ok(Self { ports })
    }

    /// The impact-port pressure $P_1$.
    pub const fn impact(&self) -> E {
        self.ports[0]
    }

    /// Mean of the four peripheral port pressures, $\bar{p}$, the local
    /// static-pressure proxy.
    pub fn peripheral_mean(&self) -> E {
        let quarter = E::from(0.25).expect("0.25 must be representable in `E`");
        quarter * (self.ports[1] + self.ports[2] + self.ports[3] + self.ports[4])
    }

    /// Differential between the impact port and the peripheral mean,
    /// $P_1 - \bar{p}$.
    ///
    /// Every pressure coefficient is normalised by this reference head,
    /// so a sample with zero differential produces non-finite
    /// coefficients.
    pub fn dynamic_head(&self) -> E {
        self.impact() - self.peripheral_mean()
    }
}

/// Angle-of-attack pressure coefficient.
///
/// $$ C_{p,\alpha} = \frac{P_5 - P_4}{P_1 - \bar{p}} $$
///
/// # Examples
///
/// ```
/// use multihole::algebra::{cp_alpha, PressureSample};
///
/// let sample =
///     PressureSample::new(&[101_325.0, 100_800.0, 100_700.0, 100_900.0, 100_850.0]).unwrap();
/// approx::assert_relative_eq!(cp_alpha(&sample), (100_850.0 - 100_900.0) / (101_325.0 - 100_812.5));
/// ```
pub fn cp_alpha<E: Float>(sample: &PressureSample<E>) -> E {
    (sample.ports[4] - sample.ports[3]) / sample.dynamic_head()
}

/// Sideslip pressure coefficient.
///
/// $$ C_{p,\beta} = \frac{P_3 - P_2}{P_1 - \bar{p}} $$
pub fn cp_beta<E: Float>(sample: &PressureSample<E>) -> E {
    (sample.ports[2] - sample.ports[1]) / sample.dynamic_head()
}

/// Mach-number pressure coefficient.
///
/// $$ C_{p,M} = 1 - \frac{\bar{p}}{P_1} $$
pub fn cp_mach<E: Float>(sample: &PressureSample<E>) -> E {
    E::one() - sample.peripheral_mean() / sample.impact()
}

/// Recover absolute static pressure from a predicted static-pressure
/// coefficient.
///
/// Inverts the forward definition
/// $C_{p,s} = (\bar{p} - P_s) / (P_1 - \bar{p})$ used when the
/// calibration surfaces were fitted:
///
/// $$ P_s = -\left( C_{p,s} (P_1 - \bar{p}) - \bar{p} \right) $$
pub fn static_pressure<E: Float>(sample: &PressureSample<E>, cp_static: E) -> E {
    -(cp_static * sample.dynamic_head() - sample.peripheral_mean())
}

/// Recover absolute total pressure from a predicted total-pressure
/// coefficient.
///
/// Inverts the forward definition
/// $C_{p,t} = (P_1 - P_t) / (P_1 - \bar{p})$:
///
/// $$ P_t = P_1 - C_{p,t} (P_1 - \bar{p}) $$
pub fn total_pressure<E: Float>(sample: &PressureSample<E>, cp_total: E) -> E {
    sample.impact() - cp_total * sample.dynamic_head()
}
