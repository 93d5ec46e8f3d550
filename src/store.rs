//! Read-only access to the calibration store produced by the rig
//! pipeline.

use std::fmt;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::ProbeError;
use crate::Result;

/// The five calibration surfaces fitted for every probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoefficientFamily {
    Alpha,
    Beta,
    Mach,
    StaticPressure,
    TotalPressure,
}

impl CoefficientFamily {
    pub const ALL: [Self; 5] = [
        Self::Alpha,
        Self::Beta,
        Self::Mach,
        Self::StaticPressure,
        Self::TotalPressure,
    ];

    /// Store table holding this family's coefficient rows.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Alpha => "ALPHA",
            Self::Beta => "BETA",
            Self::Mach => "MACH",
            Self::StaticPressure => "STATIC_PRESSURE",
            Self::TotalPressure => "TOTAL_PRESSURE",
        }
    }

    /// Polynomial degree of the feature expansion this family was
    /// fitted against.
    #[must_use]
    pub const fn degree(self) -> usize {
        match self {
            Self::Alpha | Self::Beta => 5,
            Self::Mach | Self::StaticPressure => 4,
            Self::TotalPressure => 2,
        }
    }
}

impl fmt::Display for CoefficientFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Mach => "mach",
            Self::StaticPressure => "static pressure",
            Self::TotalPressure => "total pressure",
        })
    }
}

/// The narrow read contract a probe is constructed over.
///
/// One synchronous snapshot read happens at construction time; there is
/// no caching, no invalidation and no write path. Implementations may
/// return coefficient rows in any order, the probe sorts by term index
/// when it loads them.
pub trait CalibrationStore {
    /// Every probe id stored against the (rake serial, height) pair.
    ///
    /// # Errors
    /// Any store-level failure, surfaced synchronously.
    fn probe_ids(&self, rake_serial: &str, height: i64) -> Result<Vec<i64>>;

    /// `(term index, value)` rows for one coefficient family of one
    /// probe.
    ///
    /// # Errors
    /// Any store-level failure, surfaced synchronously.
    fn fetch_coefficients(
        &self,
        probe_id: i64,
        family: CoefficientFamily,
    ) -> Result<Vec<(i64, f64)>>;

    /// Resolve the unique probe id for a (rake serial, height) pair.
    ///
    /// A duplicated key is an error state, never a silent first-row
    /// pick.
    ///
    /// # Errors
    /// [`ProbeError::ProbeNotFound`] when no row matches,
    /// [`ProbeError::AmbiguousProbe`] when several do.
    fn resolve_probe_id(&self, rake_serial: &str, height: i64) -> Result<i64> {
        let ids = self.probe_ids(rake_serial, height)?;
        match ids.as_slice() {
            [] => Err(ProbeError::ProbeNotFound {
                rake_serial: rake_serial.to_owned(),
                height,
            }),
            &[id] => Ok(id),
            _ => Err(ProbeError::AmbiguousProbe {
                rake_serial: rake_serial.to_owned(),
                height,
                count: ids.len(),
            }),
        }
    }
}

/// Calibration store backed by the rig pipeline's SQLite file.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open the store at `path`.
    ///
    /// # Errors
    /// Fails when the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "opened calibration store");
        Ok(Self { connection })
    }

    /// Wrap a connection the caller already holds.
    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }
}

impl CalibrationStore for SqliteStore {
    fn probe_ids(&self, rake_serial: &str, height: i64) -> Result<Vec<i64>> {
        let mut statement = self
            .connection
            .prepare("SELECT ID FROM PROBES WHERE RAKE_SN = ?1 AND HEIGHT = ?2")?;
        let ids = statement
            .query_map(rusqlite::params![rake_serial, height], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    fn fetch_coefficients(
        &self,
        probe_id: i64,
        family: CoefficientFamily,
    ) -> Result<Vec<(i64, f64)>> {
        // Table names come from the enum, never from caller input.
        let query = format!(
            "SELECT COEFF, VALUE FROM {} WHERE PROBE_ID = ?1",
            family.table()
        );
        let mut statement = self.connection.prepare(&query)?;
        let rows = statement
            .query_map([probe_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
