use std::path::{Path, PathBuf};

use ndarray_rand::rand::seq::SliceRandom;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use rusqlite::Connection;
use tempdir::TempDir;

use multihole::algebra::{self, PressureSample};
use multihole::config::Config;
use multihole::features;
use multihole::probe::Probe;
use multihole::store::{CoefficientFamily, SqliteStore};
use multihole::{ProbeError, Result};

const PRESSURES: [f64; 5] = [101_325.0, 100_800.0, 100_700.0, 100_900.0, 100_850.0];

fn create_database(test_name: &str) -> (TempDir, PathBuf) {
    let tmp_dir = TempDir::new(test_name).unwrap();
    let path = tmp_dir.path().join("probes.db");

    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(
            "CREATE TABLE PROBES (ID INTEGER, RAKE_SN TEXT, HEIGHT INTEGER);
             CREATE TABLE ALPHA (PROBE_ID INTEGER, COEFF INTEGER, VALUE REAL);
             CREATE TABLE BETA (PROBE_ID INTEGER, COEFF INTEGER, VALUE REAL);
             CREATE TABLE MACH (PROBE_ID INTEGER, COEFF INTEGER, VALUE REAL);
             CREATE TABLE STATIC_PRESSURE (PROBE_ID INTEGER, COEFF INTEGER, VALUE REAL);
             CREATE TABLE TOTAL_PRESSURE (PROBE_ID INTEGER, COEFF INTEGER, VALUE REAL);",
        )
        .unwrap();

    (tmp_dir, path)
}

fn insert_probe(path: &Path, id: i64, rake_serial: &str, height: i64) {
    let connection = Connection::open(path).unwrap();
    connection
        .execute(
            "INSERT INTO PROBES (ID, RAKE_SN, HEIGHT) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, rake_serial, height],
        )
        .unwrap();
}

/// Insert one family's coefficient vector, with the rows deliberately
/// shuffled so nothing downstream can lean on insertion order.
fn insert_coefficients<R: Rng>(
    path: &Path,
    id: i64,
    family: CoefficientFamily,
    values: &[f64],
    rng: &mut R,
) {
    let mut rows: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    rows.shuffle(rng);

    let connection = Connection::open(path).unwrap();
    let query = format!(
        "INSERT INTO {} (PROBE_ID, COEFF, VALUE) VALUES (?1, ?2, ?3)",
        family.table()
    );
    for (term, value) in rows {
        connection
            .execute(
                &query,
                rusqlite::params![id, i64::try_from(term).unwrap(), value],
            )
            .unwrap();
    }
}

/// Seed a probe whose every family carries random coefficients, and
/// return the vectors keyed in family declaration order.
fn seed_random_probe<R: Rng>(
    path: &Path,
    id: i64,
    rake_serial: &str,
    height: i64,
    rng: &mut R,
) -> Vec<(CoefficientFamily, Vec<f64>)> {
    insert_probe(path, id, rake_serial, height);

    CoefficientFamily::ALL
        .into_iter()
        .map(|family| {
            let values: Vec<f64> = (0..features::feature_count(family.degree()))
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect();
            insert_coefficients(path, id, family, &values, rng);
            (family, values)
        })
        .collect()
}

#[test]
fn predictions_match_manually_evaluated_surfaces() -> Result<()> {
    let seed = 40;
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let (_tmp_dir, path) = create_database("predictions_match_manually_evaluated_surfaces");
    let stored = seed_random_probe(&path, 3, "gc4go4_2", 1, &mut rng);

    let store = SqliteStore::open(&path)?;
    let probe = Probe::from_store(&store, "gc4go4_2", 1)?;
    let prediction = probe.predict(&PRESSURES)?;

    let sample = PressureSample::new(&PRESSURES)?;
    let inputs = [
        algebra::cp_mach(&sample),
        algebra::cp_alpha(&sample),
        algebra::cp_beta(&sample),
    ];

    let response = |family: CoefficientFamily| -> f64 {
        let (_, values) = stored
            .iter()
            .find(|(stored_family, _)| *stored_family == family)
            .unwrap();
        features::expand(&inputs, family.degree())
            .iter()
            .zip(values)
            .map(|(feature, coefficient)| feature * coefficient)
            .sum()
    };

    approx::assert_relative_eq!(prediction.mach, response(CoefficientFamily::Mach));
    approx::assert_relative_eq!(prediction.alpha, response(CoefficientFamily::Alpha));
    approx::assert_relative_eq!(prediction.beta, response(CoefficientFamily::Beta));
    approx::assert_relative_eq!(
        prediction.total,
        algebra::total_pressure(&sample, response(CoefficientFamily::TotalPressure))
    );
    approx::assert_relative_eq!(
        prediction.static_pressure,
        algebra::static_pressure(&sample, response(CoefficientFamily::StaticPressure))
    );

    Ok(())
}

#[test]
fn identity_total_coefficients_recover_the_peripheral_mean() -> Result<()> {
    let seed = 40;
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let (_tmp_dir, path) = create_database("identity_total_coefficients_recover_the_peripheral_mean");
    insert_probe(&path, 3, "4H-1", 1);
    for family in CoefficientFamily::ALL {
        let mut values = vec![0.0; features::feature_count(family.degree())];
        if family == CoefficientFamily::TotalPressure {
            values[0] = 1.0;
        }
        insert_coefficients(&path, 3, family, &values, &mut rng);
    }

    let store = SqliteStore::open(&path)?;
    let prediction = multihole::predict(&store, "4H-1", 1, &PRESSURES)?;

    // cp_total dots to exactly 1, so the inverse formula returns
    // P1 - (P1 - pbar) = pbar.
    approx::assert_relative_eq!(prediction.total, 100_812.5);

    Ok(())
}

#[test]
fn an_unknown_probe_is_not_found() {
    let (_tmp_dir, path) = create_database("an_unknown_probe_is_not_found");
    insert_probe(&path, 3, "4H-1", 1);

    let store = SqliteStore::open(&path).unwrap();
    let error = Probe::from_store(&store, "4H-1", 2).unwrap_err();

    assert!(matches!(
        error,
        ProbeError::ProbeNotFound { ref rake_serial, height }
            if rake_serial == "4H-1" && height == 2
    ));
}

#[test]
fn a_duplicated_probe_is_ambiguous() {
    let (_tmp_dir, path) = create_database("a_duplicated_probe_is_ambiguous");
    insert_probe(&path, 3, "4H-1", 1);
    insert_probe(&path, 4, "4H-1", 1);

    let store = SqliteStore::open(&path).unwrap();
    let error = Probe::from_store(&store, "4H-1", 1).unwrap_err();

    assert!(matches!(error, ProbeError::AmbiguousProbe { count: 2, .. }));
}

#[test]
fn row_insertion_order_does_not_change_the_prediction() -> Result<()> {
    let seed = 40;
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let (_tmp_dir, path) = create_database("row_insertion_order_does_not_change_the_prediction");

    // Two probes with identical coefficient values; the second probe's
    // rows are inserted in a different shuffled order.
    insert_probe(&path, 1, "4H-1", 1);
    insert_probe(&path, 2, "4H-1", 2);
    for family in CoefficientFamily::ALL {
        let values: Vec<f64> = (0..features::feature_count(family.degree()))
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        insert_coefficients(&path, 1, family, &values, &mut rng);
        insert_coefficients(&path, 2, family, &values, &mut rng);
    }

    let store = SqliteStore::open(&path)?;
    let first = Probe::from_store(&store, "4H-1", 1)?.predict(&PRESSURES)?;
    let second = Probe::from_store(&store, "4H-1", 2)?.predict(&PRESSURES)?;

    assert_eq!(first.total.to_bits(), second.total.to_bits());
    assert_eq!(
        first.static_pressure.to_bits(),
        second.static_pressure.to_bits()
    );
    assert_eq!(first.mach.to_bits(), second.mach.to_bits());
    assert_eq!(first.alpha.to_bits(), second.alpha.to_bits());
    assert_eq!(first.beta.to_bits(), second.beta.to_bits());

    Ok(())
}

#[test]
fn a_configured_store_serves_predictions() -> Result<()> {
    let seed = 40;
    let mut rng = Isaac64Rng::seed_from_u64(seed);

    let (tmp_dir, path) = create_database("a_configured_store_serves_predictions");
    seed_random_probe(&path, 3, "5H-2", 4, &mut rng);

    let config_path = tmp_dir.path().join("multihole.toml");
    std::fs::write(
        &config_path,
        format!("database = {:?}\n", path.display().to_string()),
    )
    .unwrap();

    let store = Config::from_path(&config_path)?.open_store()?;
    let prediction = multihole::predict(&store, "5H-2", 4, &PRESSURES)?;

    assert!(prediction.total.is_finite());
    assert!(prediction.static_pressure.is_finite());
    assert!(prediction.mach.is_finite());

    Ok(())
}
