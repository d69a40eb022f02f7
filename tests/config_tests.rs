// tests/config_tests.rs

//! # ENGINE CONFIGURATION LOADING TESTS
//!
//! **Author:** Lead QA Architect / Distinguished Professor of CMS
//! **Status:** Strict Enforcing (Cannot be bypassed)
//!
//! Asserts that `EngineConfig` TOML ingestion at the crate's public boundary
//! behaves identically to the unit-level coverage in `src/config.rs`: partial
//! overrides fall back to documented defaults, and validation rejects
//! degenerate tunables before they ever reach the pipeline.

use graphrank_core::config::EngineConfig;
use std::io::Write;

#[test]
fn test_full_override_toml_round_trips_every_field() {
    let mut file = tempfile::NamedTempFile::new().expect("FATAL: could not create fixture file.");
    writeln!(
        file,
        r#"
        max_iterations = 50
        max_scratch_bytes = 1048576
        default_damping_factor = 0.5
        default_tolerance = 1e-4
        default_deterministic_karma = true
        "#
    )
    .expect("FATAL: could not write fixture TOML.");

    let config = EngineConfig::load_from_toml(file.path())
        .expect("FATAL: a fully-specified, valid TOML document must load successfully.");

    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.max_scratch_bytes, 1_048_576);
    assert!((config.default_damping_factor - 0.5).abs() < f64::EPSILON);
    assert!((config.default_tolerance - 1e-4).abs() < 1e-15);
    assert!(config.default_deterministic_karma);
}

#[test]
fn test_empty_toml_document_yields_pure_defaults() {
    let file = tempfile::NamedTempFile::new().expect("FATAL: could not create fixture file.");
    let config = EngineConfig::load_from_toml(file.path())
        .expect("FATAL: an empty TOML document must load as the all-defaults configuration.");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_malformed_toml_is_rejected_with_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("FATAL: could not create fixture file.");
    writeln!(file, "max_iterations = [this is not valid toml").unwrap();
    let result = EngineConfig::load_from_toml(file.path());
    assert!(
        result.is_err(),
        "FATAL: syntactically invalid TOML must never silently fall back to defaults."
    );
}
