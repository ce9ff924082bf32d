//! Conformance tests that run YAML fixtures against expecta
//!
//! Run with: cargo test -p expecta-test --test conformance --features expecta-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use expecta::{Registry, RegistryBuilder};
use expecta_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// The fixtures directory next to this crate's manifest
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn registry() -> Registry {
    expecta_test::register(RegistryBuilder::new()).build()
}

/// Load and run every fixture in one file
fn run_fixture_file(file: &str) {
    let path = fixtures_dir().join(file);
    let shown = path.display();
    assert!(path.exists(), "Fixture file does not exist: {shown}");

    let yaml = fs::read_to_string(&path).expect("read yaml");
    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {shown}: {e}");
    });
    assert!(!fixtures.is_empty(), "{shown} has no fixtures");

    let registry = registry();
    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert(&registry);
    }
}

#[test]
fn test_equality() {
    run_fixture_file("01_equality.yaml");
}

#[test]
fn test_asymmetric() {
    run_fixture_file("02_asymmetric.yaml");
}

#[test]
fn test_containing() {
    run_fixture_file("03_containing.yaml");
}

#[test]
fn test_custom_testers() {
    run_fixture_file("04_custom_testers.yaml");
}

#[test]
fn test_contains() {
    run_fixture_file("05_contains.yaml");
}

#[test]
fn every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read dir")
        .map(|entry| {
            let name = entry.expect("dir entry").file_name();
            name.to_string_lossy().into_owned()
        })
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            "01_equality.yaml",
            "02_asymmetric.yaml",
            "03_containing.yaml",
            "04_custom_testers.yaml",
            "05_contains.yaml",
        ]
    );
}
