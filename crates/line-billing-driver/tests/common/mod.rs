//! Common test utilities for line-billing integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use line_billing_core::PhoneNumber;
use line_billing_driver::Dataset;

/// Test harness holding a dataset written to a temporary directory.
pub struct TestHarness {
    /// Temporary directory (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Path of the dataset file.
    pub dataset_path: PathBuf,
    /// Path a report can be written to.
    pub report_path: PathBuf,
}

impl TestHarness {
    /// Write `dataset` to a fresh temporary directory.
    pub fn new(dataset: &Value) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dataset_path = temp_dir.path().join("dataset.json");
        let report_path = temp_dir.path().join("report.json");
        std::fs::write(&dataset_path, dataset.to_string()).expect("Failed to write dataset");

        Self {
            _temp_dir: temp_dir,
            dataset_path,
            report_path,
        }
    }

    /// Load the dataset back from disk.
    pub fn load(&self) -> Dataset {
        Dataset::load(&self.dataset_path).expect("Failed to load dataset")
    }
}

/// Parse a phone number.
pub fn number(s: &str) -> PhoneNumber {
    s.parse().expect("valid phone number")
}
