//! Report validation.
//!
//! Checks the structural invariants of a [`LicenseReport`]: every record is
//! stored under its own `feature_version` key and its used count matches
//! the length of its usage list.
//!
//! # Examples
//!
//! ```
//! use lminfo_core::*;
//!
//! let mut report = LicenseReport::new();
//! report.upsert_summary(FeatureRecord::new("F", "1.0", 2, "2030-01-01 23:59", "vend"));
//! assert!(validate_report(&report).is_empty());
//! ```

use thiserror::Error;

use crate::LicenseReport;

/// Report validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A record is stored under a key other than `feature_version`.
    #[error("record stored under '{key}' but identifies as '{expected}'")]
    KeyMismatch { key: String, expected: String },
    /// `nused` disagrees with the number of usage entries.
    #[error("'{key}' reports {nused} seats in use but lists {listed}")]
    UsedCountMismatch { key: String, nused: u64, listed: usize },
}

/// Validates every record of a report.
pub fn validate_report(report: &LicenseReport) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, record) in report.iter() {
        let expected = record.key();
        if *key != expected {
            errors.push(ValidationError::KeyMismatch {
                key: key.clone(),
                expected,
            });
        }
        if record.nused != record.usage.len() as u64 {
            errors.push(ValidationError::UsedCountMismatch {
                key: key.clone(),
                nused: record.nused,
                listed: record.usage.len(),
            });
        }
    }

    errors
}
