//! Core types for structured license usage reports.
//!
//! This crate defines the data model produced from FlexLM `lmstat` output:
//!
//! - [`FeatureRecord`] — one feature/version grant with its total count,
//!   expiration, vendor and active seats.
//! - [`UsageEntry`] — one checked-out seat (user, host, pid, start time).
//! - [`LicenseReport`] — the ordered `feature_version` → record map, with the
//!   summary merge policy in [`LicenseReport::upsert_summary`].
//!
//! Validation ([`validate_report`]) checks the key and used-count invariants.
//!
//! # Example
//!
//! ```
//! use lminfo_core::*;
//!
//! let mut report = LicenseReport::new();
//! report.upsert_summary(FeatureRecord::new(
//!     "85527MAYAF",
//!     "1.000",
//!     5,
//!     "9999-12-31 23:59",
//!     "adskflex",
//! ));
//! report.push_usage(
//!     "85527MAYAF_1.000",
//!     UsageEntry::new("someguy", "ahost").with_pid("7581"),
//! );
//!
//! let record = report.get("85527MAYAF_1.000").unwrap();
//! assert_eq!(record.nused, 1);
//! assert!(validate_report(&report).is_empty());
//! ```

mod report;
mod types;
mod validate;

pub use report::{LicenseReport, MergeOutcome};
pub use types::*;
pub use validate::{ValidationError, validate_report};
