//! FlexLM license usage from `lmstat` output.
//!
//! This crate turns the free-form text printed by `lmutil lmstat -a` into a
//! structured [`LicenseReport`]: one record per feature/version with its
//! total seat count, expiration and vendor, and the list of seats currently
//! checked out.
//!
//! # Main entry points
//!
//! - [`parse_lmstat_text`] — parse pre-captured output.
//! - [`collect_license_info`] — parse the result of an acquisition, keeping
//!   the raw sections and parse counters alongside the report.
//! - [`extractor::LmstatCommand::run`] — run lmstat and capture its output.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lminfo_lmstat::parse_lmstat_text;
//!
//! let raw = "\
//! Feature usage info:
//!
//! Users of 85527MAYAF:  (Total of 5 licenses issued;  Total of 1 license in use)
//!
//!   \"85527MAYAF\" v1.000, vendor: adskflex, expiry: 1-jan-0
//!
//!     someguy ahost ahost (v1.000) (imdlic01/7111 7581), start Wed 9/12 9:08
//! ";
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
//! let report = parse_lmstat_text(raw, today).unwrap();
//! let record = report.get("85527MAYAF_1.000").unwrap();
//! assert_eq!(record.nused, 1);
//! assert_eq!(record.usage[0].userid, "someguy");
//! assert_eq!(record.usage[0].start, "2026-09-12 09:08 (Saturday)");
//! ```
//!
//! [`LicenseReport`]: lminfo_core::LicenseReport

pub mod config;
pub mod dates;
pub mod error;
pub mod extractor;
pub mod output;
pub mod parser;

use chrono::NaiveDate;
use lminfo_core::LicenseReport;
use parser::{LmstatParser, ParseStats, Sections};

pub use error::{AcquisitionError, ConfigError, LminfoError, ParseError, Result};

/// Parses pre-captured lmstat output into a report.
///
/// `today` anchors the year of checkout start dates.
pub fn parse_lmstat_text(
    raw: &str,
    today: NaiveDate,
) -> std::result::Result<LicenseReport, ParseError> {
    LmstatParser::new(raw, today).parse()
}

/// A parsed report together with the raw sections it came from.
#[derive(Debug, Clone)]
pub struct LicenseInfo {
    pub report: LicenseReport,
    pub sections: Sections,
    pub stats: ParseStats,
}

/// Parses the outcome of an lmstat acquisition.
///
/// An acquisition failure is returned as is; no parsing is attempted.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use lminfo_lmstat::{AcquisitionError, LminfoError, collect_license_info};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
/// let failed = Err(AcquisitionError::NotFound { program: "lmutil".into() });
/// assert!(matches!(
///     collect_license_info(failed, today),
///     Err(LminfoError::Acquisition(_))
/// ));
/// ```
pub fn collect_license_info(
    raw: std::result::Result<String, AcquisitionError>,
    today: NaiveDate,
) -> Result<LicenseInfo> {
    let raw = raw?;
    let mut parser = LmstatParser::new(&raw, today);
    let report = parser.parse()?;
    Ok(LicenseInfo {
        report,
        sections: parser.sections().clone(),
        stats: parser.stats(),
    })
}
