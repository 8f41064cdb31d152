//! Parser for FlexLM `lmstat -a` output.
//!
//! Parsing runs in three passes over the raw text:
//!
//! 1. [`split_sections`] walks the lines with a small state machine and
//!    keeps the details section (seats in use) and the summary table
//!    (every grant) of the first server block.
//! 2. The summary pass builds one [`FeatureRecord`] per `feature_version`
//!    key, summing the totals of repeated grants.
//! 3. The details pass appends a [`UsageEntry`] per checked-out seat to the
//!    record of the grant it was served from.
//!
//! Lines of unexpected shape are skipped; lmstat output varies across
//! vendor daemons and releases. Malformed counts and seats that cannot be
//! attributed to a grant abort the parse.
//!
//! The primary entry point is [`LmstatParser::new`] followed by
//! [`LmstatParser::parse`]; [`parse_lmstat_text`](crate::parse_lmstat_text)
//! wraps both.
//!
//! [`FeatureRecord`]: lminfo_core::FeatureRecord
//! [`UsageEntry`]: lminfo_core::UsageEntry

mod details;
mod sections;
mod summary;
pub mod util;

use chrono::NaiveDate;
use lminfo_core::{LicenseReport, validate_report};
use tracing::{debug, warn};

use crate::error::ParseError;

pub use details::{
    DetailsLine, FeatureHeader, UsageLine, VersionHeader, extract_details, parse_details_line,
    parse_feature_header, parse_usage_line, parse_version_header,
};
pub use sections::{
    FEATURE_USAGE_MARKER, LineTarget, SERVER_STATUS_PREFIX, SUMMARY_HEADER, SectionState,
    Sections, split_sections, transition,
};
pub use summary::{SummaryLine, extract_summary, parse_summary_line};

/// Counters for a single parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub summary_lines: usize,
    pub details_lines: usize,
    pub features: usize,
    pub seats: usize,
}

/// Parser for one lmstat output.
///
/// A parser is used once; create a new one per output.
pub struct LmstatParser {
    raw_output: String,
    today: NaiveDate,
    sections: Sections,
    stats: ParseStats,
}

impl LmstatParser {
    /// Creates a parser for `raw_output`. `today` anchors the year of
    /// checkout start dates, which lmstat prints without one.
    pub fn new(raw_output: &str, today: NaiveDate) -> Self {
        Self {
            raw_output: raw_output.to_string(),
            today,
            sections: Sections::default(),
            stats: ParseStats::default(),
        }
    }

    /// Parses the output into a report.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use lminfo_lmstat::parser::LmstatParser;
    ///
    /// let raw = "\
    /// Feature usage info:
    /// Feature  Version  #licenses  Expires  Vendor
    /// _______  _______  _________  _______  ______
    /// 85527MAYA_F  1.000  5  1-jan-2015  adskflex
    /// ";
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    /// let mut parser = LmstatParser::new(raw, today);
    /// let report = parser.parse().unwrap();
    ///
    /// let record = report.get("85527MAYA_F_1.000").unwrap();
    /// assert_eq!(record.ntotal, 5);
    /// assert_eq!(record.nused, 0);
    /// ```
    pub fn parse(&mut self) -> Result<LicenseReport, ParseError> {
        self.sections = split_sections(&self.raw_output);
        debug!(
            summary_lines = self.sections.summary.len(),
            details_lines = self.sections.details.len(),
            "split lmstat output"
        );

        let mut report = LicenseReport::new();
        extract_summary(&self.sections.summary, &mut report)?;
        let seats = extract_details(&self.sections.details, &mut report, self.today)?;

        self.stats = ParseStats {
            summary_lines: self.sections.summary.len(),
            details_lines: self.sections.details.len(),
            features: report.len(),
            seats,
        };
        debug!(features = report.len(), seats, "parsed lmstat output");

        for problem in validate_report(&report) {
            warn!(%problem, "inconsistent license report");
        }

        Ok(report)
    }

    /// Section lines found by the last [`parse`](Self::parse).
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}
