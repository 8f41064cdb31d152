//! Details section extraction.
//!
//! The details section lists checked-out seats grouped by feature and by
//! grant version:
//!
//! ```text
//! Users of 85527MAYAF:  (Total of 5 licenses issued;  Total of 1 license in use)
//!
//!   "85527MAYAF" v1.000, vendor: adskflex, expiry: 1-jan-0
//!   floating license
//!
//!     someguy ahost ahost (v1.000) (imdlic01/7111 7581), start Wed 9/12 9:08
//! ```
//!
//! Each line shape has its own parser returning `None` for "not this
//! shape"; [`extract_details`] drives them with a feature/version cursor.

use std::sync::LazyLock;

use chrono::NaiveDate;
use lminfo_core::{FeatureRecord, LicenseReport, UsageEntry, feature_key};
use regex::Regex;
use tracing::{debug, trace};

use super::util::{clean_pid, clean_version, short_host, tokens};
use crate::dates::{convert_expiration_date, convert_start_date};
use crate::error::ParseError;

static FEATURE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    // The in-use clause is preceded by two spaces in every lmstat release.
    Regex::new(
        r"^Users of ([^:]+):\s+\(Total of (\d+) licenses? issued;  Total of (\d+) licenses? in use\)",
    )
    .expect("static regex must compile")
});

/// `Users of <feature>:` line. The counts are informational only; the
/// summary table is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHeader {
    pub feature: String,
    pub issued: u64,
    pub in_use: u64,
}

/// Per-grant sub-header, e.g.
/// `"85527MAYAF" v1.000, vendor: adskflex, expiry: 1-jan-0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHeader {
    pub feature: String,
    pub version: String,
    pub vendor: String,
    pub expiry: String,
}

/// One checked-out seat, before date normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageLine {
    pub userid: String,
    pub host: String,
    pub sw_version: String,
    pub pid: String,
    pub date: String,
    pub time: String,
}

/// Classification of one details line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsLine {
    Feature(FeatureHeader),
    Version(VersionHeader),
    Usage(UsageLine),
    Other,
}

pub fn parse_feature_header(line: &str) -> Option<FeatureHeader> {
    let caps = FEATURE_HEADER.captures(line)?;
    Some(FeatureHeader {
        feature: caps[1].to_string(),
        issued: caps[2].parse().ok()?,
        in_use: caps[3].parse().ok()?,
    })
}

pub fn parse_version_header(line: &str) -> Option<VersionHeader> {
    let &[feature, version, "vendor:", vendor, _, expiry] = tokens(line).as_slice() else {
        return None;
    };
    let version = version.trim_end_matches(',');
    Some(VersionHeader {
        feature: feature.trim_matches('"').to_string(),
        version: version.strip_prefix('v').unwrap_or(version).to_string(),
        vendor: vendor.trim_end_matches(',').to_string(),
        expiry: expiry.to_string(),
    })
}

/// Parses a seat line in either of its two widths.
///
/// The regular shape has ten tokens:
/// `user host display (vX) (server/port pid), start Wed 9/12 9:08`.
/// When the host name is too long the server drops the display column,
/// leaving nine tokens with everything after the host shifted left.
pub fn parse_usage_line(line: &str) -> Option<UsageLine> {
    let words = tokens(line);
    let (version, pid, date, time) = match words.as_slice() {
        [_, _, _, version, _, pid, "start", _, date, time] => (*version, *pid, *date, *time),
        [_, _, version, _, pid, "start", _, date, time] => (*version, *pid, *date, *time),
        _ => return None,
    };
    Some(UsageLine {
        userid: words[0].to_string(),
        host: short_host(words[1]).to_string(),
        sw_version: clean_version(version).to_string(),
        pid: clean_pid(pid).to_string(),
        date: date.to_string(),
        time: time.to_string(),
    })
}

pub fn parse_details_line(line: &str) -> DetailsLine {
    if let Some(header) = parse_feature_header(line) {
        DetailsLine::Feature(header)
    } else if let Some(header) = parse_version_header(line) {
        DetailsLine::Version(header)
    } else if let Some(usage) = parse_usage_line(line) {
        DetailsLine::Usage(usage)
    } else {
        DetailsLine::Other
    }
}

/// Appends the seats of the details section to `report`.
///
/// Summary records must already be present. A sub-header for a grant the
/// summary did not list creates an empty record for it. A seat line with no
/// current feature and version, or whose grant is unknown, is an error.
/// Returns the number of seats appended.
pub fn extract_details(
    lines: &[String],
    report: &mut LicenseReport,
    today: NaiveDate,
) -> Result<usize, ParseError> {
    let mut feature: Option<String> = None;
    let mut version: Option<String> = None;
    let mut seats = 0;

    for line in lines {
        match parse_details_line(line) {
            DetailsLine::Feature(header) => {
                trace!(
                    feature = %header.feature,
                    issued = header.issued,
                    in_use = header.in_use,
                    "feature header"
                );
                feature = Some(header.feature);
            }
            DetailsLine::Version(header) => {
                if let Some(name) = feature.as_deref() {
                    let key = feature_key(name, &header.version);
                    if !report.contains_key(&key) {
                        debug!(
                            key = %key,
                            listed_as = %header.feature,
                            "grant missing from summary, creating empty record"
                        );
                        report.ensure_feature(&key, || {
                            FeatureRecord::new(
                                name,
                                &header.version,
                                0,
                                &convert_expiration_date(&header.expiry),
                                &header.vendor,
                            )
                        });
                    }
                }
                version = Some(header.version);
            }
            DetailsLine::Usage(usage) => {
                let (Some(name), Some(lm_version)) = (feature.as_deref(), version.as_deref())
                else {
                    return Err(ParseError::UsageWithoutFeature { line: line.clone() });
                };
                let key = feature_key(name, lm_version);
                let entry = UsageEntry {
                    userid: usage.userid,
                    host: usage.host,
                    pid: usage.pid,
                    start: convert_start_date(&usage.date, &usage.time, today),
                    sw_version: usage.sw_version,
                    lm_version: lm_version.to_string(),
                };
                if !report.push_usage(&key, entry) {
                    return Err(ParseError::UnknownFeature {
                        key,
                        line: line.clone(),
                    });
                }
                seats += 1;
            }
            DetailsLine::Other => {
                if !line.is_empty() {
                    trace!(line = %line, "skipping details line");
                }
            }
        }
    }

    Ok(seats)
}
