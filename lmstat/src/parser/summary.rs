//! Summary table extraction.
//!
//! Each grant line reads `<feature> <version> <#licenses> <expires> <vendor>`.
//! Lines of any other width are stray text and are skipped.

use lminfo_core::{FeatureRecord, LicenseReport, MergeOutcome};
use tracing::{debug, trace};

use super::util::tokens;
use crate::dates::convert_expiration_date;
use crate::error::ParseError;

/// One grant line of the summary table, with the expiration normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub feature: String,
    pub version: String,
    pub ntotal: u64,
    pub expires: String,
    pub vendor: String,
}

impl SummaryLine {
    fn into_record(self) -> FeatureRecord {
        FeatureRecord::new(
            &self.feature,
            &self.version,
            self.ntotal,
            &self.expires,
            &self.vendor,
        )
    }
}

/// Parses one summary line.
///
/// Returns `Ok(None)` for lines that are not five tokens wide and an error
/// when the license count is not an integer.
pub fn parse_summary_line(line: &str) -> Result<Option<SummaryLine>, ParseError> {
    let &[feature, version, count, expires, vendor] = tokens(line).as_slice() else {
        return Ok(None);
    };

    let ntotal = count
        .parse::<u64>()
        .map_err(|source| ParseError::InvalidCount {
            value: count.to_string(),
            line: line.to_string(),
            source,
        })?;

    Ok(Some(SummaryLine {
        feature: feature.to_string(),
        version: version.to_string(),
        ntotal,
        expires: convert_expiration_date(expires),
        vendor: vendor.to_string(),
    }))
}

/// Folds summary lines into `report`, merging repeated feature/version keys.
pub fn extract_summary(lines: &[String], report: &mut LicenseReport) -> Result<(), ParseError> {
    for line in lines {
        let Some(parsed) = parse_summary_line(line)? else {
            if !line.is_empty() {
                trace!(line = %line, "skipping non-grant summary line");
            }
            continue;
        };
        let record = parsed.into_record();
        if report.upsert_summary(record) == MergeOutcome::Merged {
            debug!(line = %line, "merged duplicate grant into existing feature");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grant_line() {
        let parsed = parse_summary_line("85527MAYA_F   1.000   5   1-jan-2015   adskflex")
            .unwrap()
            .unwrap();
        assert_eq!(
            parsed,
            SummaryLine {
                feature: "85527MAYA_F".to_string(),
                version: "1.000".to_string(),
                ntotal: 5,
                expires: "2015-01-01 23:59".to_string(),
                vendor: "adskflex".to_string(),
            }
        );
    }

    #[test]
    fn test_other_widths_are_not_grants() {
        assert_eq!(parse_summary_line("").unwrap(), None);
        assert_eq!(parse_summary_line("F 1.0 5 1-jan-0").unwrap(), None);
        assert_eq!(parse_summary_line("F 1.0 5 1-jan-0 vend extra").unwrap(), None);
    }

    #[test]
    fn test_bad_count_fails() {
        let err = parse_summary_line("F 1.0 five 1-jan-0 vend").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCount { ref value, .. } if value == "five"));
        assert!(err.to_string().contains("F 1.0 five 1-jan-0 vend"));
        assert!(parse_summary_line("F 1.0 -1 1-jan-0 vend").is_err());
    }

    #[test]
    fn test_extract_merges_duplicates() {
        let lines = vec![
            "F 1.0 3 1-oct-2027 first".to_string(),
            String::new(),
            "G 2.0 1 1-jan-0 other".to_string(),
            "F 1.0 2 1-jan-2020 second".to_string(),
        ];
        let mut report = LicenseReport::new();
        extract_summary(&lines, &mut report).unwrap();

        assert_eq!(report.len(), 2);
        let f = report.get("F_1.0").unwrap();
        assert_eq!(f.ntotal, 5);
        assert_eq!(f.expires, "2027-10-01 23:59");
        assert_eq!(f.vendor, "first");
        assert_eq!(f.nused, 0);
        assert!(f.usage.is_empty());
        assert_eq!(report.get("G_2.0").unwrap().expires, "9999-12-31 23:59");
    }

    #[test]
    fn test_extract_stops_on_bad_count() {
        let lines = vec!["F 1.0 x 1-jan-0 v".to_string()];
        let mut report = LicenseReport::new();
        assert!(extract_summary(&lines, &mut report).is_err());
    }
}
