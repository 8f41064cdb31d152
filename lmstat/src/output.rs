//! Output formatting for license reports.

use lminfo_core::LicenseReport;

use crate::parser::Sections;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty-printed JSON keyed by `feature_version`.
    #[default]
    Json,
    Yaml,
    /// Human-readable listing.
    Text,
    /// Raw summary table lines.
    Summary,
    /// Raw details section lines.
    Details,
}

/// Formats a parsed report and its raw sections in the requested format.
pub fn format_report(
    report: &LicenseReport,
    sections: &Sections,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Ok(report_to_text(report)),
        OutputFormat::Summary => Ok(lines_to_text(&sections.summary)),
        OutputFormat::Details => Ok(lines_to_text(&sections.details)),
    }
}

fn report_to_text(report: &LicenseReport) -> String {
    let mut out = String::new();

    let width = report
        .records()
        .map(|record| record.feature.len() + record.version.len() + 1)
        .max()
        .unwrap_or(8);

    for record in report.records() {
        let name = format!("{} {}", record.feature, record.version);
        out.push_str(&format!(
            "{name:<width$}  {:>4} of {:<4} in use  {:>4} free  expires {}  vendor {}\n",
            record.nused,
            record.ntotal,
            record.available(),
            record.expires,
            record.vendor,
        ));
        for seat in &record.usage {
            out.push_str(&format!(
                "    {}@{}  pid {}  since {}  sw {}  lm {}\n",
                seat.userid, seat.host, seat.pid, seat.start, seat.sw_version, seat.lm_version,
            ));
        }
    }
    if !report.is_empty() {
        out.push_str(&format!("{} seats in use\n", report.total_used()));
    }

    out
}

fn lines_to_text(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lminfo_core::{FeatureRecord, UsageEntry};

    fn sample() -> (LicenseReport, Sections) {
        let mut report = LicenseReport::new();
        report.upsert_summary(FeatureRecord::new(
            "85527MAYAF",
            "1.000",
            5,
            "9999-12-31 23:59",
            "adskflex",
        ));
        report.push_usage(
            "85527MAYAF_1.000",
            UsageEntry::new("someguy", "ahost")
                .with_pid("7581")
                .with_versions("1.000", "1.000")
                .with_start("2026-09-12 09:08 (Saturday)"),
        );
        let sections = Sections {
            summary: vec!["85527MAYAF 1.000 5 1-jan-0 adskflex".to_string()],
            details: vec!["Users of 85527MAYAF:".to_string(), String::new()],
        };
        (report, sections)
    }

    #[test]
    fn test_format_json() {
        let (report, sections) = sample();
        let json = format_report(&report, &sections, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = &value["85527MAYAF_1.000"];
        assert_eq!(record["nused"], 1);
        assert_eq!(record["usage"][0]["userid"], "someguy");
        assert!(json.contains("\n  \"85527MAYAF_1.000\": {"), "not indented: {json}");
    }

    #[test]
    fn test_format_yaml() {
        let (report, sections) = sample();
        let yaml = format_report(&report, &sections, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("85527MAYAF_1.000:"));
        assert!(yaml.contains("userid: someguy"));
    }

    #[test]
    fn test_format_text() {
        let (report, sections) = sample();
        let text = format_report(&report, &sections, OutputFormat::Text).unwrap();
        assert!(text.starts_with("85527MAYAF 1.000"));
        assert!(text.contains("1 of 5"));
        assert!(text.contains("   4 free"));
        assert!(text.contains("someguy@ahost  pid 7581"));
        assert!(text.ends_with("1 seats in use\n"));
    }

    #[test]
    fn test_format_raw_sections() {
        let (report, sections) = sample();
        assert_eq!(
            format_report(&report, &sections, OutputFormat::Summary).unwrap(),
            "85527MAYAF 1.000 5 1-jan-0 adskflex\n"
        );
        assert_eq!(
            format_report(&report, &sections, OutputFormat::Details).unwrap(),
            "Users of 85527MAYAF:\n\n"
        );
        let empty = Sections::default();
        assert_eq!(format_report(&report, &empty, OutputFormat::Summary).unwrap(), "");
    }

    #[test]
    fn test_format_text_empty_report() {
        let text =
            format_report(&LicenseReport::new(), &Sections::default(), OutputFormat::Text).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_format_names_deserialize() {
        let format: OutputFormat = serde_yaml::from_str("details").unwrap();
        assert_eq!(format, OutputFormat::Details);
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
