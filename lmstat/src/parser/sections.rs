//! Section splitter for `lmstat -a` output.
//!
//! A linear state machine walks the trimmed lines and sorts them into the
//! details section (per-seat usage, listed after `Feature usage info:`) and
//! the summary section (one line per grant, listed under the
//! `Feature Version #licenses Expires Vendor` table). Everything before the
//! usage marker and from the next `License server status:` on is dropped;
//! lmstat repeats its sections once per server in a redundant triad.

use tracing::trace;

use super::util::{starts_with_tokens, tokens, tokens_equal};

/// Line that opens the details section.
pub const FEATURE_USAGE_MARKER: &str = "Feature usage info:";

/// Column header of the summary table.
pub const SUMMARY_HEADER: &[&str] = &["Feature", "Version", "#licenses", "Expires", "Vendor"];

/// Number of underscore runs in the line under [`SUMMARY_HEADER`].
pub const SUMMARY_UNDERLINE_COLUMNS: usize = 5;

/// Leading tokens of the line that ends the summary table.
pub const SERVER_STATUS_PREFIX: &[&str] = &["License", "server", "status:"];

/// Splitter position within the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// Before `Feature usage info:`.
    Init,
    /// Collecting details lines.
    FeatureUsageInfo,
    /// Between the summary column header and its underline.
    FeatureSummaryHeader,
    /// Collecting summary lines.
    FeatureSummaryInfo,
    /// Past the end of the first summary table.
    Done,
}

/// Where a line goes after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Summary,
    Details,
    Discard,
}

/// Raw section lines, trimmed and in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub summary: Vec<String>,
    pub details: Vec<String>,
}

/// Computes the next state and the destination of one trimmed line.
pub fn transition(state: SectionState, line: &str) -> (SectionState, LineTarget) {
    match state {
        SectionState::Init if line == FEATURE_USAGE_MARKER => {
            (SectionState::FeatureUsageInfo, LineTarget::Discard)
        }
        SectionState::Init => (SectionState::Init, LineTarget::Discard),
        SectionState::FeatureUsageInfo if tokens_equal(line, SUMMARY_HEADER) => {
            (SectionState::FeatureSummaryHeader, LineTarget::Discard)
        }
        SectionState::FeatureUsageInfo => (SectionState::FeatureUsageInfo, LineTarget::Details),
        SectionState::FeatureSummaryHeader if is_summary_underline(line) => {
            (SectionState::FeatureSummaryInfo, LineTarget::Discard)
        }
        SectionState::FeatureSummaryHeader => {
            (SectionState::FeatureSummaryHeader, LineTarget::Discard)
        }
        SectionState::FeatureSummaryInfo if starts_with_tokens(line, SERVER_STATUS_PREFIX) => {
            (SectionState::Done, LineTarget::Discard)
        }
        SectionState::FeatureSummaryInfo => (SectionState::FeatureSummaryInfo, LineTarget::Summary),
        SectionState::Done => (SectionState::Done, LineTarget::Discard),
    }
}

/// Splits raw lmstat output into summary and details lines.
///
/// # Examples
///
/// ```
/// use lminfo_lmstat::parser::split_sections;
///
/// let raw = "\
/// Feature usage info:
/// Users of F:  (Total of 1 license issued;  Total of 0 licenses in use)
/// Feature  Version  #licenses  Expires  Vendor
/// _______  _______  _________  _______  ______
/// F  1.0  1  1-jan-0  vend
/// License server status: 27000@host
/// G  1.0  1  1-jan-0  vend
/// ";
/// let sections = split_sections(raw);
/// assert_eq!(sections.details.len(), 1);
/// assert_eq!(sections.summary, vec!["F  1.0  1  1-jan-0  vend"]);
/// ```
pub fn split_sections(raw: &str) -> Sections {
    let mut sections = Sections::default();
    let mut state = SectionState::Init;

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        let (next, target) = transition(state, line);
        if next != state {
            trace!(line = index + 1, from = ?state, to = ?next, "section transition");
        }
        match target {
            LineTarget::Summary => sections.summary.push(line.to_string()),
            LineTarget::Details => sections.details.push(line.to_string()),
            LineTarget::Discard => {}
        }
        state = next;
        if state == SectionState::Done {
            break;
        }
    }

    sections
}

fn is_summary_underline(line: &str) -> bool {
    let columns = tokens(line);
    columns.len() == SUMMARY_UNDERLINE_COLUMNS
        && columns
            .iter()
            .all(|column| column.chars().all(|ch| ch == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Feature                         Version     #licenses    Expires      Vendor";
    const UNDERLINE: &str =
        "_______                         _________   _________    __________   ______";

    #[test]
    fn test_transition_table() {
        use LineTarget::*;
        use SectionState::*;

        assert_eq!(transition(Init, "Users of X:"), (Init, Discard));
        assert_eq!(transition(Init, FEATURE_USAGE_MARKER), (FeatureUsageInfo, Discard));
        assert_eq!(transition(FeatureUsageInfo, "anything"), (FeatureUsageInfo, Details));
        assert_eq!(transition(FeatureUsageInfo, ""), (FeatureUsageInfo, Details));
        assert_eq!(transition(FeatureUsageInfo, HEADER), (FeatureSummaryHeader, Discard));
        assert_eq!(transition(FeatureSummaryHeader, "junk"), (FeatureSummaryHeader, Discard));
        assert_eq!(transition(FeatureSummaryHeader, UNDERLINE), (FeatureSummaryInfo, Discard));
        assert_eq!(transition(FeatureSummaryInfo, "F 1 1 x v"), (FeatureSummaryInfo, Summary));
        assert_eq!(
            transition(FeatureSummaryInfo, "License server status: 27000@h"),
            (Done, Discard)
        );
        assert_eq!(transition(Done, "F 1 1 x v"), (Done, Discard));
    }

    #[test]
    fn test_marker_must_match_whole_trimmed_line() {
        let raw = "Feature usage info: extra\nFeature usage info:x\n";
        assert_eq!(split_sections(raw), Sections::default());
        let indented = "   Feature usage info:   \nUsers of X:\n";
        assert_eq!(split_sections(indented).details, vec!["Users of X:"]);
    }

    #[test]
    fn test_missing_usage_marker_yields_nothing() {
        let raw = format!("{HEADER}\n{UNDERLINE}\nF 1.0 1 1-jan-0 v\n");
        assert_eq!(split_sections(&raw), Sections::default());
    }

    #[test]
    fn test_missing_terminal_marker_keeps_all_summary_lines() {
        let raw = format!(
            "Feature usage info:\n{HEADER}\n{UNDERLINE}\nF 1.0 1 1-jan-0 v\n\nG 2.0 3 1-jan-0 v\n"
        );
        let sections = split_sections(&raw);
        assert_eq!(sections.summary, vec!["F 1.0 1 1-jan-0 v", "", "G 2.0 3 1-jan-0 v"]);
        assert!(sections.details.is_empty());
    }

    #[test]
    fn test_only_first_server_block_is_kept() {
        let block = format!("{HEADER}\n{UNDERLINE}\nF 1.0 1 1-jan-0 v\n");
        let raw = format!(
            "License server status: 27000@a\nFeature usage info:\nUsers of F:\n{block}\
             License server status: 27000@b\nFeature usage info:\nUsers of G:\n{block}\
             License server status: 27000@c\n"
        );
        let sections = split_sections(&raw);
        assert_eq!(sections.summary, vec!["F 1.0 1 1-jan-0 v"]);
        assert_eq!(sections.details, vec!["Users of F:"]);
    }

    #[test]
    fn test_header_lines_are_not_retained() {
        let raw = format!("Feature usage info:\n{HEADER}\nnoise\n{UNDERLINE}\n");
        let sections = split_sections(&raw);
        assert!(sections.summary.is_empty());
        assert!(sections.details.is_empty());
    }

    #[test]
    fn test_underline_shape() {
        assert!(is_summary_underline(UNDERLINE));
        assert!(!is_summary_underline("_____ _____ _____ _____"));
        assert!(!is_summary_underline("_____ _____ _____ _____ ---"));
    }
}
