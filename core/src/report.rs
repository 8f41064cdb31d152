//! Keyed feature map with merge-on-insert semantics.
//!
//! A [`LicenseReport`] maps `feature_version` keys to [`FeatureRecord`]s in
//! the order they were first seen. The summary merge policy lives in
//! [`LicenseReport::upsert_summary`]: totals are summed, everything else is
//! first-seen-wins.
//!
//! # Example
//!
//! ```
//! use lminfo_core::*;
//!
//! let mut report = LicenseReport::new();
//! report.upsert_summary(FeatureRecord::new("MAYA", "1.000", 3, "2027-10-01 23:59", "adskflex"));
//! report.upsert_summary(FeatureRecord::new("MAYA", "1.000", 2, "2028-01-01 23:59", "other"));
//!
//! let record = report.get("MAYA_1.000").unwrap();
//! assert_eq!(record.ntotal, 5);
//! assert_eq!(record.expires, "2027-10-01 23:59");
//! assert_eq!(record.vendor, "adskflex");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FeatureRecord, UsageEntry};

/// Outcome of a summary upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The key was new and the record was inserted as given.
    Inserted,
    /// The key existed and the incoming total was added to it.
    Merged,
}

/// Ordered mapping from feature key to feature record.
///
/// Serializes as a plain object keyed by `feature_version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseReport {
    features: IndexMap<String, FeatureRecord>,
}

impl LicenseReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a summary record, merging into an existing one on key clash.
    ///
    /// On clash only `ntotal` changes, saturating at `u64::MAX`. Name,
    /// version, expiration and vendor of the first occurrence are kept, and
    /// the incoming usage list is ignored.
    pub fn upsert_summary(&mut self, record: FeatureRecord) -> MergeOutcome {
        let key = record.key();
        match self.features.get_mut(&key) {
            Some(existing) => {
                existing.ntotal = existing.ntotal.saturating_add(record.ntotal);
                MergeOutcome::Merged
            }
            None => {
                self.features.insert(key, record);
                MergeOutcome::Inserted
            }
        }
    }

    /// Returns the record for `key`, inserting the one built by `make` when
    /// the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use lminfo_core::*;
    ///
    /// let mut report = LicenseReport::new();
    /// let record = report.ensure_feature("X_1.0", || {
    ///     FeatureRecord::new("X", "1.0", 0, "xxxx-xx-xx xx:xx", "vend")
    /// });
    /// assert_eq!(record.ntotal, 0);
    /// assert_eq!(report.len(), 1);
    /// ```
    pub fn ensure_feature<F>(&mut self, key: &str, make: F) -> &mut FeatureRecord
    where
        F: FnOnce() -> FeatureRecord,
    {
        self.features.entry(key.to_string()).or_insert_with(make)
    }

    /// Appends a usage entry to the record at `key`.
    ///
    /// Returns `false` without touching the report when the key is absent.
    pub fn push_usage(&mut self, key: &str, entry: UsageEntry) -> bool {
        match self.features.get_mut(key) {
            Some(record) => {
                record.push_usage(entry);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FeatureRecord> {
        self.features.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates `(key, record)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureRecord)> {
        self.features.iter()
    }

    /// Iterates records in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.features.values()
    }

    /// Total seats in use across all features.
    pub fn total_used(&self) -> u64 {
        self.features.values().map(|record| record.nused).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str, total: u64, expires: &str, vendor: &str) -> FeatureRecord {
        FeatureRecord::new(name, version, total, expires, vendor)
    }

    #[test]
    fn test_upsert_sums_totals_first_seen_metadata_wins() {
        let mut report = LicenseReport::new();
        assert_eq!(
            report.upsert_summary(record("F", "1.0", 3, "2027-01-01 23:59", "v1")),
            MergeOutcome::Inserted
        );
        assert_eq!(
            report.upsert_summary(record("F", "1.0", 4, "2020-01-01 23:59", "v2")),
            MergeOutcome::Merged
        );
        assert_eq!(
            report.upsert_summary(record("F", "1.0", 1, "2030-01-01 23:59", "v3")),
            MergeOutcome::Merged
        );

        let merged = report.get("F_1.0").unwrap();
        assert_eq!(merged.ntotal, 8);
        // First seen, not earliest.
        assert_eq!(merged.expires, "2027-01-01 23:59");
        assert_eq!(merged.vendor, "v1");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_upsert_total_saturates() {
        let mut report = LicenseReport::new();
        report.upsert_summary(record("F", "1.0", u64::MAX - 1, "e", "v"));
        report.upsert_summary(record("F", "1.0", 5, "e", "v"));
        assert_eq!(report.get("F_1.0").unwrap().ntotal, u64::MAX);
    }

    #[test]
    fn test_distinct_versions_are_distinct_records() {
        let mut report = LicenseReport::new();
        report.upsert_summary(record("F", "1.0", 1, "e", "v"));
        report.upsert_summary(record("F", "2.0", 1, "e", "v"));
        assert_eq!(report.len(), 2);
        assert!(report.contains_key("F_1.0"));
        assert!(report.contains_key("F_2.0"));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut report = LicenseReport::new();
        for name in ["zeta", "alpha", "mid"] {
            report.upsert_summary(record(name, "1", 1, "e", "v"));
        }
        report.upsert_summary(record("alpha", "1", 1, "e", "v"));
        let keys: Vec<&String> = report.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["zeta_1", "alpha_1", "mid_1"]);
    }

    #[test]
    fn test_ensure_feature_does_not_replace_existing() {
        let mut report = LicenseReport::new();
        report.upsert_summary(record("F", "1.0", 5, "e", "v"));
        let existing = report.ensure_feature("F_1.0", || record("F", "1.0", 0, "x", "y"));
        assert_eq!(existing.ntotal, 5);
    }

    #[test]
    fn test_push_usage_missing_key() {
        let mut report = LicenseReport::new();
        assert!(!report.push_usage("nope_1.0", UsageEntry::new("u", "h")));
        report.upsert_summary(record("F", "1.0", 5, "e", "v"));
        assert!(report.push_usage("F_1.0", UsageEntry::new("u", "h")));
        assert_eq!(report.total_used(), 1);
    }

    #[test]
    fn test_serializes_as_keyed_object() {
        let mut report = LicenseReport::new();
        report.upsert_summary(record("85527MAYA_F", "1.000", 5, "2015-01-01 23:59", "adskflex"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["85527MAYA_F_1.000"]["ntotal"], 5);
        assert_eq!(json["85527MAYA_F_1.000"]["usage"], serde_json::json!([]));
    }
}
