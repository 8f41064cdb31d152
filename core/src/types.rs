//! Record type definitions for license usage modeling.
//!
//! This module defines the data model produced by parsing license manager
//! status output. Field names are part of the output contract: consumers
//! read `feature`, `version`, `ntotal`, `expires`, `vendor`, `nused` and
//! `usage` from every record, and `userid`, `host`, `pid`, `start`,
//! `sw_version` and `lm_version` from every usage entry.

use serde::{Deserialize, Serialize};

/// Builds the identity key of a feature record.
///
/// The key is the plain textual concatenation `feature + "_" + version`.
/// Distinct grants sharing a name and version collapse onto one key.
///
/// # Examples
///
/// ```
/// use lminfo_core::feature_key;
///
/// assert_eq!(feature_key("85527MAYA_F", "1.000"), "85527MAYA_F_1.000");
/// ```
pub fn feature_key(feature: &str, version: &str) -> String {
    format!("{feature}_{version}")
}

/// One active checkout of a feature.
///
/// # Examples
///
/// ```
/// use lminfo_core::UsageEntry;
///
/// let entry = UsageEntry::new("someguy", "ahost")
///     .with_pid("7581")
///     .with_versions("1.000", "1.000")
///     .with_start("2026-09-12 09:08 (Saturday)");
/// assert_eq!(entry.host, "ahost");
/// assert_eq!(entry.lm_version, "1.000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// User holding the seat.
    pub userid: String,
    /// Short host name (domain suffix stripped).
    pub host: String,
    /// Process id or handle as printed by the license server.
    pub pid: String,
    /// Canonical start timestamp, `YYYY-MM-DD HH:MM (Weekday)`.
    pub start: String,
    /// Version requested by the checked-out software.
    pub sw_version: String,
    /// Version of the license grant the seat was served from.
    pub lm_version: String,
}

impl UsageEntry {
    /// Creates an entry for a user on a host with all other fields empty.
    pub fn new(userid: &str, host: &str) -> Self {
        Self {
            userid: userid.to_string(),
            host: host.to_string(),
            ..Self::default()
        }
    }

    /// Sets the process id.
    pub fn with_pid(mut self, pid: &str) -> Self {
        self.pid = pid.to_string();
        self
    }

    /// Sets the software and license-manager versions.
    pub fn with_versions(mut self, sw_version: &str, lm_version: &str) -> Self {
        self.sw_version = sw_version.to_string();
        self.lm_version = lm_version.to_string();
        self
    }

    /// Sets the canonical start timestamp.
    pub fn with_start(mut self, start: &str) -> Self {
        self.start = start.to_string();
        self
    }
}

/// Aggregate record for one feature/version pair.
///
/// `nused` is kept equal to `usage.len()` by [`FeatureRecord::push_usage`];
/// fields are public for serialization and inspection, so code that pushes
/// onto `usage` directly is responsible for the count.
///
/// # Examples
///
/// ```
/// use lminfo_core::{FeatureRecord, UsageEntry};
///
/// let mut record = FeatureRecord::new("85527MAYAF", "1.000", 5, "9999-12-31 23:59", "adskflex");
/// assert_eq!(record.key(), "85527MAYAF_1.000");
/// assert_eq!(record.nused, 0);
///
/// record.push_usage(UsageEntry::new("someguy", "ahost"));
/// assert_eq!(record.nused, 1);
/// assert_eq!(record.available(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Feature name as printed by the license server.
    pub feature: String,
    /// Feature version.
    pub version: String,
    /// Total number of licenses granted, summed across duplicate grants.
    pub ntotal: u64,
    /// Canonical expiration, `YYYY-MM-DD HH:MM`.
    pub expires: String,
    /// Vendor daemon name.
    pub vendor: String,
    /// Number of seats in use.
    pub nused: u64,
    /// Active checkouts in the order they were listed.
    pub usage: Vec<UsageEntry>,
}

impl FeatureRecord {
    /// Creates a record with no seats in use.
    pub fn new(feature: &str, version: &str, ntotal: u64, expires: &str, vendor: &str) -> Self {
        Self {
            feature: feature.to_string(),
            version: version.to_string(),
            ntotal,
            expires: expires.to_string(),
            vendor: vendor.to_string(),
            nused: 0,
            usage: Vec::new(),
        }
    }

    /// Returns the identity key (`feature_version`).
    pub fn key(&self) -> String {
        feature_key(&self.feature, &self.version)
    }

    /// Appends a usage entry and bumps the used count.
    pub fn push_usage(&mut self, entry: UsageEntry) {
        self.usage.push(entry);
        self.nused += 1;
    }

    /// Seats still free. Saturates at zero when more seats are in use than
    /// the summary granted (e.g. records created from details only).
    pub fn available(&self) -> u64 {
        self.ntotal.saturating_sub(self.nused)
    }
}
