//! # Source Snapshot
//!
//! Model source texts keyed by model name, captured once per extraction.
//! Files that cannot be read are recorded as skipped instead of failing the load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::error::TimelineError;

/// A model left out of extraction, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUnit {
    pub unit: String,
    pub reason: String,
}

impl From<&SkippedUnit> for TimelineError {
    fn from(skipped: &SkippedUnit) -> Self {
        TimelineError::parse_skipped(&skipped.unit, &skipped.reason)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    units: BTreeMap<String, String>,
    skipped: Vec<SkippedUnit>,
}

impl SourceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read each `.sql` file, naming the model after the file stem
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut snapshot = Self::new();
        for path in paths {
            snapshot.load_file(path.as_ref());
        }
        snapshot
    }

    fn load_file(&mut self, path: &Path) {
        let Some(unit) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            self.skip(path.display().to_string(), "path has no usable file name");
            return;
        };

        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.units.insert(unit, text);
            }
            Err(e) => self.skip(unit, format!("{}: {e}", path.display())),
        }
    }

    fn skip(&mut self, unit: String, reason: impl Into<String>) {
        let skipped = SkippedUnit {
            unit,
            reason: reason.into(),
        };
        warn!(error = %TimelineError::from(&skipped), "Model source unreadable");
        self.skipped.push(skipped);
    }

    /// Add or replace one model's source text
    pub fn insert(&mut self, unit: impl Into<String>, text: impl Into<String>) {
        self.units.insert(unit.into(), text.into());
    }

    pub fn with_unit(mut self, unit: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(unit, text);
        self
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &str)> {
        self.units.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn skipped(&self) -> &[SkippedUnit] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceSnapshot {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (unit, text) in iter {
            snapshot.insert(unit, text);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_paths_names_units_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let orders = dir.path().join("stg_orders.sql");
        fs::write(&orders, "select * from {{ source('raw', 'orders') }}").unwrap();

        let snapshot = SourceSnapshot::from_paths([&orders]);
        assert_eq!(snapshot.len(), 1);
        let (unit, text) = snapshot.units().next().unwrap();
        assert_eq!(unit, "stg_orders");
        assert!(text.contains("source('raw', 'orders')"));
        assert!(snapshot.skipped().is_empty());
    }

    #[test]
    fn test_unreadable_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.sql");
        fs::write(&good, "select 1").unwrap();
        let missing = dir.path().join("missing.sql");
        let binary = dir.path().join("binary.sql");
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let snapshot = SourceSnapshot::from_paths([&good, &missing, &binary]);

        assert_eq!(snapshot.len(), 1);
        let skipped: Vec<_> = snapshot.skipped().iter().map(|s| s.unit.as_str()).collect();
        assert_eq!(skipped, vec!["missing", "binary"]);
    }

    #[test]
    fn test_collect_from_pairs() {
        let snapshot: SourceSnapshot = [("a", "select 1"), ("b", "select 2")].into_iter().collect();
        assert_eq!(snapshot.len(), 2);
    }
}
