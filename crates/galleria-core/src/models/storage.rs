use serde::{Deserialize, Serialize};

use super::file::MediaKind;
use crate::format::format_bytes;

/// Count and byte total for one media kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindUsage {
    pub kind: MediaKind,
    pub file_count: i64,
    pub bytes: i64,
}

/// Raw totals over every file record, active and trashed alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTotals {
    pub file_count: i64,
    pub bytes: i64,
    pub by_kind: Vec<KindUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSummary {
    pub file_count: i64,
    pub remote_bytes: i64,
    pub remote_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_size: Option<String>,
    pub database_size_available: bool,
    pub by_kind: Vec<KindUsage>,
}

impl StorageSummary {
    /// Build the summary. `database_bytes` is `None` when the store would not
    /// report its own footprint.
    pub fn new(totals: FileTotals, database_bytes: Option<i64>) -> Self {
        StorageSummary {
            file_count: totals.file_count,
            remote_bytes: totals.bytes,
            remote_size: format_bytes(totals.bytes.max(0) as u64),
            database_bytes,
            database_size: database_bytes.map(|b| format_bytes(b.max(0) as u64)),
            database_size_available: database_bytes.is_some(),
            by_kind: totals.by_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_database_size() {
        let totals = FileTotals {
            file_count: 2,
            bytes: 1536,
            by_kind: vec![],
        };
        let summary = StorageSummary::new(totals, None);
        assert_eq!(summary.remote_size, "1.50 KB");
        assert!(!summary.database_size_available);
        assert!(summary.database_size.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("database_bytes").is_none());
        assert_eq!(json["database_size_available"], false);
    }

    #[test]
    fn test_summary_with_database_size() {
        let summary = StorageSummary::new(FileTotals::default(), Some(8 * 1024 * 1024));
        assert!(summary.database_size_available);
        assert_eq!(summary.database_size.as_deref(), Some("8.00 MB"));
        assert_eq!(summary.remote_size, "0 B");
    }
}
