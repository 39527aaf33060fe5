//! Snapshot storage for collected region records.
//!
//! A run produces exactly one file, `region_<YYYYMMDD>.json`, holding every
//! record as a pretty-printed JSON array (2-space indent, non-ASCII text kept
//! literally). The file is staged in the output directory and renamed into
//! place, so readers never observe a half-written snapshot. A snapshot from
//! earlier the same day is overwritten.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::error::{FetchError, Result};
use crate::model::RegionRecord;

/// File name prefix for snapshots.
const SNAPSHOT_PREFIX: &str = "region_";

/// Snapshot file name for a date, e.g. `region_20240131.json`.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("{SNAPSHOT_PREFIX}{}.json", date.format("%Y%m%d"))
}

/// Writes dated snapshots into one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    output_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the snapshot for `date` is written to.
    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(snapshot_file_name(date))
    }

    /// Write all records as the snapshot for `date` and return its path.
    ///
    /// Creates the output directory (and parents) if absent.
    pub fn write(&self, date: NaiveDate, records: &[RegionRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| FetchError::filesystem(&self.output_dir, e))?;

        let path = self.snapshot_path(date);
        let staged = NamedTempFile::new_in(&self.output_dir)
            .map_err(|e| FetchError::filesystem(&self.output_dir, e))?;

        {
            let mut writer = BufWriter::new(staged.as_file());
            serde_json::to_writer_pretty(&mut writer, records)
                .map_err(|e| FetchError::filesystem(staged.path(), e.into()))?;
            writer
                .flush()
                .map_err(|e| FetchError::filesystem(staged.path(), e))?;
        }

        staged
            .persist(&path)
            .map_err(|e| FetchError::filesystem(&path, e.error))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_snapshot_file_name() {
        assert_eq!(snapshot_file_name(date(2024, 1, 5)), "region_20240105.json");
        assert_eq!(snapshot_file_name(date(2026, 10, 19)), "region_20261019.json");
    }

    #[test]
    fn test_write_creates_nested_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp.path().join("assets").join("data"));

        let path = store.write(date(2024, 3, 1), &[json!({"a": 1})]).unwrap();

        assert_eq!(path, temp.path().join("assets/data/region_20240301.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_write_format() {
        let temp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp.path());
        let records = vec![json!({"region_cd": "1100000000", "locatadd_nm": "서울특별시"})];

        let path = store.write(date(2024, 3, 1), &records).unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert_eq!(
            text,
            "[\n  {\n    \"region_cd\": \"1100000000\",\n    \"locatadd_nm\": \"서울특별시\"\n  }\n]"
        );
    }

    #[test]
    fn test_write_overwrites_same_day() {
        let temp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp.path());
        let day = date(2024, 3, 1);

        store.write(day, &[json!(1), json!(2)]).unwrap();
        let path = store.write(day, &[json!(3)]).unwrap();

        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, vec![json!(3)]);
        // Only the snapshot remains; no staged files left behind.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = SnapshotStore::new(&blocker)
            .write(date(2024, 3, 1), &[])
            .unwrap_err();

        assert_eq!(err.kind(), "filesystem");
    }
}
