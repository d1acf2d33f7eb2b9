use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{CertificateLedgerData, ProgressData};

/// JSON persistence under the user's data directory. Saves go through a
/// temp file and rename so a crash mid-write never leaves a truncated
/// progress file behind.
pub struct ProgressStore {
    base_dir: PathBuf,
}

impl ProgressStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typemaster");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_progress(&self) -> ProgressData {
        let mut data: ProgressData = self.load("progress.json");
        data.normalize();
        data
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save("progress.json", data)
    }

    pub fn load_certificates(&self) -> CertificateLedgerData {
        self.load("certificates.json")
    }

    pub fn save_certificates(&self, data: &CertificateLedgerData) -> Result<()> {
        self.save("certificates.json", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EXERCISES_PER_LEVEL;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_progress_round_trip() {
        let (_dir, store) = make_test_store();
        let mut data = store.load_progress();
        data.mark_completed("Beginner", 0);
        data.mark_completed("Beginner", 7);
        store.save_progress(&data).unwrap();

        let reloaded = store.load_progress();
        assert!(reloaded.is_completed("Beginner", 0));
        assert!(reloaded.is_completed("Beginner", 7));
        assert!(!reloaded.is_completed("Beginner", 1));
        assert_eq!(reloaded.completed_count("Beginner"), 2);
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (_dir, store) = make_test_store();
        let data = store.load_progress();
        assert!(data.tracks.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("progress.json"), "not json {").unwrap();
        let data = store.load_progress();
        assert!(data.tracks.is_empty());
    }

    #[test]
    fn test_load_normalizes_track_lengths() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path("progress.json"),
            r#"{"schema_version":1,"tracks":{"Pro":[true,true]}}"#,
        )
        .unwrap();
        let data = store.load_progress();
        assert_eq!(data.milestones("Pro").len(), EXERCISES_PER_LEVEL);
        assert_eq!(data.completed_count("Pro"), 2);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_progress(&ProgressData::default()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn test_certificate_ledger_round_trip() {
        let (_dir, store) = make_test_store();
        let mut ledger = store.load_certificates();
        assert_eq!(ledger.next_serial, 1000);
        ledger.next_serial = 1002;
        store.save_certificates(&ledger).unwrap();
        assert_eq!(store.load_certificates().next_serial, 1002);
    }
}
