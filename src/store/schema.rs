use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::EXERCISES_PER_LEVEL;
use crate::certificate::CertificateRecord;

const SCHEMA_VERSION: u32 = 1;

/// First serial number ever issued; the ledger counts up from here.
pub const FIRST_CERTIFICATE_SERIAL: u32 = 1000;

/// Per-track completion milestones: track name to one flag per exercise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub tracks: HashMap<String, Vec<bool>>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tracks: HashMap::new(),
        }
    }
}

impl ProgressData {
    /// Force every track to exactly one flag per exercise. Short vectors
    /// from older files pad with false; long ones truncate. Run on every
    /// load so the rest of the app can index without bounds checks.
    pub fn normalize(&mut self) {
        for flags in self.tracks.values_mut() {
            flags.resize(EXERCISES_PER_LEVEL, false);
        }
    }

    pub fn is_completed(&self, track: &str, index: usize) -> bool {
        self.tracks
            .get(track)
            .and_then(|flags| flags.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn mark_completed(&mut self, track: &str, index: usize) {
        if index >= EXERCISES_PER_LEVEL {
            return;
        }
        let flags = self
            .tracks
            .entry(track.to_string())
            .or_insert_with(|| vec![false; EXERCISES_PER_LEVEL]);
        flags[index] = true;
    }

    pub fn completed_count(&self, track: &str) -> usize {
        self.tracks
            .get(track)
            .map(|flags| flags.iter().filter(|done| **done).count())
            .unwrap_or(0)
    }

    pub fn milestones(&self, track: &str) -> Vec<bool> {
        self.tracks
            .get(track)
            .cloned()
            .unwrap_or_else(|| vec![false; EXERCISES_PER_LEVEL])
    }
}

/// Issued certificates plus the serial counter, persisted together so a
/// serial is never reused even across reinstalls of the progress file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CertificateLedgerData {
    pub schema_version: u32,
    pub next_serial: u32,
    pub issued: Vec<CertificateRecord>,
}

impl Default for CertificateLedgerData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_serial: FIRST_CERTIFICATE_SERIAL,
            issued: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_and_truncates() {
        let mut data = ProgressData::default();
        data.tracks.insert("Beginner".to_string(), vec![true; 3]);
        data.tracks
            .insert("Master".to_string(), vec![true; EXERCISES_PER_LEVEL + 20]);
        data.normalize();

        assert_eq!(data.tracks["Beginner"].len(), EXERCISES_PER_LEVEL);
        assert_eq!(data.tracks["Master"].len(), EXERCISES_PER_LEVEL);
        assert_eq!(data.completed_count("Beginner"), 3);
        assert_eq!(data.completed_count("Master"), EXERCISES_PER_LEVEL);
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let mut data = ProgressData::default();
        data.mark_completed("Pro", 42);
        data.mark_completed("Pro", 42);
        assert!(data.is_completed("Pro", 42));
        assert_eq!(data.completed_count("Pro"), 1);
    }

    #[test]
    fn test_mark_completed_ignores_out_of_range_index() {
        let mut data = ProgressData::default();
        data.mark_completed("Pro", EXERCISES_PER_LEVEL);
        assert_eq!(data.completed_count("Pro"), 0);
    }

    #[test]
    fn test_unknown_track_reads_as_untouched() {
        let data = ProgressData::default();
        assert!(!data.is_completed("Advanced", 0));
        assert_eq!(data.completed_count("Advanced"), 0);
        assert_eq!(data.milestones("Advanced").len(), EXERCISES_PER_LEVEL);
    }

    #[test]
    fn test_ledger_defaults_start_at_first_serial() {
        let ledger = CertificateLedgerData::default();
        assert_eq!(ledger.next_serial, FIRST_CERTIFICATE_SERIAL);
        assert!(ledger.issued.is_empty());
    }
}
