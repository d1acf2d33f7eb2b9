use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ProgressStore;

/// What the host hands over after a timed test: the name the user entered
/// on the results screen plus the figures to print.
#[derive(Clone, Debug)]
pub struct CertificateRequest {
    pub display_name: String,
    pub wpm: u32,
    pub net_wpm: u32,
    pub duration_minutes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub serial: u32,
    pub display_name: String,
    pub wpm: u32,
    pub net_wpm: u32,
    pub duration_minutes: u32,
    pub issued_at: DateTime<Utc>,
}

/// Issue a certificate: assign the next serial, write the plain-text file
/// into the data dir, and persist the updated ledger. The serial advances
/// only when the export succeeds, so a failed write never burns a number.
pub fn issue(store: &ProgressStore, request: &CertificateRequest) -> Result<(CertificateRecord, PathBuf)> {
    let mut ledger = store.load_certificates();
    let record = CertificateRecord {
        serial: ledger.next_serial,
        display_name: request.display_name.trim().to_string(),
        wpm: request.wpm,
        net_wpm: request.net_wpm,
        duration_minutes: request.duration_minutes,
        issued_at: Utc::now(),
    };

    let path = store.file_path(&format!("certificate-{}.txt", record.serial));
    fs::write(&path, render(&record))?;

    ledger.next_serial += 1;
    ledger.issued.push(record.clone());
    store.save_certificates(&ledger)?;

    Ok((record, path))
}

pub fn render(record: &CertificateRecord) -> String {
    let name = if record.display_name.is_empty() {
        "Anonymous Typist"
    } else {
        &record.display_name
    };
    format!(
        "\
+----------------------------------------------------------+
|              CERTIFICATE OF ACHIEVEMENT                  |
+----------------------------------------------------------+

  This certifies that

      {name}

  completed a {duration}-minute typing test at

      {wpm} words per minute ({net} WPM net of errors)

  Issued on {date}
  Certificate No. {serial}
",
        name = name,
        duration = record.duration_minutes,
        wpm = record.wpm,
        net = record.net_wpm,
        date = record.issued_at.format("%B %-d, %Y"),
        serial = record.serial,
    )
}
