//! Append-only recording of live frames.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use stemsight_core::types::DbId;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// `{patient_id}_{YYYYMMDD}.mp4`. All sessions of one day share a file.
pub fn recording_file_name(patient_id: DbId, date: NaiveDate) -> String {
    format!("{patient_id}_{}.mp4", date.format("%Y%m%d"))
}

/// Open recording file for one broadcaster session.
pub struct Recorder {
    file: File,
    path: PathBuf,
    file_name: String,
    bytes_written: u64,
}

impl Recorder {
    /// Open (or create) today's recording file under `dir` in append mode.
    pub async fn open(dir: &Path, patient_id: DbId) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let file_name = recording_file_name(patient_id, chrono::Utc::now().date_naive());
        let path = dir.join(&file_name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            file,
            path,
            file_name,
            bytes_written: 0,
        })
    }

    pub async fn write(&mut self, frame: &[u8]) -> std::io::Result<()> {
        self.file.write_all(frame).await?;
        self.bytes_written += frame.len() as u64;
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close. Returns the bytes appended during this session.
    pub async fn finish(mut self) -> std::io::Result<u64> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.bytes_written)
    }
}
