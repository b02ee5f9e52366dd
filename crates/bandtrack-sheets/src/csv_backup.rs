//! Local CSV fallback for runs where the spreadsheet write fails.
//!
//! Backups carry only the headers and data rows; the banner lives in the
//! timestamped filename instead.

use std::path::{Path, PathBuf};

use tracing::info;

use bandtrack_core::rows::RowTable;

use crate::error::BackupError;

/// Writes row tables as timestamped CSV files under a backup directory.
pub struct CsvBackup {
    dir: PathBuf,
}

impl CsvBackup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the table and returns the path of the created file.
    ///
    /// The filename is the table title with spaces replaced by underscores,
    /// suffixed with the table's update timestamp.
    pub fn write(&self, table: &RowTable) -> Result<PathBuf, BackupError> {
        std::fs::create_dir_all(&self.dir)?;

        let stem = table.title.replace(' ', "_");
        let path = self
            .dir
            .join(format!("{}_{}.csv", stem, table.updated_at.format_file_stamp()));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = table.rows.len(), "wrote CSV backup");
        Ok(path)
    }

    /// Reads a backup file back as headers plus data rows.
    pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), BackupError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_owned).collect());
        }
        Ok((headers, rows))
    }
}
