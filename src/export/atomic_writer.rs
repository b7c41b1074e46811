//! Atomic CSV file writer used by every export.
//!
//! Rows go to a temporary file next to the destination, which replaces the
//! destination on `finish()`. A writer dropped before finishing leaves the
//! previous export untouched and its temporary file is removed.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Writer, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::AppError;

/// Quoting applied to every cell of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Quote only cells that need it (delimiters, quotes, newlines).
    Minimal,
    /// Quote every cell.
    All,
}

impl From<Quoting> for QuoteStyle {
    fn from(quoting: Quoting) -> Self {
        match quoting {
            Quoting::Minimal => QuoteStyle::Necessary,
            Quoting::All => QuoteStyle::Always,
        }
    }
}

/// Writes CSV rows to a temporary file and persists them atomically.
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
    rows: u64,
}

impl AtomicCsvWriter {
    /// Creates a writer targeting `final_path`, creating its parent directory
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CsvExport` if the parent directory cannot be
    /// determined or created, or the temporary file cannot be created.
    pub fn create(final_path: impl AsRef<Path>, quoting: Quoting) -> Result<Self, AppError> {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = final_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                AppError::CsvExport(format!(
                    "Cannot determine parent directory for: {}",
                    final_path.display()
                ))
            })?;

        std::fs::create_dir_all(parent_dir).map_err(|e| {
            AppError::CsvExport(format!(
                "Failed to create directory {}: {}",
                parent_dir.display(),
                e
            ))
        })?;

        let temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| AppError::CsvExport(format!("Failed to create temporary file: {}", e)))?;

        let writer = WriterBuilder::new()
            .quote_style(quoting.into())
            .from_writer(BufWriter::new(temp_file));

        Ok(Self {
            writer,
            final_path,
            rows: 0,
        })
    }

    /// Writes one row (header or data).
    pub fn write_row<I, T>(&mut self, row: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of rows written so far, header included.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flushes all buffers and atomically persists the file.
    ///
    /// Returns the final path on success. On error the temporary file is
    /// cleaned up and the destination is left as it was.
    pub fn finish(self) -> Result<PathBuf, AppError> {
        let buf_writer = self.writer.into_inner().map_err(|e| {
            AppError::CsvExport(format!("Failed to flush CSV writer: {}", e.error()))
        })?;

        let named_temp = buf_writer
            .into_inner()
            .map_err(|e| AppError::CsvExport(format!("Failed to flush buffer: {}", e.error())))?;

        named_temp.persist(&self.final_path).map_err(|e| {
            AppError::CsvExport(format!(
                "Failed to persist file to {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        debug!(
            "[EXPORT] Wrote {} rows to {}",
            self.rows,
            self.final_path.display()
        );
        Ok(self.final_path)
    }
}
