use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use crate::config::DeriverConfig;
use crate::drivers::naming::{claim_output_file, latest_csv};
use crate::drivers::resistance::{derive_table, DeriveSummary};
use crate::drivers::RigError;
/// A produced resistance table.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedTable {
    pub path: PathBuf,
    pub summary: DeriveSummary,
}
/// File-level resistance pipeline: raw capture in, dated table out.
pub struct ResistanceDeriver {
    config: DeriverConfig,
}
impl ResistanceDeriver {
    pub fn new(config: DeriverConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &DeriverConfig {
        &self.config
    }
    pub fn try_derive(&self, input: &Path, date: NaiveDate) -> Result<DerivedTable, RigError> {
        // Open the capture before claiming a name so a bad input leaves no file behind.
        let reader = match File::open(input) {
            Ok(file) => BufReader::new(file),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RigError::InputNotFound(input.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };
        // Whole table is built in memory; a name is claimed only once it is complete.
        let (summary, table) = derive_table(reader, Vec::new(), &self.config)?;
        let (path, mut file) = claim_output_file(&self.config.output_dir, date)?;
        file.write_all(&table)?;
        file.flush()?;
        Ok(DerivedTable { path, summary })
    }
    /// Derive `input`, logging any failure. `None` means no file was produced.
    pub fn derive(&self, input: &Path, date: NaiveDate) -> Option<DerivedTable> {
        match self.try_derive(input, date) {
            Ok(table) => {
                log::info!(
                    "generated {} ({} rows, {} zero-divisor, {} malformed skipped)",
                    table.path.display(),
                    table.summary.rows_written,
                    table.summary.skipped_zero_divisor,
                    table.summary.skipped_malformed
                );
                Some(table)
            }
            Err(err) => {
                log::error!("could not process {}: {err}", input.display());
                None
            }
        }
    }
    /// Derive the most recently modified capture in the input directory.
    pub fn derive_latest(&self, date: NaiveDate) -> Option<DerivedTable> {
        match latest_csv(&self.config.input_dir) {
            Ok(Some(input)) => self.derive(&input, date),
            Ok(None) => {
                log::warn!(
                    "no CSV files in {} to process",
                    self.config.input_dir.display()
                );
                None
            }
            Err(err) => {
                log::error!(
                    "could not list {}: {err}",
                    self.config.input_dir.display()
                );
                None
            }
        }
    }
}
