use std::io::Write;
use crate::drivers::{ResistanceRow, RigError};
use crate::types::ResistanceChannel;

/// Writes a resistance table: fixed header, one line per derived row, and a
/// closing sentinel line holding the number of rows written.
pub struct TableRecorder<W: Write> {
    writer: csv::Writer<W>,
    sentinel_label: String,
    rows_written: usize,
}

impl<W: Write> TableRecorder<W> {
    pub fn start(inner: W, sentinel_label: &str) -> Result<Self, RigError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(inner);
        writer.write_record(ResistanceChannel::ALL.iter().map(|c| c.label()))?;
        Ok(Self {
            writer,
            sentinel_label: sentinel_label.to_owned(),
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &ResistanceRow) -> Result<(), RigError> {
        self.writer.serialize(row.values())?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Appends the sentinel line and hands back the flushed inner writer.
    pub fn finish(mut self) -> Result<(usize, W), RigError> {
        let count = self.rows_written.to_string();
        self.writer
            .write_record([self.sentinel_label.as_str(), count.as_str()])?;
        self.writer.flush()?;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| RigError::Io(e.into_error()))?;
        Ok((self.rows_written, inner))
    }
}
