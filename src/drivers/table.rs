use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use crate::drivers::RigError;
/// Sentinel markers recognized at the end of a resistance table. The accented
/// form is what older capture tools wrote.
const SENTINEL_MARKERS: [&str; 2] = ["total lineas:", "total líneas:"];
/// UTF-8 when valid, otherwise Latin-1 (one byte per char).
fn decode_cell(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}
pub fn is_sentinel(cell: &str, configured: &str) -> bool {
    let cell = cell.trim().to_lowercase();
    cell == configured.trim().to_lowercase() || SENTINEL_MARKERS.contains(&cell.as_str())
}
/// A derived resistance table with its sentinel line stripped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResistanceTable {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>, // column -> samples
    declared_rows: Option<usize>,
}
impl ResistanceTable {
    pub fn open(path: &Path, sentinel_label: &str) -> Result<Self, RigError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => RigError::InputNotFound(path.to_path_buf()),
            _ => err.into(),
        })?;
        Self::from_reader(BufReader::new(file), sentinel_label)
    }
    pub fn from_reader<R: Read>(input: R, sentinel_label: &str) -> Result<Self, RigError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode_cell(h).trim().to_owned())
            .collect();
        let mut columns = vec![Vec::new(); headers.len()];
        let mut declared_rows = None;
        for record in reader.byte_records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if !err.is_io_error() => {
                    log::debug!("skipping unreadable row: {err}");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let first = record.get(0).map(decode_cell);
            if first.is_some_and(|cell| is_sentinel(&cell, sentinel_label)) {
                declared_rows = record
                    .get(1)
                    .and_then(|n| decode_cell(n).trim().parse().ok());
                break;
            }
            let values: Option<Vec<f64>> = record
                .iter()
                .map(|field| std::str::from_utf8(field).ok()?.trim().parse::<f64>().ok())
                .collect();
            match values {
                Some(values) if values.len() == headers.len() => {
                    for (column, value) in columns.iter_mut().zip(values) {
                        column.push(value);
                    }
                }
                _ => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    log::debug!("line {line}: not a data row, skipped");
                }
            }
        }
        let table = Self {
            headers,
            columns,
            declared_rows,
        };
        if let Some(declared) = table.declared_rows {
            if declared != table.len() {
                log::warn!(
                    "sentinel declares {declared} rows but {} were read",
                    table.len()
                );
            }
        }
        Ok(table)
    }
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.headers
            .iter()
            .position(|h| h == label)
            .map(|i| self.columns[i].as_slice())
    }
    /// Row count stated by the sentinel line, if the table had one.
    pub fn declared_rows(&self) -> Option<usize> {
        self.declared_rows
    }
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.len()).then(|| self.columns.iter().map(|c| c[index]).collect())
    }
}
