//! Resistance derivation for the four-electrode rig.
//!
//! Electrode C1 sits across the reference (shunt) resistor, so the loop current is
//! `I = C1 / reference_ohms`. Every derived column is the voltage difference
//! between two electrodes divided by that current:
//!
//! | column | difference |
//! |--------|------------|
//! | R1     | C2 - C1    |
//! | R2     | C3 - C2    |
//! | R3     | C4 - C3    |
//! | R4     | C3 - C1    |
//! | R5     | C4 - C1    |
//! | R6     | C4 - C2    |
//!
//! Rows that cannot be used (non-numeric fields, wrong width, `C1 == 0`) are
//! skipped with a reason instead of failing the whole table.
use std::io::{Read, Write};
use crate::config::DeriverConfig;
use crate::drivers::RigError;
use crate::recorder::TableRecorder;
use crate::types::ResistanceChannel;
/// Four electrode voltages of one sample, `[C1, C2, C3, C4]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSample(pub [f64; 4]);
/// Six derived resistances of one sample, ordered R1..R6.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResistanceRow(pub [f64; 6]);
impl ResistanceRow {
    pub fn values(&self) -> [f64; 6] {
        self.0
    }
    pub fn get(&self, channel: ResistanceChannel) -> f64 {
        self.0[channel as usize]
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// C1 is zero, so the reference current is undefined.
    ZeroDivisor,
    /// Not exactly four numeric fields.
    Malformed,
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleOutcome {
    Parsed(ResistanceRow),
    Skipped(SkipReason),
}
/// Counts reported after a table has been derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeriveSummary {
    pub rows_written: usize,
    pub skipped_zero_divisor: usize,
    pub skipped_malformed: usize,
}
impl RawSample {
    /// Parse one CSV record. Fields are trimmed before conversion.
    pub fn parse<'a>(fields: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut values = [0.0; 4];
        let mut count = 0;
        for field in fields {
            if count == values.len() {
                return None;
            }
            values[count] = field.trim().parse::<f64>().ok()?;
            count += 1;
        }
        (count == values.len()).then_some(RawSample(values))
    }
    /// Reference current through the shunt, or `None` when C1 is zero.
    pub fn current(&self, reference_ohms: f64) -> Option<f64> {
        let c1 = self.0[0];
        (c1 != 0.0).then(|| c1 / reference_ohms)
    }
    pub fn resistances(&self, reference_ohms: f64) -> Option<ResistanceRow> {
        let current = self.current(reference_ohms)?;
        let mut values = [0.0; 6];
        for (slot, channel) in values.iter_mut().zip(ResistanceChannel::ALL) {
            let (high, low) = channel.electrodes();
            *slot = (self.0[high.index()] - self.0[low.index()]) / current;
        }
        Some(ResistanceRow(values))
    }
}
/// Classify one raw record.
pub fn derive_record<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    reference_ohms: f64,
) -> SampleOutcome {
    let Some(sample) = RawSample::parse(fields) else {
        return SampleOutcome::Skipped(SkipReason::Malformed);
    };
    match sample.resistances(reference_ohms) {
        Some(row) => SampleOutcome::Parsed(row),
        None => SampleOutcome::Skipped(SkipReason::ZeroDivisor),
    }
}
/// Derive a complete resistance table from a raw capture.
///
/// The first record of `input` is the capture header and is consumed without
/// being interpreted; a capture without one is [`RigError::EmptyCapture`].
/// Returns the writer back once the sentinel line has been written and flushed.
pub fn derive_table<R: Read, W: Write>(
    input: R,
    output: W,
    config: &DeriverConfig,
) -> Result<(DeriveSummary, W), RigError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    if reader.byte_headers()?.is_empty() {
        return Err(RigError::EmptyCapture);
    }
    let mut recorder = TableRecorder::start(output, &config.sentinel_label)?;
    let mut summary = DeriveSummary::default();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if !err.is_io_error() => {
                log::debug!("skipping unreadable record: {err}");
                summary.skipped_malformed += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        match derive_record(record.iter(), config.reference_ohms) {
            SampleOutcome::Parsed(row) => recorder.write_row(&row)?,
            SampleOutcome::Skipped(SkipReason::ZeroDivisor) => {
                log::debug!("line {line}: C1 is zero, skipped");
                summary.skipped_zero_divisor += 1;
            }
            SampleOutcome::Skipped(SkipReason::Malformed) => {
                log::debug!("line {line}: malformed sample, skipped");
                summary.skipped_malformed += 1;
            }
        }
    }
    let (rows_written, output) = recorder.finish()?;
    summary.rows_written = rows_written;
    Ok((summary, output))
}
#[cfg(test)]
mod tests {
    use super::*;
    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
    #[test]
    fn unit_ramp_matches_hand_computation() {
        let outcome = derive_record(["1", "2", "3", "4"], 10.0);
        let SampleOutcome::Parsed(row) = outcome else {
            panic!("expected a parsed row, got {outcome:?}");
        };
        let expected = [10.0, 10.0, 10.0, 20.0, 30.0, 20.0];
        for (got, want) in row.values().iter().zip(expected) {
            assert!(approx(*got, want), "{got} != {want}");
        }
        assert!(approx(row.get(ResistanceChannel::R5), 30.0));
    }
    #[test]
    fn resistances_follow_difference_over_current() {
        let sample = RawSample([0.5, 1.25, 2.0, 4.5]);
        let current = 0.5 / 10.0;
        let row = sample.resistances(10.0).unwrap();
        let [c1, c2, c3, c4] = sample.0;
        let expected = [
            (c2 - c1) / current,
            (c3 - c2) / current,
            (c4 - c3) / current,
            (c3 - c1) / current,
            (c4 - c1) / current,
            (c4 - c2) / current,
        ];
        assert_eq!(row.values(), expected);
    }
    #[test]
    fn zero_first_electrode_is_skipped() {
        assert_eq!(
            derive_record(["0", "5", "6", "7"], 10.0),
            SampleOutcome::Skipped(SkipReason::ZeroDivisor)
        );
        assert_eq!(
            derive_record(["-0.0", "5", "6", "7"], 10.0),
            SampleOutcome::Skipped(SkipReason::ZeroDivisor)
        );
    }
    #[test]
    fn malformed_records_are_skipped() {
        for fields in [
            vec!["1", "2", "x", "4"],
            vec!["1", "2", "3"],
            vec!["1", "2", "3", "4", "5"],
            vec!["", "2", "3", "4"],
        ] {
            assert_eq!(
                derive_record(fields.iter().copied(), 10.0),
                SampleOutcome::Skipped(SkipReason::Malformed),
                "{fields:?}"
            );
        }
    }
    #[test]
    fn whitespace_around_numbers_is_accepted() {
        assert!(matches!(
            derive_record([" 1.0", "2.0 ", " 3", "4"], 10.0),
            SampleOutcome::Parsed(_)
        ));
    }
    #[test]
    fn table_counts_only_written_rows() {
        let input = "C1,C2,C3,C4\n1,2,3,4\n0,5,6,7\nabc,1,2,3\n2,2,2,2\n1,2\n";
        let (summary, output) =
            derive_table(input.as_bytes(), Vec::new(), &DeriverConfig::default()).unwrap();
        assert_eq!(
            summary,
            DeriveSummary {
                rows_written: 2,
                skipped_zero_divisor: 1,
                skipped_malformed: 2,
            }
        );
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("R1 (C2-C1),"));
        assert_eq!(lines[2], "0.0,0.0,0.0,0.0,0.0,0.0");
        assert_eq!(lines[3], "Total lineas:,2");
    }
    #[test]
    fn non_utf8_row_is_skipped_as_malformed() {
        let input = b"C1,C2,C3,C4\n1,2,3,4\n\xFF,2,3,4\n1,1,1,1\n";
        let (summary, output) =
            derive_table(&input[..], Vec::new(), &DeriverConfig::default()).unwrap();
        assert_eq!(summary.rows_written, 2);
        assert_eq!(summary.skipped_malformed, 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("Total lineas:,2\n"));
    }
    #[test]
    fn header_only_capture_yields_zero_count() {
        let (summary, output) =
            derive_table("a,b,c,d\n".as_bytes(), Vec::new(), &DeriverConfig::default()).unwrap();
        assert_eq!(summary.rows_written, 0);
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("Total lineas:,0\n"));
    }
    #[test]
    fn capture_without_header_is_rejected() {
        assert!(matches!(
            derive_table("".as_bytes(), Vec::new(), &DeriverConfig::default()),
            Err(RigError::EmptyCapture)
        ));
    }
    #[test]
    fn reference_resistor_is_configurable() {
        let config = DeriverConfig {
            reference_ohms: 100.0,
            ..DeriverConfig::default()
        };
        let (_, output) = derive_table("h\n1,2,3,4\n".as_bytes(), Vec::new(), &config).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().nth(1), Some("100.0,100.0,100.0,200.0,300.0,200.0"));
    }
}
