use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use crate::config::AdcConfig;
use crate::drivers::RigError;
/// Output path for a converted capture: the input marker in the file name is
/// swapped for the output marker (`datos_x.csv` -> `procesado_x.csv`). Names
/// without the marker get the output marker as a prefix, so the input itself
/// is never the target.
pub fn processed_path(input: &Path, config: &AdcConfig) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let renamed = if !config.input_marker.is_empty() && name.contains(&config.input_marker) {
        name.replace(&config.input_marker, &config.output_marker)
    } else {
        format!("{}{name}", config.output_marker)
    };
    input.with_file_name(renamed)
}
/// Append a voltage column computed from the code column. Returns the number
/// of data rows converted.
pub fn convert_table<R: Read, W: Write>(
    input: R,
    output: W,
    config: &AdcConfig,
) -> Result<usize, RigError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(output);
    let mut headers = reader.headers()?.clone();
    let code_index = headers
        .iter()
        .position(|h| h.trim() == config.code_column)
        .ok_or_else(|| RigError::MissingColumn(config.code_column.clone()))?;
    headers.push_field(&config.voltage_column);
    writer.write_record(&headers)?;
    let mut rows = 0;
    for record in reader.records() {
        let mut record = record?;
        let code = record.get(code_index).unwrap_or("").trim();
        let voltage = if code.is_empty() {
            String::new()
        } else {
            let code: f64 = code.parse().map_err(|_| RigError::InvalidCode {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                value: code.to_owned(),
            })?;
            format!("{:?}", config.code_to_volts(code))
        };
        record.push_field(&voltage);
        writer.write_record(&record)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}
/// Convert the capture at `input`, writing next to it. Returns the output path.
pub fn convert_file(input: &Path, config: &AdcConfig) -> Result<PathBuf, RigError> {
    if !input.exists() {
        return Err(RigError::InputNotFound(input.to_path_buf()));
    }
    let reader = BufReader::new(File::open(input)?);
    // Convert in memory; the output file is only written once the whole table is good.
    let mut converted = Vec::new();
    let rows = convert_table(reader, &mut converted, config)?;
    let output = processed_path(input, config);
    fs::write(&output, converted)?;
    log::debug!("converted {rows} rows from {}", input.display());
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::naming::tests::scratch_dir;
    #[test]
    fn appends_voltage_column() {
        let input = "time,raw\n0,16384\n1,-32768\n2,\n";
        let mut out = Vec::new();
        let rows = convert_table(input.as_bytes(), &mut out, &AdcConfig::default()).unwrap();
        assert_eq!(rows, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "time,raw,voltaje\n0,16384,2.048\n1,-32768,-4.096\n2,,\n"
        );
    }
    #[test]
    fn missing_code_column_is_an_error() {
        let err = convert_table("a,b\n1,2\n".as_bytes(), Vec::new(), &AdcConfig::default())
            .unwrap_err();
        assert!(matches!(err, RigError::MissingColumn(ref c) if c == "raw"));
    }
    #[test]
    fn non_numeric_code_names_the_line() {
        let err = convert_table("raw\n1\nabc\n".as_bytes(), Vec::new(), &AdcConfig::default())
            .unwrap_err();
        assert!(matches!(err, RigError::InvalidCode { line: 3, ref value } if value == "abc"));
    }
    #[test]
    fn output_name_swaps_marker_in_file_name_only() {
        let config = AdcConfig::default();
        assert_eq!(
            processed_path(Path::new("datos_dir/datos_0912.csv"), &config),
            PathBuf::from("datos_dir/procesado_0912.csv")
        );
        assert_eq!(
            processed_path(Path::new("capture.csv"), &config),
            PathBuf::from("procesado_capture.csv")
        );
    }
    #[test]
    fn converts_file_on_disk() {
        let dir = scratch_dir("adc-file");
        let input = dir.join("datos_1.csv");
        fs::write(&input, "raw\n32768\n").unwrap();
        let output = convert_file(&input, &AdcConfig::default()).unwrap();
        assert_eq!(output, dir.join("procesado_1.csv"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "raw,voltaje\n32768,4.096\n");
        assert!(matches!(
            convert_file(&dir.join("datos_2.csv"), &AdcConfig::default()),
            Err(RigError::InputNotFound(_))
        ));
        fs::write(dir.join("datos_3.csv"), "code\n1\n").unwrap();
        assert!(matches!(
            convert_file(&dir.join("datos_3.csv"), &AdcConfig::default()),
            Err(RigError::MissingColumn(_))
        ));
        assert!(!dir.join("procesado_3.csv").exists());
        fs::remove_dir_all(dir).ok();
    }
}
