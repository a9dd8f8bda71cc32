//! Output file naming for derived tables and discovery of the newest capture.
//!
//! Tables are named `{DDMMYYYY}_Ensayo_{n}.csv`, where `n` starts at one more
//! than the number of tables already produced that day. The file is claimed
//! with create-new semantics, so an existing name is never overwritten.
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use chrono::NaiveDate;
use crate::drivers::RigError;
const RUN_TAG: &str = "Ensayo";
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}
pub fn output_file_name(date: NaiveDate, sequence: usize) -> String {
    format!("{}_{RUN_TAG}_{sequence}.csv", date_stamp(date))
}
fn is_same_day_table(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".csv"))
        .is_some()
}
/// Number of tables already present in `dir` for `date`.
pub fn count_same_day(dir: &Path, date: NaiveDate) -> Result<usize, RigError> {
    let prefix = format!("{}_{RUN_TAG}_", date_stamp(date));
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_same_day_table(name, &prefix) {
                count += 1;
            }
        }
    }
    Ok(count)
}
/// Create `dir` if needed and claim the next free table name for `date`.
pub fn claim_output_file(dir: &Path, date: NaiveDate) -> Result<(PathBuf, File), RigError> {
    fs::create_dir_all(dir)?;
    let mut sequence = count_same_day(dir, date)? + 1;
    loop {
        let path = dir.join(output_file_name(date, sequence));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{} already exists, trying next sequence", path.display());
                sequence += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
/// Most recently modified `*.csv` file directly inside `dir`.
pub fn latest_csv(dir: &Path) -> Result<Option<PathBuf>, RigError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv || !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    /// Fresh, empty directory under the system temp dir.
    pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "ensayo-{tag}-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
    #[test]
    fn name_uses_day_month_year() {
        assert_eq!(output_file_name(day(3, 7, 2025), 1), "03072025_Ensayo_1.csv");
        assert_eq!(output_file_name(day(31, 12, 2024), 12), "31122024_Ensayo_12.csv");
    }
    #[test]
    fn sequence_increases_within_a_day_and_restarts_next_day() {
        let dir = scratch_dir("naming-seq");
        let today = day(19, 10, 2026);
        let (first, _) = claim_output_file(&dir, today).unwrap();
        let (second, _) = claim_output_file(&dir, today).unwrap();
        assert!(first.ends_with("19102026_Ensayo_1.csv"));
        assert!(second.ends_with("19102026_Ensayo_2.csv"));
        let (tomorrow, _) = claim_output_file(&dir, day(20, 10, 2026)).unwrap();
        assert!(tomorrow.ends_with("20102026_Ensayo_1.csv"));
        assert_eq!(count_same_day(&dir, today).unwrap(), 2);
        fs::remove_dir_all(dir).ok();
    }
    #[test]
    fn gap_in_sequence_never_overwrites() {
        let dir = scratch_dir("naming-gap");
        let today = day(1, 2, 2026);
        // Only #2 exists: count says 1, so #2 is tried first and must be skipped.
        fs::write(dir.join("01022026_Ensayo_2.csv"), "keep").unwrap();
        let (path, _) = claim_output_file(&dir, today).unwrap();
        assert!(path.ends_with("01022026_Ensayo_3.csv"));
        assert_eq!(fs::read_to_string(dir.join("01022026_Ensayo_2.csv")).unwrap(), "keep");
        fs::remove_dir_all(dir).ok();
    }
    #[test]
    fn output_dir_is_created() {
        let dir = scratch_dir("naming-mkdir").join("nested").join("out");
        let (path, _) = claim_output_file(&dir, day(5, 5, 2025)).unwrap();
        assert!(path.exists());
        fs::remove_dir_all(dir.parent().unwrap().parent().unwrap()).ok();
    }
    #[test]
    fn other_files_do_not_count() {
        let dir = scratch_dir("naming-other");
        let today = day(9, 9, 2025);
        fs::write(dir.join("09092025_Ensayo_1.txt"), "").unwrap();
        fs::write(dir.join("08092025_Ensayo_1.csv"), "").unwrap();
        fs::write(dir.join("notes.csv"), "").unwrap();
        assert_eq!(count_same_day(&dir, today).unwrap(), 0);
        fs::remove_dir_all(dir).ok();
    }
    #[test]
    fn latest_csv_ignores_other_extensions() {
        let dir = scratch_dir("naming-latest");
        assert_eq!(latest_csv(&dir).unwrap(), None);
        fs::write(dir.join("readme.txt"), "").unwrap();
        assert_eq!(latest_csv(&dir).unwrap(), None);
        fs::write(dir.join("capture.csv"), "").unwrap();
        assert_eq!(latest_csv(&dir).unwrap(), Some(dir.join("capture.csv")));
        fs::remove_dir_all(dir).ok();
    }
}
