//! CSV export of an averaged series

use crate::error::{Result, ResultExt};
use crate::types::AveragedSeries;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of exported files
pub const CSV_HEADER: &str = "time,brightness";

/// Timestamp format of exported rows
pub const CSV_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write `series` as CSV, one row per point
pub fn write_csv<W: Write>(series: &AveragedSeries, mut writer: W) -> Result<W> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for point in &series.points {
        writeln!(
            writer,
            "{},{}",
            point.timestamp.format(CSV_TIME_FORMAT),
            point.value
        )?;
    }
    writer.flush()?;
    Ok(writer)
}

/// Write `series` as CSV to the file at `path`
pub fn export_csv(series: &AveragedSeries, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("can't write {}", path.display()))?;
    write_csv(series, BufWriter::new(file))?;
    tracing::info!("Exported {} points to {}", series.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::reduce;
    use crate::types::{DumpTrailer, SampleSeries};

    #[test]
    fn test_csv_rows() {
        let raw = SampleSeries::new(vec![10, 11, 12, 13], DumpTrailer::default());
        let bytes = write_csv(&reduce(&raw, 2).unwrap(), Vec::new()).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "time,brightness\n2022-01-01 00:00:00,10\n2022-01-01 00:00:30,12\n"
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        export_csv(&AveragedSeries::default(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "time,brightness\n");
    }
}
