//! On-disk layout of a dump
//!
//! A dump file is byte-identical to the body of the device's dump reply:
//! zero or more data lines, one blank line, one trailer line. Every writer of
//! that layout goes through [`DumpWriter`] so files from any run stay readable
//! by any later run.

use crate::error::Result;
use crate::types::SampleSeries;
use std::io::Write;

/// Words per data line the firmware emits
pub const FIRMWARE_WORDS_PER_LINE: usize = 16;

/// Writes data lines and the trailer in dump file layout
#[derive(Debug)]
pub struct DumpWriter<W: Write> {
    inner: W,
    data_lines: usize,
}

impl<W: Write> DumpWriter<W> {
    /// Wrap a destination
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            data_lines: 0,
        }
    }

    /// Append one data line verbatim
    pub fn write_data_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.inner, "{}", line)?;
        self.data_lines += 1;
        Ok(())
    }

    /// Append the blank separator and the trailer line
    pub fn write_trailer(&mut self, trailer: &str) -> Result<()> {
        write!(self.inner, "\n{}\n", trailer)?;
        Ok(())
    }

    /// Data lines written so far
    pub fn data_lines(&self) -> usize {
        self.data_lines
    }

    /// Flush the destination without giving it up
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the destination
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Format sample words the way the firmware prints them (`0x%04x`)
pub fn format_data_line(words: &[u32]) -> String {
    words
        .iter()
        .map(|w| format!("0x{:04x}", w))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SampleSeries {
    /// Render this series as a dump file
    pub fn write_dump<W: Write>(&self, dest: W, words_per_line: usize) -> Result<W> {
        let mut writer = DumpWriter::new(dest);
        for chunk in self.values.chunks(words_per_line.max(1)) {
            writer.write_data_line(&format_data_line(chunk))?;
        }
        writer.write_trailer(&self.trailer.to_string())?;
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DumpTrailer;

    #[test]
    fn test_layout() {
        let mut writer = DumpWriter::new(Vec::new());
        writer.write_data_line("0x0001 0x0002").unwrap();
        writer.write_data_line("0x0003").unwrap();
        writer.write_trailer("20220101 000000 000015 3").unwrap();
        assert_eq!(writer.data_lines(), 2);

        let bytes = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "0x0001 0x0002\n0x0003\n\n20220101 000000 000015 3\n"
        );
    }

    #[test]
    fn test_empty_dump_layout() {
        let series = SampleSeries::new(Vec::new(), DumpTrailer::default());
        let bytes = series.write_dump(Vec::new(), FIRMWARE_WORDS_PER_LINE).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "\n20220101 000000 000015 0\n"
        );
    }

    #[test]
    fn test_format_data_line() {
        assert_eq!(format_data_line(&[0x0a, 0xffff, 0x12345]), "0x000a 0xffff 0x12345");
        assert_eq!(format_data_line(&[]), "");
    }
}
