//! Read chromatograms from delimited text tables and write peak tables back out.
//!
//! The expected input has a single header row naming each column followed by one
//! row per sample, e.g. a two-channel detector export:
//!
//! ```text
//! time;215nm;254nm
//! 0.00;12.5;3.1
//! 0.01;12.7;3.0
//! ```
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path;

use crate::pipeline::PeakIntegrationResult;
use crate::signal::Signal;

/// The column separator used by default
pub const DEFAULT_DELIMITER: char = ';';

fn invalid_data<E: Into<Box<dyn std::error::Error + Send + Sync>>>(error: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Read the column named `channel` from a delimited table.
pub fn signal_from_reader<R: io::Read>(
    reader: R,
    channel: &str,
    delimiter: char,
) -> io::Result<Signal<'static>> {
    let reader = io::BufReader::new(reader);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(invalid_data("The chromatogram table is empty")),
    };
    let column = header
        .split(delimiter)
        .position(|name| name.trim() == channel)
        .ok_or_else(|| invalid_data(format!("Channel {channel:?} not found in header {header:?}")))?;

    let mut intensity_array: Vec<f32> = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        let pref = line.trim();
        if pref.is_empty() {
            continue;
        }
        let line_number = i + 2;
        let token = pref.split(delimiter).nth(column).ok_or_else(|| {
            invalid_data(format!("Line {line_number} has no column {column} ({channel})"))
        })?;
        let value = token.trim().parse::<f32>().map_err(|e| {
            invalid_data(format!("Expected number for {channel} on line {line_number}, found {token:?}: {e}"))
        })?;
        intensity_array.push(value);
    }
    log::debug!("Read {} points for channel {channel}", intensity_array.len());
    Signal::try_from(intensity_array).map_err(invalid_data)
}

/// Read the column named `channel` from the `;`-delimited table at `path`.
pub fn signal_from_file<P: AsRef<path::Path>>(path: P, channel: &str) -> io::Result<Signal<'static>> {
    let file = fs::File::open(path)?;
    signal_from_reader(file, channel, DEFAULT_DELIMITER)
}

fn fmt_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
}

/// Write one tab-separated row per peak in `result`. Unresolved boundaries and
/// excluded areas are written as `NA`.
pub fn peak_table_to_writer<W: io::Write>(result: &PeakIntegrationResult, writer: &mut W) -> io::Result<()> {
    writer.write_all(
        b"interval_start\tinterval_end\tindex\theight\tleft_index\tleft_value\tright_index\tright_value\tarea\n",
    )?;
    for (iv, peak) in result.peaks.iter_peaks() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            iv.start,
            iv.end,
            peak.index(),
            peak.height(),
            fmt_optional(peak.boundary.left.index()),
            fmt_optional(peak.boundary.left.value()),
            fmt_optional(peak.boundary.right.index()),
            fmt_optional(peak.boundary.right.value()),
            fmt_optional(peak.area),
        )?;
    }
    Ok(())
}

pub fn peak_table_to_file<P: AsRef<path::Path>>(result: &PeakIntegrationResult, path: P) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    peak_table_to_writer(result, &mut writer)?;
    writer.flush()
}
