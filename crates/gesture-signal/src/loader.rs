//! Capture file parsing.
//!
//! Capture files are CSVs written by the Arduino sketch: a header row
//! naming the six channels, then one row of readings per sample. The
//! capture tool emits blank lines between recordings; those are skipped.

use std::fs;
use std::path::Path;

use gesture_core::{Error, Result, SensorChannel, SensorSample};

/// Read and parse a capture file into samples
pub fn read_sensor_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SensorSample>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::RecordingParse(format!("{}: {e}", path.display()))
    })?;

    let samples = parse_capture(&contents)?;
    tracing::debug!(
        path = %path.display(),
        rows = samples.len(),
        "parsed capture file"
    );
    Ok(samples)
}

/// Parse capture CSV contents
pub fn parse_capture(contents: &str) -> Result<Vec<SensorSample>> {
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::RecordingParse("empty capture file".into()))?;
    validate_header(header)?;

    let mut samples = Vec::new();
    for (index, line) in lines {
        samples.push(parse_line(index + 1, line)?);
    }

    Ok(samples)
}

fn validate_header(header: &str) -> Result<()> {
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let expected: Vec<&str> = SensorChannel::ALL.iter().map(|c| c.name()).collect();

    if columns != expected {
        return Err(Error::RecordingParse(format!(
            "unexpected header \"{header}\", expected \"{}\"",
            expected.join(",")
        )));
    }
    Ok(())
}

/// Parse one data row. `line_number` is 1-based for error reporting.
fn parse_line(line_number: usize, line: &str) -> Result<SensorSample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() != SensorChannel::COUNT {
        return Err(Error::ChannelMismatch {
            expected: SensorChannel::COUNT,
            actual: fields.len(),
        });
    }

    let mut values = [0.0f64; SensorChannel::COUNT];
    for (i, field) in fields.iter().enumerate() {
        values[i] = field.parse().map_err(|_| {
            Error::RecordingParse(format!(
                "line {line_number}: non-numeric field \"{field}\""
            ))
        })?;
    }

    let sample = SensorSample::new(
        values[0], values[1], values[2], values[3], values[4], values[5],
    );
    if !sample.is_finite() {
        return Err(Error::RecordingParse(format!(
            "line {line_number}: non-finite reading"
        )));
    }

    Ok(sample)
}
