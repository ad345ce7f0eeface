//! Orientation trajectory file reader.
//!
//! The file is plain text: the first line holds the declared sample count,
//! every following line holds whitespace-separated numeric tokens, either
//! `time x y z` or `time x y z u v w` when velocity columns are configured.
//! The reader fails when a line cannot be parsed or when the number of data
//! lines disagrees with the declared count.

use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use thiserror::Error;

use crate::constants::SimTime;
use crate::sphexp_errors::SphexpError;

/// Line-level parsing errors for orientation trajectory files.
#[derive(Error, Debug, PartialEq)]
pub enum ParseOrientError {
    #[error("missing sample count header")]
    MissingHeader,
    #[error("invalid sample count: {0}")]
    InvalidCount(String),
    #[error("expected at least {expected} numeric fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("invalid numeric field: {0}")]
    InvalidField(String),
}

/// Raw series exactly as stored on disk.
pub(crate) struct RawOrientFile {
    pub times: Vec<SimTime>,
    pub positions: [Vec<f64>; 3],
    pub velocities: Option<[Vec<f64>; 3]>,
}

fn parse_data_line(line: &str, fields: usize) -> Result<Vec<f64>, ParseOrientError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < fields {
        return Err(ParseOrientError::TooFewFields {
            expected: fields,
            found: tokens.len(),
        });
    }
    tokens[..fields]
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| ParseOrientError::InvalidField(token.to_string()))
        })
        .collect()
}

/// Read a whole orientation trajectory file.
///
/// Arguments
/// -----------------
/// * `path`: the trajectory file; a non-openable path is fatal.
/// * `velocity_columns`: expect 7 tokens per line instead of 4.
///
/// Return
/// ----------
/// * The raw series, or a [`SphexpError`] on I/O failure, a malformed line,
///   or a data-line count that disagrees with the header.
pub(crate) fn read_orient_file(
    path: &Utf8Path,
    velocity_columns: bool,
) -> Result<RawOrientFile, SphexpError> {
    let file =
        File::open(path).map_err(|_| SphexpError::OrientFileNotFound(path.to_owned()))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines.next().ok_or(SphexpError::MalformedOrientLine {
        line: 1,
        source: ParseOrientError::MissingHeader,
    })??;
    let declared: usize =
        header
            .trim()
            .parse()
            .map_err(|_| SphexpError::MalformedOrientLine {
                line: 1,
                source: ParseOrientError::InvalidCount(header.trim().to_string()),
            })?;

    let fields = if velocity_columns { 7 } else { 4 };
    let mut times = Vec::with_capacity(declared);
    let mut positions: [Vec<f64>; 3] = Default::default();
    let mut velocities: [Vec<f64>; 3] = Default::default();

    for (offset, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let values =
            parse_data_line(&line, fields).map_err(|source| SphexpError::MalformedOrientLine {
                line: offset + 2,
                source,
            })?;
        times.push(values[0]);
        for axis in 0..3 {
            positions[axis].push(values[1 + axis]);
        }
        if velocity_columns {
            for axis in 0..3 {
                velocities[axis].push(values[4 + axis]);
            }
        }
    }

    if times.len() != declared {
        return Err(SphexpError::OrientLineCountMismatch {
            expected: declared,
            actual: times.len(),
        });
    }

    tracing::debug!("read {declared} orientation samples from {path}");

    Ok(RawOrientFile {
        times,
        positions,
        velocities: velocity_columns.then_some(velocities),
    })
}
