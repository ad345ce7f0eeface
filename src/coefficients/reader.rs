//! Binary coefficient file reader.
//!
//! The file is self-describing: a header of three little-endian 32-bit
//! integers (`numTimeSamples`, `maxDegree`, `maxRadialOrder`), then one block
//! per time sample in time order. Each block is a 64-bit float timestamp
//! followed by `(maxDegree+1)² · maxRadialOrder` 64-bit floats in row-major
//! order, harmonic index outer and radial index inner.
//!
//! The format carries no length or checksum field, so the reader
//! cross-checks the declared dimensions against the actual byte count and
//! rejects the file on any disagreement instead of trusting the header.

use std::fs::File;
use std::io::{BufReader, Read};

use camino::Utf8Path;
use nalgebra::DMatrix;
use nom::{
    multi::count,
    number::complete::{le_f64, le_i32},
    IResult, Parser,
};

use crate::constants::SimTime;
use crate::sphexp_errors::SphexpError;

/// Time axis and per-time coefficient planes, exactly as stored on disk.
pub(crate) struct RawCoefficientFile {
    pub times: Vec<SimTime>,
    pub grid: Vec<DMatrix<f64>>,
}

fn parse_header(input: &[u8]) -> IResult<&[u8], (i32, i32, i32)> {
    let (input, num_times) = le_i32(input)?;
    let (input, max_degree) = le_i32(input)?;
    let (input, max_radial) = le_i32(input)?;
    Ok((input, (num_times, max_degree, max_radial)))
}

/// One time block: timestamp plus a dense `numl × nmax` plane.
fn parse_time_block(
    input: &[u8],
    num_harmonics: usize,
    max_radial: usize,
) -> IResult<&[u8], (f64, DMatrix<f64>)> {
    let (input, time) = le_f64(input)?;
    let (input, values) = count(le_f64, num_harmonics * max_radial).parse(input)?;
    let plane = DMatrix::from_row_slice(num_harmonics, max_radial, &values);
    Ok((input, (time, plane)))
}

/// Read and validate a whole coefficient file.
///
/// Arguments
/// -----------------
/// * `path`: the binary coefficient file.
///
/// Return
/// ----------
/// * The raw time axis and grid, or a [`SphexpError`] on I/O failure, a
///   malformed header, or a content length that disagrees with the header.
pub(crate) fn read_coefficient_file(path: &Utf8Path) -> Result<RawCoefficientFile, SphexpError> {
    let mut buffer = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut buffer)?;

    let (body, (num_times, max_degree, max_radial)) = parse_header(&buffer).map_err(|_| {
        SphexpError::MalformedHeader("file shorter than the 12-byte header".to_string())
    })?;

    if num_times < 0 || max_degree < 0 || max_radial <= 0 {
        return Err(SphexpError::MalformedHeader(format!(
            "non-positive dimensions: numT={num_times} L={max_degree} N={max_radial}"
        )));
    }
    let num_times = num_times as usize;
    let max_radial = max_radial as usize;
    let num_harmonics = (max_degree as usize + 1) * (max_degree as usize + 1);
    if num_times < 2 {
        return Err(SphexpError::NotEnoughSamples(num_times));
    }

    let expected = num_times * 8 * (1 + num_harmonics * max_radial);
    if body.len() != expected {
        return Err(SphexpError::CoefficientSizeMismatch {
            expected,
            actual: body.len(),
        });
    }

    let mut times = Vec::with_capacity(num_times);
    let mut grid = Vec::with_capacity(num_times);
    let mut input = body;
    for _ in 0..num_times {
        let (rest, (time, plane)) =
            parse_time_block(input, num_harmonics, max_radial).map_err(|_| {
                SphexpError::MalformedHeader("truncated time block".to_string())
            })?;
        times.push(time);
        grid.push(plane);
        input = rest;
    }

    tracing::debug!(
        "read {num_times} time samples ({num_harmonics} harmonic x {max_radial} radial terms) from {path}"
    );

    Ok(RawCoefficientFile { times, grid })
}
