use std::io::Write;

use camino::Utf8PathBuf;
use nalgebra::DMatrix;
use tempfile::NamedTempFile;

/// Serialize a coefficient table to the binary on-disk layout: three LE i32
/// header fields, then per-time blocks of one f64 timestamp followed by the
/// row-major plane (harmonic outer, radial inner).
pub fn write_coefficient_file(times: &[f64], planes: &[DMatrix<f64>]) -> NamedTempFile {
    let num_harmonics = planes[0].nrows();
    let max_degree = (num_harmonics as f64).sqrt().round() as i32 - 1;
    let max_radial = planes[0].ncols() as i32;

    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&(times.len() as i32).to_le_bytes()).unwrap();
    file.write_all(&max_degree.to_le_bytes()).unwrap();
    file.write_all(&max_radial.to_le_bytes()).unwrap();
    for (time, plane) in times.iter().zip(planes.iter()) {
        file.write_all(&time.to_le_bytes()).unwrap();
        for l in 0..plane.nrows() {
            for n in 0..plane.ncols() {
                file.write_all(&plane[(l, n)].to_le_bytes()).unwrap();
            }
        }
    }
    file.flush().unwrap();
    file
}

/// Serialize an orientation trajectory to the text layout: a count line, then
/// one whitespace-separated line per sample with 4 or 7 numeric tokens.
pub fn write_orient_file(
    times: &[f64],
    positions: &[Vec<f64>; 3],
    velocities: Option<&[Vec<f64>; 3]>,
) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "{}", times.len()).unwrap();
    for (i, time) in times.iter().enumerate() {
        write!(
            file,
            "{} {} {} {}",
            time, positions[0][i], positions[1][i], positions[2][i]
        )
        .unwrap();
        if let Some(velocities) = velocities {
            write!(
                file,
                " {} {} {}",
                velocities[0][i], velocities[1][i], velocities[2][i]
            )
            .unwrap();
        }
        writeln!(file).unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn utf8_path(file: &NamedTempFile) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("utf8 temp path")
}

/// One-harmonic, one-radial-term planes from plain values.
pub fn scalar_planes(values: &[f64]) -> Vec<DMatrix<f64>> {
    values
        .iter()
        .map(|&v| DMatrix::from_element(1, 1, v))
        .collect()
}
