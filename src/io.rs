//! Dense matrix files.
//!
//! Files hold one record per line with comma separated values and no header.
//! On load every record becomes a column, so a file with n lines of d values
//! yields a d × n observation matrix. On save every row of the in-memory
//! matrix is written as one record, i.e. the matrix is transposed before it
//! is written. A saved sources matrix therefore has one line per source.

use crate::error::{FastIcaError, Result};
use ndarray::Array2;
use std::path::Path;

fn io_error(path: &Path, e: impl std::fmt::Display) -> FastIcaError {
    FastIcaError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Load a d × n observation matrix from a CSV file with one observation per record.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let path = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| io_error(path, e))?;

    let mut values = Vec::new();
    let mut dims = None;
    let mut n_records = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| FastIcaError::Parse {
            path: path.display().to_string(),
            record: idx + 1,
            message: e.to_string(),
        })?;

        let d = *dims.get_or_insert(record.len());
        if record.len() != d {
            return Err(FastIcaError::Parse {
                path: path.display().to_string(),
                record: idx + 1,
                message: format!("expected {} fields, found {}", d, record.len()),
            });
        }

        for field in record.iter() {
            let value: f64 = field.parse().map_err(|_| FastIcaError::Parse {
                path: path.display().to_string(),
                record: idx + 1,
                message: format!("'{}' is not a number", field),
            })?;
            values.push(value);
        }
        n_records += 1;
    }

    let d = dims.unwrap_or(0);
    if n_records == 0 || d == 0 {
        return Err(FastIcaError::InvalidDimensions {
            message: format!("{} contains no data", path.display()),
        });
    }

    // Records were read as rows of an n × d matrix.
    let by_record = Array2::from_shape_vec((n_records, d), values).map_err(|e| {
        FastIcaError::ComputationError {
            message: e.to_string(),
        }
    })?;

    Ok(by_record.reversed_axes().as_standard_layout().to_owned())
}

/// Save `m` with each of its rows written as one CSV record.
pub fn save_matrix(path: impl AsRef<Path>, m: &Array2<f64>) -> Result<()> {
    let path = path.as_ref();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| io_error(path, e))?;

    for row in m.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| io_error(path, e))?;
    }

    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}
