//! Row-major storage for a discretized Boolean feature matrix.
//!
//! Rows are samples and columns are the derived Boolean features of a
//! [schema](crate::structures::feature::FeatureSchema).
//! A matrix is immutable for the duration of a run --- batches are views over
//! its row indices rather than copies of its rows.

use crate::types::err::{self};

/// A dense Boolean matrix with a fixed column count.
#[derive(Clone, Debug)]
pub struct FeatureMatrix {
    width: usize,
    data: Vec<bool>,
}

impl FeatureMatrix {
    /// A matrix from per-sample rows, each required to have the same width.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, err::EncodingError> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => 0,
        };
        let mut data = Vec::with_capacity(width * rows.len());
        for row in rows {
            if row.len() != width {
                return Err(err::EncodingError::RowWidth {
                    expected: width,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(FeatureMatrix { width, data })
    }

    /// The column count of the matrix.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The row count of the matrix.
    pub fn sample_count(&self) -> usize {
        match self.width {
            0 => 0,
            width => self.data.len() / width,
        }
    }

    /// The given row, as a slice of column values.
    pub fn row(&self, index: usize) -> &[bool] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    /// The columns at which the given row is true, ascending.
    pub fn active_columns(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(index)
            .iter()
            .enumerate()
            .filter_map(|(column, &value)| value.then_some(column))
    }
}
