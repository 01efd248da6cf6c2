//! Binary matrix format of the model export.
//!
//! A matrix file holds two little-endian `i32` values (rows, columns)
//! followed by `rows * cols` little-endian `f64` values in column-major
//! order.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// A dense numeric matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    /// Values in column-major order, matching the file layout.
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from row slices. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut matrix = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                bail!("row {} has {} values, expected {}", r, row.len(), cols);
            }
            for (c, value) in row.iter().enumerate() {
                matrix.set(r, c, *value);
            }
        }
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row + self.rows * col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row + self.rows * col] = value;
    }

    pub fn row(&self, idx: usize) -> Vec<f64> {
        (0..self.cols).map(|col| self.get(idx, col)).collect()
    }

    pub fn col(&self, idx: usize) -> Vec<f64> {
        let start = self.rows * idx;
        self.data[start..start + self.rows].to_vec()
    }

    /// The matrix as a list of row vectors, the shape the API serves.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|row| self.row(row)).collect()
    }

    /// Read a matrix from a `.bin` file.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("reading matrix {}", path.display()))?;
        if bytes.len() < 8 {
            bail!("matrix file {} is truncated", path.display());
        }
        let rows = i32::from_le_bytes(bytes[0..4].try_into()?);
        let cols = i32::from_le_bytes(bytes[4..8].try_into()?);
        if rows < 0 || cols < 0 {
            bail!("matrix file {} has a negative shape", path.display());
        }
        let (rows, cols) = (rows as usize, cols as usize);
        let expected = 8 + rows * cols * 8;
        if bytes.len() != expected {
            bail!(
                "matrix file {} has {} bytes, expected {} for shape {}x{}",
                path.display(),
                bytes.len(),
                expected,
                rows,
                cols
            );
        }
        let data = bytes[8..]
            .chunks_exact(8)
            .map(|chunk| f64::from_le_bytes(chunk.try_into().expect("8-byte chunk")))
            .collect();
        Ok(Self { rows, cols, data })
    }

    /// Write the matrix in the `.bin` export format.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut bytes = Vec::with_capacity(8 + self.data.len() * 8);
        bytes.extend_from_slice(&(self.rows as i32).to_le_bytes());
        bytes.extend_from_slice(&(self.cols as i32).to_le_bytes());
        for value in &self.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(path, bytes).with_context(|| format!("writing matrix {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_layout_is_column_major_little_endian() {
        let matrix = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.bin");
        matrix.write(&path).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2i32.to_le_bytes());
        expected.extend_from_slice(&2i32.to_le_bytes());
        // column 0, then column 1
        for value in [1.0f64, 3.0, 2.0, 4.0] {
            expected.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(std::fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn read_restores_shape_and_values() {
        let matrix = Matrix::from_rows(&[vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("L.bin");
        matrix.write(&path).unwrap();

        let read = Matrix::read(&path).unwrap();
        assert_eq!(read.rows(), 2);
        assert_eq!(read.cols(), 3);
        assert_eq!(read, matrix);
        assert_eq!(read.row(1), vec![0.4, 0.5, 0.6]);
        assert_eq!(read.col(2), vec![0.3, 0.6]);
    }

    #[test]
    fn truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("B.bin");
        std::fs::write(&path, [1, 0, 0, 0]).unwrap();
        assert!(Matrix::read(&path).is_err());
    }

    #[test]
    fn shorter_body_than_header_claims_is_an_error() {
        let matrix = Matrix::zeros(3, 3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C.bin");
        matrix.write(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();
        assert!(Matrix::read(&path).is_err());
    }
}
