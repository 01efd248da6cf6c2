//! Data quality matrices of the model export.
//!
//! A DQI matrix is stored as headerless CSV where each cell is an aggregated
//! data quality entry rendered as a string, e.g. `(1,2,3,4,5)` or `(none)`.
//! The entries stay opaque strings here; the API serves them as-is.

use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct DqiMatrix {
    rows: Vec<Vec<String>>,
}

impl DqiMatrix {
    /// Read a DQI matrix from its `.csv` file.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("reading DQI matrix {}", path.display()))?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("reading DQI matrix {}", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> &[String] {
        &self.rows[idx]
    }

    pub fn col(&self, idx: usize) -> Vec<String> {
        self.rows.iter().map(|row| row[idx].clone()).collect()
    }

    /// The matrix as a list of row vectors, the shape the API serves.
    pub fn to_rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sample(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("B_dqi.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer
            .write_record(["(1,2,3,4,5)", "(none)", "(2,2,2,2,2)"])
            .unwrap();
        writer
            .write_record(["(5,4,3,2,1)", "(1,1,1,1,1)", "(none)"])
            .unwrap();
        writer.flush().unwrap();
        path
    }

    #[test]
    fn reads_quoted_entry_cells() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = DqiMatrix::read(&write_sample(dir.path())).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.row(0), ["(1,2,3,4,5)", "(none)", "(2,2,2,2,2)"]);
        assert_eq!(matrix.col(1), vec!["(none)", "(1,1,1,1,1)"]);
    }

    #[test]
    fn empty_file_yields_empty_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("D_dqi.csv");
        std::fs::write(&path, "").unwrap();
        let matrix = DqiMatrix::read(&path).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.cols(), 0);
    }
}
