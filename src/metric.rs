//! Per-vertex scalar data with one or more named columns.

use crate::error::{MeshError, Result};

/// Columns of per-vertex values, all of the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metric {
    num_vertices: usize,
    columns: Vec<Vec<f32>>,
    names: Vec<String>,
}

impl Metric {
    /// An empty metric for a surface with `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            columns: Vec::new(),
            names: Vec::new(),
        }
    }

    /// A metric holding a single unnamed column.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self {
            num_vertices: values.len(),
            columns: vec![values],
            names: vec![String::new()],
        }
    }

    /// Number of vertices (rows).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column < self.columns.len() {
            Ok(())
        } else {
            Err(MeshError::InvalidColumn {
                column,
                num_columns: self.columns.len(),
            })
        }
    }

    /// Values of one column.
    pub fn column(&self, column: usize) -> Result<&[f32]> {
        self.check_column(column)?;
        Ok(&self.columns[column])
    }

    /// Replace the values of one column.
    pub fn set_column(&mut self, column: usize, values: Vec<f32>) -> Result<()> {
        self.check_column(column)?;
        MeshError::check_length("column values", self.num_vertices, values.len())?;
        self.columns[column] = values;
        Ok(())
    }

    /// Append a column, returning its index.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f32>) -> Result<usize> {
        MeshError::check_length("column values", self.num_vertices, values.len())?;
        self.columns.push(values);
        self.names.push(name.into());
        Ok(self.columns.len() - 1)
    }

    /// Name of one column.
    pub fn name(&self, column: usize) -> Result<&str> {
        self.check_column(column)?;
        Ok(&self.names[column])
    }

    /// Rename one column.
    pub fn set_name(&mut self, column: usize, name: impl Into<String>) -> Result<()> {
        self.check_column(column)?;
        self.names[column] = name.into();
        Ok(())
    }

    /// All column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_read_columns() {
        let mut metric = Metric::new(3);
        assert_eq!(metric.add_column("thickness", vec![1.0, 2.0, 3.0]).unwrap(), 0);
        assert_eq!(metric.add_column("curvature", vec![0.0; 3]).unwrap(), 1);

        assert_eq!(metric.num_columns(), 2);
        assert_eq!(metric.column(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(metric.name(1).unwrap(), "curvature");

        metric.set_column(1, vec![4.0, 5.0, 6.0]).unwrap();
        metric.set_name(1, "sulc").unwrap();
        assert_eq!(metric.column(1).unwrap()[2], 6.0);
        assert_eq!(metric.names(), &["thickness".to_string(), "sulc".to_string()]);
    }

    #[test]
    fn test_rejects_bad_columns() {
        let mut metric = Metric::from_values(vec![1.0, 2.0]);
        assert_eq!(
            metric.column(1).unwrap_err(),
            MeshError::InvalidColumn {
                column: 1,
                num_columns: 1
            }
        );
        assert!(matches!(
            metric.add_column("short", vec![1.0]),
            Err(MeshError::LengthMismatch { .. })
        ));
        assert!(metric.set_column(0, vec![0.0; 3]).is_err());
    }
}
