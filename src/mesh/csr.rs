//! Flattened per-vertex lists.
//!
//! Every adjacency and kernel table in the crate is a jagged array indexed by
//! vertex. [`Csr`] stores all rows back to back in one buffer with an offset
//! table, so row `i` is `values[offsets[i]..offsets[i + 1]]`.

use std::ops::Range;

/// Compressed-row storage for variable-length per-vertex lists.
#[derive(Debug, Clone, Default)]
pub(crate) struct Csr<T> {
    offsets: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy> Csr<T> {
    /// Group `(row, value)` entries by row.
    ///
    /// Values keep their relative input order within each row.
    pub fn from_entries(num_rows: usize, entries: &[(usize, T)]) -> Self {
        let mut offsets = vec![0usize; num_rows + 1];
        for &(row, _) in entries {
            offsets[row + 1] += 1;
        }
        for i in 0..num_rows {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets[..num_rows].to_vec();
        let mut slots: Vec<Option<T>> = vec![None; entries.len()];
        for &(row, value) in entries {
            slots[cursor[row]] = Some(value);
            cursor[row] += 1;
        }

        Self {
            offsets,
            values: slots.into_iter().flatten().collect(),
        }
    }
}

impl<T> Csr<T> {
    /// Flatten a list of rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        offsets.push(0);
        let total = rows.iter().map(Vec::len).sum();
        let mut values = Vec::with_capacity(total);
        for row in rows {
            values.extend(row);
            offsets.push(values.len());
        }
        Self { offsets, values }
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Index range of row `i` within [`Csr::values`].
    #[inline]
    pub fn range(&self, i: usize) -> Range<usize> {
        self.offsets[i]..self.offsets[i + 1]
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[self.range(i)]
    }

    /// Mutable row `i`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let range = self.range(i);
        &mut self.values[range]
    }

    /// All values in row order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Same row layout with every value transformed by `f(row, value)`.
    pub fn map<U>(&self, mut f: impl FnMut(usize, &T) -> U) -> Csr<U> {
        let mut values = Vec::with_capacity(self.values.len());
        for row in 0..self.num_rows() {
            values.extend(self.row(row).iter().map(|value| f(row, value)));
        }
        Csr {
            offsets: self.offsets.clone(),
            values,
        }
    }
}
