use crate::atomic::AtomicReal;
use crate::pattern::search_lane;
use nalgebra::Scalar;
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::CsrMatrix;
use num::Zero;
use rayon::prelude::*;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Attempt to add to an entry that is not part of the sparsity pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    pub row: usize,
    pub column: usize,
}

impl Display for MissingEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry ({}, {}) is not part of the sparsity pattern",
            self.row, self.column
        )
    }
}

impl Error for MissingEntry {}

/// A CSR matrix with a fixed sparsity pattern whose values may be accumulated concurrently.
///
/// Each individual addition is atomic. A row addition consists of several independent atomic
/// additions, so concurrent row additions may interleave, but no contribution is lost.
#[derive(Debug)]
pub struct AtomicCsrMatrix<T: AtomicReal> {
    pattern: SparsityPattern,
    values: Vec<T::Atomic>,
}

impl<T: AtomicReal + Zero> AtomicCsrMatrix<T> {
    /// Creates a zero matrix with the given sparsity pattern.
    pub fn from_pattern(pattern: SparsityPattern) -> Self {
        let values = (0..pattern.nnz()).map(|_| T::new_atomic(T::zero())).collect();
        Self { pattern, values }
    }

    pub fn pattern(&self) -> &SparsityPattern {
        &self.pattern
    }

    pub fn nrows(&self) -> usize {
        self.pattern.major_dim()
    }

    pub fn ncols(&self) -> usize {
        self.pattern.minor_dim()
    }

    pub fn nnz(&self) -> usize {
        self.pattern.nnz()
    }

    /// Resets every stored value to zero, keeping the pattern.
    pub fn zero(&self) {
        self.values
            .par_iter()
            .for_each(|value| T::atomic_store(value, T::zero()));
    }

    /// Returns the value of the entry, or `None` if the entry is not stored.
    pub fn get(&self, row: usize, column: usize) -> Option<T> {
        search_lane(&self.pattern, row, column).map(|idx| T::atomic_load(&self.values[idx]))
    }

    /// Atomically adds `value` to the entry at `(row, column)`.
    pub fn add_to_entry(&self, row: usize, column: usize, value: T) -> Result<(), MissingEntry> {
        let idx = search_lane(&self.pattern, row, column).ok_or(MissingEntry { row, column })?;
        T::atomic_add(&self.values[idx], value);
        Ok(())
    }

    /// Adds `values[k]` to the entry `(row, columns[k])` for every `k`.
    ///
    /// The columns need not be sorted. Each column is located by binary search in the row.
    /// If a column is not stored, an error is returned and the additions for the preceding
    /// columns have already been applied.
    ///
    /// # Panics
    ///
    /// Panics if `columns` and `values` have different lengths.
    pub fn add_to_row_unsorted(&self, row: usize, columns: &[usize], values: &[T]) -> Result<(), MissingEntry> {
        assert_eq!(columns.len(), values.len(), "Columns and values must have the same length");
        let offsets = self.pattern.major_offsets();
        let (begin, end) = match (offsets.get(row), offsets.get(row + 1)) {
            (Some(&begin), Some(&end)) => (begin, end),
            _ => {
                let column = columns.first().copied().unwrap_or(0);
                return Err(MissingEntry { row, column });
            }
        };
        let lane_indices = &self.pattern.minor_indices()[begin..end];
        let lane_values = &self.values[begin..end];

        for (&column, &value) in columns.iter().zip(values) {
            let local_idx = lane_indices
                .binary_search(&column)
                .map_err(|_| MissingEntry { row, column })?;
            T::atomic_add(&lane_values[local_idx], value);
        }
        Ok(())
    }

    /// Copies the accumulated values into an ordinary CSR matrix.
    ///
    /// Requires exclusive access, so no accumulation can be in flight.
    pub fn to_csr(&mut self) -> CsrMatrix<T>
    where
        T: Scalar,
    {
        let values = self.values.iter_mut().map(T::read_exclusive).collect();
        CsrMatrix::try_from_pattern_and_values(self.pattern.clone(), values)
            .expect("Values are created from the pattern and must be consistent with it")
    }
}
