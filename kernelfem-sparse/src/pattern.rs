use nalgebra_sparse::pattern::{SparsityPattern, SparsityPatternFormatError};

/// Builds a sparsity pattern from row-major sorted `(row, column)` coordinates.
///
/// Duplicate coordinates are combined. Rows without coordinates are empty.
///
/// # Panics
///
/// Panics if a row index is out of bounds or the coordinates are not sorted by row.
pub fn pattern_from_sorted_coordinates(
    num_rows: usize,
    num_cols: usize,
    coordinates: impl IntoIterator<Item = (usize, usize)>,
) -> Result<SparsityPattern, SparsityPatternFormatError> {
    let mut row_offsets = Vec::with_capacity(num_rows + 1);
    let mut column_indices = Vec::new();
    row_offsets.push(0);

    let mut current_row = 0;
    let mut prev_col = None;

    for (i, j) in coordinates {
        assert!(i < num_rows, "Coordinates must be in bounds");
        assert!(i >= current_row, "Coordinates must be sorted by row");

        while i > current_row {
            row_offsets.push(column_indices.len());
            current_row += 1;
            prev_col = None;
        }

        // Only add column if it is not a duplicate
        if Some(j) != prev_col {
            column_indices.push(j);
            prev_col = Some(j);
        }
    }

    // Fill out offsets for remaining empty rows
    while row_offsets.len() < num_rows + 1 {
        row_offsets.push(column_indices.len());
    }

    SparsityPattern::try_from_offsets_and_indices(num_rows, num_cols, row_offsets, column_indices)
}

/// Returns the position of `column` in the given row of the pattern, relative to the start of
/// the pattern's index array.
///
/// Returns `None` if the row is out of bounds or the column is not part of the row.
#[inline]
pub fn search_lane(pattern: &SparsityPattern, row: usize, column: usize) -> Option<usize> {
    let offsets = pattern.major_offsets();
    let begin = *offsets.get(row)?;
    let end = *offsets.get(row + 1)?;
    pattern.minor_indices()[begin..end]
        .binary_search(&column)
        .ok()
        .map(|local_idx| begin + local_idx)
}
