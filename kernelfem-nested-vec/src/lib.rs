//! Contiguous storage of a sequence of variable-length arrays.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;

/// A sequence of arrays stored back to back in a single buffer.
///
/// Array `i` occupies `data[offsets[i] .. offsets[i + 1]]`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedVec<T> {
    offsets: Vec<usize>,
    data: Vec<T>,
}

impl<T: Debug> Debug for NestedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for NestedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NestedVec<T> {
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            data: Vec::new(),
        }
    }

    /// Appends an array by letting `fill` extend the underlying buffer.
    ///
    /// `fill` may only append to the buffer. Everything it appends becomes the new array.
    pub fn push_with(&mut self, fill: impl FnOnce(&mut Vec<T>)) {
        let begin = self.data.len();
        fill(&mut self.data);
        assert!(self.data.len() >= begin, "Existing arrays must not be truncated");
        self.offsets.push(self.data.len());
    }

    /// The number of arrays.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of elements summed over all arrays.
    pub fn total_num_elements(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, index: usize) -> Option<&[T]> {
        let begin = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.data[begin..end])
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = &[T]> {
        self.offsets
            .windows(2)
            .map(move |range| &self.data[range[0]..range[1]])
    }

    pub fn clear(&mut self) {
        self.offsets.truncate(1);
        self.data.clear();
    }
}

impl<T: Clone> NestedVec<T> {
    pub fn push(&mut self, array: &[T]) {
        self.push_with(|data| data.extend_from_slice(array));
    }
}

impl<T: Clone, S: AsRef<[T]>> From<&[S]> for NestedVec<T> {
    fn from(arrays: &[S]) -> Self {
        let mut result = Self::new();
        for array in arrays {
            result.push(array.as_ref());
        }
        result
    }
}

impl<T: Clone, S: AsRef<[T]>> From<&Vec<S>> for NestedVec<T> {
    fn from(arrays: &Vec<S>) -> Self {
        Self::from(arrays.as_slice())
    }
}

impl<T: Clone> From<&NestedVec<T>> for Vec<Vec<T>> {
    fn from(nested: &NestedVec<T>) -> Self {
        nested.iter().map(|array| array.to_vec()).collect()
    }
}
