use crate::atomic::AtomicReal;
use nalgebra::{DVector, Scalar};
use num::Zero;
use rayon::prelude::*;

/// A dense vector whose entries may be accumulated concurrently.
#[derive(Debug)]
pub struct AtomicVector<T: AtomicReal> {
    values: Vec<T::Atomic>,
}

impl<T: AtomicReal + Zero> AtomicVector<T> {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: (0..len).map(|_| T::new_atomic(T::zero())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn zero(&self) {
        self.values
            .par_iter()
            .for_each(|value| T::atomic_store(value, T::zero()));
    }

    /// Returns the entry at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).map(T::atomic_load)
    }

    /// Atomically adds `value` to the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn add(&self, index: usize, value: T) {
        T::atomic_add(&self.values[index], value);
    }

    pub fn to_dvector(&mut self) -> DVector<T>
    where
        T: Scalar,
    {
        DVector::from_iterator(self.values.len(), self.values.iter_mut().map(T::read_exclusive))
    }
}
