use std::fmt::Debug;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Floating-point scalars that can be accumulated atomically.
///
/// The value is stored as its bit pattern in an unsigned atomic integer of the same width.
/// Addition is a compare-exchange loop, so concurrent additions are never lost, but the order
/// in which they are applied (and therefore the rounding of the sum) is unspecified.
pub trait AtomicReal: Copy + Send + Sync + 'static {
    type Atomic: Debug + Send + Sync;

    fn new_atomic(value: Self) -> Self::Atomic;
    fn atomic_load(atomic: &Self::Atomic) -> Self;
    fn atomic_store(atomic: &Self::Atomic, value: Self);
    fn atomic_add(atomic: &Self::Atomic, value: Self);

    /// Reads the value through an exclusive reference, without atomic operations.
    fn read_exclusive(atomic: &mut Self::Atomic) -> Self;
}

macro_rules! impl_atomic_real {
    ($real:ty, $atomic:ty) => {
        impl AtomicReal for $real {
            type Atomic = $atomic;

            #[inline]
            fn new_atomic(value: Self) -> Self::Atomic {
                <$atomic>::new(value.to_bits())
            }

            #[inline]
            fn atomic_load(atomic: &Self::Atomic) -> Self {
                <$real>::from_bits(atomic.load(Ordering::Relaxed))
            }

            #[inline]
            fn atomic_store(atomic: &Self::Atomic, value: Self) {
                atomic.store(value.to_bits(), Ordering::Relaxed)
            }

            #[inline]
            fn atomic_add(atomic: &Self::Atomic, value: Self) {
                let mut current = atomic.load(Ordering::Relaxed);
                loop {
                    let new = (<$real>::from_bits(current) + value).to_bits();
                    match atomic.compare_exchange_weak(current, new, Ordering::Relaxed, Ordering::Relaxed) {
                        Ok(_) => break,
                        Err(actual) => current = actual,
                    }
                }
            }

            #[inline]
            fn read_exclusive(atomic: &mut Self::Atomic) -> Self {
                <$real>::from_bits(*atomic.get_mut())
            }
        }
    };
}

impl_atomic_real!(f64, AtomicU64);
impl_atomic_real!(f32, AtomicU32);
