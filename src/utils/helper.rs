use alloc::vec::Vec;

use crate::{MedianQueueError, Result};

/// Returns the index of the lower median in a sorted window
///
/// # Arguments
///
/// * `period` - The period of the window, must be non-zero
///
/// # Returns
///
/// * `usize` - `(period - 1) / 2`
#[inline]
pub const fn median_index(period: usize) -> usize {
    (period - 1) / 2
}

/// Returns the number of values held by the lower half of a window
///
/// The lower half always owns the median, so it gets the extra element
/// of an odd window.
#[inline]
pub const fn lower_half_len(period: usize) -> usize {
    median_index(period) + 1
}

/// Returns the lower median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice, must be non-empty
///
/// # Returns
///
/// * `T` - The median
#[inline]
pub fn median_from_sorted_slice<T: Copy>(ss: &[T]) -> T {
    ss[median_index(ss.len())]
}

/// Validates the initial values against the requested period
///
/// # Arguments
///
/// * `period` - The requested period
/// * `len` - The number of initial values supplied
///
/// # Returns
///
/// * `Result<()>` - `Ok` when the period is non-zero and matches `len`
pub const fn check_period(period: usize, len: usize) -> Result<()> {
    if period == 0 {
        return Err(MedianQueueError::ZeroPeriod);
    }
    if period != len {
        return Err(MedianQueueError::LengthMismatch {
            expected: period,
            actual: len,
        });
    }
    Ok(())
}

/// Reserves an empty vector with exactly `capacity` slots, reporting
/// allocation failure instead of aborting
#[inline]
pub fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| MedianQueueError::Allocation(capacity))?;
    Ok(buf)
}

/// Copies a slice into a freshly reserved boxed slice
pub fn try_boxed_copy<T: Copy>(values: &[T]) -> Result<alloc::boxed::Box<[T]>> {
    let mut buf = try_with_capacity(values.len())?;
    buf.extend_from_slice(values);
    Ok(buf.into_boxed_slice())
}
