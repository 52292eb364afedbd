use alloc::boxed::Box;
use num_traits::Float;
use ordered_float::{OrderedFloat, PrimitiveFloat};
use tracing::debug;

use crate::{
    MedianQueue, Result, Window,
    helper::{check_period, median_from_sorted_slice, try_boxed_copy},
};

/// A running median that keeps a fully sorted copy of the window.
///
/// Each update finds the evicted value by binary search, overwrites it with
/// the new value and shifts that value into place, `O(n)` in the worst case.
/// The median is read straight from the sorted copy.
#[derive(Debug, Clone)]
pub struct SortedMedianQueue<T> {
    /// The raw window values
    window: Window<T>,
    /// The window values in ascending order
    sorted: Box<[T]>,
}

impl<T> SortedMedianQueue<T>
where
    T: Float + PrimitiveFloat,
{
    /// Creates a queue seeded with `values`, oldest first
    ///
    /// # Arguments
    ///
    /// * `values` - The initial window, must be non-empty
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The queue, or an error if `values` is empty or
    ///   storage could not be allocated
    pub fn new(values: &[T]) -> Result<Self> {
        Self::with_period(values.len(), values)
    }

    /// Creates a queue with an explicit period, checking that exactly
    /// `period` initial values are supplied
    pub fn with_period(period: usize, values: &[T]) -> Result<Self> {
        check_period(period, values.len())?;

        let mut sorted = try_boxed_copy(values)?;
        sorted.sort_unstable_by_key(|value| OrderedFloat(*value));
        debug!(period, "built sorted median queue");

        Ok(Self {
            window: Window::from_slice(values)?,
            sorted,
        })
    }

    /// Returns an iterator over the window in logical (oldest to newest) order
    pub fn window(&self) -> impl Iterator<Item = T> + '_ {
        self.window.iter().copied()
    }

    /// Returns the window in ascending order
    #[inline]
    pub fn as_sorted(&self) -> &[T] {
        &self.sorted
    }
}

impl<T> MedianQueue<T> for SortedMedianQueue<T>
where
    T: Float + PrimitiveFloat,
{
    #[inline]
    fn period(&self) -> usize {
        self.window.period()
    }

    fn update(&mut self, value: T) {
        let evicted = self.window.next(value);
        let sorted = &mut self.sorted;

        let mut index = sorted.partition_point(|v| *v < evicted);
        debug_assert!(sorted[index] == evicted, "evicted value missing from sorted copy");
        sorted[index] = value;

        while index > 0 && sorted[index - 1] > value {
            sorted.swap(index - 1, index);
            index -= 1;
        }
        while index + 1 < sorted.len() && sorted[index + 1] < value {
            sorted.swap(index, index + 1);
            index += 1;
        }
    }

    #[inline]
    fn median(&self) -> T {
        median_from_sorted_slice(&self.sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MedianQueueError;

    #[test]
    fn test_odd_window() {
        let mut queue = SortedMedianQueue::new(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(queue.as_sorted(), &[1.0, 3.0, 5.0]);
        assert_eq!(queue.median(), 3.0);

        queue.update(10.0);
        assert_eq!(queue.as_sorted(), &[1.0, 3.0, 10.0]);
        assert_eq!(queue.median(), 3.0);

        queue.update(0.0);
        assert_eq!(queue.as_sorted(), &[0.0, 3.0, 10.0]);
        assert_eq!(queue.median(), 3.0);
    }

    #[test]
    fn test_even_window_reports_lower_median() {
        let mut queue = SortedMedianQueue::new(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(queue.median(), 2.0);
        queue.update(10.0);
        assert_eq!(queue.as_sorted(), &[1.0, 2.0, 3.0, 10.0]);
        assert_eq!(queue.median(), 2.0);
    }

    #[test]
    fn test_duplicates_shift_correctly() {
        let mut queue = SortedMedianQueue::new(&[2.0, 2.0, 1.0, 2.0]).unwrap();
        queue.update(3.0);
        assert_eq!(queue.as_sorted(), &[1.0, 2.0, 2.0, 3.0]);
        queue.update(0.0);
        assert_eq!(queue.as_sorted(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(queue.median(), 1.0);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            SortedMedianQueue::<f32>::with_period(0, &[]).unwrap_err(),
            MedianQueueError::ZeroPeriod
        );
    }
}
