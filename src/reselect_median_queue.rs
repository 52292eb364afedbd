use alloc::boxed::Box;
use num_traits::Float;
use ordered_float::{OrderedFloat, PrimitiveFloat};
use tracing::debug;

use crate::{
    MedianQueue, Result, Window,
    helper::{check_period, median_index, try_boxed_copy},
};

/// A running median that re-selects the middle element of the whole window
/// after every update.
///
/// Each update copies the window into a scratch buffer and runs an
/// introselect (`select_nth_unstable`), which is linear on average. No state
/// besides the raw values survives between updates.
#[derive(Debug, Clone)]
pub struct ReselectMedianQueue<T> {
    /// The raw window values
    window: Window<T>,
    /// Scratch copy of the window, partitioned around the median
    selected: Box<[T]>,
}

impl<T> ReselectMedianQueue<T>
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

        let mut queue = Self {
            window: Window::from_slice(values)?,
            selected: try_boxed_copy(values)?,
        };
        queue.select();
        debug!(period, "built reselect median queue");

        Ok(queue)
    }

    /// Returns an iterator over the window in logical (oldest to newest) order
    pub fn window(&self) -> impl Iterator<Item = T> + '_ {
        self.window.iter().copied()
    }

    fn select(&mut self) {
        let mid = median_index(self.selected.len());
        self.selected.copy_from_slice(self.window.as_slice());
        self.selected
            .select_nth_unstable_by_key(mid, |value| OrderedFloat(*value));
    }
}

impl<T> MedianQueue<T> for ReselectMedianQueue<T>
where
    T: Float + PrimitiveFloat,
{
    #[inline]
    fn period(&self) -> usize {
        self.window.period()
    }

    fn update(&mut self, value: T) {
        self.window.next(value);
        self.select();
    }

    #[inline]
    fn median(&self) -> T {
        self.selected[median_index(self.selected.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MedianQueueError;
    use alloc::vec::Vec;

    #[test]
    fn test_odd_window() {
        let mut queue = ReselectMedianQueue::new(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(queue.median(), 3.0);
        queue.update(10.0);
        assert_eq!(queue.median(), 3.0);
        queue.update(0.0);
        assert_eq!(queue.median(), 3.0);
        assert_eq!(queue.window().collect::<Vec<_>>(), [3.0, 10.0, 0.0]);
    }

    #[test]
    fn test_even_window_reports_lower_median() {
        let mut queue = ReselectMedianQueue::new(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(queue.median(), 2.0);
        queue.update(10.0);
        assert_eq!(queue.median(), 2.0);
        queue.update(0.0);
        assert_eq!(queue.median(), 2.0);
    }

    #[test]
    fn test_period_one() {
        let mut queue = ReselectMedianQueue::new(&[1.0]).unwrap();
        assert_eq!(queue.next(4.0), 4.0);
        assert_eq!(queue.next(-4.0), -4.0);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            ReselectMedianQueue::<f64>::new(&[]).unwrap_err(),
            MedianQueueError::ZeroPeriod
        );
        assert_eq!(
            ReselectMedianQueue::with_period(2, &[1.0, 2.0, 3.0]).unwrap_err(),
            MedianQueueError::LengthMismatch {
                expected: 2,
                actual: 3
            }
        );
    }
}
