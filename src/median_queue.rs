use num_traits::Float;

/// The running-median contract shared by every backend.
///
/// A median queue holds a full window of `period` values. Each update evicts
/// the oldest value in FIFO order and inserts the new one; the median is
/// always the lower median, `sorted(window)[(period - 1) / 2]`.
///
/// `Option<Q>` implements the same contract so that a missing queue can be
/// driven without special casing: updates are ignored and the median is
/// positive infinity.
pub trait MedianQueue<T> {
    /// Returns the period of the window, zero for an absent queue
    fn period(&self) -> usize;

    /// Evicts the oldest value and inserts `value`
    ///
    /// # Arguments
    ///
    /// * `value` - The new, finite sample
    fn update(&mut self, value: T);

    /// Returns the current median without mutating the queue
    ///
    /// # Returns
    ///
    /// * `T` - The lower median of the window
    fn median(&self) -> T;

    /// Pushes a sample and returns the median of the resulting window.
    ///
    /// This is one step of a median filter.
    ///
    /// # Arguments
    ///
    /// * `value` - The new, finite sample
    ///
    /// # Returns
    ///
    /// * `T` - The median after the update
    #[inline]
    fn next(&mut self, value: T) -> T {
        self.update(value);
        self.median()
    }

    /// Releases every resource owned by the queue.
    ///
    /// The queue is consumed, so it can not be used afterwards.
    #[inline]
    fn release(self)
    where
        Self: Sized,
    {
    }
}

impl<T, Q> MedianQueue<T> for Option<Q>
where
    T: Float,
    Q: MedianQueue<T>,
{
    #[inline]
    fn period(&self) -> usize {
        self.as_ref().map_or(0, Q::period)
    }

    #[inline]
    fn update(&mut self, value: T) {
        if let Some(queue) = self {
            queue.update(value);
        }
    }

    #[inline]
    fn median(&self) -> T {
        self.as_ref().map_or_else(T::infinity, Q::median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeapMedianQueue;

    #[test]
    fn test_absent_queue_is_inert() {
        let mut queue: Option<HeapMedianQueue<f64>> = None;
        queue.update(1.0);
        assert_eq!(queue.period(), 0);
        assert_eq!(queue.median(), f64::INFINITY);
        assert_eq!(queue.next(2.0), f64::INFINITY);
        queue.release();
    }

    #[test]
    fn test_present_queue_delegates() {
        let mut queue = HeapMedianQueue::new(&[5.0, 1.0, 3.0]).ok();
        assert_eq!(queue.period(), 3);
        assert_eq!(queue.median(), 3.0);
        assert_eq!(queue.next(10.0), 3.0);
        assert_eq!(queue.next(0.0), 3.0);
        queue.release();
    }
}
