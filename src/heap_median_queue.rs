use num_traits::Float;
use ordered_float::PrimitiveFloat;
use tracing::debug;

use crate::{
    MedianQueue, Result,
    helper::check_period,
    utils::{DualHeap, Side, SlotRing},
};

/// A running median over a sliding window, updated in `O(log n)` per sample.
///
/// The window lives in a ring of slots, and the same values are split across
/// two binary heaps: a max-heap for the lower half and a min-heap for the upper
/// half. Each slot knows where its value sits in the heaps, so the oldest value
/// can be replaced in place without searching. The median is the root of the
/// lower heap and is read in `O(1)`.
///
/// For even periods the lower of the two middle values is reported.
///
/// # Examples
///
/// ```
/// use median_queue::{HeapMedianQueue, MedianQueue};
///
/// let mut queue = HeapMedianQueue::new(&[5.0, 1.0, 3.0]).unwrap();
/// assert_eq!(queue.median(), 3.0);
///
/// queue.update(10.0); // evicts 5.0
/// queue.update(0.0); // evicts 1.0
/// assert_eq!(queue.median(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct HeapMedianQueue<T> {
    /// Window values with back-references into the heaps
    ring: SlotRing<T>,
    /// The lower and upper halves of the window
    heaps: DualHeap<T>,
}

impl<T> HeapMedianQueue<T>
where
    T: Float + PrimitiveFloat,
{
    /// Creates a queue seeded with `values`, oldest first. The period is
    /// the number of values.
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
    /// `period` initial values are supplied.
    ///
    /// # Arguments
    ///
    /// * `period` - The window length
    /// * `values` - The initial window, oldest first
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The queue, or an error on a zero period, a length
    ///   mismatch or allocation failure
    pub fn with_period(period: usize, values: &[T]) -> Result<Self> {
        check_period(period, values.len())?;

        let mut ring = SlotRing::from_slice(values)?;
        let heaps = DualHeap::build(&mut ring)?;
        debug!(
            period,
            lower = heaps.lower_len(),
            upper = heaps.upper_len(),
            "built heap median queue"
        );

        Ok(Self { ring, heaps })
    }

    /// Returns an iterator over the window in logical (oldest to newest) order
    pub fn window(&self) -> impl Iterator<Item = T> + '_ {
        self.ring.iter()
    }

    /// Returns the values of the lower half, which includes the median, in heap order
    pub fn lower_half(&self) -> impl Iterator<Item = T> + '_ {
        self.heaps.values(Side::Lower)
    }

    /// Returns the values of the upper half in heap order
    pub fn upper_half(&self) -> impl Iterator<Item = T> + '_ {
        self.heaps.values(Side::Upper)
    }
}

impl<T> MedianQueue<T> for HeapMedianQueue<T>
where
    T: Float + PrimitiveFloat,
{
    #[inline]
    fn period(&self) -> usize {
        self.ring.period()
    }

    fn update(&mut self, value: T) {
        let (slot, location) = self.ring.evict(value);
        self.heaps.replace(&mut self.ring, slot, location, value);
    }

    #[inline]
    fn median(&self) -> T {
        self.heaps.median()
    }
}
