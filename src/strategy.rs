use core::{fmt, str::FromStr};

use num_traits::Float;
use ordered_float::PrimitiveFloat;
use thiserror::Error;

use crate::{HeapMedianQueue, MedianQueue, ReselectMedianQueue, Result, SortedMedianQueue};

/// The algorithm backing a [`MedianFilter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Two cross-indexed heaps, `O(log n)` per update
    #[default]
    DualHeap,
    /// Selection over a copy of the whole window, `O(n)` expected per update
    Reselect,
    /// Sorted shadow of the window, `O(n)` per update
    Sorted,
}

impl Strategy {
    /// Every strategy, in declaration order
    pub const ALL: [Strategy; 3] = [Strategy::DualHeap, Strategy::Reselect, Strategy::Sorted];

    /// Returns the name accepted by [`FromStr`]
    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::DualHeap => "dual-heap",
            Strategy::Reselect => "reselect",
            Strategy::Sorted => "sorted",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a strategy name is not recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown median strategy, expected one of: dual-heap, reselect, sorted")]
pub struct ParseStrategyError;

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseStrategyError)
    }
}

/// A running median whose backend is chosen at construction time.
///
/// Every variant honours the same [`MedianQueue`] contract and reports the
/// same medians for the same input, so callers can swap strategies freely.
///
/// # Examples
///
/// ```
/// use median_queue::{MedianFilter, MedianQueue, Strategy};
///
/// let signal = [1.0, 9.0, 2.0, 8.0, 3.0, 7.0];
/// let mut filter = MedianFilter::new(Strategy::DualHeap, &signal[..3]).unwrap();
/// let smoothed: Vec<f64> = signal[3..].iter().map(|&x| filter.next(x)).collect();
/// assert_eq!(smoothed, [8.0, 3.0, 7.0]);
/// ```
#[derive(Debug, Clone)]
pub enum MedianFilter<T> {
    /// Backed by [`HeapMedianQueue`]
    DualHeap(HeapMedianQueue<T>),
    /// Backed by [`ReselectMedianQueue`]
    Reselect(ReselectMedianQueue<T>),
    /// Backed by [`SortedMedianQueue`]
    Sorted(SortedMedianQueue<T>),
}

impl<T> MedianFilter<T>
where
    T: Float + PrimitiveFloat,
{
    /// Creates a filter seeded with `values` using the given strategy
    ///
    /// # Arguments
    ///
    /// * `strategy` - The backend to use
    /// * `values` - The initial window, oldest first, must be non-empty
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The filter, or a construction error
    pub fn new(strategy: Strategy, values: &[T]) -> Result<Self> {
        Self::with_period(strategy, values.len(), values)
    }

    /// Creates a filter with an explicit period, checking that exactly
    /// `period` initial values are supplied
    pub fn with_period(strategy: Strategy, period: usize, values: &[T]) -> Result<Self> {
        Ok(match strategy {
            Strategy::DualHeap => {
                MedianFilter::DualHeap(HeapMedianQueue::with_period(period, values)?)
            }
            Strategy::Reselect => {
                MedianFilter::Reselect(ReselectMedianQueue::with_period(period, values)?)
            }
            Strategy::Sorted => MedianFilter::Sorted(SortedMedianQueue::with_period(period, values)?),
        })
    }

    /// Returns the strategy backing this filter
    pub const fn strategy(&self) -> Strategy {
        match self {
            MedianFilter::DualHeap(_) => Strategy::DualHeap,
            MedianFilter::Reselect(_) => Strategy::Reselect,
            MedianFilter::Sorted(_) => Strategy::Sorted,
        }
    }
}

impl<T> MedianQueue<T> for MedianFilter<T>
where
    T: Float + PrimitiveFloat,
{
    fn period(&self) -> usize {
        match self {
            MedianFilter::DualHeap(queue) => queue.period(),
            MedianFilter::Reselect(queue) => queue.period(),
            MedianFilter::Sorted(queue) => queue.period(),
        }
    }

    fn update(&mut self, value: T) {
        match self {
            MedianFilter::DualHeap(queue) => queue.update(value),
            MedianFilter::Reselect(queue) => queue.update(value),
            MedianFilter::Sorted(queue) => queue.update(value),
        }
    }

    fn median(&self) -> T {
        match self {
            MedianFilter::DualHeap(queue) => queue.median(),
            MedianFilter::Reselect(queue) => queue.median(),
            MedianFilter::Sorted(queue) => queue.median(),
        }
    }
}
