use alloc::boxed::Box;

use crate::{Result, helper::try_boxed_copy};

/// A full, fixed-size circular buffer holding the raw values of a window.
///
/// The window is seeded with exactly `period` values and stays full for its
/// whole life: every new value overwrites the oldest one.
#[derive(Debug, Clone)]
pub struct Window<T> {
    /// The buffer that stores the values
    buf: Box<[T]>,
    /// The position of the oldest value, overwritten by the next push
    pos: usize,
}

impl<T: Copy> Window<T> {
    /// Creates a window seeded with `values`, oldest first
    ///
    /// # Arguments
    ///
    /// * `values` - The initial values, must be non-empty
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The window, or an allocation error
    pub fn from_slice(values: &[T]) -> Result<Self> {
        debug_assert!(!values.is_empty(), "period can not be zero");
        Ok(Self {
            buf: try_boxed_copy(values)?,
            pos: 0,
        })
    }

    /// Returns the period of the window
    #[inline]
    pub fn period(&self) -> usize {
        self.buf.len()
    }

    /// Pushes a new value into the window and returns the value that was evicted
    ///
    /// # Arguments
    ///
    /// * `value` - The value to push into the window
    ///
    /// # Returns
    ///
    /// * `T` - The oldest value, now evicted from the window
    pub fn next(&mut self, value: T) -> T {
        let prev = core::mem::replace(&mut self.buf[self.pos], value);
        self.pos = (self.pos + 1) % self.period();
        prev
    }

    /// Returns an iterator over the elements in logical (oldest to newest) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newest, oldest) = self.buf.split_at(self.pos);
        oldest.iter().chain(newest.iter())
    }

    /// Returns the values in physical order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }
}
