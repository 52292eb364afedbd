use alloc::boxed::Box;

use crate::{Result, helper::try_with_capacity};

/// The half of the window a value currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The max-heap holding the lower half, its root is the median
    Lower,
    /// The min-heap holding the upper half
    Upper,
}

impl Side {
    /// Returns `true` if `a` belongs strictly above `b` in this side's heap
    #[inline]
    pub fn dominates<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Side::Lower => a > b,
            Side::Upper => a < b,
        }
    }

    /// Returns `true` if `a` belongs above `b` or ties with it
    #[inline]
    pub fn dominates_or_ties<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Side::Lower => a >= b,
            Side::Upper => a <= b,
        }
    }
}

/// Where a window slot's value currently sits inside the heaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// The heap holding the value
    pub side: Side,
    /// The position inside that heap's array
    pub index: usize,
}

/// One physical position of the ring
#[derive(Debug, Clone, Copy)]
pub struct Slot<T> {
    /// The raw sample
    pub value: T,
    /// Back-reference into the heaps
    pub location: Location,
}

/// A full circular buffer of window values, each slot carrying a
/// back-reference to the heap entry that mirrors it.
///
/// The ring only stores locations; keeping them correct is the job of
/// whoever moves heap entries (see [`DualHeap`](super::DualHeap)).
#[derive(Debug, Clone)]
pub struct SlotRing<T> {
    /// One slot per window position
    slots: Box<[Slot<T>]>,
    /// The slot evicted by the next push
    oldest: usize,
}

impl<T: Copy> SlotRing<T> {
    /// Creates a ring seeded with `values`, oldest first.
    ///
    /// Locations start out as `(Lower, i)` placeholders until the heaps are built.
    pub fn from_slice(values: &[T]) -> Result<Self> {
        let mut slots = try_with_capacity(values.len())?;
        slots.extend(values.iter().enumerate().map(|(index, &value)| Slot {
            value,
            location: Location {
                side: Side::Lower,
                index,
            },
        }));
        Ok(Self {
            slots: slots.into_boxed_slice(),
            oldest: 0,
        })
    }

    /// Returns the number of slots in the ring
    #[inline]
    pub fn period(&self) -> usize {
        self.slots.len()
    }

    /// Returns the value held by `slot`
    #[inline]
    pub fn value(&self, slot: usize) -> T {
        self.slots[slot].value
    }

    /// Returns the heap location of `slot`
    #[inline]
    pub fn location(&self, slot: usize) -> Location {
        self.slots[slot].location
    }

    /// Points `slot` at a new heap location
    #[inline]
    pub fn relocate(&mut self, slot: usize, location: Location) {
        self.slots[slot].location = location;
    }

    /// Overwrites the oldest slot with `value` and advances the cursor.
    ///
    /// # Returns
    ///
    /// * `(usize, Location)` - The overwritten slot and where its old value sits in the heaps
    pub fn evict(&mut self, value: T) -> (usize, Location) {
        let slot = self.oldest;
        self.slots[slot].value = value;
        self.oldest = (slot + 1) % self.period();
        (slot, self.location(slot))
    }

    /// Returns an iterator over the values in logical (oldest to newest) order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newest, oldest) = self.slots.split_at(self.oldest);
        oldest.iter().chain(newest.iter()).map(|slot| slot.value)
    }
}
