use alloc::boxed::Box;
use num_traits::Float;
use ordered_float::{OrderedFloat, PrimitiveFloat};
use tracing::trace;

use super::slot_ring::{Location, Side, SlotRing};
use crate::{
    Result,
    helper::{lower_half_len, try_with_capacity},
};

/// A value stored in one of the heaps, tagged with the ring slot that owns it
#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    value: T,
    slot: usize,
}

/// Where a replacement value goes relative to the value it evicts.
///
/// The first half of each name is the half the new value belongs to, the
/// second half is the heap the evicted value was stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// New value is above the median, evicted value was in the lower heap
    UpperFromLower,
    /// New value is above the median, evicted value was in the upper heap
    UpperFromUpper,
    /// New value is at or below the median, evicted value was in the lower heap
    LowerFromLower,
    /// New value is at or below the median, evicted value was in the upper heap
    LowerFromUpper,
}

impl Placement {
    /// Classifies a replacement against the current median (`boundary`)
    #[inline]
    pub fn classify<T: PartialOrd>(value: T, boundary: T, evicted: Side) -> Self {
        match (value > boundary, evicted) {
            (true, Side::Lower) => Placement::UpperFromLower,
            (true, Side::Upper) => Placement::UpperFromUpper,
            (false, Side::Lower) => Placement::LowerFromLower,
            (false, Side::Upper) => Placement::LowerFromUpper,
        }
    }

    /// Returns `true` if the new value lands in the heap opposite to the one it belongs to
    #[inline]
    pub const fn crosses(self) -> bool {
        matches!(self, Placement::UpperFromLower | Placement::LowerFromUpper)
    }
}

/// Two array-backed binary heaps splitting a window at its lower median.
///
/// The lower heap is a max-heap of the smallest `ceil(n / 2)` values and its
/// root is the median; the upper heap is a min-heap of the rest. Heap sizes
/// are fixed at construction: every replacement removes one entry and writes
/// one entry in the same array cell.
///
/// Both heaps are 0-indexed, the children of `i` live at `2i + 1` and `2i + 2`.
/// Every entry movement is mirrored into the [`SlotRing`] passed to the
/// mutating methods, so the ring can always tell where its oldest value sits.
#[derive(Debug, Clone)]
pub struct DualHeap<T> {
    /// Max-heap of the lower half
    lower: Box<[Entry<T>]>,
    /// Min-heap of the upper half
    upper: Box<[Entry<T>]>,
}

impl<T> DualHeap<T>
where
    T: Float + PrimitiveFloat,
{
    /// Builds both heaps from the values held in `ring` and points every
    /// ring slot at its heap entry.
    ///
    /// The values are sorted once, split at the lower median, and each half
    /// is heapified bottom-up.
    ///
    /// # Arguments
    ///
    /// * `ring` - A freshly seeded, non-empty ring
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The heaps, or an allocation error
    pub fn build(ring: &mut SlotRing<T>) -> Result<Self> {
        let period = ring.period();
        let lower_len = lower_half_len(period);

        let mut sorted = try_with_capacity(period)?;
        sorted.extend((0..period).map(|slot| Entry {
            value: ring.value(slot),
            slot,
        }));
        sorted.sort_unstable_by_key(|entry| OrderedFloat(entry.value));

        let mut lower = try_with_capacity(lower_len)?;
        lower.extend_from_slice(&sorted[..lower_len]);
        let mut upper = try_with_capacity(period - lower_len)?;
        upper.extend_from_slice(&sorted[lower_len..]);

        let mut heaps = Self {
            lower: lower.into_boxed_slice(),
            upper: upper.into_boxed_slice(),
        };

        for side in [Side::Lower, Side::Upper] {
            for (index, entry) in heaps.heap(side).iter().enumerate() {
                ring.relocate(entry.slot, Location { side, index });
            }
            for index in (0..heaps.heap(side).len() / 2).rev() {
                heaps.sift_down(ring, side, index);
            }
        }

        Ok(heaps)
    }

    /// Returns the median, the root of the lower heap
    #[inline]
    pub fn median(&self) -> T {
        self.lower[0].value
    }

    /// Returns the number of values in the lower half
    #[inline]
    pub fn lower_len(&self) -> usize {
        self.lower.len()
    }

    /// Returns the number of values in the upper half
    #[inline]
    pub fn upper_len(&self) -> usize {
        self.upper.len()
    }

    /// Returns the values of one half in heap order
    pub fn values(&self, side: Side) -> impl Iterator<Item = T> + '_ {
        self.heap(side).iter().map(|entry| entry.value)
    }

    /// Replaces the value of `slot`, stored at `location`, with `value` and
    /// restores heap order, partition and back-references.
    ///
    /// The ring must already hold `value` in `slot`.
    ///
    /// # Returns
    ///
    /// * `Placement` - The route the value took through the heaps
    pub fn replace(
        &mut self,
        ring: &mut SlotRing<T>,
        slot: usize,
        location: Location,
        value: T,
    ) -> Placement {
        let placement = Placement::classify(value, self.median(), location.side);

        let entry = &mut self.heap_mut(location.side)[location.index];
        debug_assert_eq!(entry.slot, slot, "ring back-reference out of sync");
        entry.value = value;

        let index = self.sift_up(ring, location.side, location.index);
        if placement.crosses() {
            // the value dominates every other entry of its heap, so it is the root now
            debug_assert_eq!(index, 0);
            self.exchange_roots(ring);
        } else {
            self.sift_down(ring, location.side, index);
        }

        trace!(?placement, slot, "replaced window slot");
        debug_assert!(self.is_partitioned(), "lower half exceeds upper half");
        placement
    }

    /// Returns `true` if the lower root does not exceed the upper root
    #[inline]
    fn is_partitioned(&self) -> bool {
        self.upper
            .first()
            .is_none_or(|upper| self.lower[0].value <= upper.value)
    }

    #[inline]
    fn heap(&self, side: Side) -> &[Entry<T>] {
        match side {
            Side::Lower => &self.lower,
            Side::Upper => &self.upper,
        }
    }

    #[inline]
    fn heap_mut(&mut self, side: Side) -> &mut [Entry<T>] {
        match side {
            Side::Lower => &mut self.lower,
            Side::Upper => &mut self.upper,
        }
    }

    /// Swaps two entries of one heap and updates their slots
    fn swap(&mut self, ring: &mut SlotRing<T>, side: Side, a: usize, b: usize) {
        let heap = self.heap_mut(side);
        heap.swap(a, b);
        ring.relocate(heap[a].slot, Location { side, index: a });
        ring.relocate(heap[b].slot, Location { side, index: b });
    }

    /// Moves the roots across when the lower root exceeds the upper root,
    /// then sinks both newcomers to restore heap order.
    fn exchange_roots(&mut self, ring: &mut SlotRing<T>) {
        let (Some(lower_root), Some(upper_root)) = (self.lower.first_mut(), self.upper.first_mut())
        else {
            return;
        };
        if lower_root.value <= upper_root.value {
            return;
        }
        core::mem::swap(lower_root, upper_root);

        ring.relocate(
            self.lower[0].slot,
            Location {
                side: Side::Lower,
                index: 0,
            },
        );
        ring.relocate(
            self.upper[0].slot,
            Location {
                side: Side::Upper,
                index: 0,
            },
        );

        self.sift_down(ring, Side::Lower, 0);
        self.sift_down(ring, Side::Upper, 0);
    }

    /// Moves the entry at `index` towards the root while it dominates or
    /// ties with its parent.
    ///
    /// # Returns
    ///
    /// * `usize` - The final position of the entry
    fn sift_up(&mut self, ring: &mut SlotRing<T>, side: Side, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            let heap = self.heap(side);
            if !side.dominates_or_ties(heap[index].value, heap[parent].value) {
                break;
            }
            self.swap(ring, side, index, parent);
            index = parent;
        }
        index
    }

    /// Moves the entry at `index` towards the leaves while a child dominates it.
    ///
    /// # Returns
    ///
    /// * `usize` - The final position of the entry
    fn sift_down(&mut self, ring: &mut SlotRing<T>, side: Side, mut index: usize) -> usize {
        loop {
            let heap = self.heap(side);
            let left = 2 * index + 1;
            let right = left + 1;
            let mut top = index;

            if left < heap.len() && side.dominates(heap[left].value, heap[top].value) {
                top = left;
            }
            if right < heap.len() && side.dominates(heap[right].value, heap[top].value) {
                top = right;
            }
            if top == index {
                return index;
            }

            self.swap(ring, side, index, top);
            index = top;
        }
    }

    /// Panics unless heap order, partition and back-references all hold
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, ring: &SlotRing<T>) {
        assert_eq!(self.lower.len() + self.upper.len(), ring.period());
        assert_eq!(self.lower.len(), lower_half_len(ring.period()));

        for side in [Side::Lower, Side::Upper] {
            let heap = self.heap(side);
            for (index, entry) in heap.iter().enumerate() {
                if index > 0 {
                    let parent = heap[(index - 1) / 2].value;
                    assert!(
                        !side.dominates(entry.value, parent),
                        "{side:?} heap order broken at {index}"
                    );
                }
                assert_eq!(ring.location(entry.slot), Location { side, index });
                assert!(ring.value(entry.slot) == entry.value);
            }
        }

        let lower_max = self.values(Side::Lower).fold(Float::neg_infinity(), Float::max);
        let upper_min = self.values(Side::Upper).fold(Float::infinity(), Float::min);
        assert!(lower_max <= upper_min, "partition broken");
        assert!(lower_max == self.median());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn build(values: &[f64]) -> (SlotRing<f64>, DualHeap<f64>) {
        let mut ring = SlotRing::from_slice(values).unwrap();
        let heaps = DualHeap::build(&mut ring).unwrap();
        heaps.assert_invariants(&ring);
        (ring, heaps)
    }

    fn push(ring: &mut SlotRing<f64>, heaps: &mut DualHeap<f64>, value: f64) -> Placement {
        let (slot, location) = ring.evict(value);
        let placement = heaps.replace(ring, slot, location, value);
        heaps.assert_invariants(ring);
        placement
    }

    fn sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
        let mut values: Vec<_> = values.collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            Placement::classify(5.0, 3.0, Side::Lower),
            Placement::UpperFromLower
        );
        assert_eq!(
            Placement::classify(5.0, 3.0, Side::Upper),
            Placement::UpperFromUpper
        );
        assert_eq!(
            Placement::classify(3.0, 3.0, Side::Lower),
            Placement::LowerFromLower
        );
        assert_eq!(
            Placement::classify(1.0, 3.0, Side::Upper),
            Placement::LowerFromUpper
        );
    }

    #[test]
    fn test_build_splits_at_lower_median() {
        let (_, heaps) = build(&[9.0, 2.0, 7.0, 4.0, 5.0, 1.0, 8.0]);
        assert_eq!(heaps.lower_len(), 4);
        assert_eq!(heaps.upper_len(), 3);
        assert_eq!(sorted(heaps.values(Side::Lower)), [1.0, 2.0, 4.0, 5.0]);
        assert_eq!(sorted(heaps.values(Side::Upper)), [7.0, 8.0, 9.0]);
        assert_eq!(heaps.median(), 5.0);
    }

    #[test]
    fn test_build_even_window() {
        let (_, heaps) = build(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(heaps.lower_len(), 2);
        assert_eq!(heaps.upper_len(), 2);
        assert_eq!(heaps.median(), 2.0);
    }

    #[test]
    fn test_build_single_value() {
        let (_, heaps) = build(&[42.0]);
        assert_eq!(heaps.lower_len(), 1);
        assert_eq!(heaps.upper_len(), 0);
        assert_eq!(heaps.median(), 42.0);
    }

    #[test]
    fn test_upper_from_lower_exchanges_roots() {
        // lower = {1, 3}, upper = {5}; evicting 1 with 10 pushes 5 down into the lower half
        let (mut ring, mut heaps) = build(&[1.0, 5.0, 3.0]);
        assert_eq!(
            push(&mut ring, &mut heaps, 10.0),
            Placement::UpperFromLower
        );
        assert_eq!(heaps.median(), 5.0);
        assert_eq!(sorted(heaps.values(Side::Upper)), [10.0]);
    }

    #[test]
    fn test_upper_from_lower_without_exchange() {
        // lower = {1, 3}, upper = {9}; evicting 1 with 4 keeps 4 as the new lower root
        let (mut ring, mut heaps) = build(&[1.0, 9.0, 3.0]);
        assert_eq!(push(&mut ring, &mut heaps, 4.0), Placement::UpperFromLower);
        assert_eq!(heaps.median(), 4.0);
        assert_eq!(sorted(heaps.values(Side::Upper)), [9.0]);
    }

    #[test]
    fn test_upper_from_upper() {
        let (mut ring, mut heaps) = build(&[9.0, 1.0, 3.0, 7.0, 2.0]);
        assert_eq!(push(&mut ring, &mut heaps, 4.0), Placement::UpperFromUpper);
        assert_eq!(heaps.median(), 3.0);
    }

    #[test]
    fn test_lower_from_lower() {
        let (mut ring, mut heaps) = build(&[1.0, 9.0, 3.0, 7.0, 2.0]);
        assert_eq!(push(&mut ring, &mut heaps, 0.0), Placement::LowerFromLower);
        assert_eq!(heaps.median(), 3.0);
    }

    #[test]
    fn test_lower_from_upper_exchanges_roots() {
        let (mut ring, mut heaps) = build(&[9.0, 1.0, 3.0, 7.0, 2.0]);
        assert_eq!(push(&mut ring, &mut heaps, 0.0), Placement::LowerFromUpper);
        assert_eq!(heaps.median(), 2.0);
        assert_eq!(sorted(heaps.values(Side::Upper)), [3.0, 7.0]);
    }

    #[test]
    fn test_lower_from_upper_tie_with_median() {
        let (mut ring, mut heaps) = build(&[9.0, 1.0, 3.0]);
        assert_eq!(push(&mut ring, &mut heaps, 3.0), Placement::LowerFromUpper);
        assert_eq!(heaps.median(), 3.0);
    }

    #[test]
    fn test_single_value_window() {
        let (mut ring, mut heaps) = build(&[1.0]);
        push(&mut ring, &mut heaps, 5.0);
        assert_eq!(heaps.median(), 5.0);
        push(&mut ring, &mut heaps, -5.0);
        assert_eq!(heaps.median(), -5.0);
    }

    #[test]
    fn test_duplicates_keep_invariants() {
        let (mut ring, mut heaps) = build(&[2.0, 2.0, 2.0, 2.0]);
        for value in [2.0, 1.0, 2.0, 3.0, 2.0, 2.0, 1.0, 3.0] {
            push(&mut ring, &mut heaps, value);
        }
        let window = sorted(ring.iter());
        assert_eq!(heaps.median(), window[1]);
    }
}
