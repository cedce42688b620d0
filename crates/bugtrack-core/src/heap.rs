//! Vec-backed binary max-heap
//!
//! The tracker's priority structure. Kept separate from `BugTracker` so
//! the sift logic can be tested on plain integers.
//!
//! # Complexity
//!
//! - Push: O(log n)
//! - Pop max: O(log n)
//! - Peek max: O(1)
//!
//! Capacity is never shrunk on pop; the backing `Vec` keeps its length /
//! capacity split and is only grown through `try_reserve`, so allocation
//! failure surfaces as an error instead of an abort.

use std::collections::TryReserveError;

/// Binary max-heap over `T: Ord`
///
/// Layout: `items[0]` is the maximum, children of `i` are `2i+1` and `2i+2`.
#[derive(Debug)]
pub struct MaxHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MaxHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create with room for `capacity` items
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Largest item, if any
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Reserve room for `additional` more items without reallocating on push
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.items.try_reserve(additional)
    }

    /// Insert an item
    ///
    /// On allocation failure the heap is unchanged and `item` is dropped.
    pub fn try_push(&mut self, item: T) -> Result<(), TryReserveError> {
        self.items.try_reserve(1)?;
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Remove and return the largest item
    ///
    /// Swaps the root with the last slot, shrinks by one, then sifts the
    /// new root down.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.items.len().checked_sub(1)?;
        self.items.swap(0, last);
        let top = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// Remove every item in storage order (not priority order)
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.items[pos] <= self.items[parent] {
                break;
            }
            self.items.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let larger = if right < len && self.items[right] > self.items[left] {
                right
            } else {
                left
            };
            if self.items[larger] <= self.items[pos] {
                break;
            }
            self.items.swap(pos, larger);
            pos = larger;
        }
    }

    /// Check the heap property (every parent >= its children)
    pub fn is_valid(&self) -> bool {
        (1..self.items.len()).all(|i| self.items[(i - 1) / 2] >= self.items[i])
    }
}

impl<T: Ord> Default for MaxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random sequence (64-bit LCG)
    fn lcg(seed: u64, n: usize) -> Vec<u32> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 40) as u32 % 1000
            })
            .collect()
    }

    #[test]
    fn test_pop_empty() {
        let mut heap: MaxHeap<u32> = MaxHeap::new();
        assert!(heap.pop().is_none());
        assert!(heap.peek().is_none());
    }

    #[test]
    fn test_push_pop_order() {
        let mut heap = MaxHeap::new();
        for v in [9, 2, 5] {
            heap.try_push(v).unwrap();
        }

        assert_eq!(heap.peek(), Some(&9));
        assert_eq!(heap.pop(), Some(9));
        assert_eq!(heap.pop(), Some(5));
        assert_eq!(heap.pop(), Some(2));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_heap_property_holds() {
        let mut heap = MaxHeap::new();
        for v in lcg(7, 500) {
            heap.try_push(v).unwrap();
            assert!(heap.is_valid());
        }

        let mut prev = u32::MAX;
        while let Some(v) = heap.pop() {
            assert!(v <= prev);
            assert!(heap.is_valid());
            prev = v;
        }
    }

    #[test]
    fn test_matches_sorted_output() {
        let values = lcg(42, 257);
        let mut heap = MaxHeap::new();
        for &v in &values {
            heap.try_push(v).unwrap();
        }

        let mut expected = values.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let popped: Vec<_> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(popped, expected);
    }

    #[test]
    fn test_capacity_retained_after_pop() {
        let mut heap = MaxHeap::try_with_capacity(8).unwrap();
        for v in 0..8u32 {
            heap.try_push(v).unwrap();
        }
        let cap = heap.capacity();
        assert!(cap >= 8);

        while heap.pop().is_some() {}
        assert_eq!(heap.capacity(), cap);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_capacity_overflow_reported() {
        let result: Result<MaxHeap<u64>, _> = MaxHeap::try_with_capacity(usize::MAX);
        assert!(result.is_err());
    }

    #[test]
    fn test_drain_empties() {
        let mut heap = MaxHeap::new();
        for v in [3, 1, 2] {
            heap.try_push(v).unwrap();
        }
        assert_eq!(heap.drain().count(), 3);
        assert!(heap.is_empty());
    }
}
