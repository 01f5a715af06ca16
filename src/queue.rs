// queue.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Priority queue of color blocks
use crate::point::ColorBlock;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry, ordered by longest side length
#[derive(Debug)]
struct Entry(ColorBlock);

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.0.longest_side_length() == other.0.longest_side_length()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .longest_side_length()
            .cmp(&other.0.longest_side_length())
    }
}

/// Max-heap of color blocks, keyed by longest side length.
///
/// Order among blocks with equal side lengths is unspecified.
#[derive(Debug, Default)]
pub struct BlockQueue {
    heap: BinaryHeap<Entry>,
}

impl BlockQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        BlockQueue::default()
    }

    /// Get the number of queued blocks
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Push a block
    pub fn push(&mut self, block: ColorBlock) {
        self.heap.push(Entry(block));
    }

    /// Remove the block with the longest side
    pub fn pop(&mut self) -> Option<ColorBlock> {
        self.heap.pop().map(|e| e.0)
    }

    /// Peek at the block with the longest side
    pub fn peek(&self) -> Option<&ColorBlock> {
        self.heap.peek().map(|e| &e.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::point::Point;

    fn block(lo: u8, hi: u8) -> ColorBlock {
        ColorBlock::new(vec![Point::new(lo, 0, 0), Point::new(hi, 0, 0)])
    }

    #[test]
    fn empty() {
        let mut q = BlockQueue::new();
        assert_eq!(q.len(), 0);
        assert!(q.peek().is_none());
        assert!(q.pop().is_none());
    }

    #[test]
    fn pop_max() {
        let mut q = BlockQueue::new();
        q.push(block(0, 10));
        q.push(block(0, 200));
        q.push(block(50, 100));
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek().unwrap().longest_side_length(), 200);
        assert_eq!(q.pop().unwrap().longest_side_length(), 200);
        assert_eq!(q.pop().unwrap().longest_side_length(), 50);
        assert_eq!(q.pop().unwrap().longest_side_length(), 10);
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn interleaved() {
        // simple LCG so the sequence is repeatable
        let mut seed = 0x2545_F491u32;
        let mut next = move || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as u8
        };
        let mut q = BlockQueue::new();
        let mut lengths = vec![];
        for round in 0..200 {
            if round % 3 == 2 {
                let popped = q.pop().unwrap().longest_side_length();
                let max = *lengths.iter().max().unwrap();
                assert_eq!(popped, max);
                let i = lengths.iter().position(|l| *l == max).unwrap();
                lengths.swap_remove(i);
            } else {
                let hi = next();
                let b = block(0, hi);
                lengths.push(b.longest_side_length());
                q.push(b);
            }
            if let Some(top) = q.peek() {
                assert_eq!(
                    top.longest_side_length(),
                    *lengths.iter().max().unwrap()
                );
            }
        }
    }
}
