// point.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Color points and the blocks which partition them
use pix::rgb::{Rgb, SRgb8, SRgba8};

/// Number of color dimensions (red, green, blue)
const DIMENSIONS: usize = 3;

/// A point in RGB color space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point([u8; DIMENSIONS]);

impl From<SRgba8> for Point {
    fn from(clr: SRgba8) -> Self {
        Point([
            u8::from(Rgb::red(clr)),
            u8::from(Rgb::green(clr)),
            u8::from(Rgb::blue(clr)),
        ])
    }
}

impl From<SRgb8> for Point {
    fn from(clr: SRgb8) -> Self {
        Point([
            u8::from(Rgb::red(clr)),
            u8::from(Rgb::green(clr)),
            u8::from(Rgb::blue(clr)),
        ])
    }
}

impl From<Point> for SRgb8 {
    fn from(p: Point) -> Self {
        SRgb8::new(p.0[0], p.0[1], p.0[2])
    }
}

impl Point {
    /// Create a new point
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Point([red, green, blue])
    }

    /// Get the value along one dimension
    pub fn get(self, dim: usize) -> u8 {
        self.0[dim]
    }

    /// Get the squared distance to another point
    pub fn distance_sq(self, rhs: Self) -> u32 {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .map(|(a, b)| {
                let d = i32::from(*a) - i32::from(*b);
                (d * d) as u32
            })
            .sum()
    }
}

/// Axis-aligned block of color points
#[derive(Clone, Debug)]
pub struct ColorBlock {
    /// Minimum corner (inclusive)
    min_corner: Point,
    /// Maximum corner (inclusive)
    max_corner: Point,
    /// All points in the block (one per pixel)
    points: Vec<Point>,
}

impl ColorBlock {
    /// Create a block containing a set of points.
    ///
    /// The corners are shrunk to fit the points.
    pub fn new(points: Vec<Point>) -> Self {
        let mut block = ColorBlock {
            min_corner: Point([0; DIMENSIONS]),
            max_corner: Point([u8::MAX; DIMENSIONS]),
            points,
        };
        block.shrink();
        block
    }

    /// Recompute the corners as the exact bounds of all points
    fn shrink(&mut self) {
        let Some(first) = self.points.first() else {
            return;
        };
        let mut min = first.0;
        let mut max = first.0;
        for p in &self.points[1..] {
            for d in 0..DIMENSIONS {
                min[d] = min[d].min(p.0[d]);
                max[d] = max[d].max(p.0[d]);
            }
        }
        self.min_corner = Point(min);
        self.max_corner = Point(max);
    }

    /// Get the number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Get the minimum corner
    #[cfg(test)]
    pub fn min_corner(&self) -> Point {
        self.min_corner
    }

    /// Get the maximum corner
    #[cfg(test)]
    pub fn max_corner(&self) -> Point {
        self.max_corner
    }

    /// Get the dimension of the longest side (lowest wins on ties)
    pub fn longest_side_index(&self) -> usize {
        let mut longest = 0;
        for d in 1..DIMENSIONS {
            if self.side_length(d) > self.side_length(longest) {
                longest = d;
            }
        }
        longest
    }

    /// Get the length of the longest side
    pub fn longest_side_length(&self) -> u8 {
        self.side_length(self.longest_side_index())
    }

    fn side_length(&self, dim: usize) -> u8 {
        self.max_corner.get(dim) - self.min_corner.get(dim)
    }

    /// Check if the block can be split
    pub fn is_splittable(&self) -> bool {
        self.len() > 1 && self.longest_side_length() > 0
    }

    /// Split at the median of the longest side.
    ///
    /// The first block gets `len / 2` points; the second gets the rest,
    /// including the median point.
    pub fn split(mut self) -> (Self, Self) {
        let dim = self.longest_side_index();
        self.points.sort_unstable_by_key(|p| p.get(dim));
        let median = self.points.len() / 2;
        let upper = self.points.split_off(median);
        (ColorBlock::new(self.points), ColorBlock::new(upper))
    }

    /// Get the average color of all points (truncated per channel)
    pub fn average(&self) -> Point {
        let mut sum = [0u64; DIMENSIONS];
        for p in &self.points {
            for d in 0..DIMENSIONS {
                sum[d] += u64::from(p.0[d]);
            }
        }
        let n = (self.points.len() as u64).max(1);
        Point([
            (sum[0] / n) as u8,
            (sum[1] / n) as u8,
            (sum[2] / n) as u8,
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn block(pts: &[(u8, u8, u8)]) -> ColorBlock {
        ColorBlock::new(pts.iter().map(|(r, g, b)| Point::new(*r, *g, *b)).collect())
    }

    #[test]
    fn shrink_bounds() {
        let b = block(&[(10, 200, 30), (40, 20, 60), (25, 100, 0)]);
        assert_eq!(b.min_corner(), Point::new(10, 20, 0));
        assert_eq!(b.max_corner(), Point::new(40, 200, 60));
        assert_eq!(b.longest_side_index(), 1);
        assert_eq!(b.longest_side_length(), 180);
    }

    #[test]
    fn single_point() {
        let b = block(&[(5, 6, 7)]);
        assert_eq!(b.longest_side_length(), 0);
        assert!(!b.is_splittable());
        assert_eq!(b.average(), Point::new(5, 6, 7));
    }

    #[test]
    fn same_color() {
        let b = block(&[(1, 1, 1), (1, 1, 1)]);
        assert!(!b.is_splittable());
    }

    #[test]
    fn split_median() {
        let b = block(&[(90, 0, 0), (10, 0, 0), (50, 0, 0), (30, 0, 0), (70, 0, 0)]);
        let (lo, hi) = b.split();
        assert_eq!(lo.len(), 2);
        assert_eq!(hi.len(), 3);
        assert_eq!(lo.min_corner(), Point::new(10, 0, 0));
        assert_eq!(lo.max_corner(), Point::new(30, 0, 0));
        assert_eq!(hi.min_corner(), Point::new(50, 0, 0));
        assert_eq!(hi.max_corner(), Point::new(90, 0, 0));
    }

    #[test]
    fn average_truncates() {
        let b = block(&[(0, 1, 255), (1, 2, 254)]);
        assert_eq!(b.average(), Point::new(0, 1, 254));
    }

    #[test]
    fn distance() {
        let a = Point::new(0, 0, 0);
        let b = Point::new(3, 4, 0);
        assert_eq!(a.distance_sq(b), 25);
        assert_eq!(b.distance_sq(a), 25);
    }
}
