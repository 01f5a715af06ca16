// quantize.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Median-cut color quantization
use crate::error::{Error, Result};
use crate::paletted::PalettedImage;
use crate::point::{ColorBlock, Point};
use crate::queue::BlockQueue;
use pix::el::Pixel;
use pix::gray::Gray8;
use pix::rgb::{SRgb8, SRgba8};
use pix::{Palette, Raster};
use std::collections::{HashMap, HashSet};

/// Maximum number of colors in a GIF palette
const MAX_COLORS: usize = 256;

/// Color quantizer, reducing a true color raster to a paletted image
pub trait Quantizer {
    /// Quantize a raster
    fn quantize(&self, raster: &Raster<SRgba8>) -> Result<PalettedImage>;
}

/// Median-cut quantizer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MedianCut {
    /// Maximum number of palette colors
    max_colors: usize,
}

impl Default for MedianCut {
    fn default() -> Self {
        MedianCut::new(MAX_COLORS)
    }
}

impl MedianCut {
    /// Create a median-cut quantizer with a maximum palette size
    pub fn new(max_colors: usize) -> Self {
        MedianCut { max_colors }
    }

    /// Get the maximum palette size
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }
}

impl Quantizer for MedianCut {
    fn quantize(&self, raster: &Raster<SRgba8>) -> Result<PalettedImage> {
        quantize(raster, self.max_colors)
    }
}

/// Quantize a raster to at most `max_colors` palette entries.
///
/// When the raster has no more distinct colors than allowed, the palette
/// holds exactly those colors (in order of first appearance) and the
/// result is lossless.  Otherwise, colors are partitioned by median cut
/// and each pixel is mapped to the nearest palette entry by squared RGB
/// distance, lowest index winning ties.
///
/// Fully transparent pixels (alpha 0) share one palette entry, the last
/// one, which is set as the transparent index.  That entry counts toward
/// `max_colors`; with `max_colors` of 1, alpha is ignored.
///
/// ## Errors
/// * [InvalidColorCount] if `max_colors` is not in `1..=256`.
/// * [QuantizationFailure] if the raster has zero area.
///
/// [InvalidColorCount]: enum.Error.html#variant.InvalidColorCount
/// [QuantizationFailure]: enum.Error.html#variant.QuantizationFailure
pub fn quantize(
    raster: &Raster<SRgba8>,
    max_colors: usize,
) -> Result<PalettedImage> {
    if max_colors == 0 || max_colors > MAX_COLORS {
        return Err(Error::InvalidColorCount);
    }
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(Error::QuantizationFailure);
    }
    let any_transparent =
        raster.pixels().iter().any(|p| is_transparent(*p));
    let has_transparent = any_transparent && max_colors > 1;
    if any_transparent && !has_transparent {
        warn!("No room for transparent color; ignoring alpha");
    }
    let budget = max_colors - usize::from(has_transparent);
    let points: Vec<Point> = raster
        .pixels()
        .iter()
        .filter(|p| !(has_transparent && is_transparent(**p)))
        .map(|p| Point::from(*p))
        .collect();
    let distinct = distinct_colors(&points);
    let colors = if distinct.len() <= budget {
        debug!("{} distinct colors; no partitioning", distinct.len());
        distinct
    } else {
        dedup(median_cut(points, budget))
    };
    let transparent = if has_transparent {
        let t = colors.len() as u8;
        Some(t)
    } else {
        None
    };
    let mut palette = Palette::new(colors.len() + usize::from(has_transparent));
    for clr in &colors {
        palette.set_entry(SRgb8::from(*clr));
    }
    if has_transparent {
        palette.set_entry(SRgb8::from(unused_color(&colors)));
    }
    debug!(
        "quantized {}x{} to {} colors (transparent: {:?})",
        width,
        height,
        palette.len(),
        transparent
    );
    let mut nearest = NearestColor::new(&colors);
    let mut indexed = Raster::<Gray8>::with_clear(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let clr = raster.pixel(x, y);
            let i = match transparent {
                Some(t) if is_transparent(clr) => t,
                _ => nearest.index(Point::from(clr)),
            };
            *indexed.pixel_mut(x, y) = Gray8::new(i);
        }
    }
    PalettedImage::new(indexed, palette)?.with_transparent(transparent)
}

/// Check whether a color is fully transparent
fn is_transparent(clr: SRgba8) -> bool {
    u8::from(clr.alpha()) == 0
}

/// Get distinct colors, in order of first appearance
fn distinct_colors(points: &[Point]) -> Vec<Point> {
    let mut seen = HashSet::new();
    points.iter().copied().filter(|p| seen.insert(*p)).collect()
}

/// Remove duplicate colors, keeping the first of each
fn dedup(colors: Vec<Point>) -> Vec<Point> {
    let n = colors.len();
    let colors = distinct_colors(&colors);
    if colors.len() < n {
        debug!("merged {} duplicate palette colors", n - colors.len());
    }
    colors
}

/// Partition points into at most `budget` blocks, returning their averages
fn median_cut(points: Vec<Point>, budget: usize) -> Vec<Point> {
    let mut queue = BlockQueue::new();
    queue.push(ColorBlock::new(points));
    while queue.len() < budget {
        match queue.peek() {
            Some(block) if block.is_splittable() => (),
            _ => break,
        }
        if let Some(block) = queue.pop() {
            let (lower, upper) = block.split();
            trace!(
                "split: {} + {} points, sides {} / {}",
                lower.len(),
                upper.len(),
                lower.longest_side_length(),
                upper.longest_side_length()
            );
            queue.push(lower);
            queue.push(upper);
        }
    }
    debug!("median cut: {} blocks (budget {})", queue.len(), budget);
    let mut colors = Vec::with_capacity(queue.len());
    while let Some(block) = queue.pop() {
        colors.push(block.average());
    }
    colors
}

/// Find a color not used by any palette entry
fn unused_color(colors: &[Point]) -> Point {
    let used: HashSet<Point> = colors.iter().copied().collect();
    (0..=u8::MAX)
        .map(|b| Point::new(0, 0, b))
        .find(|p| !used.contains(p))
        .unwrap_or_default()
}

/// Nearest palette color lookup, with a cache per source color
struct NearestColor<'a> {
    /// Opaque palette colors
    colors: &'a [Point],
    /// Cached results
    cache: HashMap<Point, u8>,
}

impl<'a> NearestColor<'a> {
    fn new(colors: &'a [Point]) -> Self {
        NearestColor {
            colors,
            cache: HashMap::new(),
        }
    }

    /// Get the index of the nearest color (lowest index on ties)
    fn index(&mut self, clr: Point) -> u8 {
        let colors = self.colors;
        *self.cache.entry(clr).or_insert_with(|| {
            let mut best = 0;
            let mut best_dist = u32::MAX;
            for (i, c) in colors.iter().enumerate() {
                let dist = clr.distance_sq(*c);
                if dist < best_dist {
                    best = i;
                    best_dist = dist;
                }
            }
            best as u8
        })
    }
}
