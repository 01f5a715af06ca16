// paletted.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
use crate::error::{Error, Result};
use pix::gray::{Gray, Gray8};
use pix::rgb::SRgb8;
use pix::{Palette, Raster};

/// Indexed-color image: a raster of palette indices plus its palette.
///
/// Every index is a valid palette position.
pub struct PalettedImage {
    /// Raster of palette indices
    raster: Raster<Gray8>,
    /// Color palette
    palette: Palette,
    /// Fully transparent palette index
    transparent: Option<u8>,
    /// Left position within the logical screen
    left: u16,
    /// Top position within the logical screen
    top: u16,
}

impl Clone for PalettedImage {
    fn clone(&self) -> Self {
        PalettedImage {
            raster: Raster::with_raster(&self.raster),
            palette: copy_palette(&self.palette),
            transparent: self.transparent,
            left: self.left,
            top: self.top,
        }
    }
}

impl PalettedImage {
    /// Create a paletted image.
    ///
    /// ## Errors
    /// * [MissingColorTable] if the palette is empty.
    /// * [InvalidColorIndex] if any raster index is outside the palette.
    ///
    /// [MissingColorTable]: enum.Error.html#variant.MissingColorTable
    /// [InvalidColorIndex]: enum.Error.html#variant.InvalidColorIndex
    pub fn new(raster: Raster<Gray8>, palette: Palette) -> Result<Self> {
        if palette.len() == 0 {
            return Err(Error::MissingColorTable);
        }
        let len = palette.len();
        if raster.pixels().iter().any(|p| idx(*p) >= len) {
            return Err(Error::InvalidColorIndex);
        }
        Ok(PalettedImage {
            raster,
            palette,
            transparent: None,
            left: 0,
            top: 0,
        })
    }

    /// Set the position within the logical screen
    pub fn with_offset(mut self, left: u16, top: u16) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Set the fully transparent palette index
    pub fn with_transparent(mut self, transparent: Option<u8>) -> Result<Self> {
        if let Some(t) = transparent {
            if usize::from(t) >= self.palette.len() {
                return Err(Error::InvalidColorIndex);
            }
        }
        self.transparent = transparent;
        Ok(self)
    }

    /// Get the width in pixels
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Get the height in pixels
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Get the left position
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Get the top position
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Get the raster of palette indices
    pub fn raster(&self) -> &Raster<Gray8> {
        &self.raster
    }

    /// Get the palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Get the transparent palette index
    pub fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    /// Get the palette index of one pixel
    pub fn index(&self, x: u32, y: u32) -> u8 {
        u8::from(Gray::value(self.raster.pixel(x as i32, y as i32)))
    }

    /// Get the color of one pixel (`None` if transparent)
    pub fn color(&self, x: u32, y: u32) -> Option<SRgb8> {
        let i = self.index(x, y);
        if self.transparent == Some(i) {
            None
        } else {
            self.palette.entry(i.into())
        }
    }

    /// Get palette indices in row-major order
    pub(crate) fn indices(&self) -> Vec<u8> {
        self.raster.pixels().iter().map(|p| idx(*p) as u8).collect()
    }

    /// Check that both dimensions fit in 16 bits
    pub(crate) fn check_dimensions(&self) -> Result<()> {
        if self.width() > u32::from(u16::MAX) || self.height() > u32::from(u16::MAX)
        {
            Err(Error::InvalidDimensions)
        } else {
            Ok(())
        }
    }
}

/// Copy a palette entry by entry
fn copy_palette(palette: &Palette) -> Palette {
    let mut copy = Palette::new(palette.len());
    for i in 0..palette.len() {
        if let Some(clr) = palette.entry(i) {
            copy.set_entry(clr);
        }
    }
    copy
}

fn idx(p: Gray8) -> usize {
    u8::from(Gray::value(p)).into()
}
