// block.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF blocks, as written to a data stream
use pix::rgb::{Rgb, SRgb8};
use pix::Palette;

/// Bytes per color table entry
const CHANNELS: usize = 3;

/// Get the number of bits needed to index a table (1 to 8)
fn table_bits(n_colors: usize) -> u8 {
    let mut bits = 1;
    while (1 << bits) < n_colors && bits < 8 {
        bits += 1;
    }
    bits
}

/// Color table, padded with black to a power of two entries (2 to 256)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    /// Packed RGB triples
    colors: Vec<u8>,
    /// Bits per pixel of table indices
    bits: u8,
}

impl ColorTable {
    /// Make a color table from a palette.
    ///
    /// Entries past 256 are ignored.
    pub fn with_palette(palette: &Palette) -> Self {
        let bits = table_bits(palette.len());
        let len = 1 << bits;
        let mut colors = Vec::with_capacity(len * CHANNELS);
        for i in 0..len {
            let clr = palette.entry(i).unwrap_or(SRgb8::new(0, 0, 0));
            colors.push(u8::from(Rgb::red(clr)));
            colors.push(u8::from(Rgb::green(clr)));
            colors.push(u8::from(Rgb::blue(clr)));
        }
        ColorTable { colors, bits }
    }

    /// Get bits per pixel of table indices
    pub fn bits_per_pixel(&self) -> u8 {
        self.bits
    }

    /// Get the packed size field (bits per pixel - 1)
    fn size_field(&self) -> u8 {
        self.bits - 1
    }

    /// Get the packed RGB triples
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    pub fn signature(&self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

/// File header (always `GIF89a`)
#[derive(Debug, Default, Clone)]
pub struct Header {}

/// Logical screen descriptor
#[derive(Debug, Default, Clone)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    /// Mark a global color table as present.
    ///
    /// Color resolution is set to the table's bits per pixel.
    pub fn with_color_table(mut self, tbl: &ColorTable) -> Self {
        let sz = tbl.size_field() & Self::COLOR_TABLE_SIZE;
        self.flags = Self::COLOR_TABLE_PRESENT
            | ((sz << 4) & Self::COLOR_RESOLUTION)
            | sz;
        self
    }
}

/// Global color table, following the logical screen descriptor
#[derive(Debug, Clone)]
pub struct GlobalColorTable {
    table: ColorTable,
}

impl GlobalColorTable {
    pub fn with_table(table: ColorTable) -> Self {
        GlobalColorTable { table }
    }
    pub fn colors(&self) -> &[u8] {
        self.table.colors()
    }
}

/// Graphic control extension: frame delay and transparency
#[derive(Debug, Default, Clone)]
pub struct GraphicControl {
    flags: u8,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

impl GraphicControl {
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn with_delay_time_cs(mut self, delay_time_cs: u16) -> Self {
        self.delay_time_cs = delay_time_cs;
        self
    }
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }
    pub fn with_transparent_color(mut self, transparent: Option<u8>) -> Self {
        match transparent {
            Some(t) => {
                self.flags |= Self::TRANSPARENT_COLOR;
                self.transparent_color_idx = t;
            }
            None => {
                self.flags &= !Self::TRANSPARENT_COLOR;
                self.transparent_color_idx = 0;
            }
        }
        self
    }
}

/// NETSCAPE2.0 application extension, for looping animations
#[derive(Debug, Default, Clone)]
pub struct Application {
    loop_count: u16,
}

impl Application {
    /// Application identifier and authentication code
    pub(crate) const NETSCAPE: &'static [u8; 11] = b"NETSCAPE2.0";

    /// Make a looping extension (zero means loop forever)
    pub fn with_loop_count(loop_count: u16) -> Self {
        Application { loop_count }
    }
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }
}

/// Image descriptor
#[derive(Debug, Default, Clone)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn with_left(mut self, left: u16) -> Self {
        self.left = left;
        self
    }
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn with_top(mut self, top: u16) -> Self {
        self.top = top;
        self
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    /// Mark a local color table as present
    pub fn with_color_table(mut self, tbl: &ColorTable) -> Self {
        self.flags = Self::COLOR_TABLE_PRESENT
            | (tbl.size_field() & Self::COLOR_TABLE_SIZE);
        self
    }
}

/// Local color table, following an image descriptor
#[derive(Debug, Clone)]
pub struct LocalColorTable {
    table: ColorTable,
}

impl LocalColorTable {
    pub fn with_table(table: ColorTable) -> Self {
        LocalColorTable { table }
    }
    pub fn colors(&self) -> &[u8] {
        self.table.colors()
    }
}

/// Image data: one color index per pixel, LZW compressed when written
#[derive(Debug, Clone)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>,
}

impl ImageData {
    /// Make image data with an LZW minimum code size (clamped to 2...8)
    pub fn new(min_code_size: u8, data: Vec<u8>) -> Self {
        ImageData {
            min_code_size: min_code_size.clamp(2, 8),
            data,
        }
    }
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Default, Clone)]
pub struct Trailer {}

/// Any block which can be written
#[derive(Debug, Clone)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GlobalColorTable(GlobalColorTable),
    GraphicControl(GraphicControl),
    Application(Application),
    ImageDesc(ImageDesc),
    LocalColorTable(LocalColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<GlobalColorTable> for Block {
    fn from(b: GlobalColorTable) -> Self {
        Block::GlobalColorTable(b)
    }
}

impl From<GraphicControl> for Block {
    fn from(b: GraphicControl) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<LocalColorTable> for Block {
    fn from(b: LocalColorTable) -> Self {
        Block::LocalColorTable(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}
