// encode.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF file encoding
use crate::block::*;
use crate::chunk::SubBlockWriter;
use crate::error::Result;
use crate::lzw::Compressor;
use crate::paletted::PalettedImage;
use std::io::{self, Write};

/// Writer which stops writing after the first error.
///
/// Once the inner writer fails, every later write or flush fails without
/// reaching it.
pub(crate) struct StickyWriter<W: Write> {
    /// Inner writer
    writer: W,
    /// Has a write failed?
    failed: bool,
}

impl<W: Write> StickyWriter<W> {
    /// Create a new sticky writer
    pub(crate) fn new(writer: W) -> Self {
        StickyWriter {
            writer,
            failed: false,
        }
    }

    fn check<T>(&mut self, res: io::Result<T>) -> io::Result<T> {
        if matches!(&res, Err(e) if e.kind() != io::ErrorKind::Interrupted) {
            warn!("write failed; discarding further output");
            self.failed = true;
        }
        res
    }

    fn failed_err() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "previous write failed")
    }
}

impl<W: Write> Write for StickyWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            return Err(Self::failed_err());
        }
        let res = self.writer.write(buf);
        self.check(res)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.failed {
            return Err(Self::failed_err());
        }
        let res = self.writer.flush();
        self.check(res)
    }
}

/// Encoder for writing [Block]s into a GIF file.
///
/// Build with Encoder.[into_block_enc].  Blocks are written in the order
/// given; no validation of block sequence is done.
///
/// [Block]: block/enum.Block.html
/// [into_block_enc]: struct.Encoder.html#method.into_block_enc
pub struct BlockEnc<W: Write> {
    /// Writer for blocks
    writer: W,
}

/// Encoder for writing paletted frames into a GIF file.
///
/// The preamble (header, logical screen, global color table and optional
/// loop extension) is derived from the first frame.
pub(crate) struct FrameEnc<W: Write> {
    /// Block encoder
    block_enc: BlockEnc<W>,
    /// Loop count (only written for animations)
    loop_count: Option<u16>,
    /// Has the preamble been written?
    has_preamble: bool,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new GIF block encoder.
    pub(crate) fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Encode one [Block](block/enum.Block.html).
    pub fn encode<B>(&mut self, block: B) -> Result<()>
    where
        B: Into<Block>,
    {
        use crate::block::Block::*;
        let w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            GlobalColorTable(b) => b.format(w),
            GraphicControl(b) => b.format(w),
            Application(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            LocalColorTable(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer(b) => b.format(w),
        }
    }

    /// Flush the writer
    pub fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(b"GIF89a")?;
        Ok(())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        let mut buf = Vec::with_capacity(7);
        buf.extend_from_slice(&self.screen_width().to_le_bytes());
        buf.extend_from_slice(&self.screen_height().to_le_bytes());
        buf.push(self.flags());
        buf.push(0); // background color index
        buf.push(0); // pixel aspect ratio
        w.write_all(&buf)?;
        Ok(())
    }
}

impl GlobalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(self.colors())?;
        Ok(())
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(7);
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&self.delay_time_cs().to_le_bytes());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block size
        w.write_all(&buf)?;
        Ok(())
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(18);
        buf.push(ExtensionCode::Application_.into());
        buf.push(Self::NETSCAPE.len() as u8); // block size
        buf.extend_from_slice(Self::NETSCAPE);
        buf.push(3); // block size
        buf.push(1); // loop sub-block ID
        buf.extend_from_slice(&self.loop_count().to_le_bytes());
        buf.push(0); // block size
        w.write_all(&buf)?;
        Ok(())
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::ImageDesc_.signature())?;
        let mut buf = Vec::with_capacity(9);
        buf.extend_from_slice(&self.left().to_le_bytes());
        buf.extend_from_slice(&self.top().to_le_bytes());
        buf.extend_from_slice(&self.width().to_le_bytes());
        buf.extend_from_slice(&self.height().to_le_bytes());
        buf.push(self.flags());
        w.write_all(&buf)?;
        Ok(())
    }
}

impl LocalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(self.colors())?;
        Ok(())
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        let min_code_size = self.min_code_size();
        w.write_all(&[min_code_size])?;
        let mut bw = SubBlockWriter::new(&mut *w);
        Compressor::new(min_code_size).compress(self.data(), &mut bw)?;
        bw.flush()?;
        trace!("image data: {} sub-blocks", bw.n_blocks());
        w.write_all(&[0])?; // block terminator
        Ok(())
    }
}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Trailer_.signature())?;
        Ok(())
    }
}

impl<W: Write> FrameEnc<W> {
    /// Create a new GIF frame encoder.
    pub(crate) fn new(block_enc: BlockEnc<W>) -> Self {
        FrameEnc {
            block_enc,
            loop_count: None,
            has_preamble: false,
        }
    }

    /// Set the animation loop count (zero means loop forever).
    ///
    /// When set, a NETSCAPE2.0 extension follows the global color table.
    pub(crate) fn with_loop_count(mut self, loop_count: Option<u16>) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Encode the preamble blocks, based on the first frame
    fn encode_preamble(&mut self, image: &PalettedImage) -> Result<()> {
        let tbl = ColorTable::with_palette(image.palette());
        debug!(
            "preamble: {}x{}, {} bits per pixel",
            image.width(),
            image.height(),
            tbl.bits_per_pixel()
        );
        self.block_enc.encode(Header::default())?;
        self.block_enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(image.width() as u16)
                .with_screen_height(image.height() as u16)
                .with_color_table(&tbl),
        )?;
        self.block_enc.encode(GlobalColorTable::with_table(tbl))?;
        if let Some(loop_count) = self.loop_count {
            self.block_enc.encode(Application::with_loop_count(loop_count))?;
        }
        self.has_preamble = true;
        Ok(())
    }

    /// Encode one frame, with a delay in centiseconds.
    ///
    /// A graphic control extension is written only if the delay is nonzero
    /// or the frame has a transparent color.
    pub(crate) fn encode_frame(
        &mut self,
        image: &PalettedImage,
        delay_cs: u16,
    ) -> Result<()> {
        image.check_dimensions()?;
        if !self.has_preamble {
            self.encode_preamble(image)?;
        }
        if delay_cs > 0 || image.transparent().is_some() {
            self.block_enc.encode(
                GraphicControl::default()
                    .with_delay_time_cs(delay_cs)
                    .with_transparent_color(image.transparent()),
            )?;
        }
        let tbl = ColorTable::with_palette(image.palette());
        let min_code_size = tbl.bits_per_pixel();
        let image_desc = ImageDesc::default()
            .with_left(image.left())
            .with_top(image.top())
            .with_width(image.width() as u16)
            .with_height(image.height() as u16)
            .with_color_table(&tbl);
        self.block_enc.encode(image_desc)?;
        self.block_enc.encode(LocalColorTable::with_table(tbl))?;
        self.block_enc
            .encode(ImageData::new(min_code_size, image.indices()))
    }

    /// Write the trailer and flush the writer
    pub(crate) fn finish(mut self) -> Result<W> {
        self.block_enc.encode(Trailer::default())?;
        self.block_enc.flush()?;
        Ok(self.block_enc.writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pix::gray::Gray8;
    use pix::rgb::SRgb8;
    use pix::{Palette, Raster};
    use std::io;

    fn image(colors: &[SRgb8]) -> PalettedImage {
        let mut palette = Palette::new(colors.len());
        for clr in colors {
            palette.set_entry(*clr);
        }
        let mut raster = Raster::with_clear(2, 2);
        *raster.pixel_mut(1, 1) = Gray8::new(colors.len() as u8 - 1);
        PalettedImage::new(raster, palette).unwrap()
    }

    #[test]
    fn blocks() {
        let mut out = vec![];
        let mut enc = BlockEnc::new(&mut out);
        enc.encode(Header::default()).unwrap();
        enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(0x0102)
                .with_screen_height(3),
        )
        .unwrap();
        enc.encode(
            GraphicControl::default()
                .with_delay_time_cs(0x1234)
                .with_transparent_color(Some(7)),
        )
        .unwrap();
        enc.encode(Application::with_loop_count(0)).unwrap();
        enc.encode(ImageDesc::default().with_left(1).with_width(2)).unwrap();
        enc.encode(Trailer::default()).unwrap();
        let mut expected = b"GIF89a".to_vec();
        expected.extend(&[0x02, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00]);
        expected.extend(&[0x21, 0xF9, 0x04, 0x01, 0x34, 0x12, 0x07, 0x00]);
        expected.extend(&[0x21, 0xFF, 0x0B]);
        expected.extend(b"NETSCAPE2.0");
        expected.extend(&[0x03, 0x01, 0x00, 0x00, 0x00]);
        expected.extend(&[0x2C, 1, 0, 0, 0, 2, 0, 0, 0, 0]);
        expected.push(0x3B);
        assert_eq!(out, expected);
    }

    #[test]
    fn image_data() {
        let mut out = vec![];
        let data = ImageData::new(2, vec![0, 0, 0]);
        BlockEnc::new(&mut out).encode(data).unwrap();
        assert_eq!(out, [0x02, 0x02, 0x84, 0x0B, 0x00]);
    }

    #[test]
    fn single_frame() {
        let img = image(&[SRgb8::new(255, 0, 0), SRgb8::new(0, 0, 255)]);
        let mut enc = FrameEnc::new(BlockEnc::new(vec![]));
        enc.encode_frame(&img, 0).unwrap();
        let out = enc.finish().unwrap();
        #[rustfmt::skip]
        let head = [
            b'G', b'I', b'F', b'8', b'9', b'a',
            0x02, 0x00, 0x02, 0x00, 0x80, 0x00, 0x00,
            0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF,
            0x2C, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x80,
            0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF,
            0x02,
        ];
        assert_eq!(&out[..head.len()], &head[..]);
        assert_eq!(out[out.len() - 2..], [0x00, 0x3B]);
        assert!(!out.windows(11).any(|w| w == b"NETSCAPE2.0"));
    }

    #[test]
    fn graphic_control() {
        let img = image(&[SRgb8::new(0, 0, 0), SRgb8::new(9, 9, 9)])
            .with_transparent(Some(1))
            .unwrap();
        let mut enc = FrameEnc::new(BlockEnc::new(vec![]))
            .with_loop_count(Some(3));
        enc.encode_frame(&img, 0).unwrap();
        enc.encode_frame(&img.clone().with_transparent(None).unwrap(), 0)
            .unwrap();
        let out = enc.finish().unwrap();
        let gce: Vec<_> = out
            .windows(3)
            .enumerate()
            .filter(|(_, w)| *w == [0x21, 0xF9, 0x04])
            .map(|(i, _)| i)
            .collect();
        assert_eq!(gce.len(), 1);
        let i = gce[0];
        assert_eq!(out[i + 3..i + 8], [0x01, 0x00, 0x00, 0x01, 0x00]);
        let n = out.windows(11).position(|w| w == b"NETSCAPE2.0").unwrap();
        assert_eq!(out[n + 11..n + 16], [0x03, 0x01, 0x03, 0x00, 0x00]);
    }

    #[test]
    fn too_large() {
        let palette = {
            let mut p = Palette::new(1);
            p.set_entry(SRgb8::new(0, 0, 0));
            p
        };
        let img =
            PalettedImage::new(Raster::with_clear(65536, 1), palette).unwrap();
        let mut out = vec![];
        let mut enc = FrameEnc::new(BlockEnc::new(&mut out));
        assert!(matches!(
            enc.encode_frame(&img, 0),
            Err(crate::Error::InvalidDimensions)
        ));
        drop(enc);
        assert!(out.is_empty());
    }

    /// Writer which fails after a number of bytes
    struct FailingWriter {
        written: usize,
        limit: usize,
        failures: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= self.limit {
                self.failures += 1;
                return Err(io::Error::new(io::ErrorKind::Other, "full"));
            }
            let n = buf.len().min(self.limit - self.written);
            self.written += n;
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sticky() {
        let mut w = FailingWriter {
            written: 0,
            limit: 4,
            failures: 0,
        };
        let mut sticky = StickyWriter::new(&mut w);
        assert!(sticky.write_all(b"GIF89a").is_err());
        assert!(sticky.write_all(b"more").is_err());
        assert!(sticky.flush().is_err());
        drop(sticky);
        assert_eq!(w.written, 4);
        assert_eq!(w.failures, 1);
    }

    #[test]
    fn write_failure() {
        let img = image(&[SRgb8::new(0, 0, 0), SRgb8::new(9, 9, 9)]);
        let mut w = FailingWriter {
            written: 0,
            limit: 10,
            failures: 0,
        };
        let mut enc = FrameEnc::new(BlockEnc::new(&mut w));
        let res = enc.encode_frame(&img, 10);
        assert!(matches!(res, Err(crate::Error::Io(_))));
        drop(enc);
        assert_eq!(w.written, 10);
        assert_eq!(w.failures, 1);
    }
}
