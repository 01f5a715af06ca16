// private.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Private module for top-level items
use crate::encode::{BlockEnc, FrameEnc, StickyWriter};
use crate::error::{Error, Result};
use crate::paletted::PalettedImage;
use crate::quantize::Quantizer;
use pix::rgb::SRgba8;
use pix::Raster;
use std::io::{BufWriter, Write};

/// GIF file encoder
///
/// Writes either a single true color raster, quantized on the way
/// ([encode]), or a sequence of paletted frames as an animation
/// ([encode_all]).  Both consume the encoder: after the first write error
/// nothing more is written, and the error is returned.  Bytes written
/// before the error are not retracted.
///
/// For hand-assembled GIFs, convert with [into_block_enc].
///
/// ## Encoding Example
/// ```
/// use cutgif::{Encoder, MedianCut};
/// use pix::{rgb::SRgba8, Raster};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut raster = Raster::with_clear(4, 4);
/// *raster.pixel_mut(0, 0) = SRgba8::new(0xFF, 0, 0, 0xFF);
/// *raster.pixel_mut(3, 3) = SRgba8::new(0, 0, 0xFF, 0xFF);
/// let mut gif = Vec::new();
/// Encoder::new(&mut gif).encode(&raster, &MedianCut::new(16))?;
/// assert_eq!(&gif[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
///
/// [encode]: struct.Encoder.html#method.encode
/// [encode_all]: struct.Encoder.html#method.encode_all
/// [into_block_enc]: struct.Encoder.html#method.into_block_enc
pub struct Encoder<W: Write> {
    /// Writer for output data
    writer: W,
    /// Buffer output?
    buffered: bool,
}

impl<W: Write> Encoder<W> {
    /// Create a new buffered GIF encoder.
    pub fn new(writer: W) -> Self {
        Encoder {
            writer,
            buffered: true,
        }
    }

    /// Create a new unbuffered GIF encoder.
    pub fn new_unbuffered(writer: W) -> Self {
        Encoder {
            writer,
            buffered: false,
        }
    }

    /// Convert into a block encoder.
    ///
    /// Blocks are written directly to the writer, without buffering.
    pub fn into_block_enc(self) -> BlockEnc<W> {
        BlockEnc::new(self.writer)
    }

    /// Quantize a true color raster and encode it as a single frame GIF.
    ///
    /// ## Errors
    /// * [InvalidDimensions] if width or height does not fit in 16 bits.
    /// * Any error from the quantizer.
    /// * [Io] on write failure.
    ///
    /// Nothing is written unless quantization succeeds.
    ///
    /// [InvalidDimensions]: enum.Error.html#variant.InvalidDimensions
    /// [Io]: enum.Error.html#variant.Io
    pub fn encode<Q>(self, raster: &Raster<SRgba8>, quantizer: &Q) -> Result<()>
    where
        Q: Quantizer + ?Sized,
    {
        if raster.width() > u32::from(u16::MAX)
            || raster.height() > u32::from(u16::MAX)
        {
            return Err(Error::InvalidDimensions);
        }
        let image = quantizer.quantize(raster)?;
        self.encode_frames(&[image], &[0], None)
    }

    /// Encode paletted frames as a GIF.
    ///
    /// * `delays`: one per frame, in centiseconds (hundredths of a second).
    /// * `loop_count`: number of times to loop (zero means forever).
    ///   Negative values are treated as zero.  Only written when there is
    ///   more than one frame.
    ///
    /// The logical screen size and global color table come from the first
    /// frame.
    ///
    /// ## Errors
    /// * [MismatchedLengths] if frame and delay counts differ.
    /// * [NoFrames] if there are no frames.
    /// * [InvalidDimensions] if any frame width or height does not fit in
    ///   16 bits.
    /// * [Io] on write failure.
    ///
    /// All but [Io] are checked before anything is written.
    ///
    /// [MismatchedLengths]: enum.Error.html#variant.MismatchedLengths
    /// [NoFrames]: enum.Error.html#variant.NoFrames
    /// [InvalidDimensions]: enum.Error.html#variant.InvalidDimensions
    /// [Io]: enum.Error.html#variant.Io
    pub fn encode_all(
        self,
        frames: &[PalettedImage],
        delays: &[u16],
        loop_count: i32,
    ) -> Result<()> {
        if frames.len() != delays.len() {
            return Err(Error::MismatchedLengths);
        }
        if frames.is_empty() {
            return Err(Error::NoFrames);
        }
        let loop_count = if frames.len() > 1 {
            Some(clamp_loop_count(loop_count))
        } else {
            None
        };
        self.encode_frames(frames, delays, loop_count)
    }

    /// Encode frames through a sticky writer
    fn encode_frames(
        self,
        frames: &[PalettedImage],
        delays: &[u16],
        loop_count: Option<u16>,
    ) -> Result<()> {
        for frame in frames {
            frame.check_dimensions()?;
        }
        debug!("encoding {} frame(s), loop count {:?}", frames.len(), loop_count);
        let writer = StickyWriter::new(self.writer);
        if self.buffered {
            write_frames(BufWriter::new(writer), frames, delays, loop_count)
        } else {
            write_frames(writer, frames, delays, loop_count)
        }
    }
}

/// Write all frames, followed by the trailer
fn write_frames<W: Write>(
    writer: W,
    frames: &[PalettedImage],
    delays: &[u16],
    loop_count: Option<u16>,
) -> Result<()> {
    let mut enc =
        FrameEnc::new(BlockEnc::new(writer)).with_loop_count(loop_count);
    for (frame, delay) in frames.iter().zip(delays) {
        enc.encode_frame(frame, *delay)?;
    }
    enc.finish()?;
    Ok(())
}

/// Clamp a loop count to the 16-bit field
fn clamp_loop_count(loop_count: i32) -> u16 {
    match u16::try_from(loop_count) {
        Ok(c) => c,
        Err(_) if loop_count < 0 => 0,
        Err(_) => {
            warn!("loop count {} too large; using {}", loop_count, u16::MAX);
            u16::MAX
        }
    }
}

/// Quantize a raster and write it as a single frame GIF.
///
/// See [Encoder::encode](struct.Encoder.html#method.encode).
pub fn encode<W, Q>(writer: W, raster: &Raster<SRgba8>, quantizer: &Q) -> Result<()>
where
    W: Write,
    Q: Quantizer + ?Sized,
{
    Encoder::new(writer).encode(raster, quantizer)
}

/// Write paletted frames as a GIF animation.
///
/// See [Encoder::encode_all](struct.Encoder.html#method.encode_all).
pub fn encode_all<W: Write>(
    writer: W,
    frames: &[PalettedImage],
    delays: &[u16],
    loop_count: i32,
) -> Result<()> {
    Encoder::new(writer).encode_all(frames, delays, loop_count)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loop_clamp() {
        assert_eq!(clamp_loop_count(-1), 0);
        assert_eq!(clamp_loop_count(i32::MIN), 0);
        assert_eq!(clamp_loop_count(0), 0);
        assert_eq!(clamp_loop_count(5), 5);
        assert_eq!(clamp_loop_count(65535), 65535);
        assert_eq!(clamp_loop_count(70000), 65535);
    }
}
