// lib.rs      cutgif crate.
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Median-cut color quantization and GIF89a encoding.
//!
//! A true color [Raster] is reduced to at most 256 colors with
//! [quantize] (or any [Quantizer]), producing a [PalettedImage].  Paletted
//! images are written as GIF files with an [Encoder], either one frame at
//! a time or as a looping animation.
//!
//! [Raster]: https://docs.rs/pix/latest/pix/struct.Raster.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod chunk;
mod encode;
mod error;
mod lzw;
mod paletted;
mod point;
mod private;
mod quantize;
mod queue;

pub use crate::encode::BlockEnc;
pub use crate::error::{Error, Result};
pub use crate::paletted::PalettedImage;
pub use crate::private::{encode, encode_all, Encoder};
pub use crate::quantize::{quantize, MedianCut, Quantizer};
