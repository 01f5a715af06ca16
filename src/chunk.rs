// chunk.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Sub-block chunking for GIF data streams
use std::io::{self, Write};

/// Maximum length of one sub-block
const SUB_BLOCK_SZ: usize = 0xFF;

/// Writer which frames a byte stream into length-prefixed sub-blocks.
///
/// Each sub-block holds up to 255 bytes.  A partial sub-block is written
/// on `flush`.  The zero-length block terminator is not written.
pub struct SubBlockWriter<'a, W: Write> {
    /// Underlying writer
    writer: &'a mut W,
    /// Pending sub-block data
    buf: Vec<u8>,
    /// Number of sub-blocks written
    n_blocks: usize,
}

impl<'a, W: Write> SubBlockWriter<'a, W> {
    /// Create a new sub-block writer
    pub fn new(writer: &'a mut W) -> Self {
        let buf = Vec::with_capacity(SUB_BLOCK_SZ);
        SubBlockWriter {
            writer,
            buf,
            n_blocks: 0,
        }
    }

    /// Get the number of sub-blocks written
    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    /// Write the pending sub-block
    fn write_block(&mut self) -> io::Result<()> {
        let len = self.buf.len();
        if len > 0 {
            self.writer.write_all(&[len as u8])?;
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
            self.n_blocks += 1;
        }
        Ok(())
    }
}

impl<'a, W: Write> Write for SubBlockWriter<'a, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = SUB_BLOCK_SZ - self.buf.len();
        let consumed = remaining.min(buf.len());
        self.buf.extend_from_slice(&buf[..consumed]);
        if self.buf.len() == SUB_BLOCK_SZ {
            self.write_block()?;
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_block()?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chunk(data: &[u8]) -> (Vec<u8>, usize) {
        let mut out = vec![];
        let mut bw = SubBlockWriter::new(&mut out);
        bw.write_all(data).unwrap();
        bw.flush().unwrap();
        let n = bw.n_blocks();
        (out, n)
    }

    #[test]
    fn empty() {
        let (out, n) = chunk(&[]);
        assert!(out.is_empty());
        assert_eq!(n, 0);
    }

    #[test]
    fn short() {
        let (out, n) = chunk(&[1, 2, 3]);
        assert_eq!(out, [3, 1, 2, 3]);
        assert_eq!(n, 1);
    }

    #[test]
    fn full_blocks() {
        for k in 1..4 {
            let data = vec![0xAA; 255 * k];
            let (out, n) = chunk(&data);
            assert_eq!(n, k);
            assert_eq!(out.len(), 256 * k);
            for b in out.chunks(256) {
                assert_eq!(b[0], 0xFF);
                assert!(b[1..].iter().all(|v| *v == 0xAA));
            }
        }
    }

    #[test]
    fn partial_block() {
        let data: Vec<u8> = (0..255 * 2 + 17).map(|i| i as u8).collect();
        let (out, n) = chunk(&data);
        assert_eq!(n, 3);
        assert_eq!(out.len(), 256 * 2 + 18);
        assert_eq!(out[0], 0xFF);
        assert_eq!(out[256], 0xFF);
        assert_eq!(out[512], 17);
        assert_eq!(&out[513..], &data[510..]);
    }

    #[test]
    fn many_small_writes() {
        let mut out = vec![];
        let mut bw = SubBlockWriter::new(&mut out);
        for i in 0..300 {
            bw.write_all(&[i as u8]).unwrap();
        }
        bw.flush().unwrap();
        assert_eq!(out.len(), 256 + 46);
        assert_eq!(out[256], 45);
    }
}
