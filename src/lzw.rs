// lzw.rs
//
// Copyright (c) 2020-2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF
use std::cmp::Ordering;
use std::io::{self, Write};
use std::ops::AddAssign;

/// Code Bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }
}

/// Code type
type Code = u16;

/// Number of packed bytes to collect before writing
const FLUSH_SZ: usize = 255;

/// Dictionary node
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Next node code
    next: Option<Code>,
    /// Left node code
    left: Option<Code>,
    /// Right node code
    right: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Code dictionary trie
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

/// LZW Data Compressor
///
/// Codes are packed least-significant bit first, starting at one bit more
/// than the minimum code size and growing up to 12 bits.
pub struct Compressor {
    /// Code dictionary
    trie: Trie,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Current code
    code: u32,
    /// Number of bits in current code
    n_bits: u8,
    /// Packed bytes not yet written
    buffer: Vec<u8>,
}

impl Node {
    fn new(byte: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            byte,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(Bits::MAX.entries().into()),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.table.push(Node::new(byte as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Get a mutable node
    fn node_mut(&mut self, code: Code) -> &mut Node {
        debug_assert!(code < self.next_code());
        &mut self.table[code as usize]
    }

    /// Search for a string, inserting it if not found
    fn search_insert(&mut self, code: Option<Code>, byte: u8) -> Option<Code> {
        match code {
            Some(code) => self.insert(code, byte),
            None => Some(byte as Code),
        }
    }

    /// Insert a node
    fn insert(&mut self, code: Code, byte: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut node = self.node_mut(code);
        let mut ordering = Ordering::Equal;
        while let Some(code) = node.link(ordering) {
            node = self.node_mut(code);
            ordering = byte.cmp(&node.byte);
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        node.set_link(ordering, next_code);
        self.table.push(Node::new(byte));
        None
    }
}

impl Compressor {
    /// Create a new compressor
    pub fn new(min_code_bits: u8) -> Self {
        let trie = Trie::new(min_code_bits);
        let code_bits = Bits::from(min_code_bits + 1);
        Compressor {
            min_code_bits,
            trie,
            code_bits,
            code: 0,
            n_bits: 0,
            buffer: Vec::with_capacity(FLUSH_SZ * 2),
        }
    }

    /// Pack a code into the buffer
    fn pack(&mut self, code: Code) {
        self.code |= (code as u32) << self.n_bits;
        self.n_bits += u8::from(self.code_bits);
        while self.n_bits >= 8 {
            self.buffer.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Write buffered bytes once enough are collected
    fn drain<W: Write>(&mut self, writer: &mut W, all: bool) -> io::Result<()> {
        if all || self.buffer.len() >= FLUSH_SZ {
            writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Compress a byte buffer into a writer.
    ///
    /// The stream begins with a clear code and ends with an end code; any
    /// partial trailing byte is zero-padded.
    pub fn compress<W: Write>(
        &mut self,
        bytes: &[u8],
        writer: &mut W,
    ) -> io::Result<()> {
        self.pack(self.trie.clear_code());
        let mut code = None;
        for byte in bytes {
            code = match self.trie.search_insert(code, *byte) {
                Some(code) => Some(code),
                None => {
                    if let Some(code) = code {
                        self.pack(code);
                    }
                    Some(*byte as Code)
                }
            };
            let next_code = self.trie.next_code();
            if next_code > self.code_bits.entries() {
                if next_code > Bits::MAX.entries() {
                    self.pack(self.trie.clear_code());
                    self.trie.reset();
                    self.code_bits = Bits::from(self.min_code_bits + 1);
                } else {
                    self.code_bits += 1;
                }
            }
            self.drain(writer, false)?;
        }
        if let Some(code) = code {
            self.pack(code);
        }
        self.pack(self.trie.end_code());
        if self.n_bits > 0 {
            self.buffer.push(self.code as u8);
            self.code = 0;
            self.n_bits = 0;
        }
        self.drain(writer, true)
    }
}
