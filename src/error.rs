// error.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
use std::fmt;
use std::io;

/// Errors encountered while quantizing or encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error from the output sink.
    Io(io::Error),
    /// Frame width or height does not fit in 16 bits.
    InvalidDimensions,
    /// Number of frames and number of delays differ.
    MismatchedLengths,
    /// Maximum color count outside of 1 to 256.
    InvalidColorCount,
    /// Image cannot be quantized (zero area).
    QuantizationFailure,
    /// Frame has an empty palette.
    MissingColorTable,
    /// Color index in a frame is not a valid palette entry.
    InvalidColorIndex,
    /// No frames to encode.
    NoFrames,
}

/// Cutgif result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display() {
        assert_eq!(Error::MismatchedLengths.to_string(), "MismatchedLengths");
        let err = Error::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert!(err.source().is_some());
        assert!(Error::InvalidDimensions.source().is_none());
    }
}
