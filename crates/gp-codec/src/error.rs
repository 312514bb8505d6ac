use std::io;

use thiserror::Error;

/// Reasons a decode produced no image.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Missing, unreadable or short input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Bad signature, compressed payload or nonsensical header fields.
    #[error("invalid bitmap: {0}")]
    Format(String),
    #[error("unsupported bit depth: {0} bpp")]
    UnsupportedBitDepth(u16),
    #[error(transparent)]
    Image(#[from] gp_core::Error),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("image too large to encode: {width}x{height}")]
    TooLarge { width: usize, height: usize },
}
