//! Decoders and writers at the edges of the grayscale pipeline.
//!
//! Every decoder either returns a complete [`gp_core::GrayImage`] or an error;
//! partially decoded buffers are never handed out.
//!
//! - [`RawDecoder`]: headerless 8-bit samples, dimensions supplied by caller.
//! - [`BmpDecoder`]: uncompressed 8/24 bpp bitmaps, 24 bpp reduced to gray by
//!   an unweighted truncating mean. See [`OffsetMode`] for the two ways the
//!   pixel-data offset can be interpreted.
//! - [`ImageWriter`]: PNG (lossless) and JPEG (quality-parameterized) output.

pub mod bmp;
mod error;
pub mod gray;
pub mod raw;
pub mod writer;

pub use bmp::{BmpDecoder, BmpHeader, OffsetMode, row_stride};
pub use error::{DecodeError, DecodeResult, WriteError};
pub use raw::RawDecoder;
pub use writer::{ImageCrateWriter, ImageWriter, OutputFormat};
