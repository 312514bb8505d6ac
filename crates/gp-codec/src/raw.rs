use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gp_core::{Error, GrayImage, Image};

use crate::error::DecodeResult;

/// Headerless 8-bit grayscale reader with externally supplied dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDecoder {
    pub width: usize,
    pub height: usize,
}

impl Default for RawDecoder {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

impl RawDecoder {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> DecodeResult<GrayImage> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!(
            "decoding raw {} as {}x{}",
            path.display(),
            self.width,
            self.height
        );
        self.decode(&mut BufReader::new(file))
    }

    /// Reads exactly `width * height` samples; anything after them is left unread.
    pub fn decode<R: Read>(&self, reader: &mut R) -> DecodeResult<GrayImage> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyImage.into());
        }
        let len = self
            .width
            .checked_mul(self.height)
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: 0,
            })?;

        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        Ok(Image::from_vec(self.width, self.height, data)?)
    }
}
