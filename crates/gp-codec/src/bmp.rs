//! Uncompressed 8/24-bpp BMP reader that normalizes to top-down gray.
//!
//! Only the 54-byte `BITMAPFILEHEADER` + `BITMAPINFOHEADER` prefix is
//! interpreted. Pixel rows are padded to 4-byte boundaries on disk and stored
//! bottom-up unless the height is negative.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use gp_core::{Error, GrayImage, Image};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult};
use crate::gray::{bgr_row_to_gray, index_row_to_gray};

pub const HEADER_LEN: usize = 54;

/// "BM" read as a little-endian u16.
pub const SIGNATURE: u16 = 0x4D42;

/// 256 palette entries of 4 bytes each.
const PALETTE_LEN: u32 = 1024;

/// Fixed-layout file + info header, all fields little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_offset: u32,
    pub dib_header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl BmpHeader {
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Self {
        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);
        let u32_at =
            |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        let i32_at =
            |o: usize| i32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);

        Self {
            signature: u16_at(0),
            file_size: u32_at(2),
            reserved1: u16_at(6),
            reserved2: u16_at(8),
            pixel_offset: u32_at(10),
            dib_header_size: u32_at(14),
            width: i32_at(18),
            height: i32_at(22),
            planes: u16_at(26),
            bits_per_pixel: u16_at(28),
            compression: u32_at(30),
            image_size: u32_at(34),
            x_pixels_per_meter: i32_at(38),
            y_pixels_per_meter: i32_at(42),
            colors_used: u32_at(46),
            important_colors: u32_at(50),
        }
    }

    /// Checks the fields the decoder depends on, except the bit depth.
    pub fn validate(&self) -> DecodeResult<()> {
        if self.signature != SIGNATURE {
            return Err(DecodeError::Format(format!(
                "bad signature {:#06x}, expected {SIGNATURE:#06x}",
                self.signature
            )));
        }
        if self.compression != 0 {
            return Err(DecodeError::Format(format!(
                "compression method {} is not supported",
                self.compression
            )));
        }
        if self.width <= 0 || self.height == 0 {
            return Err(DecodeError::Format(format!(
                "invalid dimensions {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Rows are stored top row first when the height is negative.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

/// Bytes per stored row, rounded up to a multiple of four.
pub fn row_stride(width: usize, bits_per_pixel: u16) -> usize {
    (width * (bits_per_pixel as usize / 8) + 3) & !3
}

/// Where the decoder looks for pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetMode {
    /// Seek to the header's pixel offset for every bit depth.
    #[default]
    TrustOffset,
    /// For 8 bpp, seek 1024 bytes before the declared offset.
    ///
    /// Compatibility workaround for producers whose offset overshoots a
    /// 256-entry palette written directly in front of the pixels. 24 bpp
    /// files still use the declared offset.
    SkipPaletteHeuristic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BmpDecoder {
    pub offset_mode: OffsetMode,
}

impl BmpDecoder {
    pub fn new(offset_mode: OffsetMode) -> Self {
        Self { offset_mode }
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> DecodeResult<GrayImage> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("decoding bmp {}", path.display());
        self.decode(&mut BufReader::new(file))
    }

    pub fn decode<R: Read + Seek>(&self, reader: &mut R) -> DecodeResult<GrayImage> {
        let mut raw = [0u8; HEADER_LEN];
        reader.read_exact(&mut raw)?;
        let header = BmpHeader::parse(&raw);
        header.validate()?;

        let convert: fn(&[u8], &mut [u8]) = match header.bits_per_pixel {
            8 => index_row_to_gray,
            24 => bgr_row_to_gray,
            bpp => return Err(DecodeError::UnsupportedBitDepth(bpp)),
        };

        let width = header.width as usize;
        let height = header.height.unsigned_abs() as usize;
        let stride = row_stride(width, header.bits_per_pixel);
        let offset = self.pixel_offset(&header)?;
        log::debug!(
            "bmp {}x{} {} bpp, stride {}, pixel offset {} (declared {}, {:?})",
            width,
            height,
            header.bits_per_pixel,
            stride,
            offset,
            header.pixel_offset,
            self.offset_mode
        );

        let len = stride.checked_mul(height).ok_or_else(|| {
            DecodeError::Format(format!("pixel data for {width}x{height} overflows"))
        })?;
        let end = reader.seek(SeekFrom::End(0))?;
        if offset.saturating_add(len as u64) > end {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("pixel data needs {len} bytes at offset {offset}, input has {end}"),
            )
            .into());
        }

        reader.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;

        let pixel_count = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: 0,
        })?;
        let mut gray = vec![0u8; pixel_count];
        for (y, dst_row) in gray.chunks_exact_mut(width).enumerate() {
            let src_y = if header.is_top_down() {
                y
            } else {
                height - 1 - y
            };
            let start = src_y * stride;
            convert(&data[start..start + stride], dst_row);
        }

        Ok(Image::from_vec(width, height, gray)?)
    }

    fn pixel_offset(&self, header: &BmpHeader) -> DecodeResult<u64> {
        match (self.offset_mode, header.bits_per_pixel) {
            (OffsetMode::SkipPaletteHeuristic, 8) => header
                .pixel_offset
                .checked_sub(PALETTE_LEN)
                .map(u64::from)
                .ok_or_else(|| {
                    DecodeError::Format(format!(
                        "pixel offset {} leaves no room for a palette",
                        header.pixel_offset
                    ))
                }),
            _ => Ok(u64::from(header.pixel_offset)),
        }
    }
}
