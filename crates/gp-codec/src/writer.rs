use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gp_core::ImageView;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::WriteError;

/// Output container for an encoded gray image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    /// Lossy; quality is clamped to `1..=100`.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Encodes single-channel images to files.
///
/// Writers never create parent directories; callers prepare the destination.
pub trait ImageWriter {
    fn write_png(&self, path: &Path, img: &ImageView<'_, u8>) -> Result<(), WriteError>;

    fn write_jpeg(&self, path: &Path, img: &ImageView<'_, u8>, quality: u8)
    -> Result<(), WriteError>;

    fn write(
        &self,
        path: &Path,
        img: &ImageView<'_, u8>,
        format: OutputFormat,
    ) -> Result<(), WriteError> {
        match format {
            OutputFormat::Png => self.write_png(path, img),
            OutputFormat::Jpeg { quality } => self.write_jpeg(path, img, quality),
        }
    }
}

/// [`ImageWriter`] backed by the `image` crate encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateWriter;

impl ImageWriter for ImageCrateWriter {
    fn write_png(&self, path: &Path, img: &ImageView<'_, u8>) -> Result<(), WriteError> {
        encode_to(path, img, |w, data, width, height| {
            PngEncoder::new(w).write_image(data, width, height, ExtendedColorType::L8)
        })
    }

    fn write_jpeg(
        &self,
        path: &Path,
        img: &ImageView<'_, u8>,
        quality: u8,
    ) -> Result<(), WriteError> {
        let quality = quality.clamp(1, 100);
        encode_to(path, img, |w, data, width, height| {
            JpegEncoder::new_with_quality(w, quality).write_image(
                data,
                width,
                height,
                ExtendedColorType::L8,
            )
        })
    }
}

fn encode_to<F>(path: &Path, img: &ImageView<'_, u8>, encode: F) -> Result<(), WriteError>
where
    F: FnOnce(&mut BufWriter<File>, &[u8], u32, u32) -> image::ImageResult<()>,
{
    let (width, height) = match (u32::try_from(img.width()), u32::try_from(img.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(WriteError::TooLarge {
                width: img.width(),
                height: img.height(),
            });
        }
    };

    let data: Cow<'_, [u8]> = match img.as_contiguous_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(img.to_image().into_vec()),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    encode(&mut writer, &data, width, height)?;
    writer.flush()?;
    log::debug!("wrote {}x{} to {}", width, height, path.display());
    Ok(())
}
