use gp_core::{BorderMode, Error, Image, ImageView, sample_bilinear_f32, sample_nearest};
use serde::{Deserialize, Serialize};

use crate::spec::ResizeSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    Nearest,
    Bilinear,
}

impl Interpolation {
    /// Short tag used in generated file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Nearest => "nn",
            Self::Bilinear => "bilinear",
        }
    }
}

pub fn resize(
    src: &ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
    interpolation: Interpolation,
) -> Result<Image<u8>, Error> {
    match interpolation {
        Interpolation::Nearest => resize_nearest(src, dst_width, dst_height),
        Interpolation::Bilinear => resize_bilinear(src, dst_width, dst_height),
    }
}

/// Copies `src[round(y * h/dst_h)][round(x * w/dst_w)]`, clamped to the image.
pub fn resize_nearest(
    src: &ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
) -> Result<Image<u8>, Error> {
    let spec = ResizeSpec::for_view(src, dst_width, dst_height)?;
    let (scale_x, scale_y) = spec.nearest_scale();
    log::trace!(
        "nearest {}x{} -> {}x{}",
        spec.src_width,
        spec.src_height,
        dst_width,
        dst_height
    );

    let mut dst = Image::new_fill(dst_width, dst_height, 0u8);
    for (y, row) in dst.data_mut().chunks_exact_mut(dst_width).enumerate() {
        let sy = y as f32 * scale_y;
        for (x, out) in row.iter_mut().enumerate() {
            *out = sample_nearest(src, x as f32 * scale_x, sy, BorderMode::Clamp);
        }
    }

    Ok(dst)
}

/// Edge-anchored bilinear resize; blended values are truncated, not rounded.
///
/// Corner pixels of the output equal the corresponding source corners.
pub fn resize_bilinear(
    src: &ImageView<'_, u8>,
    dst_width: usize,
    dst_height: usize,
) -> Result<Image<u8>, Error> {
    let spec = ResizeSpec::for_view(src, dst_width, dst_height)?;
    log::trace!(
        "bilinear {}x{} -> {}x{}",
        spec.src_width,
        spec.src_height,
        dst_width,
        dst_height
    );

    let xs: Vec<f32> = (0..dst_width).map(|x| spec.bilinear_x(x)).collect();
    let mut dst = Image::new_fill(dst_width, dst_height, 0u8);
    for (y, row) in dst.data_mut().chunks_exact_mut(dst_width).enumerate() {
        let sy = spec.bilinear_y(y);
        for (out, &sx) in row.iter_mut().zip(&xs) {
            let v = sample_bilinear_f32(src, sx, sy, BorderMode::Clamp);
            *out = v.clamp(0.0, 255.0) as u8;
        }
    }

    Ok(dst)
}
