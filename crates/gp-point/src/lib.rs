//! Point transforms over 8-bit gray images.
//!
//! Each operation depends only on the input sample, so it is realized as a
//! 256-entry lookup table and applied row by row into a fresh image of the
//! same dimensions. Intermediate values are computed in `f64`, clamped to
//! `[0, 255]` and then quantized.

use gp_core::{Error, Image, ImageView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOp {
    /// `c * ln(1 + v)` with `c = 255 / ln(256)`.
    Log,
    /// `255^(1 - g) * v^g`; `g` must be finite and positive.
    Gamma(f32),
    /// `255 - v`.
    Negative,
}

/// How real-valued results become 8-bit samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quantize {
    #[default]
    Round,
    /// Drop the fraction, as a plain float-to-integer cast does.
    Truncate,
}

impl Quantize {
    fn apply(self, v: f64) -> u8 {
        let v = v.clamp(0.0, 255.0);
        match self {
            Self::Round => v.round() as u8,
            Self::Truncate => v.trunc() as u8,
        }
    }
}

impl PointOp {
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::Gamma(g) if !(g.is_finite() && g > 0.0) => Err(Error::InvalidParameter(
                format!("gamma must be finite and positive, got {g}"),
            )),
            _ => Ok(()),
        }
    }

    pub fn lut(&self, quantize: Quantize) -> [u8; 256] {
        let mut table = [0u8; 256];
        match *self {
            Self::Log => {
                let c = 255.0 / 256f64.ln();
                for (v, out) in table.iter_mut().enumerate() {
                    *out = quantize.apply(c * (1.0 + v as f64).ln());
                }
            }
            Self::Gamma(g) => {
                let g = g as f64;
                let c = 255f64.powf(1.0 - g);
                for (v, out) in table.iter_mut().enumerate() {
                    *out = quantize.apply(c * (v as f64).powf(g));
                }
            }
            Self::Negative => {
                for (v, out) in table.iter_mut().enumerate() {
                    *out = 255 - v as u8;
                }
            }
        }
        table
    }
}

pub fn apply_lut(src: &ImageView<'_, u8>, lut: &[u8; 256]) -> Image<u8> {
    let mut data = Vec::with_capacity(src.width() * src.height());
    for row in src.rows() {
        data.extend(row.iter().map(|&v| lut[v as usize]));
    }
    Image::from_vec(src.width(), src.height(), data).expect("one output sample per input sample")
}

pub fn apply_point_op(
    src: &ImageView<'_, u8>,
    op: PointOp,
    quantize: Quantize,
) -> Result<Image<u8>, Error> {
    op.validate()?;
    Ok(apply_lut(src, &op.lut(quantize)))
}

pub fn log_transform(src: &ImageView<'_, u8>) -> Image<u8> {
    apply_lut(src, &PointOp::Log.lut(Quantize::Round))
}

pub fn gamma_transform(src: &ImageView<'_, u8>, gamma: f32) -> Result<Image<u8>, Error> {
    apply_point_op(src, PointOp::Gamma(gamma), Quantize::Round)
}

pub fn negative_transform(src: &ImageView<'_, u8>) -> Image<u8> {
    apply_lut(src, &PointOp::Negative.lut(Quantize::Round))
}
