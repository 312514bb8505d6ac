//! Image resampling for gray images: nearest-neighbor and bilinear.
//!
//! Both kernels accept any target size, so the same calls shrink, enlarge or
//! change the aspect ratio (`512x512 -> 1024x512`). They allocate a fresh
//! output and never touch their input, which makes chained pipelines such as
//! `512 -> 32 -> 512` straightforward to compose.
//!
//! Coordinate mapping:
//! - Nearest: `src = round(dst * src_len / dst_len)`, clamped to the last
//!   pixel. Half-way coordinates round away from zero.
//! - Bilinear: `src = dst * (src_len - 1) / (dst_len - 1)`, so the first and
//!   last target pixels sit exactly on the first and last source pixels. A
//!   target axis of length 1 maps to source coordinate 0. Blended values are
//!   truncated toward zero.
//!
//! Zero-sized sources or targets are rejected with [`gp_core::Error::EmptyImage`].

mod resize;
mod spec;

pub use resize::{Interpolation, resize, resize_bilinear, resize_nearest};
pub use spec::{ResizeSpec, edge_anchored};
