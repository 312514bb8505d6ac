//! Foundational primitives for the grayscale pipeline.
//!
//! ## Images and Views
//! [`Image`] owns a row-major buffer whose length always equals
//! `width * height`; construction fails otherwise. [`ImageView`] borrows rows
//! with an element stride that may exceed the width, which lets subviews and
//! padded buffers share the same read path.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to pixel centres. Nearest-neighbor sampling
//! rounds half away from zero; bilinear sampling blends the floor-based 2x2
//! neighbourhood.

mod border;
mod error;
mod image;
mod sample;

pub use border::{BorderMode, map_index};
pub use error::Error;
pub use image::{Image, ImageView, center_patch};
pub use sample::{sample_bilinear_f32, sample_nearest};

/// Single-channel 8-bit image produced by every decoder and stage.
pub type GrayImage = Image<u8>;
