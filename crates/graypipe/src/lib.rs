//! Umbrella crate for the `graypipe` workspace.
//!
//! Re-exports the image containers, the RAW/BMP decoders and writers, the
//! point transforms and the resampling kernels so callers can depend on a
//! single crate.

pub use gp_codec::*;
pub use gp_core::*;
pub use gp_point::*;
pub use gp_resize::*;
