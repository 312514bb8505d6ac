use gp_core::{Error, ImageView};

/// Source and target dimensions of one resample call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub src_width: usize,
    pub src_height: usize,
    pub dst_width: usize,
    pub dst_height: usize,
}

impl ResizeSpec {
    pub fn new(
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    ) -> Result<Self, Error> {
        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return Err(Error::EmptyImage);
        }
        Ok(Self {
            src_width,
            src_height,
            dst_width,
            dst_height,
        })
    }

    pub fn for_view<T>(
        src: &ImageView<'_, T>,
        dst_width: usize,
        dst_height: usize,
    ) -> Result<Self, Error> {
        Self::new(src.width(), src.height(), dst_width, dst_height)
    }

    /// Source pixels per target pixel, `src / dst` on each axis.
    pub fn nearest_scale(&self) -> (f32, f32) {
        (
            self.src_width as f32 / self.dst_width as f32,
            self.src_height as f32 / self.dst_height as f32,
        )
    }

    pub fn bilinear_x(&self, x: usize) -> f32 {
        edge_anchored(x, self.src_width, self.dst_width)
    }

    pub fn bilinear_y(&self, y: usize) -> f32 {
        edge_anchored(y, self.src_height, self.dst_height)
    }
}

/// Maps target index `i` so that `0 -> 0` and `dst_len - 1 -> src_len - 1`.
///
/// The integer product is divided last, which keeps the final index exact.
/// A single-pixel target axis maps to source coordinate 0.
pub fn edge_anchored(i: usize, src_len: usize, dst_len: usize) -> f32 {
    if dst_len <= 1 {
        return 0.0;
    }
    let num = i as f64 * (src_len.saturating_sub(1)) as f64;
    (num / (dst_len - 1) as f64) as f32
}
