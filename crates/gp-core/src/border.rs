/// How samplers treat coordinates that fall outside the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    /// Snap to the nearest edge pixel.
    Clamp,
    /// Read a fixed value outside the image.
    Constant(T),
}

/// Maps a possibly out-of-range index onto `[0, len)`.
///
/// Returns `None` for constant borders when `i` is outside, and for empty axes.
pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let inside = i >= 0 && (i as usize) < len;
    match mode {
        BorderMode::Constant(_) if inside => Some(i as usize),
        BorderMode::Constant(_) => None,
        BorderMode::Clamp => Some(i.clamp(0, (len - 1) as isize) as usize),
    }
}
