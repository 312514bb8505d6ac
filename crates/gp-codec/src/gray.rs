//! Row converters from stored BMP pixels to 8-bit gray.

/// Averages each B,G,R triplet with truncating integer division.
///
/// `src` must hold at least `3 * dst.len()` bytes; trailing padding is ignored.
pub fn bgr_row_to_gray(src: &[u8], dst: &mut [u8]) {
    debug_assert!(src.len() >= dst.len() * 3);
    for (out, bgr) in dst.iter_mut().zip(src.chunks_exact(3)) {
        let sum = bgr[0] as u16 + bgr[1] as u16 + bgr[2] as u16;
        *out = (sum / 3) as u8;
    }
}

/// Copies 8-bit samples as they are stored. Palette entries are not consulted.
pub fn index_row_to_gray(src: &[u8], dst: &mut [u8]) {
    let n = dst.len();
    dst.copy_from_slice(&src[..n]);
}

#[cfg(test)]
mod tests {
    use super::{bgr_row_to_gray, index_row_to_gray};

    #[test]
    fn bgr_average_truncates() {
        let src = [
            0u8, 0, 0, // black
            255, 255, 255, // white
            1, 1, 0, // 2/3 -> 0
            10, 20, 32, // 62/3 -> 20
            0, 0, // padding
        ];
        let mut dst = [0u8; 4];
        bgr_row_to_gray(&src, &mut dst);
        assert_eq!(dst, [0, 255, 0, 20]);
    }

    #[test]
    fn index_row_ignores_padding() {
        let src = [3u8, 4, 5, 0xAA];
        let mut dst = [0u8; 3];
        index_row_to_gray(&src, &mut dst);
        assert_eq!(dst, [3, 4, 5]);
    }
}
