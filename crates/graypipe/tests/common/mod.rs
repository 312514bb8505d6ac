#![allow(dead_code)]

pub mod synthetic {
    use graypipe::{Image, row_stride};

    /// Horizontal + vertical ramp, `(x + y) * 255 / (w + h - 2)`.
    pub fn gradient_u8(width: usize, height: usize) -> Image<u8> {
        let denom = (width + height - 2).max(1);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(((x + y) * 255 / denom) as u8);
            }
        }
        Image::from_vec(width, height, data).expect("valid gradient")
    }

    fn header(width: usize, height: usize, bpp: u16, offset: u32, payload: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(offset as usize + payload);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&((offset as usize + payload) as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(width as i32).to_le_bytes());
        out.extend_from_slice(&(height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&bpp.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(payload as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 16]);
        out
    }

    /// Standard 8-bpp bitmap: header, 256-entry gray palette, bottom-up rows.
    pub fn bmp8(img: &Image<u8>) -> Vec<u8> {
        let (w, h) = img.dimensions();
        let stride = row_stride(w, 8);
        let mut out = header(w, h, 8, 54 + 1024, stride * h);
        for i in 0..=255u8 {
            out.extend_from_slice(&[i, i, i, 0]);
        }
        for y in (0..h).rev() {
            let start = out.len();
            out.extend_from_slice(img.as_view().row(y));
            out.resize(start + stride, 0);
        }
        out
    }

    /// 24-bpp bitmap with B = G = R = gray, bottom-up rows.
    pub fn bmp24(img: &Image<u8>) -> Vec<u8> {
        let (w, h) = img.dimensions();
        let stride = row_stride(w, 24);
        let mut out = header(w, h, 24, 54, stride * h);
        for y in (0..h).rev() {
            let start = out.len();
            for &v in img.as_view().row(y) {
                out.extend_from_slice(&[v, v, v]);
            }
            out.resize(start + stride, 0);
        }
        out
    }
}
