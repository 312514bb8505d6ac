use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Reads the pixel whose centre is closest to `(x, y)`.
///
/// Coordinates round half away from zero before the border mode applies.
pub fn sample_nearest<T: Copy>(img: &ImageView<'_, T>, x: f32, y: f32, border: BorderMode<T>) -> T {
    let xi = x.round() as isize;
    let yi = y.round() as isize;

    match (
        map_index(xi, img.width(), &border),
        map_index(yi, img.height(), &border),
    ) {
        // SAFETY: `map_index` only returns indices in `[0, len)`.
        (Some(mx), Some(my)) => unsafe { *img.get_unchecked(mx, my) },
        _ => match border {
            BorderMode::Constant(v) => v,
            BorderMode::Clamp => panic!("cannot sample an empty image with a clamp border"),
        },
    }
}

/// Blends the 2x2 neighbourhood around `(x, y)` with floor-based weights.
///
/// With `a = x - floor(x)` and `b = y - floor(y)` the taps are weighted
/// `(1-a)(1-b)`, `a(1-b)`, `(1-a)b` and `ab`, summed in that order.
pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    let x1f = x.floor();
    let y1f = y.floor();
    let a = x - x1f;
    let b = y - y1f;

    let x1 = x1f as isize;
    let y1 = y1f as isize;

    let p11 = sample_at_f32(img, x1, y1, &border);
    let p21 = sample_at_f32(img, x1 + 1, y1, &border);
    let p12 = sample_at_f32(img, x1, y1 + 1, &border);
    let p22 = sample_at_f32(img, x1 + 1, y1 + 1, &border);

    (1.0 - a) * (1.0 - b) * p11 + a * (1.0 - b) * p21 + (1.0 - a) * b * p12 + a * b * p22
}

fn sample_at_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: &BorderMode<f32>,
) -> f32 {
    match (
        map_index(x, img.width(), border),
        map_index(y, img.height(), border),
    ) {
        // SAFETY: `map_index` only returns indices in `[0, len)`.
        (Some(mx), Some(my)) => unsafe { (*img.get_unchecked(mx, my)).into() },
        _ => match border {
            BorderMode::Constant(c) => *c,
            BorderMode::Clamp => panic!("cannot sample an empty image with a clamp border"),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::border::BorderMode;
    use crate::image::Image;
    use crate::sample::{sample_bilinear_f32, sample_nearest};

    #[test]
    fn nearest_on_3x3_with_clamp_and_constant() {
        let img = Image::from_vec(
            3,
            3,
            vec![
                0u8, 1, 2, // row 0
                10, 11, 12, // row 1
                20, 21, 22, // row 2
            ],
        )
        .expect("valid image");
        let view = img.as_view();

        assert_eq!(sample_nearest(&view, 1.2, 1.6, BorderMode::Clamp), 21);
        assert_eq!(sample_nearest(&view, 1.5, 0.0, BorderMode::Clamp), 2);
        assert_eq!(sample_nearest(&view, 9.0, 9.0, BorderMode::Clamp), 22);
        assert_eq!(
            sample_nearest(&view, -0.6, 1.0, BorderMode::Constant(99u8)),
            99
        );
    }

    #[test]
    fn bilinear_center_and_clamped_edge() {
        let img = Image::from_vec(2, 2, vec![0u8, 10, 20, 30]).expect("valid image");
        let view = img.as_view();

        let center = sample_bilinear_f32(&view, 0.5, 0.5, BorderMode::Clamp);
        assert!((center - 15.0).abs() < 1e-6);

        // the right/bottom taps clamp onto the last column/row
        let corner = sample_bilinear_f32(&view, 1.0, 1.0, BorderMode::Clamp);
        assert_eq!(corner, 30.0);

        let outside = sample_bilinear_f32(&view, 1.5, 0.0, BorderMode::Constant(100.0));
        assert!((outside - 55.0).abs() < 1e-6);
    }
}
