//! Seed-color extraction and color distance metrics.
//!
//! The seed is a per-channel median (not a mean): clicking near a boundary must
//! pick the dominant color instead of blending the two sides. Distances combine
//! a max-channel RGB difference with a wrapped HSV hue difference so that
//! equally bright but differently tinted surfaces stay apart.

use crate::image::ImageRgb8;
use crate::mask::Mask;
use palette::{IntoColor, Hsv, Srgb};

/// Per-channel median color over the 3×3 patch centered at (cx, cy), clipped
/// to the frame.
pub fn median_patch_color(rgb: &ImageRgb8, cx: i32, cy: i32) -> [u8; 3] {
    let (w, h) = rgb.dims();
    let x0 = (cx - 1).max(0) as usize;
    let x1 = ((cx + 2).min(w as i32)) as usize;
    let y0 = (cy - 1).max(0) as usize;
    let y1 = ((cy + 2).min(h as i32)) as usize;
    let mut channels: [Vec<u8>; 3] = [Vec::with_capacity(9), Vec::with_capacity(9), Vec::with_capacity(9)];
    for y in y0..y1 {
        for x in x0..x1 {
            let px = rgb.get(x, y);
            for c in 0..3 {
                channels[c].push(px[c]);
            }
        }
    }
    [
        median_u8(&mut channels[0]),
        median_u8(&mut channels[1]),
        median_u8(&mut channels[2]),
    ]
}

/// Per-channel median color over the mask's own foreground pixels.
/// `None` for an empty mask.
pub fn median_mask_color(rgb: &ImageRgb8, mask: &Mask) -> Option<[u8; 3]> {
    debug_assert_eq!(rgb.dims(), mask.dims());
    let count = mask.area();
    if count == 0 {
        return None;
    }
    let mut channels: [Vec<u8>; 3] = [
        Vec::with_capacity(count),
        Vec::with_capacity(count),
        Vec::with_capacity(count),
    ];
    for (i, &m) in mask.data.iter().enumerate() {
        if m == 0 {
            continue;
        }
        let o = 3 * i;
        channels[0].push(rgb.data[o]);
        channels[1].push(rgb.data[o + 1]);
        channels[2].push(rgb.data[o + 2]);
    }
    Some([
        median_u8(&mut channels[0]),
        median_u8(&mut channels[1]),
        median_u8(&mut channels[2]),
    ])
}

fn median_u8(values: &mut [u8]) -> u8 {
    debug_assert!(!values.is_empty());
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        // Even-count medians average the two middle samples, as the original
        // seed extraction did on clipped border patches.
        ((u16::from(values[n / 2 - 1]) + u16::from(values[n / 2]) + 1) / 2) as u8
    }
}

/// Largest absolute channel difference between a pixel and the seed.
#[inline]
pub fn max_channel_diff(px: [u16; 3], seed: [u8; 3]) -> f32 {
    let mut best = 0i32;
    for c in 0..3 {
        let d = (i32::from(px[c]) - i32::from(seed[c])).abs();
        if d > best {
            best = d;
        }
    }
    best as f32
}

/// Crude saturation estimate of the seed color: `(max - min) / (max + 1)`.
/// Vibrant seeds widen the color tolerance downstream.
pub fn seed_saturation(seed: [u8; 3]) -> f32 {
    let max = seed.iter().copied().max().unwrap_or(0) as f32;
    let min = seed.iter().copied().min().unwrap_or(0) as f32;
    (max - min) / (max + 1.0)
}

/// HSV hue of an RGB triple in degrees `[0, 360)`.
pub fn hue_deg(rgb: [u8; 3]) -> f32 {
    let hsv: Hsv = Srgb::new(rgb[0], rgb[1], rgb[2])
        .into_format::<f32>()
        .into_color();
    hsv.hue.into_positive_degrees()
}

/// Wrapped angular distance between two hues in degrees, in `[0, 180]`.
#[inline]
pub fn hue_diff_deg(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert!(hue_deg([255, 0, 0]).abs() < 1e-3);
        assert!((hue_deg([0, 255, 0]) - 120.0).abs() < 1e-3);
        assert!((hue_deg([0, 0, 255]) - 240.0).abs() < 1e-3);
    }

    #[test]
    fn hue_distance_wraps() {
        assert!((hue_diff_deg(350.0, 10.0) - 20.0).abs() < 1e-3);
        assert!((hue_diff_deg(10.0, 350.0) - 20.0).abs() < 1e-3);
        assert!((hue_diff_deg(90.0, 270.0) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn median_ignores_the_outlier_neighbor() {
        // 3x3 patch: eight brown-ish pixels and one cream outlier.
        let mut img = ImageRgb8::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                img.set(x, y, [120, 80, 40]);
            }
        }
        img.set(2, 2, [250, 240, 220]);
        assert_eq!(median_patch_color(&img, 1, 1), [120, 80, 40]);
    }

    #[test]
    fn mask_median_skips_background() {
        let mut img = ImageRgb8::new(4, 1);
        img.set(0, 0, [10, 10, 10]);
        img.set(1, 0, [20, 20, 20]);
        img.set(2, 0, [30, 30, 30]);
        img.set(3, 0, [250, 0, 0]);
        let mut m = Mask::new(4, 1);
        m.set(0, 0, true);
        m.set(1, 0, true);
        m.set(2, 0, true);
        assert_eq!(median_mask_color(&img, &m), Some([20, 20, 20]));
        assert_eq!(median_mask_color(&img, &Mask::new(4, 1)), None);
    }

    #[test]
    fn saturation_of_gray_is_low() {
        assert!(seed_saturation([128, 128, 128]).abs() < 1e-3);
        assert!(seed_saturation([200, 40, 40]) > 0.5);
    }
}
