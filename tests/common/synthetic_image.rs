use mask_refiner::{ImageRgb8, Mask};

/// Red and blue with equal luma, so the two-tone boundary carries color
/// contrast but no grayscale edge.
pub const RED: [u8; 3] = [97, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

/// Generates a two-tone image: `left` color for `x < split_x`, `right` after.
pub fn two_tone_rgb(
    width: usize,
    height: usize,
    split_x: usize,
    left: [u8; 3],
    right: [u8; 3],
) -> ImageRgb8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = ImageRgb8::new(width, height);
    for y in 0..height {
        for x in 0..width {
            img.set(x, y, if x < split_x { left } else { right });
        }
    }
    img
}

/// Rectangular mask covering `x0..x1`, `y0..y1`.
pub fn block_mask(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
) -> Mask {
    let mut m = Mask::new(width, height);
    for y in y0..y1 {
        for x in x0..x1 {
            m.set(x, y, true);
        }
    }
    m
}

/// Mask of the full left half (`x < split_x`).
pub fn half_mask(width: usize, height: usize, split_x: usize) -> Mask {
    block_mask(width, height, 0, 0, split_x, height)
}
