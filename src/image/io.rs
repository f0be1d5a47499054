//! I/O helpers for photographs, masks and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned interleaved RGB buffer.
//! - `load_mask_image`: read a grayscale image as a binary mask (nonzero = set).
//! - `save_mask_image`: write a mask to a grayscale PNG (255 = set).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageRgb8;
use crate::mask::Mask;
use image::{DynamicImage, GrayImage, ImageBuffer};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to interleaved 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<ImageRgb8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    ImageRgb8::from_raw(w, h, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size for {}", path.display()))
}

/// Load a grayscale image as a binary mask; any nonzero pixel is foreground.
pub fn load_mask_image(path: &Path) -> Result<Mask, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    let mut mask = Mask::new(w, h);
    for (i, px) in img.into_raw().into_iter().enumerate() {
        mask.data[i] = u8::from(px != 0);
    }
    Ok(mask)
}

/// Save a binary mask to a grayscale PNG with foreground at full white.
pub fn save_mask_image(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let data: Vec<u8> = mask.data.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect();
    let buffer: GrayImage = ImageBuffer::from_raw(mask.w as u32, mask.h as u32, data)
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(buffer)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
