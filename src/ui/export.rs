//! Save a rendered frame as an image file.

use anyhow::{Context, Result};
use eframe::egui;
use std::path::Path;

/// Write `frame` to `path`. The format follows the file extension.
///
/// Alpha is dropped so that formats without transparency (JPEG, BMP) can be
/// written the same way as PNG.
pub fn save_color_image(path: &Path, frame: &egui::ColorImage) -> Result<()> {
    let [width, height] = frame.size;
    let rgba: Vec<u8> = frame.pixels.iter().flat_map(|pixel| pixel.to_array()).collect();
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, rgba).context("screenshot has an unexpected pixel count")?;

    image::DynamicImage::ImageRgba8(buffer)
        .to_rgb8()
        .save(path)
        .with_context(|| format!("Failed to save figure to {}", path.display()))?;

    log::info!("Saved {}x{} figure to {}", width, height, path.display());
    Ok(())
}

/// Pixel size of a frame drawn at `size` points with one pixel per point.
pub fn expected_pixels(size: [f32; 2]) -> [usize; 2] {
    [size[0].round().max(0.0) as usize, size[1].round().max(0.0) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_square() -> egui::ColorImage {
        let rgba: Vec<u8> = std::iter::repeat([255u8, 0, 0, 255]).take(4).flatten().collect();
        egui::ColorImage::from_rgba_unmultiplied([2, 2], &rgba)
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.png");

        save_color_image(&path, &red_square()).unwrap();

        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (2, 2));
        assert_eq!(saved.get_pixel(1, 1).0, [255, 0, 0]);
    }

    #[test]
    fn test_save_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.unknown");

        assert!(save_color_image(&path, &red_square()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_expected_pixels() {
        assert_eq!(expected_pixels([1440.0, 1200.0]), [1440, 1200]);
        assert_eq!(expected_pixels([99.6, 0.4]), [100, 0]);
    }
}
