use std::io::Cursor;

use base64::Engine;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::parse_hex;
use crate::model::PixelGrid;

/// Default square thumbnail edge in pixels
pub const THUMBNAIL_SIZE: u32 = 128;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Output encoding. JPEG has no alpha channel, so transparent cells are
/// flattened onto a white background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpg,
}

/// Integer upscale factor for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportScale {
    X1,
    X2,
    X4,
    X8,
}

impl ExportScale {
    pub fn factor(&self) -> u32 {
        match self {
            ExportScale::X1 => 1,
            ExportScale::X2 => 2,
            ExportScale::X4 => 4,
            ExportScale::X8 => 8,
        }
    }
}

/// Render the grid at an integer scale: every source pixel becomes a
/// scale x scale block of solid color, nearest-neighbor only. Pixel art must
/// never be smoothed.
pub fn render_scaled(
    grid: &PixelGrid,
    scale: ExportScale,
    format: ExportFormat,
) -> Result<RgbaImage, String> {
    let factor = scale.factor();
    let width = grid.width() * factor;
    let height = grid.height() * factor;

    let mut img = match format {
        ExportFormat::Png => RgbaImage::new(width, height),
        ExportFormat::Jpg => RgbaImage::from_pixel(width, height, WHITE),
    };

    for (x, y, pixel) in grid.pixels() {
        if pixel.is_transparent() {
            continue;
        }
        let rgba = parse_hex(&pixel.color)?;
        for dy in 0..factor {
            for dx in 0..factor {
                img.put_pixel(x * factor + dx, y * factor + dy, rgba);
            }
        }
    }

    Ok(img)
}

/// Encode a rendered image to PNG or JPEG bytes
pub fn encode(img: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    match format {
        ExportFormat::Png => img
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| format!("failed to encode PNG: {}", e))?,
        ExportFormat::Jpg => {
            // The JPEG encoder rejects RGBA input
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb.write_to(&mut cursor, image::ImageFormat::Jpeg)
                .map_err(|e| format!("failed to encode JPEG: {}", e))?
        }
    }
    Ok(bytes)
}

/// Render the full export in one step and return the encoded bytes
pub fn export(grid: &PixelGrid, scale: ExportScale, format: ExportFormat) -> Result<Vec<u8>, String> {
    let img = render_scaled(grid, scale, format)?;
    encode(&img, format)
}

/// Square preview raster for the project list: the grid scaled down to fit,
/// centered, unfilled cells transparent, nearest-neighbor sampled. Returned
/// as a PNG data URI, which is what SavedProject.thumbnail stores.
pub fn thumbnail(grid: &PixelGrid, size: u32) -> Result<String, String> {
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 || size == 0 {
        return Err("cannot render a thumbnail for an empty canvas".to_string());
    }

    let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
    let scaled_w = ((width as f32 * scale) as u32).max(1);
    let scaled_h = ((height as f32 * scale) as u32).max(1);
    let offset_x = (size - scaled_w) / 2;
    let offset_y = (size - scaled_h) / 2;

    let mut img = RgbaImage::new(size, size);
    for ty in 0..scaled_h {
        // Nearest-neighbor back-mapping into the source grid
        let sy = ((ty as f32 / scale) as u32).min(height - 1);
        for tx in 0..scaled_w {
            let sx = ((tx as f32 / scale) as u32).min(width - 1);
            let pixel = match grid.get(sx as i32, sy as i32) {
                Some(p) if !p.is_transparent() => p,
                _ => continue,
            };
            let rgba = parse_hex(&pixel.color)?;
            img.put_pixel(offset_x + tx, offset_y + ty, rgba);
        }
    }

    let png = encode(&img, ExportFormat::Png)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{}", encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pixel;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn test_scaled_export_blocks() {
        // 2x2 grid, one red pixel at the origin, exported at x2
        let grid = PixelGrid::new(2, 2).with_pixel(0, 0, Pixel::solid("#ff0000"));
        let img = render_scaled(&grid, ExportScale::X2, ExportFormat::Png).unwrap();

        assert_eq!(img.dimensions(), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 && y < 2 { RED } else { CLEAR };
                assert_eq!(*img.get_pixel(x, y), expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_jpg_export_flattens_onto_white() {
        let grid = PixelGrid::new(2, 2).with_pixel(0, 0, Pixel::solid("#ff0000"));
        let img = render_scaled(&grid, ExportScale::X2, ExportFormat::Jpg).unwrap();
        assert_eq!(*img.get_pixel(0, 0), RED);
        assert_eq!(*img.get_pixel(3, 3), WHITE);
    }

    #[test]
    fn test_scale_factors() {
        let grid = PixelGrid::new(3, 2);
        for (scale, factor) in [
            (ExportScale::X1, 1),
            (ExportScale::X2, 2),
            (ExportScale::X4, 4),
            (ExportScale::X8, 8),
        ] {
            let img = render_scaled(&grid, scale, ExportFormat::Png).unwrap();
            assert_eq!(img.dimensions(), (3 * factor, 2 * factor));
        }
    }

    #[test]
    fn test_malformed_color_is_an_error() {
        let grid = PixelGrid::new(1, 1).with_pixel(0, 0, Pixel::solid("magenta"));
        assert!(render_scaled(&grid, ExportScale::X1, ExportFormat::Png).is_err());
    }

    #[test]
    fn test_encoded_outputs_have_magic_bytes() {
        let grid = PixelGrid::new(2, 2).with_pixel(1, 1, Pixel::solid("#00ff00"));
        let png = export(&grid, ExportScale::X1, ExportFormat::Png).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let jpg = export(&grid, ExportScale::X1, ExportFormat::Jpg).unwrap();
        assert_eq!(&jpg[..2], [0xff, 0xd8]);
    }

    #[test]
    fn test_thumbnail_is_square_data_uri() {
        let grid = PixelGrid::new(4, 4).with_pixel(0, 0, Pixel::solid("#0000ff"));
        let uri = thumbnail(&grid, THUMBNAIL_SIZE).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(uri.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
    }

    #[test]
    fn test_thumbnail_centers_wide_canvas() {
        // 4x1 canvas in a 128px thumbnail: content occupies a 128x32 band
        // centered vertically, everything else stays transparent.
        let mut grid = PixelGrid::new(4, 1);
        for x in 0..4 {
            grid = grid.with_pixel(x, 0, Pixel::solid("#ff0000"));
        }
        let uri = thumbnail(&grid, 128).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(uri.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(*img.get_pixel(64, 64), RED); // inside the band
        assert_eq!(*img.get_pixel(64, 10), CLEAR); // above it
        assert_eq!(*img.get_pixel(64, 120), CLEAR); // below it
    }

    #[test]
    fn test_thumbnail_samples_nearest_neighbor() {
        // Left half red, right half blue; no blended colors may appear.
        let mut grid = PixelGrid::new(2, 2);
        grid = grid
            .with_pixel(0, 0, Pixel::solid("#ff0000"))
            .with_pixel(0, 1, Pixel::solid("#ff0000"))
            .with_pixel(1, 0, Pixel::solid("#0000ff"))
            .with_pixel(1, 1, Pixel::solid("#0000ff"));
        let uri = thumbnail(&grid, 64).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(uri.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        for (_, _, px) in img.enumerate_pixels() {
            assert!(
                *px == RED || *px == Rgba([0, 0, 255, 255]),
                "unexpected blended pixel {px:?}"
            );
        }
    }
}
