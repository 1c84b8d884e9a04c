//! Raster helpers: base64 payloads, template sources, the bundled blank page.

use std::io::{Cursor, Read};

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::error::{AppError, Result};
use crate::layout::PageSize;

/// Resolution of the bundled blank template
const BLANK_PX_PER_MM: f64 = 2.0;

/// Frame inset of the bundled blank template, in mm
const BLANK_FRAME_MM: f64 = 6.0;

/// Decodes plain base64 or a `data:<mime>;base64,` URL.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let payload = match text.trim().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| AppError::ImageError("data URL without payload".to_string()))?,
        None => text.trim(),
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    B64.decode(compact.as_bytes())
        .map_err(|e| AppError::ImageError(format!("invalid base64: {}", e)))
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    ::image::load_from_memory(bytes).map_err(|e| AppError::ImageError(e.to_string()))
}

/// Reads image bytes from a file path or an http(s) URL and checks they decode.
pub fn load_image_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .call()
            .map_err(|e| AppError::TemplateError(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::TemplateError(format!("Failed to read response: {}", e)))?;
        bytes
    } else {
        std::fs::read(source).map_err(|e| AppError::TemplateError(format!("{}: {}", source, e)))?
    };

    decode_image(&bytes)?;
    Ok(bytes)
}

/// Drops alpha by compositing onto white paper.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba_image = image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();

    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, Rgb([out_r, out_g, out_b]));
    }
    rgb_image
}

/// PNG of a blank page with a light frame, used when no scanned form was imported.
pub fn blank_template(page: PageSize) -> Result<Vec<u8>> {
    let width = (page.width * BLANK_PX_PER_MM).round().max(1.0) as u32;
    let height = (page.height * BLANK_PX_PER_MM).round().max(1.0) as u32;
    let inset = (BLANK_FRAME_MM * BLANK_PX_PER_MM) as u32;

    let frame = Rgb([200, 200, 200]);
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    if width > 2 * inset && height > 2 * inset {
        let (left, right) = (inset, width - inset - 1);
        let (top, bottom) = (inset, height - inset - 1);
        for x in left..=right {
            canvas.put_pixel(x, top, frame);
            canvas.put_pixel(x, bottom, frame);
        }
        for y in top..=bottom {
            canvas.put_pixel(left, y, frame);
            canvas.put_pixel(right, y, frame);
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::ImageError(e.to_string()))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::GenericImageView;
    use pretty_assertions::assert_eq;

    #[test]
    fn data_urls_and_bare_base64_decode_alike() {
        let bare = B64.encode(b"hello");
        let url = format!("data:image/png;base64,{}", bare);
        assert_eq!(decode_base64(&bare).unwrap(), b"hello");
        assert_eq!(decode_base64(&url).unwrap(), b"hello");
        assert!(decode_base64("data:image/png;base64").is_err());
        assert!(decode_base64("!!!").is_err());
    }

    #[test]
    fn blank_template_matches_page_aspect() {
        let png = blank_template(PageSize::A4_PORTRAIT).unwrap();
        let image = decode_image(&png).unwrap();
        assert_eq!(image.dimensions(), (420, 594));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let mut rgba = ::image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn missing_template_file_is_reported() {
        assert!(matches!(
            load_image_source("/nonexistent/form.png"),
            Err(AppError::TemplateError(_))
        ));
    }
}
