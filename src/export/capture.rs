use image::ImageEncoder;

use crate::error::{PlotError, Result};

/// Tightly packed RGBA8 pixels of a captured plot region, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl CapturedImage {
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png).write_image(
            &self.rgba,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(png)
    }
}

/// Crop a full-viewport screenshot to `rect` (in points), keeping at most
/// `max_width × max_height` physical pixels from the rect's top-left corner.
pub fn crop_screenshot(
    image: &egui::ColorImage,
    rect: egui::Rect,
    pixels_per_point: f32,
    max_width: usize,
    max_height: usize,
) -> Result<CapturedImage> {
    let full_w = image.width();
    let full_h = image.height();
    let x0 = ((rect.left().max(0.0) * pixels_per_point) as usize).min(full_w);
    let y0 = ((rect.top().max(0.0) * pixels_per_point) as usize).min(full_h);
    let x1 = ((rect.right() * pixels_per_point).ceil().max(0.0) as usize)
        .min(full_w)
        .min(x0 + max_width);
    let y1 = ((rect.bottom() * pixels_per_point).ceil().max(0.0) as usize)
        .min(full_h)
        .min(y0 + max_height);

    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    if width == 0 || height == 0 {
        return Err(PlotError::CaptureUnavailable);
    }

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in y0..y1 {
        for col in x0..x1 {
            let c = image.pixels[row * full_w + col];
            rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }
    Ok(CapturedImage {
        width,
        height,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Color32, ColorImage, Rect};

    /// 4×3 image whose red channel is the column and green the row.
    fn gradient() -> ColorImage {
        let mut img = ColorImage::new([4, 3], Color32::BLACK);
        for y in 0..3 {
            for x in 0..4 {
                img.pixels[y * 4 + x] = Color32::from_rgb(x as u8, y as u8, 0);
            }
        }
        img
    }

    #[test]
    fn crops_to_rect() {
        let rect = Rect::from_min_max(pos2(1.0, 1.0), pos2(3.0, 3.0));
        let cap = crop_screenshot(&gradient(), rect, 1.0, 5000, 5000).unwrap();
        assert_eq!((cap.width, cap.height), (2, 2));
        assert_eq!(&cap.rgba[0..4], &[1, 1, 0, 255]);
        assert_eq!(&cap.rgba[12..16], &[2, 2, 0, 255]);
    }

    #[test]
    fn scales_by_pixels_per_point() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let cap = crop_screenshot(&gradient(), rect, 2.0, 5000, 5000).unwrap();
        assert_eq!((cap.width, cap.height), (2, 2));
    }

    #[test]
    fn clamps_to_image_and_max_size() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        let cap = crop_screenshot(&gradient(), rect, 1.0, 5000, 5000).unwrap();
        assert_eq!((cap.width, cap.height), (4, 3));

        let cap = crop_screenshot(&gradient(), rect, 1.0, 3, 2).unwrap();
        assert_eq!((cap.width, cap.height), (3, 2));
        assert_eq!(cap.rgba.len(), 3 * 2 * 4);
    }

    #[test]
    fn empty_crop_is_unavailable() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(20.0, 20.0));
        assert!(matches!(
            crop_screenshot(&gradient(), rect, 1.0, 5000, 5000),
            Err(PlotError::CaptureUnavailable)
        ));
    }

    #[test]
    fn png_has_signature() {
        let cap = CapturedImage {
            width: 1,
            height: 1,
            rgba: vec![255, 0, 0, 255],
        };
        let png = cap.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
