use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

use crate::overlay::{to_i32, DrawSurface};
use crate::rect::PixelRect;

/// A transparent RGBA canvas drawn with `imageproc`.
///
/// Without a font, text measures as empty and is skipped; boxes and logos
/// are still drawn.
pub struct ImageSurface {
    canvas: RgbaImage,
    font: Option<FontVec>,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            font,
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        self.canvas
            .save(path)
            .with_context(|| format!("failed to save overlay to {}", path.display()))?;
        info!(?path, "saved overlay");
        Ok(())
    }
}

impl DrawSurface for ImageSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn text_size(&self, text: &str, px: f32) -> (u32, u32) {
        match &self.font {
            Some(font) => text_size(PxScale::from(px), font, text),
            None => (0, 0),
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let (width, height) = self.canvas.dimensions();
        if rect.is_empty() || rect.x >= width || rect.y >= height {
            return;
        }
        let w = rect.w.min(width - rect.x);
        let h = rect.h.min(height - rect.y);
        let rect = Rect::at(to_i32(rect.x), to_i32(rect.y)).of_size(w, h);
        draw_filled_rect_mut(&mut self.canvas, rect, color);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, px: f32, color: Rgba<u8>) {
        let Some(font) = &self.font else {
            debug!(text, "no font loaded, skipping text");
            return;
        };
        draw_text_mut(&mut self.canvas, color, x, y, PxScale::from(px), font, text);
    }

    fn paste(&mut self, x: i64, y: i64, image: &RgbaImage) {
        imageops::overlay(&mut self.canvas, image, x, y);
    }
}

/// Load a TrueType/OpenType font, logging and returning None on failure.
pub fn load_font(path: &Path) -> Option<FontVec> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!(?path, error = %e, "failed to read font file");
            return None;
        }
    };
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            info!(?path, "loaded font");
            Some(font)
        }
        Err(e) => {
            warn!(?path, error = %e, "failed to parse font file");
            None
        }
    }
}

/// Load a logo image from any format the imaging library understands.
pub fn load_logo(path: &Path) -> Result<RgbaImage> {
    let logo = image::open(path)
        .with_context(|| format!("failed to open logo {}", path.display()))?
        .to_rgba8();
    debug!(?path, width = logo.width(), height = logo.height(), "loaded logo");
    Ok(logo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::overlay::Overlay;
    use tracing_test::traced_test;

    #[test]
    fn blank_canvas_is_transparent() {
        let surface = ImageSurface::new(8, 4, None);
        assert_eq!(surface.dimensions(), (8, 4));
        assert!(surface.canvas().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn fill_rect_covers_exact_area() {
        let mut surface = ImageSurface::new(10, 10, None);
        let color = Rgba([0, 0, 0, 90]);
        surface.fill_rect(PixelRect { x: 2, y: 3, w: 4, h: 2 }, color);

        assert_eq!(*surface.canvas().get_pixel(2, 3), color);
        assert_eq!(*surface.canvas().get_pixel(5, 4), color);
        assert_eq!(surface.canvas().get_pixel(6, 4).0[3], 0);
        assert_eq!(surface.canvas().get_pixel(2, 5).0[3], 0);
    }

    #[test]
    fn far_off_canvas_rect_is_clipped() {
        let mut surface = ImageSurface::new(4, 4, None);
        surface.fill_rect(PixelRect { x: u32::MAX, y: u32::MAX, w: 2, h: 2 }, Rgba([255; 4]));
        assert!(surface.canvas().pixels().all(|p| p.0[3] == 0));

        surface.fill_rect(PixelRect { x: 3, y: 3, w: u32::MAX, h: u32::MAX }, Rgba([255; 4]));
        assert_eq!(*surface.canvas().get_pixel(3, 3), Rgba([255; 4]));
        assert_eq!(surface.canvas().get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn empty_rect_is_ignored() {
        let mut surface = ImageSurface::new(4, 4, None);
        surface.fill_rect(PixelRect { x: 0, y: 0, w: 0, h: 3 }, Rgba([255; 4]));
        assert!(surface.canvas().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn paste_places_logo() {
        let mut surface = ImageSurface::new(10, 10, None);
        let logo = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        surface.paste(7, 1, &logo);

        assert_eq!(*surface.canvas().get_pixel(7, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*surface.canvas().get_pixel(8, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(surface.canvas().get_pixel(6, 1).0[3], 0);
    }

    #[traced_test]
    #[test]
    fn text_without_font_is_skipped() {
        let mut overlay = Overlay::new(ImageSurface::new(200, 100, None), OverlayConfig::default());
        let backing = overlay.draw_text(20, 20, "0001");
        assert!(backing.is_empty());
        assert!(overlay.surface().canvas().pixels().all(|p| p.0[3] == 0));
    }

    #[traced_test]
    #[test]
    fn missing_font_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_font(&dir.path().join("missing.ttf")).is_none());

        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(load_font(&bogus).is_none());
    }

    #[test]
    fn save_and_reload_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("overlay.png");
        let mut surface = ImageSurface::new(6, 6, None);
        surface.fill_rect(PixelRect { x: 0, y: 0, w: 3, h: 3 }, Rgba([10, 20, 30, 255]));
        surface.save(&path).unwrap();

        let reloaded = load_logo(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (6, 6));
        assert_eq!(*reloaded.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
    }
}
