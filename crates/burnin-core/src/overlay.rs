//! Burn-in layout: decides what goes where and issues draw commands to a
//! [`DrawSurface`].

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::OverlayConfig;
use crate::dpx::{self, HeaderError};
use crate::rect::{scale_bbox, PixelRect};
use crate::sequence::{Frame, Timecode};

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("invalid date format {format:?}")]
    InvalidDateFormat { format: String },
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("failed to probe image dimensions")]
    Image(#[from] image::ImageError),
}

/// A 2D canvas that can measure and draw text, fill rectangles and paste
/// images. Coordinates are pixels from the top-left corner.
pub trait DrawSurface {
    fn dimensions(&self) -> (u32, u32);

    /// Extent of `text` rendered at `px` pixels high.
    fn text_size(&self, text: &str, px: f32) -> (u32, u32);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>);

    fn draw_text(&mut self, x: i32, y: i32, text: &str, px: f32, color: Rgba<u8>);

    fn paste(&mut self, x: i64, y: i64, image: &RgbaImage);
}

/// Draws burn-in elements onto a surface using an [`OverlayConfig`].
pub struct Overlay<S> {
    surface: S,
    config: OverlayConfig,
}

impl<S: DrawSurface> Overlay<S> {
    pub fn new(surface: S, config: OverlayConfig) -> Self {
        let (width, height) = surface.dimensions();
        info!(width, height, "overlay initialized");
        Self { surface, config }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Text height in pixels for the current canvas.
    pub fn font_px(&self) -> f32 {
        let (_, height) = self.surface.dimensions();
        (height as f64 * self.config.font_size).floor() as f32
    }

    /// Vertical distance between consecutive text lines.
    pub fn line_height(&self) -> u32 {
        (self.font_px() * 1.5).ceil() as u32
    }

    /// Top-left margin for the first line of text.
    pub fn margin(&self) -> (u32, u32) {
        let (width, height) = self.surface.dimensions();
        let pad = self.config.text_padding;
        ((width as f64 * pad) as u32, (height as f64 * pad) as u32)
    }

    /// Top edge of the line following one drawn at `y`.
    pub fn next_line(&self, y: u32) -> u32 {
        y.saturating_add(self.line_height())
    }

    /// Draw `text` at `(x, y)` over a translucent backing box and return the
    /// box that was filled.
    ///
    /// The box spans the scaled text extent with both corners included, so
    /// it is one pixel larger than the extent on each axis. Text that
    /// measures empty gets no box.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str) -> PixelRect {
        let px = self.font_px();
        let extent = self.surface.text_size(text, px);
        let (w, h) = scale_bbox(extent, self.config.box_scale);
        let origin = self.config.box_origin_scale;
        let mut backing = PixelRect {
            x: (x as f64 * origin) as u32,
            y: (y as f64 * origin) as u32,
            w: 0,
            h: 0,
        };
        if extent.0 > 0 && extent.1 > 0 {
            backing.w = w.saturating_add(1);
            backing.h = h.saturating_add(1);
        }

        debug!(x, y, px, ?backing, text, "drawing text");
        if !backing.is_empty() {
            self.surface.fill_rect(backing, self.config.box_color);
        }
        self.surface
            .draw_text(to_i32(x), to_i32(y), text, px, self.config.text_color);
        backing
    }

    pub fn draw_frame(&mut self, x: u32, y: u32, frame: &Frame) -> PixelRect {
        self.draw_text(x, y, &frame.to_display_string())
    }

    pub fn draw_timecode(&mut self, x: u32, y: u32, timecode: &Timecode) -> PixelRect {
        self.draw_text(x, y, &timecode.to_string())
    }

    /// Draw the current local date using the configured format.
    pub fn draw_date(&mut self, x: u32, y: u32) -> Result<PixelRect, OverlayError> {
        let text = date_stamp(&self.config.date_format)?;
        Ok(self.draw_text(x, y, &text))
    }

    pub fn draw_logo(&mut self, x: u32, y: u32, logo: &RgbaImage) {
        debug!(x, y, width = logo.width(), height = logo.height(), "pasting logo");
        self.surface.paste(i64::from(x), i64::from(y), logo);
    }
}

pub(crate) fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Render the current local time with a strftime pattern.
pub fn date_stamp(format: &str) -> Result<String, OverlayError> {
    let mut out = String::new();
    write!(out, "{}", Local::now().format(format)).map_err(|_| {
        OverlayError::InvalidDateFormat {
            format: format.to_string(),
        }
    })?;
    Ok(out)
}

/// Dimensions of a source image: read from the DPX header when the file has
/// one, otherwise probed through the imaging library.
pub fn source_dimensions(path: &Path) -> Result<(u32, u32), OverlayError> {
    if let Some(info) = dpx::read_header_dimensions(path)? {
        info!(?path, %info, "dimensions from DPX header");
        return Ok(info.dimensions());
    }
    let dims = image::image_dimensions(path)?;
    info!(?path, width = dims.0, height = dims.1, "dimensions from image probe");
    Ok(dims)
}
