use std::path::PathBuf;

use image::Rgba;

/// Layout and styling for burn-in text.
///
/// Fractional sizes are relative to the canvas: `font_size` and
/// `text_padding` are multiplied by the image height and width/height.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Margin from the canvas edge for the first text line.
    pub text_padding: f64,
    /// Font height as a fraction of the canvas height.
    pub font_size: f64,
    /// Growth of the backing box around the measured text.
    pub box_scale: f64,
    /// Factor applied to the text origin to get the box origin.
    pub box_origin_scale: f64,
    pub box_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    /// TrueType font used for text, or None to draw boxes only.
    pub font_path: Option<PathBuf>,
    /// strftime pattern for date stamps.
    pub date_format: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text_padding: 0.03,
            font_size: 0.023,
            box_scale: 1.05,
            box_origin_scale: 0.95,
            box_color: Rgba([0, 0, 0, 90]),
            text_color: Rgba([255, 255, 255, 255]),
            font_path: Some(PathBuf::from("fonts/Inconsolata-Regular.ttf")),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}
