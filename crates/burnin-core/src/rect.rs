/// A rectangle in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Scale the rect's size by `percent`, keeping its origin.
    pub fn scale_size(self, percent: f64) -> PixelRect {
        let (w, h) = scale_bbox((self.w, self.h), percent);
        PixelRect { w, h, ..self }
    }
}

/// Scale a `(width, height)` box proportionally, truncating each side.
pub fn scale_bbox(bbox: (u32, u32), percent: f64) -> (u32, u32) {
    let scale = |v: u32| (v as f64 * percent) as u32;
    (scale(bbox.0), scale(bbox.1))
}
