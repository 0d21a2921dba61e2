// Canvas dimensions and proportional rescaling on resize.

use crate::domain::entities::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    // Device pixels per CSS pixel.
    pub pixel_ratio: f64,
    pub embedded_view_visible: bool,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            pixel_ratio,
            embedded_view_visible: false,
        }
    }

    /// Canvas width in device pixels.
    pub fn width(&self) -> f64 {
        self.css_width * self.pixel_ratio
    }

    /// Canvas height in device pixels.
    pub fn height(&self) -> f64 {
        self.css_height * self.pixel_ratio
    }

    /// Applies a new CSS size and pixel ratio; returns the factors live coordinates must be scaled by.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Rescale {
        let (old_width, old_height) = (self.width(), self.height());
        self.css_width = css_width;
        self.css_height = css_height;
        self.pixel_ratio = pixel_ratio;
        Rescale {
            sx: ratio(self.width(), old_width),
            sy: ratio(self.height(), old_height),
        }
    }

    /// Flips the auxiliary embedded view; returns the new visibility.
    pub fn toggle_embedded_view(&mut self) -> bool {
        self.embedded_view_visible = !self.embedded_view_visible;
        self.embedded_view_visible
    }
}

// A zero-sized canvas has nothing to scale from.
fn ratio(new: f64, old: f64) -> f64 {
    if old > 0.0 { new / old } else { 1.0 }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    pub sx: f64,
    pub sy: f64,
}

impl Rescale {
    pub fn is_identity(&self) -> bool {
        self.sx == 1.0 && self.sy == 1.0
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x * self.sx, point.y * self.sy)
    }
}
