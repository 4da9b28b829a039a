//! Viewport transform: `device = image * scale + offset`

use grove_layout::{Bounds, Point};

use crate::config::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, valid_scale_range};

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Point,
    width: f64,
    height: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    /// An unusable scale range falls back to the default one.
    pub fn new(width: f64, height: f64, min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if valid_scale_range(min_scale, max_scale) {
            (min_scale, max_scale)
        } else {
            tracing::warn!(
                "Ignoring scale range [{}, {}], using [{}, {}]",
                min_scale,
                max_scale,
                DEFAULT_MIN_SCALE,
                DEFAULT_MAX_SCALE
            );
            (DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
        };
        Viewport {
            scale: 1.0_f64.clamp(min_scale, max_scale),
            offset: Point::default(),
            width,
            height,
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn to_image(&self, p: Point) -> Point {
        Point::new((p.x - self.offset.x) / self.scale, (p.y - self.offset.y) / self.scale)
    }

    pub fn to_device(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    /// Multiply the scale by `factor`, keeping the image point under
    /// `anchor` fixed. The offset is solved from the clamped scale, so the
    /// anchor holds even when the clamp engages. Returns whether the scale
    /// changed.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let target = self.clamp(self.scale * factor);
        if target == self.scale {
            return false;
        }
        let image = self.to_image(anchor);
        self.scale = target;
        self.place(image, anchor);
        true
    }

    /// Zoom so the dragged rectangle fills the viewport, centred. Drags
    /// below `min_px` in either dimension are ignored.
    pub fn zoom_to_rect(&mut self, a: Point, b: Point, min_px: f64) -> bool {
        let (w, h) = ((b.x - a.x).abs(), (b.y - a.y).abs());
        if w < min_px || h < min_px || w == 0.0 || h == 0.0 {
            return false;
        }
        let rect_center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let image = self.to_image(rect_center);
        let multiplier = (self.width / w).min(self.height / h);
        self.scale = self.clamp(self.scale * multiplier);
        self.place(image, self.center());
        true
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Scale `bounds` to `margin` of the viewport and centre it.
    pub fn fit(&mut self, bounds: &Bounds, margin: f64) -> bool {
        let (gw, gh) = (bounds.width(), bounds.height());
        if gw <= 0.0 || gh <= 0.0 {
            return false;
        }
        self.scale = self.clamp((self.width / gw).min(self.height / gh) * margin);
        self.place(bounds.center(), self.center());
        true
    }

    /// Put an image point at the viewport centre without changing scale.
    pub fn center_on(&mut self, image: Point) {
        self.place(image, self.center());
    }

    fn place(&mut self, image: Point, device: Point) {
        self.offset = Point::new(device.x - image.x * self.scale, device.y - image.y * self.scale);
    }

    fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}
