use std::fmt;

use crate::render::num;

/// Scale range enforced on every zoom interaction.
pub const SCALE_EXTENT: (f32, f32) = (0.25, 8.0);

/// Screen = chart * k + (x, y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn new(x: f32, y: f32, k: f32) -> Self {
        Self { x, y, k }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self { x, y, k: 1.0 }
    }

    pub fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    pub fn invert(&self, (x, y): (f32, f32)) -> (f32, f32) {
        ((x - self.x) / self.k, (y - self.y) / self.k)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ZoomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({},{}) scale({})",
            num(self.x),
            num(self.y),
            num(self.k)
        )
    }
}

/// Drag-to-pan and wheel/pinch-to-zoom state for one chart view.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBehavior {
    scale_extent: (f32, f32),
    transform: ZoomTransform,
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self::new(SCALE_EXTENT)
    }
}

impl ZoomBehavior {
    pub fn new(scale_extent: (f32, f32)) -> Self {
        let (min, max) = scale_extent;
        Self {
            scale_extent: (min.min(max), min.max(max)),
            transform: ZoomTransform::IDENTITY,
        }
    }

    pub fn scale_extent(&self) -> (f32, f32) {
        self.scale_extent
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    fn clamp_scale(&self, k: f32) -> f32 {
        let (min, max) = self.scale_extent;
        if k.is_nan() {
            return self.transform.k.clamp(min, max);
        }
        k.clamp(min, max)
    }

    pub fn set_transform(&mut self, transform: ZoomTransform) {
        self.transform = ZoomTransform {
            k: self.clamp_scale(transform.k),
            ..transform
        };
    }

    /// Drag by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.transform.x += dx;
        self.transform.y += dy;
    }

    /// Scales to `k` keeping the screen point `around` fixed.
    pub fn scale_to(&mut self, k: f32, around: (f32, f32)) {
        let k = self.clamp_scale(k);
        let anchor = self.transform.invert(around);
        self.transform = ZoomTransform {
            x: around.0 - anchor.0 * k,
            y: around.1 - anchor.1 * k,
            k,
        };
    }

    pub fn scale_by(&mut self, factor: f32, around: (f32, f32)) {
        self.scale_to(self.transform.k * factor, around);
    }

    /// Mouse wheel: each 500 units of `delta_y` halves or doubles the scale.
    pub fn wheel(&mut self, delta_y: f32, pointer: (f32, f32)) {
        self.scale_by(2f32.powf(-delta_y * 0.002), pointer);
    }

    /// Two-finger pinch from `start_distance` to `distance` apart.
    pub fn pinch(&mut self, start_distance: f32, distance: f32, center: (f32, f32)) {
        if start_distance <= 0.0 {
            return;
        }
        self.scale_by(distance / start_distance, center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_round_trips_points() {
        let t = ZoomTransform::new(10.0, -5.0, 2.0);
        assert_eq!(t.apply((1.0, 2.0)), (12.0, -1.0));
        assert_eq!(t.invert((12.0, -1.0)), (1.0, 2.0));
    }

    #[test]
    fn formats_like_an_svg_transform() {
        let t = ZoomTransform::new(15.5, 20.0, 1.0);
        assert_eq!(t.to_string(), "translate(15.5,20) scale(1)");
    }

    #[test]
    fn scale_is_clamped_on_every_path() {
        let mut zoom = ZoomBehavior::default();
        zoom.scale_to(100.0, (0.0, 0.0));
        assert_eq!(zoom.transform().k, 8.0);
        for _ in 0..50 {
            zoom.wheel(500.0, (10.0, 10.0));
        }
        assert_eq!(zoom.transform().k, 0.25);
        zoom.pinch(1.0, 1000.0, (0.0, 0.0));
        assert_eq!(zoom.transform().k, 8.0);
        zoom.set_transform(ZoomTransform::new(0.0, 0.0, 0.01));
        assert_eq!(zoom.transform().k, 0.25);
        zoom.set_transform(ZoomTransform::new(0.0, 0.0, f32::NAN));
        assert_eq!(zoom.transform().k, 0.25);
    }

    #[test]
    fn zoom_keeps_pointer_fixed() {
        let mut zoom = ZoomBehavior::default();
        zoom.set_transform(ZoomTransform::translate(40.0, 30.0));
        let pointer = (100.0, 80.0);
        let before = zoom.transform().invert(pointer);
        zoom.wheel(-500.0, pointer);
        assert!((zoom.transform().k - 2.0).abs() < 1e-5);
        let after = zoom.transform().invert(pointer);
        assert!((before.0 - after.0).abs() < 1e-3);
        assert!((before.1 - after.1).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_translation_only() {
        let mut zoom = ZoomBehavior::default();
        zoom.set_transform(ZoomTransform::new(0.0, 0.0, 2.0));
        zoom.pan(5.0, -3.0);
        assert_eq!(zoom.transform(), ZoomTransform::new(5.0, -3.0, 2.0));
    }
}
