//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Conversion between screen coordinates and model coordinates.
///
/// Supplied by whoever renders the canvas, so interaction code never needs
/// to know how the view is laid out.
pub trait CoordinateTransform {
    /// Convert a screen point to model coordinates.
    fn to_model_space(&self, screen_point: Point) -> Point;

    /// Convert a model point to screen coordinates.
    fn to_screen_space(&self, model_point: Point) -> Point;

    /// Map a model-space rectangle to screen space.
    fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.to_screen_space(rect.origin()),
            self.to_screen_space(Point::new(rect.x1, rect.y1)),
        )
    }
}

/// Screen and model coordinates coincide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn to_model_space(&self, screen_point: Point) -> Point {
        screen_point
    }

    fn to_screen_space(&self, model_point: Point) -> Point {
        model_point
    }
}

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and model coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen-to-model transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let model_point = self.to_model_space(screen_point);
        self.zoom = new_zoom;

        // Shift so model_point stays under screen_point
        let new_screen = self.to_screen_space(model_point);
        self.offset += screen_point - new_screen;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the camera to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: kurbo::Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = kurbo::Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

impl CoordinateTransform for Camera {
    fn to_model_space(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    fn to_screen_space(&self, model_point: Point) -> Point {
        self.transform() * model_point
    }
}
