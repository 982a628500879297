pub use glam::{Mat2, Vec2};
pub use rect::{Rect, RectError};
pub use vec2i::{v2i, Vec2i};

mod rect;
mod vec2i;

pub fn v2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// Rotates `point` by `degrees` (clockwise in screen space, y pointing down)
/// around `pivot`.
pub fn rotate_about(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return point;
    }

    Mat2::from_angle(degrees.to_radians()) * (point - pivot) + pivot
}
