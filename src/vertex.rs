use crate::color::Rgb;
use crate::math::Vec3;

/// Projected vertex with world position, screen position, depth, normal and color
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub screen_position: [f32; 2],
    /// Distance along the camera's viewing axis
    pub depth: f32,
    pub normal: Vec3,
    pub color: Rgb,
}
