use crate::math::{cross, dot, normalize, sub, Vec3};

/// Perspective camera looking at the scene origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: [0.0, 0.0, 10.0],
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, fov: f32) -> Self {
        Camera {
            position,
            fov,
            ..Camera::default()
        }
    }

    /// Builds the projector for a canvas of the given size
    pub fn projector(&self, width: usize, height: usize) -> Projector {
        let forward = normalize(&sub(&[0.0; 3], &self.position));
        let right = normalize(&cross(&forward, &[0.0, 1.0, 0.0]));
        let up = cross(&right, &forward);
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Projector {
            eye: self.position,
            right,
            up,
            forward,
            focal: 1.0 / (self.fov.to_radians() / 2.0).tan(),
            aspect,
            near: self.near,
            far: self.far,
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Precomputed camera basis for projecting many points per frame
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f32,
    aspect: f32,
    near: f32,
    far: f32,
    width: f32,
    height: f32,
}

impl Projector {
    /// Projects a world position to canvas pixels plus view depth.
    ///
    /// Returns `None` when the point lies outside the near/far range.
    pub fn project(&self, point: &Vec3) -> Option<([f32; 2], f32)> {
        let relative = sub(point, &self.eye);
        let depth = dot(&relative, &self.forward);
        if !(self.near..=self.far).contains(&depth) {
            return None;
        }
        let ndc_x = dot(&relative, &self.right) * self.focal / (self.aspect * depth);
        let ndc_y = dot(&relative, &self.up) * self.focal / depth;
        let screen_x = (ndc_x + 1.0) * 0.5 * self.width;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height;
        Some(([screen_x, screen_y], depth))
    }

    /// Pixels covered by one world unit at the given depth
    pub fn pixels_per_unit(&self, depth: f32) -> f32 {
        if depth <= 0.0 {
            return 0.0;
        }
        self.focal * self.height * 0.5 / depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new([0.0, 0.0, 15.0], 60.0);
        let projector = camera.projector(200, 100);
        let (screen, depth) = projector.project(&[0.0, 0.0, 0.0]).unwrap();
        assert!((screen[0] - 100.0).abs() < 1e-3);
        assert!((screen[1] - 50.0).abs() < 1e-3);
        assert!((depth - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_up_is_up() {
        let projector = Camera::new([0.0, 2.0, 10.0], 60.0).projector(100, 100);
        let (top, _) = projector.project(&[0.0, 3.0, 0.0]).unwrap();
        let (bottom, _) = projector.project(&[0.0, -3.0, 0.0]).unwrap();
        assert!(top[1] < bottom[1]);
        let (right, _) = projector.project(&[3.0, 0.0, 0.0]).unwrap();
        assert!(right[0] > 50.0);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let projector = Camera::new([0.0, 0.0, 10.0], 60.0).projector(100, 100);
        assert!(projector.project(&[0.0, 0.0, 20.0]).is_none());
    }
}
