use crate::color::Rgb;
use crate::math::{dot, length, normalize, sub, Vec3};

/// Light source kinds
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Emits from a position in every direction
    Point,
    /// Parallel rays arriving from `position` towards the origin
    Directional,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    /// Distance at which a point light fades out; unlimited when `None`
    pub range: Option<f32>,
}

impl Light {
    pub fn point(position: Vec3, color: Rgb, intensity: f32) -> Self {
        Light {
            kind: LightKind::Point,
            position,
            color,
            intensity,
            range: None,
        }
    }

    pub fn directional(position: Vec3, color: Rgb, intensity: f32) -> Self {
        Light {
            kind: LightKind::Directional,
            position,
            color,
            intensity,
            range: None,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = Some(range);
        self
    }

    /// Quadratic falloff to zero at `range`
    fn attenuation(&self, position: &Vec3) -> f32 {
        match (self.kind, self.range) {
            (LightKind::Point, Some(range)) if range > 0.0 => {
                let falloff = (1.0 - length(&sub(&self.position, position)) / range).clamp(0.0, 1.0);
                falloff * falloff
            }
            _ => 1.0,
        }
    }

    /// Unit vector from `position` towards the light
    fn direction_from(&self, position: &Vec3) -> Vec3 {
        match self.kind {
            LightKind::Point => normalize(&sub(&self.position, position)),
            LightKind::Directional => normalize(&self.position),
        }
    }
}

/// Ambient term plus a fixed set of lights
#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub lights: Vec<Light>,
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting {
            ambient: 1.0,
            lights: Vec::new(),
        }
    }
}

impl Lighting {
    /// Light reaching a surface point, per channel.
    ///
    /// Surfaces are treated as double sided, so back faces are lit as if
    /// their normal were flipped.
    pub fn irradiance(&self, normal: &Vec3, position: &Vec3) -> Rgb {
        let mut total = Rgb::WHITE * self.ambient;
        for light in &self.lights {
            let direction = light.direction_from(position);
            let diffuse = dot(normal, &direction).abs() * light.attenuation(position);
            total += light.color * (diffuse * light.intensity);
        }
        total
    }

    /// Applies lighting to a base color
    pub fn shade(&self, base: Rgb, normal: &Vec3, position: &Vec3) -> Rgb {
        base * self.irradiance(normal, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_only() {
        let lighting = Lighting {
            ambient: 0.5,
            lights: Vec::new(),
        };
        let shaded = lighting.shade(Rgb::new(1.0, 0.5, 0.0), &[0.0, 0.0, 1.0], &[0.0; 3]);
        assert_eq!(shaded, Rgb::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_facing_light_is_brightest() {
        let lighting = Lighting {
            ambient: 0.0,
            lights: vec![Light::point([0.0, 0.0, 10.0], Rgb::WHITE, 1.0)],
        };
        let facing = lighting.irradiance(&[0.0, 0.0, 1.0], &[0.0; 3]);
        let grazing = lighting.irradiance(&[1.0, 0.0, 0.0], &[0.0; 3]);
        assert!((facing.r - 1.0).abs() < 1e-6);
        assert!(grazing.r.abs() < 1e-6);
    }

    #[test]
    fn test_back_faces_are_lit() {
        let lighting = Lighting {
            ambient: 0.0,
            lights: vec![Light::directional([0.0, 0.0, 1.0], Rgb::WHITE, 1.0)],
        };
        let back = lighting.irradiance(&[0.0, 0.0, -1.0], &[0.0; 3]);
        assert!((back.g - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_light_range() {
        let lighting = Lighting {
            ambient: 0.0,
            lights: vec![Light::point([0.0, 0.0, 10.0], Rgb::WHITE, 1.0).with_range(20.0)],
        };
        let near = lighting.irradiance(&[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert!((near.r - 0.25).abs() < 1e-6);
        let beyond = lighting.irradiance(&[0.0, 0.0, 1.0], &[0.0, 0.0, -15.0]);
        assert_eq!(beyond.r, 0.0);
    }
}
