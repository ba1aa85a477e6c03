//! Numeric building blocks shared by the per-frame updaters

use crate::math::{lerp, Vec3};

/// `amplitude * sin(t * frequency + phase)`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Oscillator {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl Oscillator {
    pub const fn new(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Oscillator {
            amplitude,
            frequency,
            phase,
        }
    }

    /// Same oscillation shifted a quarter turn, i.e. `amplitude * cos(t * frequency + phase)`
    pub fn cosine(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Oscillator::new(amplitude, frequency, phase + std::f32::consts::FRAC_PI_2)
    }

    pub fn sample(&self, t: f32) -> f32 {
        self.amplitude * (t * self.frequency + self.phase).sin()
    }
}

/// One oscillator per axis, added to a base position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Float3 {
    pub x: Option<Oscillator>,
    pub y: Option<Oscillator>,
    pub z: Option<Oscillator>,
}

impl Float3 {
    pub const NONE: Float3 = Float3 {
        x: None,
        y: None,
        z: None,
    };

    /// Base position plus each axis' offset at time `t`
    pub fn offset(&self, base: &Vec3, t: f32) -> Vec3 {
        let sample = |axis: Option<Oscillator>| axis.map_or(0.0, |o| o.sample(t));
        [
            base[0] + sample(self.x),
            base[1] + sample(self.y),
            base[2] + sample(self.z),
        ]
    }
}

/// Moves `current` a fixed fraction of the way to `target`
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    lerp(current, target, factor)
}

/// Nudges the XY components of `position` towards `target`.
///
/// Nothing moves when the planar distance is at or beyond `radius`. Returns
/// whether the position changed.
pub fn attract(position: &mut Vec3, target: [f32; 2], radius: Option<f32>, factor: f32) -> bool {
    let dx = target[0] - position[0];
    let dy = target[1] - position[1];
    if let Some(radius) = radius {
        if (dx * dx + dy * dy).sqrt() >= radius {
            return false;
        }
    }
    position[0] += dx * factor;
    position[1] += dy * factor;
    true
}

/// Pull towards `target` whose strength fades linearly to zero at `radius`
pub fn attract_falloff(position: &mut Vec3, target: [f32; 2], radius: f32, strength: f32) -> bool {
    let dx = target[0] - position[0];
    let dy = target[1] - position[1];
    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= radius {
        return false;
    }
    let force = (1.0 - distance / radius) * strength;
    position[0] += dx * force;
    position[1] += dy * force;
    true
}

/// Scales a coordinate towards zero once it leaves `[-bound, bound]`
pub fn contain(value: f32, bound: f32, damping: f32) -> f32 {
    if value.abs() > bound {
        value * damping
    } else {
        value
    }
}

/// Rotates the XY components about the Z axis; the planar radius is unchanged
pub fn rotate_planar(position: &Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    [
        position[0] * cos - position[1] * sin,
        position[0] * sin + position[1] * cos,
        position[2],
    ]
}

/// How a node's rotation advances
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spin {
    /// Fixed increment per update, independent of frame time
    PerFrame(Vec3),
    /// Radians per second of elapsed time, set absolutely each frame
    Rate(Vec3),
}

impl Spin {
    pub const NONE: Spin = Spin::PerFrame([0.0; 3]);

    pub fn advance(&self, rotation: &mut Vec3, elapsed: f32) {
        match self {
            Spin::PerFrame(step) => {
                for axis in 0..3 {
                    rotation[axis] += step[axis];
                }
            }
            Spin::Rate(rate) => {
                for axis in 0..3 {
                    rotation[axis] = rate[axis] * elapsed;
                }
            }
        }
    }
}

/// Pointer-driven tilt eased towards `rest + pointer * gain`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rest: Vec3,
    /// X rotation per unit of pointer Y
    pub pitch: f32,
    /// Y rotation per unit of pointer X
    pub yaw: f32,
    /// Z rotation per unit of pointer X
    pub roll: f32,
    pub factor: f32,
}

impl Tilt {
    pub fn target(&self, pointer: [f32; 2]) -> Vec3 {
        [
            self.rest[0] + pointer[1] * self.pitch,
            self.rest[1] + pointer[0] * self.yaw,
            self.rest[2] + pointer[0] * self.roll,
        ]
    }

    /// Eases the axes this tilt drives; axes with zero gain and zero rest are left alone
    pub fn ease(&self, rotation: &mut Vec3, pointer: [f32; 2]) {
        let target = self.target(pointer);
        let gains = [self.pitch, self.yaw, self.roll];
        for axis in 0..3 {
            if gains[axis] != 0.0 || self.rest[axis] != 0.0 {
                rotation[axis] = approach(rotation[axis], target[axis], self.factor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillator_at_zero_is_phase() {
        let o = Oscillator::new(0.6, 0.5, 0.0);
        assert_eq!(o.sample(0.0), 0.0);
        let c = Oscillator::cosine(0.4, 0.3, 0.0);
        assert!((c.sample(0.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_float_offset() {
        let float = Float3 {
            y: Some(Oscillator::new(1.0, 1.0, 0.0)),
            ..Float3::NONE
        };
        assert_eq!(float.offset(&[1.0, 2.0, 3.0], 0.0), [1.0, 2.0, 3.0]);
        let moved = float.offset(&[1.0, 2.0, 3.0], std::f32::consts::FRAC_PI_2);
        assert!((moved[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_attract_moves_fraction_of_distance() {
        let mut p = [0.0, 0.0, 4.0];
        assert!(attract(&mut p, [10.0, 0.0], None, 0.1));
        assert!((p[0] - 1.0).abs() < 1e-6);
        assert_eq!(p[2], 4.0);
    }

    #[test]
    fn test_attract_respects_radius() {
        let mut p = [0.0, 0.0, 0.0];
        assert!(!attract(&mut p, [10.0, 0.0], Some(3.0), 0.1));
        assert_eq!(p, [0.0, 0.0, 0.0]);
        assert!(!attract_falloff(&mut p, [10.0, 0.0], 6.0, 0.003));
        assert!(attract_falloff(&mut p, [3.0, 0.0], 6.0, 0.5));
        assert!((p[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_contain_damps_instead_of_clamping() {
        assert_eq!(contain(20.0, 17.0, 0.95), 19.0);
        assert_eq!(contain(-20.0, 17.0, 0.95), -19.0);
        assert_eq!(contain(16.0, 17.0, 0.95), 16.0);
    }

    #[test]
    fn test_rotate_planar_keeps_radius() {
        let p = [3.0, 4.0, 1.0];
        let r = rotate_planar(&p, 0.7);
        assert!(((r[0] * r[0] + r[1] * r[1]).sqrt() - 5.0).abs() < 1e-5);
        assert_eq!(r[2], 1.0);
    }

    #[test]
    fn test_spin_modes() {
        let mut rotation = [0.0; 3];
        Spin::PerFrame([0.001, 0.002, 0.0]).advance(&mut rotation, 5.0);
        Spin::PerFrame([0.001, 0.002, 0.0]).advance(&mut rotation, 6.0);
        assert!((rotation[1] - 0.004).abs() < 1e-7);
        Spin::Rate([0.5, 0.3, 0.2]).advance(&mut rotation, 2.0);
        assert_eq!(rotation, [1.0, 0.6, 0.4]);
    }

    #[test]
    fn test_tilt_eases_towards_target() {
        let tilt = Tilt {
            rest: [-1.0, 0.0, 0.0],
            pitch: 0.15,
            yaw: 0.2,
            roll: 0.0,
            factor: 0.5,
        };
        let mut rotation = [0.0, 0.0, 0.7];
        tilt.ease(&mut rotation, [1.0, 0.0]);
        assert!((rotation[0] + 0.5).abs() < 1e-6);
        assert!((rotation[1] - 0.1).abs() < 1e-6);
        assert_eq!(rotation[2], 0.7);
    }
}
