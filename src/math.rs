pub type Vec3 = [f32; 3];
pub type Mat3 = [[f32; 3]; 3];

pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Edge function used in rasterization
pub fn edge_function(a: &[f32; 2], b: &[f32; 2], c: &[f32; 2]) -> f32 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &Mat3, vector: &Vec3) -> Vec3 {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

pub fn rotation_x(angle: f32) -> Mat3 {
    let (sin, cos) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

pub fn rotation_y(angle: f32) -> Mat3 {
    let (sin, cos) = angle.sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

pub fn rotation_z(angle: f32) -> Mat3 {
    let (sin, cos) = angle.sin_cos();
    [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]]
}

/// Rotation matrix for XYZ-ordered Euler angles (`Rx * Ry * Rz`)
pub fn euler_rotation(angles: &Vec3) -> Mat3 {
    let xy = multiply_matrices(&rotation_x(angles[0]), &rotation_y(angles[1]));
    multiply_matrices(&xy, &rotation_z(angles[2]))
}

pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: &Vec3, k: f32) -> Vec3 {
    [v[0] * k, v[1] * k, v[2] * k]
}

pub fn dot(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(u: &Vec3, v: &Vec3) -> Vec3 {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

pub fn length(v: &Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Normalizes a vector; degenerate input yields the +Z axis
pub fn normalize(v: &Vec3) -> Vec3 {
    let length = length(v);
    if length <= f32::EPSILON {
        return [0.0, 0.0, 1.0];
    }
    [v[0] / length, v[1] / length, v[2] / length]
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let u = sub(b, a);
    let v = sub(c, a);
    normalize(&cross(&u, &v))
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step between two edges; the edges may be given in descending order
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn fract(x: f32) -> f32 {
    let f = x - x.floor();
    // Tiny negative inputs round up to exactly 1.0
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Cheap deterministic hash of a 2D lattice point into [0, 1)
pub fn hash2(x: f32, y: f32) -> f32 {
    fract((x * 12.9898 + y * 78.233).sin() * 43_758.547)
}

/// Scale, rotation and translation of a scene node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: [0.0; 3],
        rotation: [0.0; 3],
        scale: [1.0; 3],
    };

    pub fn at(position: Vec3) -> Self {
        Transform {
            position,
            ..Transform::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }

    /// Flattens the transform into a single affine map
    pub fn affine(&self) -> Affine {
        let rotation = euler_rotation(&self.rotation);
        let scaling = [
            [self.scale[0], 0.0, 0.0],
            [0.0, self.scale[1], 0.0],
            [0.0, 0.0, self.scale[2]],
        ];
        Affine {
            linear: multiply_matrices(&rotation, &scaling),
            translation: self.position,
        }
    }
}

/// Linear map plus translation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub linear: Mat3,
    pub translation: Vec3,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        linear: IDENTITY,
        translation: [0.0; 3],
    };

    pub fn apply(&self, point: &Vec3) -> Vec3 {
        add(&multiply_matrix_vector(&self.linear, point), &self.translation)
    }

    /// Transforms a direction; only valid for uniform scale
    pub fn apply_normal(&self, normal: &Vec3) -> Vec3 {
        normalize(&multiply_matrix_vector(&self.linear, normal))
    }

    /// Returns the map that applies `self` first and `parent` afterwards
    pub fn then(&self, parent: &Affine) -> Affine {
        Affine {
            linear: multiply_matrices(&parent.linear, &self.linear),
            translation: parent.apply(&self.translation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Vec3, b: &Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-5)
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let rotated = multiply_matrix_vector(&rotation_z(std::f32::consts::FRAC_PI_2), &[1.0, 0.0, 0.0]);
        assert!(close(&rotated, &[0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_calculate_normal() {
        let normal = calculate_normal(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(close(&normal, &[0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_smoothstep_descending_edges() {
        assert_eq!(smoothstep(5.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(5.0, 0.0, 5.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn test_hash_in_unit_range() {
        for i in 0..100 {
            let h = hash2(i as f32, (i * 7) as f32);
            assert!((0.0..1.0).contains(&h));
        }
    }

    #[test]
    fn test_affine_composition() {
        let child = Transform::at([1.0, 0.0, 0.0]).affine();
        let parent = Transform::at([0.0, -4.0, -6.0]).with_scale(2.0).affine();
        let world = child.then(&parent).apply(&[0.0, 1.0, 0.0]);
        assert!(close(&world, &[2.0, -2.0, -6.0]));
    }
}
