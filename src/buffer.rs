//! Fixed-size vertex buffers mutated in place by the per-frame updaters
//!
//! None of these buffers can grow or shrink after construction: the only
//! mutable access handed out is a slice over the existing elements.

use crate::color::Rgb;
use crate::math::{add, cross, normalize, sub, Vec3};

/// One particle's initial attributes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub color: Rgb,
    pub size: f32,
}

/// Structure-of-arrays particle storage
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    sizes: Vec<f32>,
}

impl ParticleBuffer {
    /// Builds `count` particles from a generator invoked once per index
    pub fn from_fn(count: usize, mut generate: impl FnMut(usize) -> Particle) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);
        for i in 0..count {
            let particle = generate(i);
            positions.push(particle.position);
            colors.push(particle.color);
            sizes.push(particle.size);
        }
        ParticleBuffer {
            positions,
            colors,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}

/// Indexed triangle mesh with rest positions and per-vertex normals
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    positions: Vec<Vec3>,
    rest: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
}

impl MeshBuffer {
    /// Triangles referencing out-of-range vertices are dropped
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let vertex_count = positions.len();
        let triangles = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| (i as usize) < vertex_count))
            .collect();
        let mut mesh = MeshBuffer {
            rest: positions.clone(),
            normals: vec![[0.0, 0.0, 1.0]; vertex_count],
            positions,
            triangles,
        };
        mesh.recompute_normals();
        mesh
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Positions as generated, before any per-frame displacement
    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Recomputes area-weighted vertex normals from the current positions
    pub fn recompute_normals(&mut self) {
        for normal in self.normals.iter_mut() {
            *normal = [0.0; 3];
        }
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let u = sub(&self.positions[b], &self.positions[a]);
            let v = sub(&self.positions[c], &self.positions[a]);
            let face = cross(&u, &v);
            for index in [a, b, c] {
                self.normals[index] = add(&self.normals[index], &face);
            }
        }
        for normal in self.normals.iter_mut() {
            *normal = normalize(normal);
        }
    }
}

/// Line segments stored as consecutive vertex pairs
#[derive(Clone, Debug, PartialEq)]
pub struct LineBuffer {
    positions: Vec<Vec3>,
    rest: Vec<Vec3>,
}

impl LineBuffer {
    /// A trailing unpaired vertex is discarded
    pub fn new(mut positions: Vec<Vec3>) -> Self {
        positions.truncate(positions.len() & !1);
        LineBuffer {
            rest: positions.clone(),
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }
}
