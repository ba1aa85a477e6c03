//! Procedural generators for initial particle, mesh and line buffers

use std::collections::HashMap;

use rand::Rng;

use crate::buffer::{LineBuffer, MeshBuffer, Particle, ParticleBuffer};
use crate::color::Rgb;
use crate::math::{calculate_normal, dot, normalize, scale, sub, Vec3};

/// How scattered particles pick their color from a palette
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coloring {
    /// Uniformly pick one palette entry
    Pick,
    /// Blend between consecutive palette stops, wrapping around at the end
    Gradient,
}

/// Scatters particles uniformly inside an axis-aligned box centered on the origin
pub fn scatter_particles<R: Rng>(
    count: usize,
    extent: Vec3,
    palette: &[Rgb],
    coloring: Coloring,
    size_range: (f32, f32),
    rng: &mut R,
) -> ParticleBuffer {
    ParticleBuffer::from_fn(count, |_| {
        let position = [
            (rng.random::<f32>() - 0.5) * extent[0],
            (rng.random::<f32>() - 0.5) * extent[1],
            (rng.random::<f32>() - 0.5) * extent[2],
        ];
        let color = palette_color(palette, coloring, rng);
        let size = size_range.0 + rng.random::<f32>() * (size_range.1 - size_range.0);
        Particle {
            position,
            color,
            size,
        }
    })
}

fn palette_color<R: Rng>(palette: &[Rgb], coloring: Coloring, rng: &mut R) -> Rgb {
    if palette.is_empty() {
        return Rgb::WHITE;
    }
    match coloring {
        Coloring::Pick => palette[rng.random_range(0..palette.len())],
        Coloring::Gradient => {
            let t = rng.random::<f32>() * palette.len() as f32;
            let stop = (t.floor() as usize).min(palette.len() - 1);
            let next = (stop + 1) % palette.len();
            palette[stop].lerp(palette[next], t - stop as f32)
        }
    }
}

/// Positions of a regular grid in the XY plane, row by row from +Y to -Y
fn grid_positions(width: f32, height: f32, segments_x: usize, segments_y: usize) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity((segments_x + 1) * (segments_y + 1));
    for iy in 0..=segments_y {
        let y = height / 2.0 - iy as f32 * height / segments_y as f32;
        for ix in 0..=segments_x {
            let x = ix as f32 * width / segments_x as f32 - width / 2.0;
            positions.push([x, y, 0.0]);
        }
    }
    positions
}

fn grid_triangles(segments_x: usize, segments_y: usize) -> Vec<[u32; 3]> {
    let row = segments_x + 1;
    let mut triangles = Vec::with_capacity(segments_x * segments_y * 2);
    for iy in 0..segments_y {
        for ix in 0..segments_x {
            let a = (ix + row * iy) as u32;
            let b = (ix + row * (iy + 1)) as u32;
            let c = (ix + 1 + row * (iy + 1)) as u32;
            let d = (ix + 1 + row * iy) as u32;
            triangles.push([a, b, d]);
            triangles.push([b, c, d]);
        }
    }
    triangles
}

/// Triangulated plane in the XY plane
pub fn plane(width: f32, height: f32, segments_x: usize, segments_y: usize) -> MeshBuffer {
    let segments_x = segments_x.max(1);
    let segments_y = segments_y.max(1);
    MeshBuffer::new(
        grid_positions(width, height, segments_x, segments_y),
        grid_triangles(segments_x, segments_y),
    )
}

/// Square plane raised into a central mountain range
pub fn terrain(width: f32, segments: usize) -> MeshBuffer {
    let segments = segments.max(1);
    let mut positions = grid_positions(width, width, segments, segments);
    for position in positions.iter_mut() {
        let [x, y, _] = *position;
        let distance = (x * x + y * y).sqrt();
        let ridge = 1.0 + (x * 0.5).sin() * 0.3 + (y * 0.5).cos() * 0.3;
        position[2] = (4.0 - distance * 0.3).max(0.0) * ridge;
    }
    MeshBuffer::new(positions, grid_triangles(segments, segments))
}

/// Horizontal and vertical grid lines at depth `z`
pub fn line_grid(width: f32, height: f32, divisions_x: usize, divisions_y: usize, z: f32) -> LineBuffer {
    let divisions_x = divisions_x.max(1);
    let divisions_y = divisions_y.max(1);
    let (half_width, half_height) = (width / 2.0, height / 2.0);
    let mut positions = Vec::with_capacity((divisions_x + divisions_y + 2) * 2);

    // Horizontal lines
    for i in 0..=divisions_y {
        let y = (i as f32 / divisions_y as f32) * height - half_height;
        positions.push([-half_width, y, z]);
        positions.push([half_width, y, z]);
    }

    // Vertical lines
    for i in 0..=divisions_x {
        let x = (i as f32 / divisions_x as f32) * width - half_width;
        positions.push([x, -half_height, z]);
        positions.push([x, half_height, z]);
    }

    LineBuffer::new(positions)
}

/// Lattice where every point links to its right and upper neighbour
pub fn lattice_lines(min: i32, max: i32, step: i32, z: f32) -> LineBuffer {
    let step = step.max(1);
    let fs = step as f32;
    let mut positions = Vec::new();
    for x in (min..=max).step_by(step as usize) {
        for y in (min..=max).step_by(step as usize) {
            let (fx, fy) = (x as f32, y as f32);
            positions.push([fx, fy, z]);
            positions.push([fx + fs, fy, z]);
            positions.push([fx, fy, z]);
            positions.push([fx, fy + fs, z]);
        }
    }
    LineBuffer::new(positions)
}

/// Points spread evenly over a sphere along a golden-angle spiral, pole to pole
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Vec3> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    (0..count)
        .map(|i| {
            let y = if count > 1 {
                1.0 - 2.0 * i as f32 / (count - 1) as f32
            } else {
                0.0
            };
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            [radius * ring * theta.cos(), radius * y, radius * ring * theta.sin()]
        })
        .collect()
}

/// One segment for every pair of points closer than `max_distance`
pub fn proximity_links(points: &[Vec3], max_distance: f32) -> LineBuffer {
    let limit = max_distance * max_distance;
    let mut positions = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = sub(b, a);
            if dot(&d, &d) < limit {
                positions.push(*a);
                positions.push(*b);
            }
        }
    }
    LineBuffer::new(positions)
}

/// Latitude/longitude sphere
pub fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> MeshBuffer {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut positions = Vec::with_capacity((width_segments + 1) * (height_segments + 1));
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * std::f32::consts::PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;
            positions.push([
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let row = width_segments + 1;
    let mut triangles = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * row + ix + 1) as u32;
            let b = (iy * row + ix) as u32;
            let c = ((iy + 1) * row + ix) as u32;
            let d = ((iy + 1) * row + ix + 1) as u32;
            if iy != 0 {
                triangles.push([a, b, d]);
            }
            if iy != height_segments - 1 {
                triangles.push([b, c, d]);
            }
        }
    }
    MeshBuffer::new(positions, triangles)
}

/// Torus around the Z axis
pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> MeshBuffer {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(3);
    let mut positions = Vec::with_capacity((radial_segments + 1) * (tubular_segments + 1));
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * std::f32::consts::TAU;
            positions.push([
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ]);
        }
    }

    let row = tubular_segments + 1;
    let mut triangles = Vec::with_capacity(radial_segments * tubular_segments * 2);
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = (row * j + i - 1) as u32;
            let b = (row * (j - 1) + i - 1) as u32;
            let c = (row * (j - 1) + i) as u32;
            let d = (row * j + i) as u32;
            triangles.push([a, b, d]);
            triangles.push([b, c, d]);
        }
    }
    MeshBuffer::new(positions, triangles)
}

/// Flat annulus in the XY plane
pub fn ring(inner: f32, outer: f32, segments: usize) -> MeshBuffer {
    let segments = segments.max(3);
    let mut positions = Vec::with_capacity(segments * 2);
    for i in 0..segments {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        positions.push([inner * cos, inner * sin, 0.0]);
        positions.push([outer * cos, outer * sin, 0.0]);
    }
    let mut triangles = Vec::with_capacity(segments * 2);
    for i in 0..segments {
        let next = (i + 1) % segments;
        let (a, b) = ((i * 2) as u32, (i * 2 + 1) as u32);
        let (c, d) = ((next * 2) as u32, (next * 2 + 1) as u32);
        triangles.push([a, b, d]);
        triangles.push([a, d, c]);
    }
    MeshBuffer::new(positions, triangles)
}

/// Cone standing on the XZ plane; `jitter` displaces every vertex by up to
/// half its value on each axis to give a low-poly look
pub fn cone<R: Rng>(
    radius: f32,
    height: f32,
    radial_segments: usize,
    jitter: f32,
    rng: &mut R,
) -> MeshBuffer {
    let radial_segments = radial_segments.max(3);
    let half = height / 2.0;
    let mut positions = Vec::with_capacity(radial_segments + 2);
    positions.push([0.0, half, 0.0]);
    positions.push([0.0, -half, 0.0]);
    for i in 0..radial_segments {
        let angle = i as f32 / radial_segments as f32 * std::f32::consts::TAU;
        positions.push([radius * angle.sin(), -half, radius * angle.cos()]);
    }
    if jitter > 0.0 {
        for position in positions.iter_mut() {
            for axis in position.iter_mut() {
                *axis += (rng.random::<f32>() - 0.5) * jitter;
            }
        }
    }

    let mut triangles = Vec::with_capacity(radial_segments * 2);
    for i in 0..radial_segments {
        let current = (i + 2) as u32;
        let next = ((i + 1) % radial_segments + 2) as u32;
        triangles.push([0, current, next]);
        triangles.push([1, next, current]);
    }
    MeshBuffer::new(positions, triangles)
}

/// Builds a flat-shaded polyhedron: every face gets its own vertices so
/// normals stay per face
fn polyhedron(vertices: &[Vec3], indices: &[[u32; 3]], radius: f32) -> MeshBuffer {
    let mut positions = Vec::with_capacity(indices.len() * 3);
    let mut triangles = Vec::with_capacity(indices.len());
    for (face, corners) in indices.iter().enumerate() {
        for &corner in corners {
            positions.push(scale(&normalize(&vertices[corner as usize]), radius));
        }
        let base = (face * 3) as u32;
        triangles.push([base, base + 1, base + 2]);
    }
    MeshBuffer::new(positions, triangles)
}

pub fn tetrahedron(radius: f32) -> MeshBuffer {
    let vertices = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let indices = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
    polyhedron(&vertices, &indices, radius)
}

pub fn octahedron(radius: f32) -> MeshBuffer {
    let vertices = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let indices = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    polyhedron(&vertices, &indices, radius)
}

pub fn icosahedron(radius: f32) -> MeshBuffer {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let vertices = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let indices = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    polyhedron(&vertices, &indices, radius)
}

pub fn dodecahedron(radius: f32) -> MeshBuffer {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    let vertices = [
        // (±1, ±1, ±1)
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        // (0, ±1/φ, ±φ)
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        // (±1/φ, ±φ, 0)
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        // (±φ, 0, ±1/φ)
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ];
    let indices = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];
    polyhedron(&vertices, &indices, radius)
}

/// Welds coincident vertices so edges can be matched across faces
fn weld(positions: &[Vec3]) -> Vec<u32> {
    let mut seen: HashMap<[i64; 3], u32> = HashMap::new();
    positions
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let key = [
                (p[0] * 1e4).round() as i64,
                (p[1] * 1e4).round() as i64,
                (p[2] * 1e4).round() as i64,
            ];
            *seen.entry(key).or_insert(index as u32)
        })
        .collect()
}

/// Unique edges of the mesh keyed by welded vertex, with every adjacent face
fn edge_faces(mesh: &MeshBuffer) -> Vec<([u32; 2], Vec<usize>)> {
    let welded = weld(mesh.rest());
    let mut order = Vec::new();
    let mut edges: HashMap<[u32; 2], Vec<usize>> = HashMap::new();
    for (face, triangle) in mesh.triangles().iter().enumerate() {
        for k in 0..3 {
            let a = welded[triangle[k] as usize];
            let b = welded[triangle[(k + 1) % 3] as usize];
            if a == b {
                continue;
            }
            let key = [a.min(b), a.max(b)];
            let faces = edges.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            faces.push(face);
        }
    }
    order
        .into_iter()
        .map(|key| {
            let faces = edges.remove(&key).unwrap_or_default();
            (key, faces)
        })
        .collect()
}

/// Every unique triangle edge, as pairs of vertex indices into `mesh`
pub fn wire_edges(mesh: &MeshBuffer) -> Vec<[u32; 2]> {
    edge_faces(mesh).into_iter().map(|(edge, _)| edge).collect()
}

/// Outline edges: boundary edges plus edges whose adjacent faces meet at
/// more than `threshold_degrees`
pub fn feature_edges(mesh: &MeshBuffer, threshold_degrees: f32) -> Vec<[u32; 2]> {
    let rest = mesh.rest();
    let face_normals: Vec<Vec3> = mesh
        .triangles()
        .iter()
        .map(|&[a, b, c]| calculate_normal(&rest[a as usize], &rest[b as usize], &rest[c as usize]))
        .collect();
    let limit = threshold_degrees.to_radians().cos();

    edge_faces(mesh)
        .into_iter()
        .filter(|(_, faces)| match faces.as_slice() {
            [first, second] => dot(&face_normals[*first], &face_normals[*second]) < limit,
            _ => true,
        })
        .map(|(edge, _)| edge)
        .collect()
}
