//! The built-in scene catalogue

use std::f32::consts::PI;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::motion::{Float3, Oscillator, Spin, Tilt};
use crate::animation::{
    Attraction, Containment, CursorConfig, Fill, GlobeConfig, Glow, Jitter, MatrixConfig, ParticleConfig,
    PointerResponse, Pull, Ripple, Shading, ShapeConfig, ShapeKind, ShapeLight, SurfaceWire, Topology, WaveAxis,
    WaveConfig, WaveTerm, Wireframe,
};
use crate::camera::Camera;
use crate::color::Rgb;
use crate::geometry::Coloring;
use crate::graphics::Fog;
use crate::lighting::{Light, Lighting};
use crate::postfx::Effect;
use crate::scene::{NodeDescriptor, NodeKind, SceneDescriptor};

/// Luminance smoothing shared by every bloom pass
const BLOOM_SMOOTHING: f32 = 0.9;
/// Falloff distance of the scene point lights
const LIGHT_RANGE: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Linked point sphere turning towards the pointer; the page background
    Globe,
    /// Gradient-colored particle cloud that parts around the pointer
    ParticleField,
    /// Undulating translucent plane
    Waves,
    /// Slowly spinning spheres, tori and octahedra
    FloatingShapes,
    /// Falling green glyph columns over a rippling grid
    Matrix,
    /// Outlined mountain terrain with repelling icosahedra
    WireframeTerrain,
    /// Jittered low-poly mountains and platonic solids
    LowPoly,
    /// Radial wave grid with wireframe spheres
    MinimalWireframe,
    /// Glowing orbs, particles and a lattice
    Professional,
    /// Gradient spheres, neon rings and a rainbow wave
    Aesthetic,
}

impl Preset {
    pub const ALL: [Preset; 10] = [
        Preset::Globe,
        Preset::ParticleField,
        Preset::Waves,
        Preset::FloatingShapes,
        Preset::Matrix,
        Preset::WireframeTerrain,
        Preset::LowPoly,
        Preset::MinimalWireframe,
        Preset::Professional,
        Preset::Aesthetic,
    ];

    /// The command-line name of the preset
    pub fn name(self) -> &'static str {
        match self {
            Preset::Globe => "globe",
            Preset::ParticleField => "particle-field",
            Preset::Waves => "waves",
            Preset::FloatingShapes => "floating-shapes",
            Preset::Matrix => "matrix",
            Preset::WireframeTerrain => "wireframe-terrain",
            Preset::LowPoly => "low-poly",
            Preset::MinimalWireframe => "minimal-wireframe",
            Preset::Professional => "professional",
            Preset::Aesthetic => "aesthetic",
        }
    }

    /// The preset after this one, wrapping around at the end of [`Preset::ALL`]
    pub fn next(self) -> Preset {
        let index = Preset::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Preset::ALL[(index + 1) % Preset::ALL.len()]
    }

    /// Builds the scene; `seed` drives every random placement and buffer
    pub fn descriptor(self, seed: u64) -> SceneDescriptor {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = match self {
            Preset::Globe => globe(),
            Preset::ParticleField => particle_field(),
            Preset::Waves => waves(),
            Preset::FloatingShapes => floating_shapes(),
            Preset::Matrix => matrix(&mut rng),
            Preset::WireframeTerrain => wireframe_terrain(),
            Preset::LowPoly => low_poly(),
            Preset::MinimalWireframe => minimal_wireframe(),
            Preset::Professional => professional(),
            Preset::Aesthetic => aesthetic(),
        };
        for node in &mut scene.nodes {
            node.seed = rng.random();
        }
        scene
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn bloom(intensity: f32, threshold: f32) -> Effect {
    Effect::Bloom {
        intensity,
        threshold,
        smoothing: BLOOM_SMOOTHING,
    }
}

fn point(position: [f32; 3], color: u32, intensity: f32) -> Light {
    Light::point(position, Rgb::hex(color), intensity).with_range(LIGHT_RANGE)
}

fn directional(position: [f32; 3], color: u32, intensity: f32) -> Light {
    Light::directional(position, Rgb::hex(color), intensity)
}

fn fog(color: u32, near: f32, far: f32) -> Option<Fog> {
    Some(Fog {
        color: Rgb::hex(color),
        near,
        far,
    })
}

fn tilt(pitch: f32, yaw: f32, roll: f32, factor: f32) -> Tilt {
    Tilt {
        rest: [0.0; 3],
        pitch,
        yaw,
        roll,
        factor,
    }
}

fn shape(name: &str, config: ShapeConfig) -> NodeDescriptor {
    NodeDescriptor::new(name, NodeKind::Shape(config))
}

fn globe() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("globe", Camera::new([0.0, 0.0, 18.0], 60.0));
    scene.background = Rgb::hex(0x0a0a0f);
    scene.effects.push(bloom(0.6, 0.3));
    let config = GlobeConfig {
        line_color: Rgb::hex(0x3b82f6),
        point_color: Rgb::hex(0x8b5cf6),
        ..GlobeConfig::default()
    };
    scene
        .nodes
        .push(NodeDescriptor::new("globe", NodeKind::Globe(config)).with_scale(1.2));
    scene
}

fn particle_field() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("particle-field", Camera::new([0.0, 0.0, 15.0], 60.0));
    scene.background = Rgb::hex(0x0a0a0f);
    scene.effects.push(bloom(1.0, 0.2));
    let config = ParticleConfig {
        count: 800,
        extent: [30.0, 30.0, 20.0],
        palette: vec![Rgb::hex(0x3b82f6), Rgb::hex(0x8b5cf6), Rgb::hex(0xec4899)],
        coloring: Coloring::Gradient,
        size_range: (1.0, 1.0),
        opacity: 0.6,
        // 0.0005 rad per frame at 60 fps
        spin_rate: 0.03,
        jitter: Some(Jitter {
            amplitude: 0.01,
            frequency: 1.0,
        }),
        attraction: Some(Attraction {
            reach: 5.0,
            radius: Some(3.0),
            pull: Pull::Fraction(0.02),
        }),
        containment: None,
        field_spin: [0.0, 0.05, 0.0],
    };
    scene
        .nodes
        .push(NodeDescriptor::new("particles", NodeKind::Particles(config)).with_size(0.08));
    scene
}

fn waves() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("waves", Camera::new([0.0, 2.0, 10.0], 60.0));
    scene.background = Rgb::hex(0x0a0a0f);
    let config = WaveConfig {
        topology: Topology::Mesh {
            width: 40.0,
            height: 40.0,
            segments_x: 128,
            segments_y: 128,
        },
        terms: vec![
            WaveTerm::sin(WaveAxis::X, 1.5, 1.0, 0.5),
            WaveTerm::sin(WaveAxis::Y, 2.25, -0.7, 0.5),
            WaveTerm::sin(WaveAxis::Diagonal, 0.75, 0.5, 0.25),
        ],
        shading: Shading::Elevation {
            low: Rgb::hex(0x3b82f6),
            high: Rgb::hex(0x8b5cf6),
        },
        opacity: 0.15,
        ..WaveConfig::default()
    };
    scene.nodes.push(
        NodeDescriptor::new("waves", NodeKind::Wave(config))
            .at([0.0, -5.0, -10.0])
            .with_rotation([-PI / 2.5, 0.0, 0.0])
            .with_speed(0.5),
    );
    scene
}

fn floating_shapes() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("floating-shapes", Camera::new([0.0, 0.0, 10.0], 45.0));
    scene.background = Rgb::hex(0x0a0a0f);
    scene.lighting = Lighting {
        ambient: 0.5,
        lights: vec![
            point([10.0, 10.0, 10.0], 0x3b82f6, 1.0),
            point([-10.0, -10.0, -10.0], 0x8b5cf6, 0.5),
        ],
    };
    let sphere = ShapeKind::Sphere {
        radius: 1.0,
        width_segments: 32,
        height_segments: 32,
    };
    let torus = ShapeKind::Torus {
        radius: 1.0,
        tube: 0.4,
        radial_segments: 16,
        tubular_segments: 100,
    };
    let octahedron = ShapeKind::Octahedron(1.2);
    let shapes = [
        ([-8.0, 4.0, -5.0], 0x3b82f6, sphere, 1.2),
        ([8.0, -3.0, -8.0], 0x8b5cf6, torus, 0.8),
        ([-6.0, -4.0, -6.0], 0xec4899, octahedron, 1.0),
        ([7.0, 5.0, -7.0], 0x3b82f6, sphere, 0.9),
        ([0.0, -2.0, -10.0], 0x8b5cf6, torus, 1.1),
        ([-9.0, 2.0, -9.0], 0xec4899, octahedron, 0.7),
    ];
    for (i, (position, color, kind, scale)) in shapes.into_iter().enumerate() {
        let config = ShapeConfig {
            float: Float3 {
                y: Some(Oscillator::new(0.15, 0.5, i as f32)),
                ..Float3::NONE
            },
            spin: Spin::PerFrame([0.001, 0.002, 0.0]),
            fill: Some(Fill::Standard {
                opacity: 0.15,
                emissive: 0.0,
            }),
            ..ShapeConfig::new(kind)
        };
        scene.nodes.push(
            shape(&format!("shape-{}", i), config)
                .at(position)
                .with_color(Rgb::hex(color))
                .with_scale(scale),
        );
    }
    scene
}

fn matrix(rng: &mut StdRng) -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("matrix", Camera::new([0.0, 0.0, 15.0], 60.0));
    scene.background = Rgb::hex(0x0a0a0a);
    scene.fog = fog(0x0a0a0a, 10.0, 30.0);
    scene.effects.push(bloom(1.5, 0.1));
    scene.lighting = Lighting {
        ambient: 0.2,
        lights: vec![point([0.0, 0.0, 10.0], 0x00ff41, 0.5)],
    };
    let palette = [0x00ff41, 0x00ff88, 0x00ffaa, 0x39ff14];
    for i in 0..30 {
        let position = [
            (i as f32 - 15.0) * 0.8,
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
        ];
        let color = palette[rng.random_range(0..palette.len())];
        scene.nodes.push(
            NodeDescriptor::new(format!("column-{}", i), NodeKind::MatrixColumn(MatrixConfig::default()))
                .at(position)
                .with_color(Rgb::hex(color))
                .with_speed(rng.random_range(0.3..0.7)),
        );
    }
    let grid = WaveConfig {
        topology: Topology::Lines {
            width: 40.0,
            height: 40.0,
            divisions_x: 40,
            divisions_y: 40,
            z: -10.0,
        },
        ripple: Some(Ripple::Wave {
            reach: 20.0,
            wavenumber: 0.3,
            angular_speed: 2.0,
            decay: 0.05,
            amplitude: 2.0,
        }),
        opacity: 0.15,
        additive: true,
        sway: Float3 {
            z: Some(Oscillator::new(0.05, 0.1, 0.0)),
            ..Float3::NONE
        },
        ..WaveConfig::default()
    };
    scene
        .nodes
        .push(NodeDescriptor::new("grid", NodeKind::Wave(grid)).with_color(Rgb::hex(0x00ff41)));
    scene.nodes.push(
        NodeDescriptor::new("cursor", NodeKind::Cursor(CursorConfig::default()))
            .at([0.0, 0.0, 2.0])
            .with_color(Rgb::hex(0x00ff41)),
    );
    scene
}

fn wireframe_terrain() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("wireframe-terrain", Camera::new([0.0, 3.0, 14.0], 55.0));
    scene.background = Rgb::hex(0x0d0d0d);
    scene.fog = fog(0x0d0d0d, 10.0, 24.0);
    scene.effects.push(bloom(0.6, 0.15));
    scene.lighting = Lighting {
        ambient: 0.4,
        lights: vec![
            directional([8.0, 8.0, 8.0], 0x00d4ff, 0.8),
            point([-8.0, 5.0, 0.0], 0x0099ff, 0.6),
            point([0.0, 8.0, 5.0], 0x00bfff, 0.5),
        ],
    };
    let terrain = WaveConfig {
        topology: Topology::Terrain {
            width: 24.0,
            segments: 30,
        },
        terms: vec![
            WaveTerm::sin(WaveAxis::X, 0.4, 0.5, 0.15),
            WaveTerm::cos(WaveAxis::Y, 0.4, -0.3, 0.15),
        ],
        opacity: 0.04,
        wire: Some(SurfaceWire {
            color: Rgb::hex(0x00d4ff),
            opacity: 0.85,
            threshold: None,
        }),
        tilt: Some(Tilt {
            rest: [-PI / 3.0, 0.0, 0.0],
            ..tilt(0.15, 0.2, 0.0, 0.02)
        }),
        spin: Spin::PerFrame([0.0, 0.0, 0.0003]),
        ..WaveConfig::default()
    };
    scene.nodes.push(
        NodeDescriptor::new("terrain", NodeKind::Wave(terrain))
            .at([0.0, -4.0, -6.0])
            .with_scale(1.8)
            .with_color(Rgb::hex(0x00bfff)),
    );
    // Solids sit in a group scaled 2.5x, so positions and reach are scaled with it
    let solids = [
        ([-3.0, 2.0, -3.0], 0.9, 0x00d4ff),
        ([3.0, 1.0, -4.0], 1.1, 0x00bfff),
        ([0.0, 3.0, -2.0], 0.7, 0x0099ff),
        ([-2.0, -1.0, -1.0], 0.8, 0x00aaff),
    ];
    for (i, (position, size, color)) in solids.into_iter().enumerate() {
        let position: [f32; 3] = position;
        let config = ShapeConfig {
            float: Float3 {
                z: Some(Oscillator::new(0.35 * 2.5, 0.5, position[0])),
                ..Float3::NONE
            },
            spin: Spin::PerFrame([0.002, 0.003, 0.0]),
            response: PointerResponse::Repel {
                reach: 5.0 * 2.5,
                radius: 4.0 * 2.5,
                push: 0.08,
                spring: 0.05,
            },
            fill: Some(Fill::Standard {
                opacity: 0.06,
                emissive: 0.2,
            }),
            wire: Some(Wireframe {
                color: None,
                opacity: 0.9,
                threshold: Some(10.0),
            }),
            ..ShapeConfig::new(ShapeKind::Icosahedron(size))
        };
        scene.nodes.push(
            shape(&format!("solid-{}", i), config)
                .at(position.map(|v| v * 2.5))
                .with_scale(2.5)
                .with_color(Rgb::hex(color)),
        );
    }
    scene
}

fn low_poly() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("low-poly", Camera::new([0.0, 0.0, 12.0], 60.0));
    scene.background = Rgb::hex(0x0d0d0d);
    scene.fog = fog(0x0d0d0d, 8.0, 20.0);
    scene.effects.push(bloom(0.5, 0.2));
    scene.lighting = Lighting {
        ambient: 0.4,
        lights: vec![
            directional([10.0, 10.0, 5.0], 0x00d4ff, 0.8),
            directional([-10.0, -10.0, -5.0], 0x0080ff, 0.5),
            point([0.0, 5.0, 0.0], 0x00bfff, 0.6),
        ],
    };
    let wire = Some(Wireframe {
        color: None,
        opacity: 0.95,
        threshold: Some(15.0),
    });
    let mountains = [
        ([-3.0, -1.5, -5.0], 1.0, 0x00bfff, 0.001),
        ([3.0, -2.0, -7.0], 1.2, 0x0099ff, -0.0008),
        ([0.0, -2.5, -9.0], 1.4, 0x0080ff, 0.0012),
    ];
    for (i, (position, scale, color, rate)) in mountains.into_iter().enumerate() {
        let config = ShapeConfig {
            float: Float3 {
                y: Some(Oscillator::new(0.15 * 2.5, 0.5, 0.0)),
                ..Float3::NONE
            },
            spin: Spin::PerFrame([0.0, rate, 0.0]),
            response: PointerResponse::Tilt(tilt(0.2, 0.0, 0.2, 0.03)),
            fill: Some(Fill::Standard {
                opacity: 0.08,
                emissive: 0.0,
            }),
            wire,
            ..ShapeConfig::new(ShapeKind::Cone {
                radius: 1.5,
                height: 2.5,
                radial_segments: 6,
                jitter: 0.2,
            })
        };
        scene.nodes.push(
            shape(&format!("mountain-{}", i), config)
                .at(position)
                .with_scale(scale * 2.5)
                .with_color(Rgb::hex(color)),
        );
    }
    let solids = [
        ([-4.0, 2.0, -4.0], ShapeKind::Icosahedron(1.0), 0x00d4ff),
        ([4.0, 1.0, -6.0], ShapeKind::Octahedron(1.0), 0x00bfff),
        ([-2.0, 3.5, -8.0], ShapeKind::Tetrahedron(1.0), 0x0099ff),
        ([2.0, -0.5, -5.0], ShapeKind::Dodecahedron(1.0), 0x00aaff),
    ];
    for (i, (position, kind, color)) in solids.into_iter().enumerate() {
        let position: [f32; 3] = position;
        let config = ShapeConfig {
            float: Float3 {
                y: Some(Oscillator::new(0.2 * 2.5, 0.7, position[0])),
                ..Float3::NONE
            },
            spin: Spin::PerFrame([0.002, 0.003, 0.0]),
            response: PointerResponse::Hover {
                reach: 5.0,
                radius: 4.0,
                scale: 1.15,
                factor: 0.05,
            },
            fill: Some(Fill::Standard {
                opacity: 0.05,
                emissive: 0.0,
            }),
            wire,
            ..ShapeConfig::new(kind)
        };
        scene.nodes.push(
            shape(&format!("solid-{}", i), config)
                .at(position)
                .with_scale(2.5)
                .with_color(Rgb::hex(color)),
        );
    }
    scene
}

fn minimal_wireframe() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("minimal-wireframe", Camera::new([0.0, 0.0, 13.0], 55.0));
    scene.background = Rgb::hex(0x0d0d0d);
    scene.fog = fog(0x0d0d0d, 12.0, 22.0);
    scene.effects.push(bloom(0.55, 0.2));
    scene.lighting = Lighting {
        ambient: 0.3,
        lights: vec![
            point([12.0, 12.0, 12.0], 0x00d4ff, 0.6),
            point([-8.0, 6.0, 8.0], 0x00bfff, 0.4),
        ],
    };
    let grid = WaveConfig {
        topology: Topology::Lines {
            width: 26.0,
            height: 26.0,
            divisions_x: 24,
            divisions_y: 24,
            z: 0.0,
        },
        terms: vec![WaveTerm::sin(WaveAxis::Radial, 0.25, -0.5, 0.7)],
        opacity: 0.8,
        tilt: Some(Tilt {
            rest: [-PI / 4.0, 0.0, 0.0],
            ..tilt(0.1, 0.15, 0.0, 0.03)
        }),
        ..WaveConfig::default()
    };
    scene.nodes.push(
        NodeDescriptor::new("grid", NodeKind::Wave(grid))
            .at([0.0, -3.0, -10.0])
            .with_scale(1.5)
            .with_color(Rgb::hex(0x00d4ff)),
    );
    let spheres = [
        ([0.0, 0.0, -6.0], 1.6, 0x00d4ff),
        ([-5.0, 1.5, -8.0], 1.1, 0x00bfff),
        ([5.0, -1.5, -7.0], 1.3, 0x0099ff),
    ];
    for (i, (position, radius, color)) in spheres.into_iter().enumerate() {
        let config = ShapeConfig {
            spin: Spin::PerFrame([0.001, 0.003, 0.0]),
            pulse: Some(Oscillator::new(0.06, 0.5, 0.0)),
            response: PointerResponse::Tilt(tilt(0.0, 0.0, 0.15, 0.03)),
            fill: Some(Fill::Basic { opacity: 0.03 }),
            wire: Some(Wireframe {
                color: None,
                opacity: 0.9,
                threshold: Some(15.0),
            }),
            ..ShapeConfig::new(ShapeKind::Sphere {
                radius,
                width_segments: 10,
                height_segments: 8,
            })
        };
        scene.nodes.push(
            shape(&format!("sphere-{}", i), config)
                .at(position)
                .with_scale(2.3)
                .with_color(Rgb::hex(color)),
        );
    }
    scene
}

fn professional() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("professional", Camera::new([0.0, 0.0, 10.0], 60.0));
    scene.background = Rgb::hex(0x0a0a0f);
    scene.fog = fog(0x0a0a0f, 8.0, 25.0);
    scene.effects.push(bloom(1.0, 0.2));
    scene.lighting = Lighting {
        ambient: 0.5,
        lights: vec![directional([5.0, 5.0, 5.0], 0x3b82f6, 0.3)],
    };
    let orbs = [
        ([-5.0, 2.0, -4.0], 0x3b82f6, 1.4, 0.8),
        ([5.0, -1.0, -5.0], 0x8b5cf6, 1.2, 1.0),
        ([0.0, 3.0, -6.0], 0xf59e0b, 1.1, 1.2),
        ([-3.0, -2.0, -3.0], 0x60a5fa, 1.0, 0.9),
        ([4.0, 2.0, -7.0], 0xa78bfa, 1.3, 0.7),
        ([-2.0, 0.0, -2.0], 0x3b82f6, 0.9, 1.1),
    ];
    for (i, (position, color, size, speed)) in orbs.into_iter().enumerate() {
        let config = ShapeConfig {
            float: Float3 {
                x: Some(Oscillator::cosine(0.4, 0.3, 0.0)),
                y: Some(Oscillator::new(0.6, 0.5, 0.0)),
                z: None,
            },
            spin: Spin::Rate([0.15, 0.2, 0.0]),
            pulse: Some(Oscillator::new(0.12, 0.8, 0.0)),
            response: PointerResponse::Attract {
                reach: 2.5,
                factor: 0.015,
                radius: None,
            },
            fill: Some(Fill::Standard {
                opacity: 0.7,
                emissive: 0.8,
            }),
            glow: Some(Glow {
                scale: 1.2,
                opacity: 0.15,
            }),
            light: Some(ShapeLight {
                intensity: 2.0,
                pulse: Oscillator::new(0.5, 0.5, 0.0),
                range: Some(8.0),
            }),
            ..ShapeConfig::new(ShapeKind::Sphere {
                radius: 1.0,
                width_segments: 24,
                height_segments: 16,
            })
        };
        scene.nodes.push(
            shape(&format!("orb-{}", i), config)
                .at(position)
                .with_color(Rgb::hex(color))
                .with_size(size)
                .with_speed(speed),
        );
    }
    let particles = ParticleConfig {
        count: 1800,
        extent: [35.0, 35.0, 25.0],
        palette: [0x3b82f6, 0x8b5cf6, 0xf59e0b, 0x60a5fa, 0xa78bfa]
            .into_iter()
            .map(Rgb::hex)
            .collect(),
        coloring: Coloring::Pick,
        size_range: (0.3, 0.8),
        opacity: 0.75,
        spin_rate: 0.0,
        jitter: Some(Jitter {
            amplitude: 0.01,
            frequency: 0.3,
        }),
        attraction: Some(Attraction {
            reach: 18.0,
            radius: Some(6.0),
            pull: Pull::Falloff(0.003),
        }),
        containment: Some(Containment {
            bound: 17.0,
            damping: 0.95,
        }),
        field_spin: [0.0, 0.015, 0.0],
    };
    scene
        .nodes
        .push(NodeDescriptor::new("particles", NodeKind::Particles(particles)).with_size(0.1));
    let lattice = WaveConfig {
        topology: Topology::Lattice {
            min: -10,
            max: 10,
            step: 2,
            z: -8.0,
        },
        terms: vec![WaveTerm::sin(WaveAxis::Diagonal, 0.2, 0.5, 0.3)],
        ripple: Some(Ripple::Bump {
            reach: 15.0,
            radius: 8.0,
            amplitude: 2.0,
        }),
        opacity: 0.15,
        additive: true,
        ..WaveConfig::default()
    };
    scene.nodes.push(
        NodeDescriptor::new("lattice", NodeKind::Wave(lattice)).with_color(Rgb::new(0.23, 0.51, 0.96)),
    );
    scene
}

fn aesthetic() -> SceneDescriptor {
    let mut scene = SceneDescriptor::new("aesthetic", Camera::new([0.0, 0.0, 12.0], 60.0));
    scene.background = Rgb::hex(0x0a0a1f);
    scene.fog = fog(0x0a0a1f, 10.0, 35.0);
    scene.effects.push(bloom(1.2, 0.1));
    scene.effects.push(Effect::ChromaticAberration {
        offset: [0.0005, 0.0005],
    });
    scene.lighting = Lighting {
        ambient: 0.5,
        lights: vec![
            point([10.0, 10.0, 10.0], 0xff006e, 2.0),
            point([-10.0, -10.0, -10.0], 0x3a86ff, 2.0),
            point([0.0, 0.0, 10.0], 0xffbe0b, 1.5),
        ],
    };
    let spheres = [
        ([-4.0, 2.0, -4.0], [0xff006e, 0xfb5607, 0xffbe0b], 1.5, 0.8),
        ([4.0, -2.0, -6.0], [0x3a86ff, 0x8338ec, 0x06ffa5], 1.3, 1.0),
        ([0.0, 3.0, -5.0], [0xffbe0b, 0x06ffa5, 0xff006e], 1.2, 1.2),
    ];
    for (i, (position, colors, size, speed)) in spheres.into_iter().enumerate() {
        let config = ShapeConfig {
            float: Float3 {
                x: Some(Oscillator::cosine(0.5, 0.3, 0.0)),
                y: Some(Oscillator::new(0.8, 0.5, 0.0)),
                z: None,
            },
            spin: Spin::Rate([0.2, 0.3, 0.0]),
            pulse: Some(Oscillator::new(0.15, 0.8, 0.0)),
            response: PointerResponse::Attract {
                reach: 3.0,
                factor: 0.02,
                radius: None,
            },
            fill: Some(Fill::Gradient {
                colors: colors.map(Rgb::hex),
                opacity: 0.9,
            }),
            ..ShapeConfig::new(ShapeKind::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 24,
            })
        };
        scene.nodes.push(
            shape(&format!("sphere-{}", i), config)
                .at(position)
                .with_color(Rgb::hex(colors[0]))
                .with_size(size)
                .with_speed(speed),
        );
    }
    let rings = [
        ([-3.0, -1.0, -3.0], 0xff006e, 1.5, 0.6),
        ([3.0, 1.0, -4.0], 0x3a86ff, 1.8, 0.8),
        ([0.0, -2.0, -2.0], 0x06ffa5, 1.3, 1.0),
    ];
    for (i, (position, color, radius, speed)) in rings.into_iter().enumerate() {
        let config = ShapeConfig {
            float: Float3 {
                y: Some(Oscillator::new(0.5, 0.7, 0.0)),
                ..Float3::NONE
            },
            spin: Spin::Rate([0.5, 0.3, 0.2]),
            response: PointerResponse::Tilt(tilt(0.5, 0.0, 0.5, 0.03)),
            fill: Some(Fill::Standard {
                opacity: 0.8,
                emissive: 1.5,
            }),
            ..ShapeConfig::new(ShapeKind::Torus {
                radius,
                tube: 0.15,
                radial_segments: 16,
                tubular_segments: 100,
            })
        };
        scene.nodes.push(
            shape(&format!("ring-{}", i), config)
                .at(position)
                .with_color(Rgb::hex(color))
                .with_speed(speed),
        );
    }
    let particles = ParticleConfig {
        count: 2000,
        extent: [40.0, 40.0, 30.0],
        palette: [0xff006e, 0xfb5607, 0xffbe0b, 0x8338ec, 0x3a86ff, 0x06ffa5]
            .into_iter()
            .map(Rgb::hex)
            .collect(),
        coloring: Coloring::Pick,
        size_range: (0.0, 1.0),
        opacity: 0.8,
        spin_rate: 0.05,
        jitter: Some(Jitter {
            amplitude: 0.01,
            frequency: 1.0,
        }),
        attraction: Some(Attraction {
            reach: 20.0,
            radius: Some(8.0),
            pull: Pull::Fraction(0.005),
        }),
        containment: None,
        field_spin: [0.0, 0.0, 0.02],
    };
    scene
        .nodes
        .push(NodeDescriptor::new("particles", NodeKind::Particles(particles)).with_size(0.08));
    let wave = WaveConfig {
        topology: Topology::Mesh {
            width: 50.0,
            height: 50.0,
            segments_x: 100,
            segments_y: 100,
        },
        terms: vec![
            WaveTerm::sin(WaveAxis::X, 0.5, 1.0, 0.5),
            WaveTerm::cos(WaveAxis::Y, 0.5, 0.8, 0.5),
        ],
        ripple: Some(Ripple::Wave {
            reach: 20.0,
            wavenumber: 0.5,
            angular_speed: 2.0,
            decay: 0.1,
            amplitude: 3.0,
        }),
        shading: Shading::Rainbow,
        opacity: 0.3,
        ..WaveConfig::default()
    };
    scene.nodes.push(
        NodeDescriptor::new("wave", NodeKind::Wave(wave))
            .at([0.0, 0.0, -15.0])
            .with_rotation([-PI / 6.0, 0.0, 0.0]),
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_value_enum() {
        for preset in Preset::ALL {
            let value = preset.to_possible_value().unwrap();
            assert_eq!(value.get_name(), preset.name());
            assert_eq!(Preset::from_str(preset.name(), false).unwrap(), preset);
        }
    }

    #[test]
    fn test_every_preset_has_nodes() {
        for preset in Preset::ALL {
            let scene = preset.descriptor(1);
            assert!(!scene.nodes.is_empty(), "{} has no nodes", preset);
            assert_eq!(scene.name, preset.name());
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        for preset in Preset::ALL {
            assert_eq!(preset.descriptor(42), preset.descriptor(42));
        }
        assert_ne!(Preset::Matrix.descriptor(1), Preset::Matrix.descriptor(2));
    }

    #[test]
    fn test_matrix_columns() {
        let scene = Preset::Matrix.descriptor(7);
        let columns: Vec<_> = scene
            .nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::MatrixColumn(_)))
            .collect();
        assert_eq!(columns.len(), 30);
        for (i, column) in columns.iter().enumerate() {
            let position = column.transform.position;
            assert!((position[0] - (i as f32 - 15.0) * 0.8).abs() < 1e-6);
            assert!((-5.0..5.0).contains(&position[1]));
            assert!((-5.0..5.0).contains(&position[2]));
            assert!((0.3..0.7).contains(&column.speed));
        }
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut preset = Preset::Globe;
        let mut seen = Vec::new();
        for _ in 0..Preset::ALL.len() {
            seen.push(preset);
            preset = preset.next();
        }
        assert_eq!(seen, Preset::ALL.to_vec());
        assert_eq!(preset, Preset::Globe);
        assert_eq!(Preset::Aesthetic.next(), Preset::Globe);
    }

    #[test]
    fn test_globe_scene() {
        let scene = Preset::Globe.descriptor(0);
        assert_eq!(scene.background, Rgb::hex(0x0a0a0f));
        let NodeKind::Globe(config) = &scene.nodes[0].kind else {
            panic!("globe preset without a globe node");
        };
        assert_eq!(config.line_color, Rgb::hex(0x3b82f6));
        assert_eq!(config.point_color, Rgb::hex(0x8b5cf6));
        assert_eq!(scene.nodes[0].transform.scale, [1.2; 3]);
    }

    #[test]
    fn test_aesthetic_post_processing() {
        let scene = Preset::Aesthetic.descriptor(0);
        assert_eq!(scene.effects.len(), 2);
        assert!(matches!(scene.effects[1], Effect::ChromaticAberration { .. }));
    }
}
