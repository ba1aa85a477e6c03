//! Scene composer: declarative descriptors and their instantiated node tree

use log::debug;

use crate::animation::{
    Animation, CursorConfig, CursorTrail, FloatingShape, FrameInput, Globe, GlobeConfig, MatrixConfig, MatrixRain,
    ParticleConfig, ParticleField, ShapeConfig, WaveConfig, WaveSurface,
};
use crate::camera::Camera;
use crate::color::Rgb;
use crate::graphics::{Canvas, Fog, Painter};
use crate::lighting::Lighting;
use crate::math::{Transform, Vec3};
use crate::pointer::{PointerHub, PointerListener};
use crate::postfx::Effect;

/// Which animation family a node belongs to, with its configuration
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Particles(ParticleConfig),
    Wave(WaveConfig),
    Shape(ShapeConfig),
    MatrixColumn(MatrixConfig),
    Cursor(CursorConfig),
    Globe(GlobeConfig),
}

/// Immutable configuration of one visual element
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
    pub name: String,
    pub transform: Transform,
    pub color: Rgb,
    pub size: f32,
    /// Multiplier on elapsed time
    pub speed: f32,
    /// Seed for any randomness in the node's buffers
    pub seed: u64,
    pub kind: NodeKind,
}

impl NodeDescriptor {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        NodeDescriptor {
            name: name.into(),
            transform: Transform::IDENTITY,
            color: Rgb::WHITE,
            size: 1.0,
            speed: 1.0,
            seed: 0,
            kind,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = [scale; 3];
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the animation for this node; its buffers are not built until mount
    pub fn instantiate(&self) -> Box<dyn Animation> {
        match &self.kind {
            NodeKind::Particles(config) => Box::new(ParticleField::new(self, config.clone())),
            NodeKind::Wave(config) => Box::new(WaveSurface::new(self, config.clone())),
            NodeKind::Shape(config) => Box::new(FloatingShape::new(self, config.clone())),
            NodeKind::MatrixColumn(config) => Box::new(MatrixRain::new(self, *config)),
            NodeKind::Cursor(config) => Box::new(CursorTrail::new(self, *config)),
            NodeKind::Globe(config) => Box::new(Globe::new(self, *config)),
        }
    }
}

/// Everything needed to build a scene, assembled once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    pub name: String,
    pub background: Rgb,
    pub camera: Camera,
    pub lighting: Lighting,
    pub fog: Option<Fog>,
    pub effects: Vec<Effect>,
    pub nodes: Vec<NodeDescriptor>,
}

impl SceneDescriptor {
    pub fn new(name: impl Into<String>, camera: Camera) -> Self {
        SceneDescriptor {
            name: name.into(),
            background: Rgb::BLACK,
            camera,
            lighting: Lighting::default(),
            fog: None,
            effects: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Overrides the particle count of every particle node
    pub fn with_particle_count(mut self, count: usize) -> Self {
        for node in &mut self.nodes {
            if let NodeKind::Particles(config) = &mut node.kind {
                config.count = count;
            }
        }
        self
    }
}

/// An instantiated node: the animation plus its own pointer cell
pub struct SceneNode {
    animation: Box<dyn Animation>,
    listener: Option<PointerListener>,
}

impl SceneNode {
    pub fn animation(&self) -> &dyn Animation {
        self.animation.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }
}

/// A running scene: mounted nodes, lights, fog and post-processing
pub struct Scene {
    name: String,
    background: Rgb,
    lighting: Lighting,
    fog: Option<Fog>,
    effects: Vec<Effect>,
    nodes: Vec<SceneNode>,
}

impl Scene {
    /// Creates and mounts every node, subscribing one listener per pointer-reactive node
    pub fn instantiate(descriptor: &SceneDescriptor, hub: &PointerHub) -> Scene {
        let nodes: Vec<SceneNode> = descriptor
            .nodes
            .iter()
            .map(|node| {
                let mut animation = node.instantiate();
                animation.mount();
                let listener = animation.reacts_to_pointer().then(|| hub.subscribe());
                SceneNode { animation, listener }
            })
            .collect();
        debug!(
            "Scene '{}' assembled: {} nodes, {} pointer listeners",
            descriptor.name,
            nodes.len(),
            nodes.iter().filter(|node| node.is_listening()).count()
        );
        Scene {
            name: descriptor.name.clone(),
            background: descriptor.background,
            lighting: descriptor.lighting.clone(),
            fog: descriptor.fog,
            effects: descriptor.effects.clone(),
            nodes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// First node with the given name
    pub fn node(&self, name: &str) -> Option<&dyn Animation> {
        self.nodes
            .iter()
            .map(SceneNode::animation)
            .find(|animation| animation.name() == name)
    }

    /// Runs every node's updater once with its own pointer reading
    pub fn update(&mut self, elapsed: f32, delta: f32) {
        for node in &mut self.nodes {
            let frame = match node.listener.as_ref().and_then(PointerListener::get) {
                Some(pointer) => FrameInput::new(elapsed, delta, pointer),
                None => FrameInput::untracked(elapsed, delta),
            };
            node.animation.update(&frame);
        }
    }

    /// Clears the canvas, draws every node and runs the post-processing passes
    pub fn render(&self, canvas: &mut Canvas, camera: &Camera) {
        canvas.clear(self.background);
        let mut lighting = self.lighting.clone();
        lighting
            .lights
            .extend(self.nodes.iter().flat_map(|node| node.animation.lights()));
        {
            let mut painter = Painter::new(canvas, camera, &lighting, self.fog);
            for node in &self.nodes {
                node.animation.draw(&mut painter);
            }
        }
        for effect in &self.effects {
            effect.apply(canvas);
        }
    }

    /// Releases every node's buffers and pointer listener
    pub fn unmount(&mut self) {
        for node in &mut self.nodes {
            node.listener = None;
            node.animation.unmount();
        }
        debug!("Scene '{}' unmounted", self.name);
    }
}
