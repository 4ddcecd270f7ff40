//! Scene description for the Bohr model view.
//!
//! Drawing happens in the browser. This side decides what goes in the scene,
//! where it sits, and how it moves; [`SceneGraph`] records that and is
//! serialized into the detail page, where the three.js host replays it.
//!
//! The browser host owns the frame loop and resizing. Per frame it advances
//! each [`Orbit`] by `speed`, wraps the angle at
//! [`SceneDescription::angle_wrap`], and turns each [`Spin`] by `rate`.

use crate::shells::ShellState;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, TAU};

pub type ObjectId = usize;

pub const NUCLEUS_RADIUS: f32 = 0.5;
pub const ELECTRON_RADIUS: f32 = 0.1;
pub const RING_SEGMENTS: u32 = 50;
pub const MODEL_SCALE: f32 = 2.0;
/// Model rotation about Y, radians per frame.
pub const MODEL_SPIN: f32 = 0.005;
pub const VIEWPORT_HEIGHT: u32 = 400;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneObject {
    Sphere {
        radius: f32,
        color: u32,
        emissive: u32,
    },
    /// A circle of `radius` drawn as a closed line.
    Ring {
        radius: f32,
        segments: u32,
        color: u32,
    },
    Model {
        url: String,
        scale: f32,
    },
    AmbientLight {
        color: u32,
        intensity: f32,
    },
    DirectionalLight {
        color: u32,
        intensity: f32,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: ObjectId,
    pub parent: Option<ObjectId>,
    pub object: SceneObject,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Camera {
    pub fn orbit_view() -> Self {
        Camera {
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 10.0],
            min_distance: 5.0,
            max_distance: 20.0,
        }
    }

    pub fn model_view() -> Self {
        Camera {
            fov: 60.0,
            near: 0.1,
            far: 5000.0,
            position: [0.0, 0.0, 5.0],
            min_distance: 2.0,
            max_distance: 20.0,
        }
    }
}

/// What the core needs from a renderer to build a scene. Frame scheduling
/// and resize handling stay with the host.
pub trait SceneHost {
    fn create_scene(&mut self);
    fn add_object(
        &mut self,
        object: SceneObject,
        parent: Option<ObjectId>,
        position: [f32; 3],
        rotation: [f32; 3],
    ) -> ObjectId;
}

/// A [`SceneHost`] that only records. Serializes to the form the browser
/// host reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneGraph {
    pub nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn node(&self, id: ObjectId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn count(&self, pred: impl Fn(&SceneObject) -> bool) -> usize {
        self.nodes.iter().filter(|n| pred(&n.object)).count()
    }
}

impl SceneHost for SceneGraph {
    fn create_scene(&mut self) {
        self.nodes.clear();
    }

    fn add_object(
        &mut self,
        object: SceneObject,
        parent: Option<ObjectId>,
        position: [f32; 3],
        rotation: [f32; 3],
    ) -> ObjectId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            parent,
            object,
            position,
            rotation,
        });
        id
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Orbit {
    pub node: ObjectId,
    pub radius: f32,
    pub angle: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Spin {
    pub node: ObjectId,
    pub rate: f32,
}

/// The moving parts of a mounted scene: electrons on their shells and any
/// spinning model.
#[derive(Debug, Clone)]
pub struct OrbitAnimation {
    state: ShellState,
    electrons: Vec<ObjectId>,
    spins: Vec<Spin>,
    camera: Camera,
}

fn add_lights<H: SceneHost>(host: &mut H, ambient: f32, directional: Option<f32>) {
    host.add_object(
        SceneObject::AmbientLight {
            color: 0xffffff,
            intensity: ambient,
        },
        None,
        [0.0; 3],
        [0.0; 3],
    );
    if let Some(intensity) = directional {
        host.add_object(
            SceneObject::DirectionalLight {
                color: 0xffffff,
                intensity,
            },
            None,
            [5.0, 5.0, 5.0],
            [0.0; 3],
        );
    }
}

impl OrbitAnimation {
    /// Nucleus, one ring per shell and one sphere per electron, all parented
    /// to the nucleus.
    pub fn mount_bohr<H: SceneHost>(host: &mut H, state: ShellState) -> Self {
        host.create_scene();
        add_lights(host, 0.6, Some(0.8));
        let nucleus = host.add_object(
            SceneObject::Sphere {
                radius: NUCLEUS_RADIUS,
                color: 0xffd700,
                emissive: 0x555500,
            },
            None,
            [0.0; 3],
            [0.0; 3],
        );

        let mut electrons = Vec::with_capacity(state.electron_count());
        for shell in &state.shells {
            host.add_object(
                SceneObject::Ring {
                    radius: shell.radius,
                    segments: RING_SEGMENTS,
                    color: 0x666666,
                },
                Some(nucleus),
                [0.0; 3],
                [FRAC_PI_2, 0.0, 0.0],
            );
            for electron in &shell.electrons {
                let id = host.add_object(
                    SceneObject::Sphere {
                        radius: ELECTRON_RADIUS,
                        color: 0x00aaff,
                        emissive: 0x005577,
                    },
                    Some(nucleus),
                    shell.position(electron),
                    [0.0; 3],
                );
                electrons.push(id);
            }
        }

        OrbitAnimation {
            state,
            electrons,
            spins: Vec::new(),
            camera: Camera::orbit_view(),
        }
    }

    /// A loaded model that spins slowly about Y.
    pub fn mount_model<H: SceneHost>(host: &mut H, url: &str) -> Self {
        host.create_scene();
        add_lights(host, 1.0, None);
        let model = host.add_object(
            SceneObject::Model {
                url: url.to_string(),
                scale: MODEL_SCALE,
            },
            None,
            [0.0; 3],
            [0.0; 3],
        );
        OrbitAnimation {
            state: ShellState { shells: Vec::new() },
            electrons: Vec::new(),
            spins: vec![Spin {
                node: model,
                rate: MODEL_SPIN,
            }],
            camera: Camera::model_view(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn shells(&self) -> &ShellState {
        &self.state
    }

    pub fn orbits(&self) -> Vec<Orbit> {
        let mut ids = self.electrons.iter();
        let mut orbits = Vec::with_capacity(self.electrons.len());
        for shell in &self.state.shells {
            for electron in &shell.electrons {
                if let Some(&node) = ids.next() {
                    orbits.push(Orbit {
                        node,
                        radius: shell.radius,
                        angle: electron.angle,
                        speed: electron.speed,
                    });
                }
            }
        }
        orbits
    }

    /// The serializable bundle the browser host consumes.
    pub fn describe(&self, graph: &SceneGraph) -> SceneDescription {
        SceneDescription {
            nodes: graph.nodes.clone(),
            camera: self.camera,
            orbits: self.orbits(),
            spins: self.spins.clone(),
            angle_wrap: TAU,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneDescription {
    pub nodes: Vec<Node>,
    pub camera: Camera,
    pub orbits: Vec<Orbit>,
    pub spins: Vec<Spin>,
    /// Orbit angles stay in `[0, angle_wrap)`.
    pub angle_wrap: f32,
    pub viewport_height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mounted(n: u32) -> (SceneGraph, OrbitAnimation) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut graph = SceneGraph::default();
        let animation = OrbitAnimation::mount_bohr(&mut graph, ShellState::new(n, &mut rng));
        (graph, animation)
    }

    #[test]
    fn bohr_scene_has_one_object_per_shell_and_electron() {
        let (graph, animation) = mounted(10);
        assert_eq!(graph.count(|o| matches!(o, SceneObject::Ring { .. })), 2);
        assert_eq!(
            graph.count(|o| matches!(o, SceneObject::Sphere { radius, .. } if *radius == ELECTRON_RADIUS)),
            10
        );
        assert_eq!(animation.orbits().len(), 10);
        let nucleus = graph
            .nodes
            .iter()
            .find(|n| matches!(n.object, SceneObject::Sphere { radius, .. } if radius == NUCLEUS_RADIUS))
            .map(|n| n.id);
        for orbit in animation.orbits() {
            assert_eq!(graph.node(orbit.node).and_then(|n| n.parent), nucleus);
        }
    }

    #[test]
    fn orbits_start_where_the_electrons_were_placed() {
        let (graph, animation) = mounted(10);
        for orbit in animation.orbits() {
            let position = graph.node(orbit.node).map(|n| n.position).unwrap();
            assert!((position[0] - orbit.radius * orbit.angle.cos()).abs() < 1e-5);
            assert!((position[2] - orbit.radius * orbit.angle.sin()).abs() < 1e-5);
            assert_eq!(position[1], 0.0);
        }
    }

    #[test]
    fn model_scene_spins_the_asset() {
        let mut graph = SceneGraph::default();
        let animation = OrbitAnimation::mount_model(&mut graph, "https://example.org/h.glb");
        let description = animation.describe(&graph);
        assert!(description.orbits.is_empty());
        assert_eq!(description.spins.len(), 1);
        assert_eq!(description.spins[0].rate, MODEL_SPIN);
        assert!(matches!(
            graph.node(description.spins[0].node).map(|n| &n.object),
            Some(SceneObject::Model { .. })
        ));
        assert_eq!(description.camera, Camera::model_view());
    }

    #[test]
    fn remount_clears_previous_scene() {
        let (mut graph, _) = mounted(10);
        let mut rng = StdRng::seed_from_u64(1);
        OrbitAnimation::mount_bohr(&mut graph, ShellState::new(1, &mut rng));
        assert_eq!(graph.count(|o| matches!(o, SceneObject::Ring { .. })), 1);
    }

    #[test]
    fn description_serializes_with_object_kinds() {
        let (graph, animation) = mounted(1);
        let json = serde_json::to_value(animation.describe(&graph)).unwrap();
        assert_eq!(json["nodes"][0]["object"]["kind"], "ambient_light");
        assert_eq!(json["orbits"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["viewport_height"], 400);
        assert!((json["angle_wrap"].as_f64().unwrap() - std::f64::consts::TAU).abs() < 1e-5);
        assert!(json["spins"].as_array().unwrap().is_empty());
    }
}
