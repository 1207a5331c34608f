//! # Scene Management Module
//!
//! Scene graph, render layers, meshes and vertex data.
//!
//! ## Key Components
//!
//! - [`Scene`] - Top-level container: camera, node tree and materials
//! - [`SceneNode`] - A group, mesh or line-set node owning its children
//! - [`Layers`] - Render layer membership bitmask
//! - [`Mesh`] - Vertex data plus lazily created GPU buffers
//! - [`Vertex3D`] - GPU vertex with position and normal
//!
//! ## Usage
//!
//! ```no_run
//! use geometry_wars::config::CameraConfig;
//! use geometry_wars::gfx::camera::FixedCamera;
//! use geometry_wars::gfx::geometry::cuboid;
//! use geometry_wars::gfx::scene::{Mesh, Scene, SceneNode};
//!
//! let mut scene = Scene::new(FixedCamera::new(&CameraConfig::default(), 16.0 / 9.0));
//! let mut container = SceneNode::group("box");
//! container.add_child(SceneNode::with_mesh("body", Mesh::from_geometry(&cuboid(1.0, 1.0, 1.0))));
//! scene.add(container);
//! ```

pub mod layers;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use layers::{Layers, RenderLayer};
pub use mesh::{DrawMesh, Mesh, Topology};
pub use node::{NodeId, NodeKind, SceneNode, Transform, TransformProperty};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
