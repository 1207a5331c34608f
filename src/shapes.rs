//! The five playable polyhedra and the factory that turns them into scene nodes

use cgmath::Deg;
use log::debug;
use rand::Rng;
use uuid::Uuid;

use crate::gfx::{
    geometry::{self, edges, GeometryData},
    resources::{Material, MaterialManager},
    scene::{Layers, Mesh, RenderLayer, SceneNode},
};

/// Scale every shape container starts at before it grows in
pub const INITIAL_SCALE: f32 = 0.01;

/// Dihedral angle above which a mesh edge gets an outline
pub const OUTLINE_THRESHOLD: Deg<f32> = Deg(1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl ShapeKind {
    /// In spawn order, left to right
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Tetrahedron,
        ShapeKind::Cube,
        ShapeKind::Octahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Tetrahedron => "Tetrahedron",
            ShapeKind::Cube => "Cube",
            ShapeKind::Octahedron => "Octahedron",
            ShapeKind::Dodecahedron => "Dodecahedron",
            ShapeKind::Icosahedron => "Icosahedron",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShapeKind::Tetrahedron => {
                "Also known as a triangular pyramid, this geometry consists of four congruent equilateral triangles."
            }
            ShapeKind::Cube => "A geometry bounded by six equal square faces.",
            ShapeKind::Octahedron => "A geometry bounded by eight equilateral triangles.",
            ShapeKind::Dodecahedron => "A geometry bounded by twelve equal faces.",
            ShapeKind::Icosahedron => "A geometry bounded by twenty equal faces.",
        }
    }

    /// Unit-radius solid; the cube is 1×1×1
    pub fn geometry(self) -> GeometryData {
        match self {
            ShapeKind::Tetrahedron => geometry::tetrahedron(1.0),
            ShapeKind::Cube => geometry::cuboid(1.0, 1.0, 1.0),
            ShapeKind::Octahedron => geometry::octahedron(1.0),
            ShapeKind::Dodecahedron => geometry::dodecahedron(1.0),
            ShapeKind::Icosahedron => geometry::icosahedron(1.0),
        }
    }
}

/// Shape colors as (material name, sRGB hex)
pub const PALETTE: [(&str, u32); 13] = [
    ("red", 0xff0000),
    ("deeppink", 0xff1493),
    ("orange", 0xffa500),
    ("yellow", 0xffff00),
    ("khaki", 0xf0e68c),
    ("indigo", 0x4b0082),
    ("fuchsia", 0xff00ff),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("aqua", 0x00ffff),
    ("blue", 0x0000ff),
    ("cornsilk", 0xfff8dc),
    ("goldenrod", 0xdaa520),
];

/// Adds one lit material per palette color
pub fn register_palette(materials: &mut MaterialManager) {
    for (name, hex) in PALETTE {
        materials.add_material(Material::from_hex(name, hex));
    }
}

pub struct ShapeFactory;

impl ShapeFactory {
    /// Builds a shape container: a glowing mesh on the bloom layer plus its
    /// black outline, scaled down to [`INITIAL_SCALE`] and tagged with a
    /// fresh character id.
    ///
    /// The palette materials must be registered in the scene for the color
    /// to show; see [`register_palette`].
    pub fn build<R: Rng + ?Sized>(kind: ShapeKind, rng: &mut R) -> SceneNode {
        let geometry = kind.geometry();
        let (color, _) = PALETTE[rng.random_range(0..PALETTE.len())];

        let mesh = SceneNode::with_mesh(&format!("{} Mesh", kind.name()), Mesh::from_geometry(&geometry))
            .with_material(color)
            .with_layers(Layers::default().with(RenderLayer::Bloom));
        let outline = SceneNode::with_mesh(
            &format!("{} Outline", kind.name()),
            Mesh::from_lines(&edges(&geometry, OUTLINE_THRESHOLD)),
        )
        .with_material(MaterialManager::OUTLINE);

        let mut container = SceneNode::group(kind.name()).with_uniform_scale(INITIAL_SCALE);
        container.add_child(mesh);
        container.add_child(outline);
        container.character_id = Some(Uuid::new_v4());

        debug!("Built {} ({})", kind.name(), color);
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{NodeKind, Topology};
    use cgmath::Vector3;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_containers_start_small_with_unique_ids() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ids = HashSet::new();
        for _ in 0..20 {
            for kind in ShapeKind::ALL {
                let shape = ShapeFactory::build(kind, &mut rng);
                assert_eq!(shape.kind(), NodeKind::Group);
                assert_eq!(shape.transform.scale, Vector3::new(0.01, 0.01, 0.01));
                let id = shape.character_id.expect("shapes carry a character id");
                assert!(ids.insert(id), "duplicate id {}", id);
            }
        }
    }

    #[test]
    fn test_mesh_glows_and_outline_does_not() {
        let mut rng = StdRng::seed_from_u64(3);
        let shape = ShapeFactory::build(ShapeKind::Cube, &mut rng);
        let [mesh, outline] = shape.children() else {
            panic!("expected mesh and outline children");
        };

        let bloom = RenderLayer::Bloom.layers();
        assert_eq!(mesh.mesh().unwrap().topology(), Topology::Triangles);
        assert!(mesh.layers.test(&bloom));
        assert!(mesh.layers.is_enabled(0));
        let color = mesh.material.as_deref().unwrap();
        assert!(PALETTE.iter().any(|(name, _)| *name == color));

        assert_eq!(outline.mesh().unwrap().topology(), Topology::Lines);
        assert!(!outline.layers.test(&bloom));
        assert_eq!(outline.material.as_deref(), Some(MaterialManager::OUTLINE));
        // A cube outline is its 12 edges, without the face diagonals.
        assert_eq!(outline.mesh().unwrap().primitive_count(), 12);
    }

    #[test]
    fn test_palette_registration() {
        let mut materials = MaterialManager::new();
        register_palette(&mut materials);
        for (name, _) in PALETTE {
            let material = materials.get_material(name).unwrap();
            assert!(!material.unlit);
        }
        assert_eq!(materials.get_material("red").unwrap().base_color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_names_and_descriptions() {
        let names: Vec<&str> = ShapeKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["Tetrahedron", "Cube", "Octahedron", "Dodecahedron", "Icosahedron"]);
        assert!(ShapeKind::Cube.description().contains("six equal square faces"));
    }
}
