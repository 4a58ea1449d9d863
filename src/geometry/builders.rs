//! Concrete data-source builder functions (§3.3): mesh, basis curves,
//! instancer, xform and material-binding locators.

use glam::{Mat4, Vec2, Vec3};

use crate::ids::{Path, Token};
use crate::scene_index::SceneDataSource;

use super::data_source::Container;

pub const TOPOLOGY: Token = "topology";
pub const POINTS: Token = "points";
pub const FACE_VERTEX_COUNTS: Token = "faceVertexCounts";
pub const FACE_VERTEX_INDICES: Token = "faceVertexIndices";
pub const NORMALS: Token = "normals";
pub const UVS: Token = "uvs";
pub const CURVE_VERTEX_COUNTS: Token = "curveVertexCounts";
pub const WIDTHS: Token = "widths";
pub const INSTANCE_TRANSFORMS: Token = "instanceTransforms";
pub const PROTOTYPES: Token = "prototypes";
pub const MATRIX: Token = "matrix";
pub const MATERIAL_BINDING: Token = "materialBinding";
pub const PROTOTYPE_PATH: Token = "prototypePath";

#[must_use]
pub fn build_mesh_data_source(
    points: &[Vec3],
    face_vertex_counts: &[i32],
    face_vertex_indices: &[i32],
    normals: Option<&[Vec3]>,
    uvs: Option<&[Vec2]>,
) -> SceneDataSource {
    let topology = Container::new()
        .with(FACE_VERTEX_COUNTS, SceneDataSource::Ints(face_vertex_counts.to_vec()))
        .with(FACE_VERTEX_INDICES, SceneDataSource::Ints(face_vertex_indices.to_vec()));

    let mut root = Container::new()
        .with(POINTS, SceneDataSource::Vec3s(points.to_vec()))
        .with(TOPOLOGY, topology.into_data_source());

    if let Some(n) = normals {
        root = root.with(NORMALS, SceneDataSource::Vec3s(n.to_vec()));
    }
    if let Some(uv) = uvs {
        root = root.with(UVS, SceneDataSource::Vec2s(uv.to_vec()));
    }

    root.into_data_source()
}

#[must_use]
pub fn build_basis_curves_data_source(
    points: &[Vec3],
    curve_vertex_counts: &[i32],
    widths: Option<&[f32]>,
) -> SceneDataSource {
    let mut root = Container::new()
        .with(POINTS, SceneDataSource::Vec3s(points.to_vec()))
        .with(CURVE_VERTEX_COUNTS, SceneDataSource::Ints(curve_vertex_counts.to_vec()));
    if let Some(w) = widths {
        root = root.with(WIDTHS, SceneDataSource::Floats(w.to_vec()));
    }
    root.into_data_source()
}

#[must_use]
pub fn build_instancer_data_source(prototypes: &[Path], instance_transforms: &[Mat4]) -> SceneDataSource {
    Container::new()
        .with(PROTOTYPES, SceneDataSource::Container(prototypes.iter().map(|p| (PROTOTYPE_PATH, SceneDataSource::Path(p.clone()))).collect()))
        .with(
            INSTANCE_TRANSFORMS,
            SceneDataSource::Container(
                instance_transforms.iter().map(|m| (MATRIX, SceneDataSource::Matrix4(*m))).collect(),
            ),
        )
        .into_data_source()
}

#[must_use]
pub fn build_xform_data_source(matrix: Mat4) -> SceneDataSource {
    Container::new().with(MATRIX, SceneDataSource::Matrix4(matrix)).into_data_source()
}

#[must_use]
pub fn build_material_binding_data_source(material_path: Path) -> SceneDataSource {
    Container::new().with(MATERIAL_BINDING, SceneDataSource::Path(material_path)).into_data_source()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_source_carries_points_and_topology() {
        let ds = build_mesh_data_source(
            &[Vec3::ZERO, Vec3::X, Vec3::Y],
            &[3],
            &[0, 1, 2],
            None,
            None,
        );
        match ds {
            SceneDataSource::Container(children) => {
                assert!(children.iter().any(|(n, _)| *n == POINTS));
                assert!(children.iter().any(|(n, _)| *n == TOPOLOGY));
            }
            _ => panic!("expected container"),
        }
    }

    #[test]
    fn xform_data_source_round_trips_matrix() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let ds = build_xform_data_source(m);
        match ds {
            SceneDataSource::Container(children) => {
                let (_, value) = children.into_iter().find(|(n, _)| *n == MATRIX).unwrap();
                match value {
                    SceneDataSource::Matrix4(got) => assert_eq!(got, m),
                    _ => panic!("expected matrix"),
                }
            }
            _ => panic!("expected container"),
        }
    }
}
