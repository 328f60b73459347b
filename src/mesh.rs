//! Model-space triangle meshes.
//!
//! A [`Mesh`] is a list of named objects, each with its own vertex pools and
//! faces. Faces index into those pools 0-based; absent normals or UVs are
//! `None`. Raw OBJ indices are 1-based and go through
//! [`Face::from_one_based`].

use std::path::Path;

use crate::error::EngineError;
use crate::math::{Vec2, Vec3};
use crate::triangle::{Triangle, Vertex};

pub const N_CUBE_VERTICES: usize = 8;
pub const N_CUBE_FACES: usize = 12;

// Unit cube, corners at +/-1. Scaled to the requested size in `Mesh::cube`.
const CUBE_VERTICES: [Vec3; N_CUBE_VERTICES] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

// 1-based, as an OBJ file would list them. Each face's cross product
// (b - a) x (c - a) points out of the cube.
const CUBE_FACES: [[u32; 3]; N_CUBE_FACES] = [
    // Front (-z)
    [1, 2, 3],
    [1, 3, 4],
    // Right (+x)
    [4, 3, 5],
    [4, 5, 6],
    // Back (+z)
    [6, 5, 7],
    [6, 7, 8],
    // Left (-x)
    [8, 7, 2],
    [8, 2, 1],
    // Top (+y)
    [2, 7, 5],
    [2, 5, 3],
    // Bottom (-y)
    [6, 8, 1],
    [6, 1, 4],
];

/// Converts a raw 1-based OBJ index. `0` means "not given".
#[inline]
pub fn one_based(index: u32) -> Option<usize> {
    index.checked_sub(1).map(|i| i as usize)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub positions: [usize; 3],
    pub uvs: [Option<usize>; 3],
    pub normals: [Option<usize>; 3],
}

impl Face {
    pub fn new(positions: [usize; 3]) -> Self {
        Self {
            positions,
            uvs: [None; 3],
            normals: [None; 3],
        }
    }

    /// Builds a face from raw 1-based indices. Position indices are required;
    /// a zero UV or normal index marks that attribute as absent.
    pub fn from_one_based(
        positions: [u32; 3],
        uvs: [u32; 3],
        normals: [u32; 3],
    ) -> Result<Self, EngineError> {
        let mut resolved = [0; 3];
        for (slot, &raw) in resolved.iter_mut().zip(&positions) {
            *slot = one_based(raw).ok_or_else(|| {
                EngineError::FailedToLoadModel(format!("face {:?} has a zero position index", positions))
            })?;
        }
        Ok(Self {
            positions: resolved,
            uvs: uvs.map(one_based),
            normals: normals.map(one_based),
        })
    }
}

/// One named group of faces with its own vertex pools.
#[derive(Clone, Debug, Default)]
pub struct MeshObject {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    faces: Vec<Face>,
}

impl MeshObject {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            normals,
            uvs,
            faces,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Model-space triangle for one face, or `None` when a position index is
    /// out of range. Out-of-range normal/UV indices are treated as absent.
    pub fn triangle(&self, face: &Face) -> Option<Triangle> {
        let mut vertices = [Vertex::default(); 3];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let position = *self.positions.get(face.positions[i])?;
            let normal = face.normals[i].and_then(|n| self.normals.get(n).copied());
            let uv = face.uvs[i].and_then(|t| self.uvs.get(t).copied());
            *vertex = Vertex::with_attributes(position, normal, uv);
        }
        Some(Triangle::new(vertices))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().filter_map(move |face| {
            let triangle = self.triangle(face);
            if triangle.is_none() {
                log::warn!("{}: face {:?} indexes past the vertex pool", self.name, face);
            }
            triangle
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    objects: Vec<MeshObject>,
}

impl Mesh {
    pub fn new(objects: Vec<MeshObject>) -> Self {
        Self { objects }
    }

    /// Axis-aligned cube centered on the origin with edge length `size`.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let positions = CUBE_VERTICES.iter().map(|&v| v * half).collect();
        let faces = CUBE_FACES
            .iter()
            .filter_map(|&raw| Face::from_one_based(raw, [0; 3], [0; 3]).ok())
            .collect();
        Self::new(vec![MeshObject::new("cube", positions, Vec::new(), Vec::new(), faces)])
    }

    /// Loads every object of an OBJ file. Polygons are triangulated.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)
            .map_err(|e| EngineError::FailedToLoadModel(format!("{}: {}", path.display(), e)))?;

        let objects: Vec<MeshObject> = models.into_iter().map(Self::object_from_tobj).collect();
        log::debug!(
            "loaded {} object(s), {} face(s) from {}",
            objects.len(),
            objects.iter().map(|o| o.faces.len()).sum::<usize>(),
            path.display()
        );
        Ok(Self::new(objects))
    }

    // tobj hands out 0-based index buffers, one entry per face corner.
    fn object_from_tobj(model: tobj::Model) -> MeshObject {
        let mesh = model.mesh;
        let positions = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2])))
            .collect();
        let normals = mesh
            .normals
            .chunks_exact(3)
            .map(|n| Vec3::new(f64::from(n[0]), f64::from(n[1]), f64::from(n[2])))
            .collect();
        let uvs = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(f64::from(t[0]), f64::from(t[1])))
            .collect();

        let corner = |indices: &[u32], face: usize| -> [Option<usize>; 3] {
            [0, 1, 2].map(|k| indices.get(face * 3 + k).map(|&i| i as usize))
        };
        let faces = mesh
            .indices
            .chunks_exact(3)
            .enumerate()
            .map(|(f, idx)| Face {
                positions: [idx[0] as usize, idx[1] as usize, idx[2] as usize],
                uvs: corner(&mesh.texcoord_indices, f),
                normals: corner(&mesh.normal_indices, f),
            })
            .collect();

        MeshObject::new(model.name, positions, normals, uvs, faces)
    }

    pub fn objects(&self) -> &[MeshObject] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&MeshObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }

    /// Every model-space triangle, object by object.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.objects.iter().flat_map(MeshObject::triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn one_based_indices_convert() {
        assert_eq!(one_based(1), Some(0));
        assert_eq!(one_based(0), None);

        let face = Face::from_one_based([1, 2, 3], [0, 4, 0], [2, 2, 2]).unwrap();
        assert_eq!(face.positions, [0, 1, 2]);
        assert_eq!(face.uvs, [None, Some(3), None]);
        assert_eq!(face.normals, [Some(1); 3]);

        let err = Face::from_one_based([0, 1, 2], [0; 3], [0; 3]).unwrap_err();
        assert_eq!(err.code(), "FAILED_TO_LOAD_MODEL");
    }

    #[test]
    fn cube_faces_point_outwards() {
        let cube = Mesh::cube(1.0);
        assert_eq!(cube.face_count(), N_CUBE_FACES);
        let triangles: Vec<_> = cube.triangles().collect();
        assert_eq!(triangles.len(), N_CUBE_FACES);
        for t in &triangles {
            let [a, b, c] = t.positions();
            let centroid = (a + b + c) / 3.0;
            assert!(t.face_normal().dot(centroid) > 0.0, "{:?}", t);
            assert!(t.positions().iter().all(|p| p.x.abs() == 0.5));
        }
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let object = MeshObject::new(
            "broken",
            vec![Vec3::ZERO, Vec3::ONE, Vec3::UP],
            Vec::new(),
            Vec::new(),
            vec![Face::new([0, 1, 2]), Face::new([0, 1, 7])],
        );
        assert_eq!(object.triangles().count(), 1);
    }

    #[test]
    fn loads_obj_objects() {
        let path = std::env::temp_dir().join(format!("rastline-quad-{}.obj", std::process::id()));
        fs::write(
            &path,
            "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1 4//1\n",
        )
        .unwrap();

        let mesh = Mesh::from_obj(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let quad = mesh.object("quad").unwrap();
        assert_eq!(quad.faces().len(), 2);
        assert_eq!(quad.faces()[0].uvs, [None; 3]);
        let t = quad.triangle(&quad.faces()[0]).unwrap();
        assert_eq!(t.vertices[0].normal, Vec3::OUT);
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn missing_obj_is_a_load_error() {
        let err = Mesh::from_obj("/nonexistent/rastline.obj").unwrap_err();
        assert!(matches!(err, EngineError::FailedToLoadModel(_)));
    }
}
