//! STL format support

use crate::MeshReader;
use ssm_core::{Error, Point3f, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub struct StlReader;

impl MeshReader for StlReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Input(format!("cannot open {}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);

        let mesh = Self::read_from(&mut reader)
            .map_err(|e| Error::Input(format!("{}: {}", path.display(), e)))?;
        log::debug!(
            "Read {} with {} vertices and {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

impl StlReader {
    /// Read an ASCII or binary STL stream
    ///
    /// Fails with [`Error::Input`] when the data cannot be parsed or holds no
    /// triangles.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<TriangleMesh> {
        let indexed = stl_io::read_stl(reader)
            .map_err(|e| Error::Input(format!("cannot parse STL data: {}", e)))?;

        let vertices: Vec<Point3f> = indexed
            .vertices
            .iter()
            .map(|v| Point3f::new(v[0], v[1], v[2]))
            .collect();
        let faces: Vec<[usize; 3]> = indexed.faces.iter().map(|f| f.vertices).collect();

        let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if mesh.is_empty() {
            return Err(Error::Input("mesh contains no triangles".to_string()));
        }
        if !mesh.has_valid_faces() {
            return Err(Error::Input("mesh references missing vertices".to_string()));
        }
        if mesh.vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(Error::Input("mesh has non-finite coordinates".to_string()));
        }

        Ok(mesh)
    }
}
