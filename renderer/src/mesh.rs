//! Mesh model and decoders
//!
//! A [`Model`] is decoded once from a completed resource's bytes and is
//! read-only afterwards.

use alloc::vec::Vec;
use core::fmt;
use glam::Vec3;

/// A triangle mesh: vertex positions plus index triples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Model {
    /// Empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles
    #[inline]
    pub fn nfaces(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices
    #[inline]
    pub fn nverts(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex indices of a face
    #[inline]
    pub fn face(&self, index: usize) -> Option<[usize; 3]> {
        self.faces
            .get(index)
            .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
    }

    /// Position of a vertex
    #[inline]
    pub fn vert(&self, index: usize) -> Option<Vec3> {
        self.vertices.get(index).copied()
    }

    /// Positions of the three corners of a face
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = self.face(index)?;
        Some([self.vert(a)?, self.vert(b)?, self.vert(c)?])
    }
}

/// Decoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not UTF-8 text
    InvalidUtf8,
    /// A `v` record without three numeric coordinates
    MalformedVertex { line: usize },
    /// An `f` record with fewer than three corners or a non-numeric index
    MalformedFace { line: usize },
    /// A face corner referencing a vertex that does not exist
    IndexOutOfRange { line: usize, index: i64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUtf8 => write!(f, "mesh payload is not valid UTF-8"),
            Self::MalformedVertex { line } => write!(f, "malformed vertex on line {line}"),
            Self::MalformedFace { line } => write!(f, "malformed face on line {line}"),
            Self::IndexOutOfRange { line, index } => {
                write!(f, "vertex index {index} out of range on line {line}")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

/// Turns a resource payload into a [`Model`]
pub trait MeshDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Model, DecodeError>;
}

/// Wavefront OBJ subset: `v` positions and `f` faces.
///
/// Face corners may use the `v/vt/vn` forms; only the position index is
/// kept. Polygons are fan-triangulated. Every other record is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjDecoder;

impl MeshDecoder for ObjDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Model, DecodeError> {
        let text = core::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
        let mut model = Model::new();
        let mut corners: Vec<u32> = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let mut parts = raw.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let mut xyz = [0.0f32; 3];
                    for slot in &mut xyz {
                        *slot = parts
                            .next()
                            .and_then(|s| s.parse().ok())
                            .ok_or(DecodeError::MalformedVertex { line })?;
                    }
                    model.vertices.push(Vec3::from_array(xyz));
                }
                Some("f") => {
                    corners.clear();
                    for token in parts {
                        let index: i64 = token
                            .split('/')
                            .next()
                            .and_then(|s| s.parse().ok())
                            .ok_or(DecodeError::MalformedFace { line })?;
                        if index < 1 || index as usize > model.vertices.len() {
                            return Err(DecodeError::IndexOutOfRange { line, index });
                        }
                        corners.push((index - 1) as u32);
                    }
                    if corners.len() < 3 {
                        return Err(DecodeError::MalformedFace { line });
                    }
                    for k in 1..corners.len() - 1 {
                        model.faces.push([corners[0], corners[k], corners[k + 1]]);
                    }
                }
                _ => {}
            }
        }

        Ok(model)
    }
}
