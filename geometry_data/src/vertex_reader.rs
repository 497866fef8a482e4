//! Readers for the vertex records in a vertex buffer.
//! [VertexReader::read_raw_vertex] supports every format with a known size.
//! Only the [World](VertexBufferFormat::World), [Rigid](VertexBufferFormat::Rigid),
//! and [Skinned](VertexBufferFormat::Skinned) layouts can be decoded into attributes.
use binrw::io::{Read, Seek};
use binrw::{BinRead, BinReaderExt};
use geometry_lib::formats::render_geometry::VertexBufferFormat;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Vertex counts come from the definition, so don't trust them for allocations.
const MAX_INITIAL_VERTEX_CAPACITY: usize = 1024;

/// Errors while reading vertex records.
#[derive(Debug, Error)]
pub enum VertexReadError {
    /// The format has no known record size.
    #[error("Reading vertices for format {0:?} is not supported.")]
    UnsupportedFormat(VertexBufferFormat),

    /// The requested vertex layout does not match the buffer's format.
    #[error("Expected a vertex buffer of format {expected:?} but found {actual:?}.")]
    FormatMismatch {
        expected: VertexBufferFormat,
        actual: VertexBufferFormat,
    },

    /// An error occurred while reading the data from the buffer.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error occurred while reading the data from the buffer.
    #[error(transparent)]
    BinRead(#[from] binrw::error::Error),
}

/// The vertex layout for [VertexBufferFormat::Rigid].
/// [VertexBufferFormat::World] uses the same layout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
pub struct RigidVertex {
    pub position: [f32; 3],
    pub texture_coordinate: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub binormal: [f32; 3],
}

pub type WorldVertex = RigidVertex;

/// The vertex layout for [VertexBufferFormat::Skinned].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub texture_coordinate: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub binormal: [f32; 3],
    pub blend_indices: [u8; 4],
    /// Unsigned normalized weights for each of the [blend_indices](#structfield.blend_indices).
    pub blend_weights: [u8; 4],
}

impl SkinnedVertex {
    /// The [blend_weights](#structfield.blend_weights) converted to the range 0.0 to 1.0.
    pub fn blend_weights_f32(&self) -> [f32; 4] {
        self.blend_weights.map(|w| w as f32 / 255.0f32)
    }
}

/// Reads vertex records starting from the current position of a borrowed reader.
/// The vertex data is read directly from the reader and never buffered as a whole.
#[derive(Debug)]
pub struct VertexReader<'a, R> {
    reader: &'a mut R,
    format: VertexBufferFormat,
    count: usize,
}

impl<'a, R: Read + Seek> VertexReader<'a, R> {
    /// Creates a reader for `count` vertices of the given `format`.
    pub fn new(reader: &'a mut R, format: VertexBufferFormat, count: usize) -> Self {
        Self {
            reader,
            format,
            count,
        }
    }

    pub fn format(&self) -> VertexBufferFormat {
        self.format
    }

    /// The number of vertices in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The size in bytes of each vertex record or `None` if the format has no known size.
    pub fn vertex_size(&self) -> Option<usize> {
        self.format.size_in_bytes().map(|s| s as usize)
    }

    /// Reads the bytes for the next vertex.
    pub fn read_raw_vertex(&mut self) -> Result<Vec<u8>, VertexReadError> {
        let size = self
            .vertex_size()
            .ok_or(VertexReadError::UnsupportedFormat(self.format))?;

        let mut bytes = vec![0u8; size];
        self.reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads the bytes for all [count](#method.count) vertices.
    pub fn read_raw_vertices(&mut self) -> Result<Vec<Vec<u8>>, VertexReadError> {
        let mut vertices = Vec::with_capacity(std::cmp::min(
            self.count,
            MAX_INITIAL_VERTEX_CAPACITY,
        ));
        for _ in 0..self.count {
            vertices.push(self.read_raw_vertex()?);
        }
        Ok(vertices)
    }

    pub fn read_world_vertex(&mut self) -> Result<WorldVertex, VertexReadError> {
        self.read_vertex(VertexBufferFormat::World)
    }

    pub fn read_rigid_vertex(&mut self) -> Result<RigidVertex, VertexReadError> {
        self.read_vertex(VertexBufferFormat::Rigid)
    }

    pub fn read_skinned_vertex(&mut self) -> Result<SkinnedVertex, VertexReadError> {
        self.read_vertex(VertexBufferFormat::Skinned)
    }

    fn read_vertex<T: BinRead<Args = ()>>(
        &mut self,
        expected: VertexBufferFormat,
    ) -> Result<T, VertexReadError> {
        if self.format != expected {
            return Err(VertexReadError::FormatMismatch {
                expected,
                actual: self.format,
            });
        }

        let vertex = self.reader.read_le::<T>()?;
        Ok(vertex)
    }
}
