//! The buffer definitions and meshes stored in a render geometry resource.
//! A [Mesh] references entries in the [vertex_buffers](struct.RenderGeometryResourceDefinition.html#structfield.vertex_buffers)
//! and [index_buffers](struct.RenderGeometryResourceDefinition.html#structfield.index_buffers) of a
//! [RenderGeometryResourceDefinition] by index.
//! The definitions only describe the data, which is stored separately in the resource blob.

use crate::ResourceDataReference;

use binrw::BinRead;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The format of a vertex buffer.
///
/// Most of these names are placeholders.
/// The format determines the size of each vertex record and which stream the buffer is assigned to
/// but not necessarily anything about the attributes the records contain.
/// Codes marked as unused or invalid have no known record size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumIter, strum::Display, strum::FromRepr)
)]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[br(repr(u16))]
#[repr(u16)]
pub enum VertexBufferFormat {
    Invalid = 0x00,
    World = 0x01,
    Rigid = 0x02,
    Skinned = 0x03,
    Unknown4 = 0x04,
    Unknown5 = 0x05,
    Unknown6 = 0x06,
    Unknown7 = 0x07,
    Unused8 = 0x08,
    AmbientPrt = 0x09,
    LinearPrt = 0x0A,
    QuadraticPrt = 0x0B,
    UnknownC = 0x0C,
    UnknownD = 0x0D,
    UnknownE = 0x0E,
    UnknownF = 0x0F,
    Unused10 = 0x10,
    Unused11 = 0x11,
    Unused12 = 0x12,
    Unused13 = 0x13,
    Unknown14 = 0x14,
    Unknown15 = 0x15,
    Unknown16 = 0x16,
    Unknown17 = 0x17,
    Unknown18 = 0x18,
    Unknown19 = 0x19,
    Unknown1A = 0x1A,
    Unknown1B = 0x1B,
    Unknown1C = 0x1C,
    Unused1D = 0x1D,
}

impl VertexBufferFormat {
    /// The size in bytes of a single vertex record or `None` for invalid and unused formats.
    /**
    ```rust
    use geometry_lib::formats::render_geometry::VertexBufferFormat;

    assert_eq!(Some(0x38), VertexBufferFormat::World.size_in_bytes());
    assert_eq!(None, VertexBufferFormat::Unused8.size_in_bytes());
    ```
     */
    pub fn size_in_bytes(&self) -> Option<u32> {
        match self {
            VertexBufferFormat::Invalid => None,
            VertexBufferFormat::World => Some(0x38),
            VertexBufferFormat::Rigid => Some(0x38),
            VertexBufferFormat::Skinned => Some(0x40),
            VertexBufferFormat::Unknown4 => Some(0x8),
            VertexBufferFormat::Unknown5 => Some(0x4),
            VertexBufferFormat::Unknown6 => Some(0x14),
            VertexBufferFormat::Unknown7 => Some(0x14),
            VertexBufferFormat::Unused8 => None,
            VertexBufferFormat::AmbientPrt => Some(0x4),
            VertexBufferFormat::LinearPrt => Some(0x4),
            VertexBufferFormat::QuadraticPrt => Some(0x24),
            VertexBufferFormat::UnknownC => Some(0x14),
            VertexBufferFormat::UnknownD => Some(0x10),
            VertexBufferFormat::UnknownE => Some(0xC),
            VertexBufferFormat::UnknownF => Some(0x18),
            VertexBufferFormat::Unused10 => None,
            VertexBufferFormat::Unused11 => None,
            VertexBufferFormat::Unused12 => None,
            VertexBufferFormat::Unused13 => None,
            VertexBufferFormat::Unknown14 => Some(0x8),
            VertexBufferFormat::Unknown15 => Some(0x4),
            VertexBufferFormat::Unknown16 => Some(0x4),
            VertexBufferFormat::Unknown17 => Some(0x4),
            VertexBufferFormat::Unknown18 => Some(0x20),
            VertexBufferFormat::Unknown19 => Some(0x20),
            VertexBufferFormat::Unknown1A => Some(0xC),
            VertexBufferFormat::Unknown1B => Some(0x24),
            VertexBufferFormat::Unknown1C => Some(0x80),
            VertexBufferFormat::Unused1D => None,
        }
    }
}

/// Describes the location and format of a vertex buffer's data.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferDefinition {
    /// The number of vertices in the buffer.
    pub count: u32,
    pub format: VertexBufferFormat,
    /// The stride in bytes stored with the definition.
    /// This usually matches [size_in_bytes](enum.VertexBufferFormat.html#method.size_in_bytes) for the format.
    pub vertex_size: u16,
    pub data: ResourceDataReference,
}

/// Describes the location of an index buffer's data.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferDefinition {
    pub unk1: u32, // primitive type?
    pub data: ResourceDataReference,
}

/// The shared pools of buffer definitions for all the meshes in a resource.
/// Elements are referenced by their position, so the order of each collection matters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderGeometryResourceDefinition {
    pub vertex_buffers: Vec<VertexBufferDefinition>,
    pub index_buffers: Vec<IndexBufferDefinition>,
}

/// The buffer references for a single mesh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    /// Indices into [vertex_buffers](struct.RenderGeometryResourceDefinition.html#structfield.vertex_buffers).
    /// Unused entries are typically `0xFFFF`, which is out of range for any pool.
    pub vertex_buffers: Vec<u16>,
    /// Indices into [index_buffers](struct.RenderGeometryResourceDefinition.html#structfield.index_buffers).
    /// Meshes should always have at least 2 elements.
    pub index_buffers: Vec<u16>,
}
