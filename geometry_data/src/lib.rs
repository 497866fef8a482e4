//! # geometry_data
//!
//! geometry_data resolves the buffer references of a [Mesh](geometry_lib::formats::render_geometry::Mesh)
//! into the vertex and index buffer definitions of a
//! [RenderGeometryResourceDefinition](geometry_lib::formats::render_geometry::RenderGeometryResourceDefinition)
//! and opens readers on the buffer data in the resource blob.
//!
//! ## Getting Started
//! Bind the mesh with [BoundMesh::bind](crate::mesh_reader::BoundMesh::bind)
//! and then open readers for the streams and index buffers the mesh uses.
/*!
```rust
use binrw::io::Cursor;
use geometry_data::prelude::*;
use geometry_lib::formats::render_geometry::{
    IndexBufferDefinition, Mesh, RenderGeometryResourceDefinition,
};
use geometry_lib::{ResourceAddress, ResourceDataReference};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let definition = RenderGeometryResourceDefinition {
    vertex_buffers: Vec::new(),
    index_buffers: vec![IndexBufferDefinition {
        unk1: 0,
        data: ResourceDataReference {
            size: 6,
            unused4: 0,
            unused8: 0,
            address: ResourceAddress::resource(2),
            unused10: 0,
        },
    }],
};
let mesh = Mesh {
    vertex_buffers: vec![0xFFFF; 8],
    index_buffers: vec![0, 0xFFFF],
};

let bound = BoundMesh::bind(&mesh, &definition)?;

let mut resource = Cursor::new(vec![0xFF, 0xFF, 0, 0, 1, 0, 2, 0]);
let mut reader = bound.open_index_buffer(0, &mut resource)?.unwrap();
assert_eq!(vec![0, 1, 2], reader.read_indices(3)?);
# Ok(())
# }
```
 */
//!
//! ## Streams
//! A mesh has up to [STREAM_COUNT](crate::stream::STREAM_COUNT) vertex streams.
//! The stream for each vertex buffer isn't stored in the data and is instead inferred from the buffer's
//! [VertexBufferFormat](geometry_lib::formats::render_geometry::VertexBufferFormat).
//! See [vertex_stream_index](crate::stream::vertex_stream_index) for details.
//!
//! ## Shared Readers
//! Opening a reader seeks the resource reader to the start of the buffer data.
//! Readers borrow the resource reader mutably, so only one buffer can be read at a time
//! from the same resource reader.
pub mod index_reader;
pub mod mesh_reader;
pub mod stream;
pub mod vertex_reader;

/// Common imports for top level types and important traits.
pub mod prelude {
    pub use crate::index_reader::{IndexBufferFormat, IndexBufferReader};
    pub use crate::mesh_reader::{
        open_index_buffer_reader, open_vertex_reader, BoundMesh, MeshReaderError,
    };
    pub use crate::stream::{vertex_stream_index, STREAM_COUNT};
    pub use crate::vertex_reader::{VertexReadError, VertexReader};
}
