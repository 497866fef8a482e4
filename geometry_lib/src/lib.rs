//! # geometry_lib
//!
//! geometry_lib provides strongly typed definitions for the structures that describe
//! where a mesh's vertex and index data lives inside a render geometry resource.
//!
//! A [Mesh](crate::formats::render_geometry::Mesh) only stores small indices into the buffer pools of a
//! [RenderGeometryResourceDefinition](crate::formats::render_geometry::RenderGeometryResourceDefinition).
//! Each [VertexBufferDefinition](crate::formats::render_geometry::VertexBufferDefinition) and
//! [IndexBufferDefinition](crate::formats::render_geometry::IndexBufferDefinition) in turn stores a [ResourceAddress]
//! for the location of its data in the resource blob.
//!
//! Fixed size records implement [BinRead](binrw::BinRead) and can be parsed from little endian data.
/*!
```rust
use binrw::{io::Cursor, BinReaderExt};
use geometry_lib::{ResourceAddress, ResourceAddressType};

let mut reader = Cursor::new([0x10, 0x00, 0x00, 0x40]);
let address = reader.read_le::<ResourceAddress>().unwrap();
assert_eq!(ResourceAddressType::Resource, address.address_type());
assert_eq!(Some(0x10), address.resource_offset());
```
 */
pub mod formats;

mod resource;

pub use resource::{ResourceAddress, ResourceAddressType, ResourceDataReference};
