//! Binding of a [Mesh] to the buffer definitions of a [RenderGeometryResourceDefinition].
//!
//! The index and vertex data for every mesh in a resource is stored in a single resource blob.
//! Binding resolves the buffer indices of the [Mesh] to definitions,
//! and each definition determines where its data starts in the resource blob.
use binrw::io::{Read, Seek, SeekFrom};
use geometry_lib::formats::render_geometry::{
    IndexBufferDefinition, Mesh, RenderGeometryResourceDefinition, VertexBufferDefinition,
};
use geometry_lib::ResourceAddress;
use log::{debug, trace};
use thiserror::Error;

use crate::index_reader::{IndexBufferFormat, IndexBufferReader};
use crate::stream::{vertex_stream_index, STREAM_COUNT};
use crate::vertex_reader::VertexReader;

/// The number of index buffers for a mesh.
pub const INDEX_BUFFER_COUNT: usize = 2;

/// Errors while binding a [Mesh].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshReaderError {
    /// The mesh is malformed and does not reference enough index buffers.
    #[error("Expected at least {expected} index buffers for the mesh but found {actual}.")]
    TooFewIndexBuffers { expected: usize, actual: usize },
}

/// The vertex streams and index buffers used by a [Mesh].
/// Empty elements are not used by the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundMesh<'a> {
    pub vertex_streams: [Option<&'a VertexBufferDefinition>; STREAM_COUNT],
    pub index_buffers: [Option<&'a IndexBufferDefinition>; INDEX_BUFFER_COUNT],
}

impl<'a> BoundMesh<'a> {
    /// Binds the vertex and index buffers referenced by `mesh` in `definition`.
    /// Out of range buffer indices leave the corresponding element empty.
    /// Returns an error if the mesh has fewer than [INDEX_BUFFER_COUNT] index buffer indices.
    pub fn bind(
        mesh: &Mesh,
        definition: &'a RenderGeometryResourceDefinition,
    ) -> Result<Self, MeshReaderError> {
        let vertex_streams = bind_vertex_streams(mesh, definition);
        let index_buffers = bind_index_buffers(mesh, definition)?;
        Ok(Self {
            vertex_streams,
            index_buffers,
        })
    }

    /// Opens a vertex reader on the definition for the stream at `stream_index`.
    /// Returns `None` if the index is out of range, the stream is empty, or
    /// the buffer's address isn't relative to the resource data.
    pub fn open_vertex_stream<'r, R: Read + Seek>(
        &self,
        stream_index: usize,
        reader: &'r mut R,
    ) -> std::io::Result<Option<VertexReader<'r, R>>> {
        match self.vertex_streams.get(stream_index).copied().flatten() {
            Some(definition) => open_vertex_reader(definition, reader),
            None => Ok(None),
        }
    }

    /// Opens an index buffer reader on the definition at `buffer_index`.
    /// Returns `None` if the index is out of range, the buffer is empty, or
    /// the buffer's address isn't relative to the resource data.
    pub fn open_index_buffer<'r, R: Read + Seek>(
        &self,
        buffer_index: usize,
        reader: &'r mut R,
    ) -> std::io::Result<Option<IndexBufferReader<'r, R>>> {
        match self.index_buffers.get(buffer_index).copied().flatten() {
            Some(definition) => open_index_buffer_reader(definition, reader),
            None => Ok(None),
        }
    }
}

fn bind_vertex_streams<'a>(
    mesh: &Mesh,
    definition: &'a RenderGeometryResourceDefinition,
) -> [Option<&'a VertexBufferDefinition>; STREAM_COUNT] {
    // The game loads buffers from specific indices depending on the type of mesh.
    // Scanning every buffer and assigning streams by format is only an approximation.
    let mut streams = [None; STREAM_COUNT];
    for &buffer_index in &mesh.vertex_buffers {
        let buffer = match definition.vertex_buffers.get(buffer_index as usize) {
            Some(buffer) => buffer,
            None => {
                trace!(
                    "Skipping vertex buffer index {} for {} vertex buffers.",
                    buffer_index,
                    definition.vertex_buffers.len()
                );
                continue;
            }
        };

        match vertex_stream_index(buffer.format) {
            // Later buffers replace earlier buffers with the same stream.
            Some(stream_index) => streams[stream_index] = Some(buffer),
            None => debug!(
                "Skipping vertex buffer index {} with unassigned format {:?}.",
                buffer_index, buffer.format
            ),
        }
    }
    streams
}

fn bind_index_buffers<'a>(
    mesh: &Mesh,
    definition: &'a RenderGeometryResourceDefinition,
) -> Result<[Option<&'a IndexBufferDefinition>; INDEX_BUFFER_COUNT], MeshReaderError> {
    if mesh.index_buffers.len() < INDEX_BUFFER_COUNT {
        return Err(MeshReaderError::TooFewIndexBuffers {
            expected: INDEX_BUFFER_COUNT,
            actual: mesh.index_buffers.len(),
        });
    }

    let mut buffers = [None; INDEX_BUFFER_COUNT];
    for (buffer, buffer_index) in buffers.iter_mut().zip(&mesh.index_buffers) {
        *buffer = definition.index_buffers.get(*buffer_index as usize);
    }
    Ok(buffers)
}

/// Opens a vertex reader on the data for `definition`.
/// `reader` should contain the resource data and will be positioned at the start of the vertex buffer.
///
/// Returns `None` without moving `reader` if the buffer's address isn't relative to the resource data.
pub fn open_vertex_reader<'r, R: Read + Seek>(
    definition: &VertexBufferDefinition,
    reader: &'r mut R,
) -> std::io::Result<Option<VertexReader<'r, R>>> {
    if !seek_resource(&definition.data.address, reader)? {
        return Ok(None);
    }
    Ok(Some(VertexReader::new(
        reader,
        definition.format,
        definition.count as usize,
    )))
}

/// Opens an index buffer reader on the data for `definition`.
/// `reader` should contain the resource data and will be positioned at the start of the index buffer.
/// Indices are always read as [IndexBufferFormat::UInt16].
///
/// Returns `None` without moving `reader` if the buffer's address isn't relative to the resource data.
pub fn open_index_buffer_reader<'r, R: Read + Seek>(
    definition: &IndexBufferDefinition,
    reader: &'r mut R,
) -> std::io::Result<Option<IndexBufferReader<'r, R>>> {
    if !seek_resource(&definition.data.address, reader)? {
        return Ok(None);
    }
    Ok(Some(IndexBufferReader::new(reader, IndexBufferFormat::UInt16)))
}

fn seek_resource<R: Seek>(address: &ResourceAddress, reader: &mut R) -> std::io::Result<bool> {
    // Other address types aren't supported.
    match address.resource_offset() {
        Some(offset) => {
            reader.seek(SeekFrom::Start(offset as u64))?;
            Ok(true)
        }
        None => {
            debug!(
                "Unsupported address type {:?} for buffer data.",
                address.address_type()
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use geometry_lib::formats::render_geometry::VertexBufferFormat;
    use geometry_lib::{ResourceAddressType, ResourceDataReference};
    use hexlit::hex;
    use strum::IntoEnumIterator;

    fn data(address: ResourceAddress) -> ResourceDataReference {
        ResourceDataReference {
            size: 0,
            unused4: 0,
            unused8: 0,
            address,
            unused10: 0,
        }
    }

    fn vertex_buffer(format: VertexBufferFormat, offset: u32) -> VertexBufferDefinition {
        VertexBufferDefinition {
            count: 2,
            format,
            vertex_size: format.size_in_bytes().unwrap_or(0) as u16,
            data: data(ResourceAddress::resource(offset)),
        }
    }

    fn index_buffer(address: ResourceAddress) -> IndexBufferDefinition {
        IndexBufferDefinition {
            unk1: 3,
            data: data(address),
        }
    }

    fn mesh(vertex_buffers: Vec<u16>, index_buffers: Vec<u16>) -> Mesh {
        Mesh {
            vertex_buffers,
            index_buffers,
        }
    }

    #[test]
    fn bind_streams_by_format() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![
                vertex_buffer(VertexBufferFormat::Rigid, 0),
                vertex_buffer(VertexBufferFormat::AmbientPrt, 0x70),
            ],
            index_buffers: Vec::new(),
        };

        let bound = BoundMesh::bind(&mesh(vec![0, 1], vec![0xFFFF, 0xFFFF]), &definition).unwrap();
        assert_eq!(
            [
                Some(&definition.vertex_buffers[0]),
                None,
                Some(&definition.vertex_buffers[1]),
                None,
                None
            ],
            bound.vertex_streams
        );
        assert_eq!([None, None], bound.index_buffers);
    }

    #[test]
    fn bind_streams_later_buffer_replaces_earlier() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![
                vertex_buffer(VertexBufferFormat::World, 0),
                vertex_buffer(VertexBufferFormat::Unknown4, 0x70),
                vertex_buffer(VertexBufferFormat::Skinned, 0x80),
            ],
            index_buffers: Vec::new(),
        };

        let bound = BoundMesh::bind(&mesh(vec![0, 1, 2], vec![0, 0]), &definition).unwrap();
        assert_eq!(Some(&definition.vertex_buffers[2]), bound.vertex_streams[0]);
        assert_eq!(Some(&definition.vertex_buffers[1]), bound.vertex_streams[4]);

        // The iteration order of the mesh's indices determines the result.
        let bound = BoundMesh::bind(&mesh(vec![2, 1, 0], vec![0, 0]), &definition).unwrap();
        assert_eq!(Some(&definition.vertex_buffers[0]), bound.vertex_streams[0]);
    }

    #[test]
    fn bind_streams_out_of_range_index() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![
                vertex_buffer(VertexBufferFormat::World, 0),
                vertex_buffer(VertexBufferFormat::Unknown14, 0x70),
                vertex_buffer(VertexBufferFormat::Unknown1B, 0x80),
            ],
            index_buffers: Vec::new(),
        };

        let bound = BoundMesh::bind(
            &mesh(vec![5, 1, 0xFFFF, 2, 3], vec![0xFFFF, 0xFFFF]),
            &definition,
        )
        .unwrap();
        assert_eq!(
            [
                None,
                Some(&definition.vertex_buffers[1]),
                None,
                Some(&definition.vertex_buffers[2]),
                None
            ],
            bound.vertex_streams
        );
    }

    #[test]
    fn bind_streams_every_format() {
        // Each buffer should end up in the stream for its format.
        for format in VertexBufferFormat::iter() {
            let definition = RenderGeometryResourceDefinition {
                vertex_buffers: vec![vertex_buffer(format, 0)],
                index_buffers: Vec::new(),
            };
            let bound = BoundMesh::bind(&mesh(vec![0], vec![0, 0]), &definition).unwrap();

            for (i, stream) in bound.vertex_streams.iter().enumerate() {
                if vertex_stream_index(format) == Some(i) {
                    assert_eq!(Some(&definition.vertex_buffers[0]), *stream);
                } else {
                    assert_eq!(None, *stream);
                }
            }
        }
    }

    #[test]
    fn bind_empty_mesh() {
        let definition = RenderGeometryResourceDefinition::default();
        let bound = BoundMesh::bind(&mesh(Vec::new(), vec![0, 1]), &definition).unwrap();
        assert_eq!([None; STREAM_COUNT], bound.vertex_streams);
        assert_eq!([None; INDEX_BUFFER_COUNT], bound.index_buffers);
    }

    #[test]
    fn bind_index_buffers() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: Vec::new(),
            index_buffers: vec![
                index_buffer(ResourceAddress::resource(0)),
                index_buffer(ResourceAddress::resource(8)),
            ],
        };

        let bound = BoundMesh::bind(&mesh(Vec::new(), vec![1, 0]), &definition).unwrap();
        assert_eq!(
            [
                Some(&definition.index_buffers[1]),
                Some(&definition.index_buffers[0])
            ],
            bound.index_buffers
        );
    }

    #[test]
    fn bind_index_buffers_out_of_range() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: Vec::new(),
            index_buffers: vec![index_buffer(ResourceAddress::resource(0))],
        };

        let bound = BoundMesh::bind(&mesh(Vec::new(), vec![0xFFFF, 0]), &definition).unwrap();
        assert_eq!(
            [None, Some(&definition.index_buffers[0])],
            bound.index_buffers
        );
    }

    #[test]
    fn bind_index_buffers_extra_indices() {
        // Only the first two indices are used.
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: Vec::new(),
            index_buffers: vec![
                index_buffer(ResourceAddress::resource(0)),
                index_buffer(ResourceAddress::resource(8)),
            ],
        };

        let bound = BoundMesh::bind(&mesh(Vec::new(), vec![0, 0, 1]), &definition).unwrap();
        assert_eq!(
            [
                Some(&definition.index_buffers[0]),
                Some(&definition.index_buffers[0])
            ],
            bound.index_buffers
        );
    }

    #[test]
    fn bind_too_few_index_buffers() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![vertex_buffer(VertexBufferFormat::World, 0)],
            index_buffers: vec![
                index_buffer(ResourceAddress::resource(0)),
                index_buffer(ResourceAddress::resource(8)),
            ],
        };

        assert_eq!(
            Err(MeshReaderError::TooFewIndexBuffers {
                expected: 2,
                actual: 1
            }),
            BoundMesh::bind(&mesh(vec![0], vec![0]), &definition)
        );
        assert_eq!(
            Err(MeshReaderError::TooFewIndexBuffers {
                expected: 2,
                actual: 0
            }),
            BoundMesh::bind(&mesh(vec![0], Vec::new()), &definition)
        );
    }

    #[test]
    fn bind_too_few_index_buffers_empty_definition() {
        let definition = RenderGeometryResourceDefinition::default();
        assert!(BoundMesh::bind(&mesh(Vec::new(), vec![0]), &definition).is_err());
    }

    #[test]
    fn bind_is_deterministic() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![
                vertex_buffer(VertexBufferFormat::Skinned, 0),
                vertex_buffer(VertexBufferFormat::LinearPrt, 0x80),
                vertex_buffer(VertexBufferFormat::Unknown15, 0x88),
            ],
            index_buffers: vec![index_buffer(ResourceAddress::resource(0x90))],
        };
        let mesh = mesh(vec![0, 1, 2, 0xFFFF], vec![0, 0xFFFF]);

        assert_eq!(
            BoundMesh::bind(&mesh, &definition).unwrap(),
            BoundMesh::bind(&mesh, &definition).unwrap()
        );
    }

    #[test]
    fn open_vertex_reader_resource_address() {
        let definition = vertex_buffer(VertexBufferFormat::Unknown5, 4);
        let mut reader = Cursor::new(hex!("FFFFFFFF 01020304 05060708"));

        let mut vertices = open_vertex_reader(&definition, &mut reader)
            .unwrap()
            .unwrap();
        assert_eq!(VertexBufferFormat::Unknown5, vertices.format());
        assert_eq!(2, vertices.count());
        assert_eq!(
            vec![hex!("01020304").to_vec(), hex!("05060708").to_vec()],
            vertices.read_raw_vertices().unwrap()
        );
    }

    #[test]
    fn open_vertex_reader_unsupported_address() {
        for address_type in [
            ResourceAddressType::Memory,
            ResourceAddressType::Definition,
            ResourceAddressType::Unknown3,
            ResourceAddressType::Unknown7,
        ] {
            let mut definition = vertex_buffer(VertexBufferFormat::World, 0);
            definition.data.address = ResourceAddress::from_parts(address_type, 4);

            let mut reader = Cursor::new(hex!("FFFFFFFF 01020304"));
            reader.set_position(2);

            let result = open_vertex_reader(&definition, &mut reader).unwrap();
            assert!(result.is_none());
            // The reader should not be moved.
            assert_eq!(2, reader.position());
        }
    }

    #[test]
    fn open_index_buffer_reader_resource_address() {
        let definition = index_buffer(ResourceAddress::resource(2));
        let mut reader = Cursor::new(hex!("FFFF 0100 0200 0300"));

        let mut indices = open_index_buffer_reader(&definition, &mut reader)
            .unwrap()
            .unwrap();
        assert_eq!(IndexBufferFormat::UInt16, indices.format());
        assert_eq!(vec![1, 2, 3], indices.read_indices(3).unwrap());
    }

    #[test]
    fn open_index_buffer_reader_unsupported_address() {
        let definition = index_buffer(ResourceAddress::from_parts(
            ResourceAddressType::Definition,
            2,
        ));
        let mut reader = Cursor::new(hex!("FFFF 0100 0200 0300"));
        reader.set_position(6);

        assert!(open_index_buffer_reader(&definition, &mut reader)
            .unwrap()
            .is_none());
        assert_eq!(6, reader.position());
    }

    #[test]
    fn open_readers_share_reader() {
        // Each reader seeks to its own buffer before reading.
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![vertex_buffer(VertexBufferFormat::Unknown16, 0)],
            index_buffers: vec![index_buffer(ResourceAddress::resource(8))],
        };
        let bound = BoundMesh::bind(&mesh(vec![0], vec![0, 0xFFFF]), &definition).unwrap();
        let mut reader = Cursor::new(hex!("01020304 05060708 0200 0100"));

        let mut indices = bound.open_index_buffer(0, &mut reader).unwrap().unwrap();
        assert_eq!(vec![2, 1], indices.read_indices(2).unwrap());

        let mut vertices = bound.open_vertex_stream(2, &mut reader).unwrap().unwrap();
        assert_eq!(hex!("01020304").to_vec(), vertices.read_raw_vertex().unwrap());

        let mut indices = bound.open_index_buffer(0, &mut reader).unwrap().unwrap();
        assert_eq!(2, indices.read_index().unwrap());
    }

    #[test]
    fn open_vertex_stream_empty_or_out_of_range() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![vertex_buffer(VertexBufferFormat::World, 0)],
            index_buffers: Vec::new(),
        };
        let bound = BoundMesh::bind(&mesh(vec![0], vec![0, 0]), &definition).unwrap();
        let mut reader = Cursor::new(vec![0u8; 0x70]);
        reader.set_position(1);

        assert!(bound.open_vertex_stream(0, &mut reader).unwrap().is_some());
        reader.set_position(1);

        assert!(bound.open_vertex_stream(1, &mut reader).unwrap().is_none());
        assert!(bound
            .open_vertex_stream(STREAM_COUNT, &mut reader)
            .unwrap()
            .is_none());
        assert!(bound.open_vertex_stream(usize::MAX, &mut reader).unwrap().is_none());
        assert_eq!(1, reader.position());
    }

    #[test]
    fn open_index_buffer_empty_or_out_of_range() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: Vec::new(),
            index_buffers: vec![index_buffer(ResourceAddress::resource(0))],
        };
        let bound = BoundMesh::bind(&mesh(Vec::new(), vec![0xFFFF, 0]), &definition).unwrap();
        let mut reader = Cursor::new(vec![0u8; 4]);

        assert!(bound.open_index_buffer(0, &mut reader).unwrap().is_none());
        assert!(bound.open_index_buffer(1, &mut reader).unwrap().is_some());
        assert!(bound
            .open_index_buffer(INDEX_BUFFER_COUNT, &mut reader)
            .unwrap()
            .is_none());
    }

    // Reads succeed but every seek fails.
    struct FailingSeek(Cursor<Vec<u8>>);

    impl Read for FailingSeek {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Seek for FailingSeek {
        fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "seek not supported",
            ))
        }
    }

    #[test]
    fn open_readers_seek_error() {
        let definition = RenderGeometryResourceDefinition {
            vertex_buffers: vec![vertex_buffer(VertexBufferFormat::World, 0)],
            index_buffers: vec![index_buffer(ResourceAddress::resource(0))],
        };
        let bound = BoundMesh::bind(&mesh(vec![0], vec![0, 0]), &definition).unwrap();
        let mut reader = FailingSeek(Cursor::new(vec![0u8; 0x40]));

        assert!(open_vertex_reader(&definition.vertex_buffers[0], &mut reader).is_err());
        assert!(open_index_buffer_reader(&definition.index_buffers[0], &mut reader).is_err());
        assert!(bound.open_vertex_stream(0, &mut reader).is_err());
        assert!(bound.open_index_buffer(0, &mut reader).is_err());
    }

    #[test]
    fn open_readers_unsupported_address_does_not_seek() {
        let mut vertex_definition = vertex_buffer(VertexBufferFormat::World, 0);
        vertex_definition.data.address =
            ResourceAddress::from_parts(ResourceAddressType::Memory, 0);
        let index_definition = index_buffer(ResourceAddress::from_parts(
            ResourceAddressType::Definition,
            0,
        ));
        let mut reader = FailingSeek(Cursor::new(vec![0u8; 0x40]));

        assert!(open_vertex_reader(&vertex_definition, &mut reader)
            .unwrap()
            .is_none());
        assert!(open_index_buffer_reader(&index_definition, &mut reader)
            .unwrap()
            .is_none());
    }
}
