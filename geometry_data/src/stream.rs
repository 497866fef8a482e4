//! Vertex stream assignment for vertex buffer formats.
use geometry_lib::formats::render_geometry::VertexBufferFormat;

/// The number of vertex streams for a mesh.
pub const STREAM_COUNT: usize = 5;

/// Returns the index of the vertex stream for buffers with the given `format`
/// or `None` if buffers of this format aren't assigned to a stream.
/// The result is always less than [STREAM_COUNT].
///
/// The assignments are based on which buffers appear together in existing meshes
/// and are only an approximation.
/// Unrelated formats may share a stream.
/**
```rust
use geometry_data::stream::vertex_stream_index;
use geometry_lib::formats::render_geometry::VertexBufferFormat;

assert_eq!(Some(0), vertex_stream_index(VertexBufferFormat::Skinned));
assert_eq!(Some(2), vertex_stream_index(VertexBufferFormat::AmbientPrt));
assert_eq!(Some(3), vertex_stream_index(VertexBufferFormat::Unknown1B));
```
 */
pub fn vertex_stream_index(format: VertexBufferFormat) -> Option<usize> {
    // Don't try to simplify this.
    // Even the invalid and unused formats have an assigned stream.
    match format {
        VertexBufferFormat::Invalid => Some(0),
        VertexBufferFormat::World => Some(0),
        VertexBufferFormat::Rigid => Some(0),
        VertexBufferFormat::Skinned => Some(0),
        VertexBufferFormat::Unknown4 => Some(4),
        VertexBufferFormat::Unknown5 => Some(4),
        VertexBufferFormat::Unknown6 => Some(4),
        VertexBufferFormat::Unknown7 => Some(0),
        VertexBufferFormat::Unused8 => Some(2),
        // Precomputed radiance transfer coefficients.
        VertexBufferFormat::AmbientPrt => Some(2),
        VertexBufferFormat::LinearPrt => Some(2),
        VertexBufferFormat::QuadraticPrt => Some(2),
        VertexBufferFormat::UnknownC => Some(0),
        VertexBufferFormat::UnknownD => Some(0),
        VertexBufferFormat::UnknownE => Some(4),
        VertexBufferFormat::UnknownF => Some(0),
        VertexBufferFormat::Unused10 => Some(1),
        VertexBufferFormat::Unused11 => Some(2),
        VertexBufferFormat::Unused12 => Some(1),
        VertexBufferFormat::Unused13 => Some(1),
        VertexBufferFormat::Unknown14 => Some(1),
        VertexBufferFormat::Unknown15 => Some(2),
        VertexBufferFormat::Unknown16 => Some(2),
        VertexBufferFormat::Unknown17 => Some(2),
        VertexBufferFormat::Unknown18 => Some(0),
        VertexBufferFormat::Unknown19 => Some(0),
        VertexBufferFormat::Unknown1A => Some(2),
        VertexBufferFormat::Unknown1B => Some(3),
        VertexBufferFormat::Unknown1C => Some(0),
        VertexBufferFormat::Unused1D => Some(1),
    }
}
