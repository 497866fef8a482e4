//! The supported structures for render geometry resources.

pub mod render_geometry;
