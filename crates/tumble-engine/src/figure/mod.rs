//! Renderable meshes ("figures") and their geometry.

mod figure;
mod geometry;

pub use figure::{Figure, VertexArray};
pub use geometry::{
    GeometryError, MeshGeometry, CUBE, CUBE_INDICES, CUBE_POSITIONS, CUBE_UVS,
};
