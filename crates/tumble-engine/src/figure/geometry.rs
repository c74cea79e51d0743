use thiserror::Error;

/// Borrowed mesh data: per-vertex positions and uvs plus 16-bit triangle
/// indices. `positions[i]` and `uvs[i]` describe the same vertex.
#[derive(Debug, Copy, Clone)]
pub struct MeshGeometry<'a> {
    pub positions: &'a [[f32; 3]],
    pub uvs: &'a [[f32; 2]],
    pub indices: &'a [u16],
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GeometryError {
    #[error("mesh has no vertices or no indices")]
    Empty,

    #[error("{positions} positions but {uvs} uvs")]
    AttributeCountMismatch { positions: usize, uvs: usize },

    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("index {index} at position {at} is out of range for {vertices} vertices")]
    IndexOutOfRange { at: usize, index: u16, vertices: usize },
}

impl MeshGeometry<'_> {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.is_empty() || self.indices.is_empty() {
            return Err(GeometryError::Empty);
        }
        if self.positions.len() != self.uvs.len() {
            return Err(GeometryError::AttributeCountMismatch {
                positions: self.positions.len(),
                uvs: self.uvs.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::PartialTriangle(self.indices.len()));
        }
        let vertices = self.positions.len();
        if let Some((at, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| usize::from(i) >= vertices)
        {
            return Err(GeometryError::IndexOutOfRange { at, index, vertices });
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

const S: f32 = 1.0;

/// Cube corners, four per face: front, back, top, bottom, left, right.
pub const CUBE_POSITIONS: [[f32; 3]; 24] = [
    [-S, S, S], [S, S, S], [S, -S, S], [-S, -S, S], // front
    [S, S, -S], [-S, S, -S], [-S, -S, -S], [S, -S, -S], // back
    [-S, S, -S], [S, S, -S], [S, S, S], [-S, S, S], // top
    [S, -S, -S], [-S, -S, -S], [-S, -S, S], [S, -S, S], // bottom
    [-S, S, -S], [-S, S, S], [-S, -S, S], [-S, -S, -S], // left
    [S, S, S], [S, S, -S], [S, -S, -S], [S, -S, S], // right
];

/// The same texture quad on every face.
pub const CUBE_UVS: [[f32; 2]; 24] = [
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // front
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // back
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // top
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // bottom
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // left
    [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], // right
];

/// Two triangles per face.
pub const CUBE_INDICES: [u16; 36] = [
    0, 3, 1, 1, 3, 2, // front
    4, 7, 5, 5, 7, 6, // back
    8, 11, 9, 9, 11, 10, // top
    12, 15, 13, 13, 15, 14, // bottom
    16, 19, 17, 17, 19, 18, // left
    20, 23, 21, 21, 23, 22, // right
];

/// Unit-half-extent cube (corners at ±1).
pub const CUBE: MeshGeometry<'static> = MeshGeometry {
    positions: &CUBE_POSITIONS,
    uvs: &CUBE_UVS,
    indices: &CUBE_INDICES,
};

#[cfg(test)]
mod tests {
    use super::*;

    // ── cube ──────────────────────────────────────────────────────────────

    #[test]
    fn cube_is_valid() {
        assert_eq!(CUBE.validate(), Ok(()));
        assert_eq!(CUBE.vertex_count(), 24);
        assert_eq!(CUBE.index_count(), 36);
    }

    #[test]
    fn cube_front_face_lies_on_positive_z() {
        let front = &CUBE_INDICES[..6];
        assert_eq!(front, &[0, 3, 1, 1, 3, 2]);
        for &i in front {
            assert_eq!(CUBE_POSITIONS[i as usize][2], 1.0);
        }
    }

    #[test]
    fn every_cube_face_is_planar() {
        for face in CUBE_INDICES.chunks(6) {
            let corners: Vec<[f32; 3]> = face.iter().map(|&i| CUBE_POSITIONS[i as usize]).collect();
            let shared_axis =
                (0..3).find(|&axis| corners.iter().all(|c| c[axis] == corners[0][axis]));
            assert!(shared_axis.is_some(), "face {face:?} is not axis aligned");
        }
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn mismatched_attribute_counts_are_rejected() {
        let g = MeshGeometry {
            positions: &CUBE_POSITIONS,
            uvs: &CUBE_UVS[..23],
            indices: &CUBE_INDICES,
        };
        assert_eq!(
            g.validate(),
            Err(GeometryError::AttributeCountMismatch { positions: 24, uvs: 23 })
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let g = MeshGeometry {
            positions: &CUBE_POSITIONS[..3],
            uvs: &CUBE_UVS[..3],
            indices: &[0, 1, 3],
        };
        assert_eq!(
            g.validate(),
            Err(GeometryError::IndexOutOfRange { at: 2, index: 3, vertices: 3 })
        );
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let g = MeshGeometry {
            positions: &CUBE_POSITIONS[..3],
            uvs: &CUBE_UVS[..3],
            indices: &[0, 1],
        };
        assert_eq!(g.validate(), Err(GeometryError::PartialTriangle(2)));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let g = MeshGeometry { positions: &[], uvs: &[], indices: &[] };
        assert_eq!(g.validate(), Err(GeometryError::Empty));
    }
}
