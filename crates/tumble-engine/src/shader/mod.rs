//! Shader programs.
//!
//! A program is built in three steps, each of which can fail:
//! - compile: parse + validate each WGSL stage
//! - link: match the vertex outputs to the fragment inputs and check the
//!   resources both stages declare
//! - resolve: look up the position/uv attributes and the projection uniform
//!   by name
//!
//! Only then is anything created on the GPU.

mod error;
mod pipeline;
mod program;
mod stage;

pub use error::{ShaderError, Stage};
pub use pipeline::{ActiveShader, Shader, ShaderTargets, TRANSFORM_UNIFORM_SIZE};
pub use program::{LinkedProgram, ProgramLayout, ProgramSource, ResourceSlot};
pub use stage::{compile_stage, CompiledStage};

/// Vertex stage for textured figures.
pub const FIGURE_VERTEX_SOURCE: &str = include_str!("shaders/figure.vert.wgsl");

/// Fragment stage for textured figures.
pub const FIGURE_FRAGMENT_SOURCE: &str = include_str!("shaders/figure.frag.wgsl");

/// Program source for the bundled figure shader.
pub fn figure_program() -> ProgramSource<'static> {
    ProgramSource {
        vertex: FIGURE_VERTEX_SOURCE,
        fragment: FIGURE_FRAGMENT_SOURCE,
        position_attribute: "position",
        uv_attribute: "uv",
        projection_uniform: "projection",
    }
}
