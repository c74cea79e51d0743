use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Reasons a shader program could not be built.
///
/// Every variant means no program exists; there is no partially valid shader.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} stage failed to compile:\n{diagnostics}")]
    Compile { stage: Stage, diagnostics: String },

    #[error("program failed to link: {0}")]
    Link(String),

    #[error("vertex attribute `{0}` not found")]
    MissingAttribute(String),

    #[error("uniform `{0}` not found")]
    MissingUniform(String),

    #[error("vertex attribute `{name}` must be {expected}")]
    AttributeType { name: String, expected: &'static str },

    #[error("uniform `{name}` must be {expected}")]
    UniformType { name: String, expected: &'static str },
}
