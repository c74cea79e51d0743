use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::error::{ShaderError, Stage};

/// One successfully compiled (parsed + validated) shader stage.
#[derive(Debug)]
pub struct CompiledStage {
    stage: Stage,
    source: String,
    module: naga::Module,
}

impl CompiledStage {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }
}

/// Compiles WGSL `source` for `stage`.
///
/// Diagnostics are rendered against the source so they point at the
/// offending line.
pub fn compile_stage(stage: Stage, source: &str) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        diagnostics: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            diagnostics: e.emit_to_string(source),
        })?;

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        module,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{FIGURE_FRAGMENT_SOURCE, FIGURE_VERTEX_SOURCE};

    #[test]
    fn bundled_stages_compile() {
        let v = compile_stage(Stage::Vertex, FIGURE_VERTEX_SOURCE).unwrap();
        let f = compile_stage(Stage::Fragment, FIGURE_FRAGMENT_SOURCE).unwrap();
        assert_eq!(v.stage(), Stage::Vertex);
        assert_eq!(f.module().entry_points.len(), 1);
    }

    #[test]
    fn syntax_error_reports_diagnostics() {
        let err = compile_stage(Stage::Vertex, "@vertex fn vs_main( -> {").unwrap_err();
        match err {
            ShaderError::Compile { stage, diagnostics } => {
                assert_eq!(stage, Stage::Vertex);
                assert!(!diagnostics.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_error_is_a_compile_error() {
        // Parses, but returns the wrong type.
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = compile_stage(Stage::Fragment, src).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Fragment, .. }));
    }
}
