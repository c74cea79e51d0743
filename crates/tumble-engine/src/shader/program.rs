use naga::{AddressSpace, Binding, ImageClass, ImageDimension, Module, ScalarKind, TypeInner};

use super::error::{ShaderError, Stage};
use super::stage::{compile_stage, CompiledStage};

/// Inputs for building a program: stage sources plus the names the binding
/// code looks up. Names must match the source exactly.
#[derive(Debug, Copy, Clone)]
pub struct ProgramSource<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub position_attribute: &'a str,
    pub uv_attribute: &'a str,
    pub projection_uniform: &'a str,
}

/// `@group(g) @binding(b)` slot of a bound resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
}

impl From<&naga::ResourceBinding> for ResourceSlot {
    fn from(rb: &naga::ResourceBinding) -> Self {
        Self {
            group: rb.group,
            binding: rb.binding,
        }
    }
}

/// Every location and slot the draw path needs, resolved at link time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProgramLayout {
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub position_location: u32,
    pub uv_location: u32,
    pub projection: ResourceSlot,
    pub texture: ResourceSlot,
    pub sampler: ResourceSlot,
}

/// A fully compiled, linked and resolved program that does not yet live on
/// a GPU.
///
/// Only constructible through [`LinkedProgram::link`], so holding one means
/// every name resolved.
#[derive(Debug)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
    layout: ProgramLayout,
}

impl LinkedProgram {
    /// Compiles both stages, links them and resolves attribute/uniform names.
    ///
    /// All-or-nothing: on the first failure everything built so far is
    /// dropped and the error is returned.
    pub fn link(src: &ProgramSource<'_>) -> Result<Self, ShaderError> {
        let vertex = compile_stage(Stage::Vertex, src.vertex)?;
        let fragment = compile_stage(Stage::Fragment, src.fragment)?;

        let vs = entry_point(vertex.module(), Stage::Vertex)?;
        let fs = entry_point(fragment.module(), Stage::Fragment)?;
        check_interface(vertex.module(), vs, fragment.module(), fs)?;

        let position_location = resolve_attribute(
            vertex.module(),
            vs,
            src.position_attribute,
            naga::VectorSize::Tri,
            "vec3<f32>",
        )?;
        let uv_location = resolve_attribute(
            vertex.module(),
            vs,
            src.uv_attribute,
            naga::VectorSize::Bi,
            "vec2<f32>",
        )?;
        check_vertex_inputs(vertex.module(), vs, &[position_location, uv_location])?;
        let projection = resolve_uniform(vertex.module(), src.projection_uniform)?;
        let (texture, sampler) = resolve_texture(fragment.module())?;

        let layout = ProgramLayout {
            vertex_entry: vs.name.clone(),
            fragment_entry: fs.name.clone(),
            position_location,
            uv_location,
            projection,
            texture,
            sampler,
        };
        check_bind_group(&layout, vertex.module(), fragment.module())?;

        Ok(Self {
            vertex,
            fragment,
            layout,
        })
    }

    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }

    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}

// ── link ──────────────────────────────────────────────────────────────────

fn entry_point(module: &Module, stage: Stage) -> Result<&naga::EntryPoint, ShaderError> {
    let mut found = module.entry_points.iter().filter(|ep| ep.stage == stage.naga());
    match (found.next(), found.next()) {
        (Some(ep), None) => Ok(ep),
        (None, _) => Err(ShaderError::Link(format!("no {stage} entry point"))),
        (Some(_), Some(_)) => Err(ShaderError::Link(format!(
            "more than one {stage} entry point"
        ))),
    }
}

/// A location-bound value crossing a stage boundary.
struct Port<'m> {
    name: Option<&'m str>,
    location: u32,
    ty: naga::Handle<naga::Type>,
}

fn push_ports<'m>(
    module: &'m Module,
    name: Option<&'m str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Port<'m>>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Port {
            name,
            location: *location,
            ty,
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(Binding::Location { location, .. }) = &m.binding {
                        out.push(Port {
                            name: m.name.as_deref(),
                            location: *location,
                            ty: m.ty,
                        });
                    }
                }
            }
        }
    }
}

fn inputs<'m>(module: &'m Module, ep: &'m naga::EntryPoint) -> Vec<Port<'m>> {
    let mut ports = Vec::new();
    for arg in &ep.function.arguments {
        push_ports(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut ports);
    }
    ports
}

fn outputs<'m>(module: &'m Module, ep: &'m naga::EntryPoint) -> Vec<Port<'m>> {
    let mut ports = Vec::new();
    if let Some(result) = &ep.function.result {
        push_ports(module, None, result.ty, result.binding.as_ref(), &mut ports);
    }
    ports
}

fn check_interface(
    vmod: &Module,
    vs: &naga::EntryPoint,
    fmod: &Module,
    fs: &naga::EntryPoint,
) -> Result<(), ShaderError> {
    let produced = outputs(vmod, vs);

    for input in inputs(fmod, fs) {
        let Some(out) = produced.iter().find(|p| p.location == input.location) else {
            return Err(ShaderError::Link(format!(
                "fragment input @location({}) is not written by the vertex stage",
                input.location
            )));
        };
        if vmod.types[out.ty].inner != fmod.types[input.ty].inner {
            return Err(ShaderError::Link(format!(
                "@location({}) type differs between vertex output and fragment input",
                input.location
            )));
        }
    }
    Ok(())
}

fn bound_globals(module: &Module) -> impl Iterator<Item = (ResourceSlot, &naga::GlobalVariable)> {
    module
        .global_variables
        .iter()
        .filter_map(|(_, gv)| gv.binding.as_ref().map(|rb| (ResourceSlot::from(rb), gv)))
}

/// The draw path binds exactly one group: uniform, texture and sampler.
fn check_bind_group(
    layout: &ProgramLayout,
    vmod: &Module,
    fmod: &Module,
) -> Result<(), ShaderError> {
    let known = [layout.projection, layout.texture, layout.sampler];

    if let Some(slot) = known.iter().find(|s| s.group != 0) {
        return Err(ShaderError::Link(format!(
            "resource at @group({}) @binding({}) is outside bind group 0",
            slot.group, slot.binding
        )));
    }
    if known[0].binding == known[1].binding
        || known[0].binding == known[2].binding
        || known[1].binding == known[2].binding
    {
        return Err(ShaderError::Link("uniform, texture and sampler share a binding".into()));
    }

    // Each layout entry is visible to one stage only.
    for (slot, gv) in bound_globals(vmod) {
        if slot != layout.projection {
            return Err(stray_resource(Stage::Vertex, slot, gv));
        }
    }
    for (slot, gv) in bound_globals(fmod) {
        if slot != layout.texture && slot != layout.sampler {
            return Err(stray_resource(Stage::Fragment, slot, gv));
        }
    }
    Ok(())
}

fn stray_resource(stage: Stage, slot: ResourceSlot, gv: &naga::GlobalVariable) -> ShaderError {
    ShaderError::Link(format!(
        "{stage} stage cannot bind `{}` at @group({}) @binding({})",
        gv.name.as_deref().unwrap_or("<unnamed>"),
        slot.group,
        slot.binding
    ))
}

/// Only the position and uv buffers are fed; any other vertex input would
/// be left without a source.
fn check_vertex_inputs(
    module: &Module,
    vs: &naga::EntryPoint,
    fed: &[u32],
) -> Result<(), ShaderError> {
    match inputs(module, vs).iter().find(|p| !fed.contains(&p.location)) {
        Some(port) => Err(ShaderError::Link(format!(
            "vertex input `{}` at @location({}) has no vertex buffer",
            port.name.unwrap_or("<unnamed>"),
            port.location
        ))),
        None => Ok(()),
    }
}

// ── resolve ───────────────────────────────────────────────────────────────

fn is_f32_vector(inner: &TypeInner, size: naga::VectorSize) -> bool {
    matches!(
        inner,
        TypeInner::Vector { size: s, scalar } if *s == size && *scalar == naga::Scalar::F32
    )
}

fn resolve_attribute(
    module: &Module,
    vs: &naga::EntryPoint,
    name: &str,
    size: naga::VectorSize,
    expected: &'static str,
) -> Result<u32, ShaderError> {
    let ports = inputs(module, vs);
    let port = ports
        .iter()
        .find(|p| p.name == Some(name))
        .ok_or_else(|| ShaderError::MissingAttribute(name.to_owned()))?;

    if !is_f32_vector(&module.types[port.ty].inner, size) {
        return Err(ShaderError::AttributeType {
            name: name.to_owned(),
            expected,
        });
    }
    Ok(port.location)
}

fn resolve_uniform(module: &Module, name: &str) -> Result<ResourceSlot, ShaderError> {
    let (_, gv) = module
        .global_variables
        .iter()
        .find(|(_, gv)| gv.space == AddressSpace::Uniform && gv.name.as_deref() == Some(name))
        .ok_or_else(|| ShaderError::MissingUniform(name.to_owned()))?;

    let is_mat4 = matches!(
        module.types[gv.ty].inner,
        TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar: naga::Scalar::F32,
        }
    );
    if !is_mat4 {
        return Err(ShaderError::UniformType {
            name: name.to_owned(),
            expected: "mat4x4<f32>",
        });
    }

    gv.binding
        .as_ref()
        .map(ResourceSlot::from)
        .ok_or_else(|| ShaderError::MissingUniform(name.to_owned()))
}

/// Finds the fragment stage's sampled 2-D float texture and filtering sampler.
fn resolve_texture(module: &Module) -> Result<(ResourceSlot, ResourceSlot), ShaderError> {
    let mut texture = None;
    let mut sampler = None;

    for (slot, gv) in bound_globals(module) {
        match &module.types[gv.ty].inner {
            TypeInner::Image {
                dim: ImageDimension::D2,
                arrayed: false,
                class: ImageClass::Sampled {
                    kind: ScalarKind::Float,
                    multi: false,
                },
            } if texture.is_none() => texture = Some(slot),
            TypeInner::Sampler { comparison: false } if sampler.is_none() => sampler = Some(slot),
            _ => {}
        }
    }

    match (texture, sampler) {
        (Some(t), Some(s)) => Ok((t, s)),
        (None, _) => Err(ShaderError::Link(
            "fragment stage declares no sampled 2-D texture".into(),
        )),
        (_, None) => Err(ShaderError::Link(
            "fragment stage declares no filtering sampler".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{FIGURE_FRAGMENT_SOURCE, FIGURE_VERTEX_SOURCE};

    fn source<'a>(vertex: &'a str, fragment: &'a str) -> ProgramSource<'a> {
        ProgramSource {
            vertex,
            fragment,
            position_attribute: "position",
            uv_attribute: "uv",
            projection_uniform: "projection",
        }
    }

    fn bundled() -> ProgramSource<'static> {
        source(FIGURE_VERTEX_SOURCE, FIGURE_FRAGMENT_SOURCE)
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn bundled_program_resolves_every_location() {
        let program = LinkedProgram::link(&bundled()).unwrap();
        let layout = program.layout();

        assert_eq!(layout.vertex_entry, "vs_main");
        assert_eq!(layout.fragment_entry, "fs_main");
        assert_eq!(layout.position_location, 0);
        assert_eq!(layout.uv_location, 1);
        assert_eq!(layout.projection, ResourceSlot { group: 0, binding: 0 });
        assert_eq!(layout.texture, ResourceSlot { group: 0, binding: 1 });
        assert_eq!(layout.sampler, ResourceSlot { group: 0, binding: 2 });
    }

    #[test]
    fn attributes_inside_an_input_struct_resolve() {
        let vs = r#"
            @group(0) @binding(0) var<uniform> projection: mat4x4<f32>;
            struct In { @location(3) position: vec3<f32>, @location(5) uv: vec2<f32> };
            struct Out { @builtin(position) pos: vec4<f32>, @location(0) frag_uv: vec2<f32> };
            @vertex fn vs_main(v: In) -> Out {
                var o: Out;
                o.pos = projection * vec4<f32>(v.position, 1.0);
                o.frag_uv = v.uv;
                return o;
            }
        "#;
        let program = LinkedProgram::link(&source(vs, FIGURE_FRAGMENT_SOURCE)).unwrap();
        assert_eq!(program.layout().position_location, 3);
        assert_eq!(program.layout().uv_location, 5);
    }

    // ── compile failures ──────────────────────────────────────────────────

    #[test]
    fn fragment_failure_yields_no_program() {
        let result = LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, "not wgsl at all"));
        assert!(matches!(
            result,
            Err(ShaderError::Compile { stage: Stage::Fragment, .. })
        ));
    }

    #[test]
    fn vertex_failure_is_reported_first() {
        let result = LinkedProgram::link(&source("fn", "fn"));
        assert!(matches!(
            result,
            Err(ShaderError::Compile { stage: Stage::Vertex, .. })
        ));
    }

    // ── resolve failures ──────────────────────────────────────────────────

    #[test]
    fn missing_position_name_fails() {
        let mut src = bundled();
        src.position_attribute = "pos";
        assert!(matches!(
            LinkedProgram::link(&src),
            Err(ShaderError::MissingAttribute(n)) if n == "pos"
        ));
    }

    #[test]
    fn missing_uv_name_fails() {
        let mut src = bundled();
        src.uv_attribute = "inUV";
        assert!(matches!(
            LinkedProgram::link(&src),
            Err(ShaderError::MissingAttribute(n)) if n == "inUV"
        ));
    }

    #[test]
    fn missing_projection_name_fails() {
        let mut src = bundled();
        src.projection_uniform = "mvp";
        assert!(matches!(
            LinkedProgram::link(&src),
            Err(ShaderError::MissingUniform(n)) if n == "mvp"
        ));
    }

    #[test]
    fn swapped_attribute_types_are_rejected() {
        let mut src = bundled();
        src.position_attribute = "uv";
        src.uv_attribute = "position";
        assert!(matches!(
            LinkedProgram::link(&src),
            Err(ShaderError::AttributeType { expected: "vec3<f32>", .. })
        ));
    }

    #[test]
    fn non_matrix_uniform_is_rejected() {
        let vs = r#"
            @group(0) @binding(0) var<uniform> projection: vec4<f32>;
            struct Out { @builtin(position) pos: vec4<f32>, @location(0) frag_uv: vec2<f32> };
            @vertex fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> Out {
                var o: Out;
                o.pos = projection + vec4<f32>(position, 1.0);
                o.frag_uv = uv;
                return o;
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(vs, FIGURE_FRAGMENT_SOURCE)),
            Err(ShaderError::UniformType { .. })
        ));
    }

    // ── link failures ─────────────────────────────────────────────────────

    #[test]
    fn unmatched_fragment_input_fails_to_link() {
        let fs = r#"
            @group(0) @binding(1) var figure_texture: texture_2d<f32>;
            @group(0) @binding(2) var figure_sampler: sampler;
            @fragment fn fs_main(@location(4) frag_uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(figure_texture, figure_sampler, frag_uv);
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, fs)),
            Err(ShaderError::Link(_))
        ));
    }

    #[test]
    fn stage_without_entry_point_fails_to_link() {
        let fs = "fn helper() -> f32 { return 1.0; }";
        assert!(matches!(
            LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, fs)),
            Err(ShaderError::Link(_))
        ));
    }

    #[test]
    fn fragment_without_texture_fails_to_link() {
        let fs = r#"
            @fragment fn fs_main(@location(0) frag_uv: vec2<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(frag_uv, 0.0, 1.0);
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, fs)),
            Err(ShaderError::Link(_))
        ));
    }

    #[test]
    fn extra_vertex_input_fails_to_link() {
        let vs = r#"
            @group(0) @binding(0) var<uniform> projection: mat4x4<f32>;
            struct Out { @builtin(position) pos: vec4<f32>, @location(0) frag_uv: vec2<f32> };
            @vertex fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) uv: vec2<f32>,
                @location(2) normal: vec3<f32>,
            ) -> Out {
                var o: Out;
                o.pos = projection * vec4<f32>(position + normal, 1.0);
                o.frag_uv = uv;
                return o;
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(vs, FIGURE_FRAGMENT_SOURCE)),
            Err(ShaderError::Link(msg)) if msg.contains("normal")
        ));
    }

    #[test]
    fn fragment_reading_projection_fails_to_link() {
        let fs = r#"
            @group(0) @binding(0) var<uniform> projection: mat4x4<f32>;
            @group(0) @binding(1) var figure_texture: texture_2d<f32>;
            @group(0) @binding(2) var figure_sampler: sampler;
            @fragment fn fs_main(@location(0) frag_uv: vec2<f32>) -> @location(0) vec4<f32> {
                let tint = projection * vec4<f32>(1.0);
                return textureSample(figure_texture, figure_sampler, frag_uv) * tint;
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, fs)),
            Err(ShaderError::Link(msg)) if msg.contains("projection")
        ));
    }

    #[test]
    fn vertex_reading_texture_fails_to_link() {
        let vs = r#"
            @group(0) @binding(0) var<uniform> projection: mat4x4<f32>;
            @group(0) @binding(1) var figure_texture: texture_2d<f32>;
            struct Out { @builtin(position) pos: vec4<f32>, @location(0) frag_uv: vec2<f32> };
            @vertex fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> Out {
                var o: Out;
                let h = textureLoad(figure_texture, vec2<i32>(0, 0), 0).r;
                o.pos = projection * vec4<f32>(position.x, position.y + h, position.z, 1.0);
                o.frag_uv = uv;
                return o;
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(vs, FIGURE_FRAGMENT_SOURCE)),
            Err(ShaderError::Link(msg)) if msg.contains("figure_texture")
        ));
    }

    #[test]
    fn colliding_bindings_fail_to_link() {
        let fs = r#"
            @group(0) @binding(0) var figure_texture: texture_2d<f32>;
            @group(0) @binding(2) var figure_sampler: sampler;
            @fragment fn fs_main(@location(0) frag_uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(figure_texture, figure_sampler, frag_uv);
            }
        "#;
        assert!(matches!(
            LinkedProgram::link(&source(FIGURE_VERTEX_SOURCE, fs)),
            Err(ShaderError::Link(_))
        ));
    }
}
