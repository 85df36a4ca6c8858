//! Emission of the generated processor header.

use fpc_analysis::{Perspective, SampleKind, SampleUsage};
use fpc_ir::SectionKind;

use crate::{banner, sections, Context};

pub(crate) fn emit(ctx: &Context) -> String {
    let module = ctx.module;
    let class = &ctx.class_name;
    let mut out = String::new();

    if let Some(comments) = &module.leading_comments {
        out.push_str(comments);
        if !comments.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(&banner(class));
    out.push_str(&format!("#ifndef {class}_DEFINED\n#define {class}_DEFINED\n"));
    out.push_str("\n#include \"include/core/SkM44.h\"\n#include \"include/core/SkTypes.h\"\n");

    out.push('\n');
    if let Some(header) = sections::text(module, SectionKind::Header) {
        out.push_str(header);
    }
    out.push('\n');
    out.push_str("#include \"src/gpu/GrFragmentProcessor.h\"\n");

    out.push_str(&format!(
        "\nclass {class} : public GrFragmentProcessor {{\npublic:\n"
    ));
    if let Some(text) = sections::text(module, SectionKind::Class) {
        out.push_str(text);
    }

    match sections::text(module, SectionKind::Make) {
        Some(make) => out.push_str(make),
        None => out.push_str(&generated_make(ctx)),
    }

    out.push_str(&format!("    {class}(const {class}& src);\n"));
    out.push_str("    std::unique_ptr<GrFragmentProcessor> clone() const override;\n");
    out.push_str(&format!(
        "    const char* name() const override {{ return \"{}\"; }}\n",
        ctx.name
    ));

    if let Some(fields) = sections::text(module, SectionKind::Fields) {
        out.push_str(fields);
    }
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.has_field()) {
        out.push_str(&format!(
            "    {} {};\n",
            binding.ctype.display(),
            binding.name
        ));
    }
    out.push_str("private:\n");

    match sections::text(module, SectionKind::Constructor) {
        Some(ctor) => out.push_str(ctor),
        None => out.push_str(&generated_constructor(ctx)),
    }

    out.push_str("    GrGLSLFragmentProcessor* onCreateGLSLInstance() const override;\n");
    out.push_str(
        "    void onGetGLSLProcessorKey(const GrShaderCaps&,GrProcessorKeyBuilder*) const override;\n",
    );
    out.push_str("    bool onIsEqual(const GrFragmentProcessor&) const override;\n");
    out.push_str("    GR_DECLARE_FRAGMENT_PROCESSOR_TEST\n");
    out.push_str("    typedef GrFragmentProcessor INHERITED;\n");
    out.push_str("};\n#endif\n");
    out
}

/// The factory and constructor share one parameter list: every
/// constructor-bound value in declaration order, then any extra
/// `@constructorParams` declarations verbatim.
fn constructor_params(ctx: &Context) -> String {
    let mut params: Vec<String> = ctx
        .analysis
        .uniforms
        .iter()
        .filter(|b| b.in_ctor)
        .map(|b| format!("{} {}", b.ctype.display(), b.name))
        .collect();
    if let Some(extra) = sections::text(ctx.module, SectionKind::ConstructorParams) {
        params.push(extra.to_string());
    }
    params.join(", ")
}

fn constructor_args(ctx: &Context) -> String {
    let mut args: Vec<String> = ctx
        .analysis
        .uniforms
        .iter()
        .filter(|b| b.in_ctor)
        .map(|b| {
            if b.is_child {
                format!("std::move({})", b.name)
            } else {
                b.name.clone()
            }
        })
        .collect();
    if let Some(extra) = sections::text(ctx.module, SectionKind::ConstructorParams) {
        args.extend(sections::param_names(extra));
    }
    args.join(", ")
}

fn generated_make(ctx: &Context) -> String {
    let class = &ctx.class_name;
    format!(
        "    static std::unique_ptr<GrFragmentProcessor> Make({}) {{\n\
         \x20       return std::unique_ptr<GrFragmentProcessor>(new {class}({}));\n\
         \x20   }}\n",
        constructor_params(ctx),
        constructor_args(ctx)
    )
}

fn generated_constructor(ctx: &Context) -> String {
    let class = &ctx.class_name;
    let mut out = format!(
        "    {class}({})\n    : INHERITED(k{class}_ClassID, kNone_OptimizationFlags)",
        constructor_params(ctx)
    );
    if let Some(init) = sections::text(ctx.module, SectionKind::Initializers) {
        out.push_str(&format!("\n    , {init}"));
    }
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.has_field()) {
        out.push_str(&format!("\n    , {0}({0})", binding.name));
    }
    out.push_str(" {\n");
    for slot in &ctx.analysis.slots {
        let name = &ctx.module.globals[slot.var].name;
        out.push_str(&format!(
            "        this->registerChild(std::move({name}), {});\n",
            sample_usage_expr(&slot.usage)
        ));
    }
    if ctx.analysis.uses_sample_coords {
        out.push_str("        this->setUsesSampleCoordsDirectly();\n");
    }
    out.push_str("    }\n");
    out
}

fn perspective_expr(perspective: &Perspective) -> String {
    match perspective {
        Perspective::Known(known) => known.to_string(),
        Perspective::Runtime(expr) => expr.clone(),
    }
}

/// Renders the `SkSL::SampleUsage` value registered for a child. The
/// shorthand factories cover the common single-mode cases; a slot that
/// also saw explicit coordinates needs the full constructor.
pub(crate) fn sample_usage_expr(usage: &SampleUsage) -> String {
    if usage.explicit_coords {
        let (kind, expr, perspective) = match &usage.kind {
            SampleKind::None | SampleKind::PassThrough => {
                ("kNone", String::new(), "false".to_string())
            }
            SampleKind::UniformMatrix {
                expression,
                perspective,
            } => ("kUniform", expression.clone(), perspective_expr(perspective)),
            SampleKind::VariableMatrix => ("kVariable", String::new(), "true".to_string()),
        };
        let pass_through = usage.kind == SampleKind::PassThrough;
        return format!(
            "SkSL::SampleUsage(SkSL::SampleUsage::Kind::{kind}, \"{expr}\", {perspective}, true, {pass_through})"
        );
    }
    match &usage.kind {
        SampleKind::None => "SkSL::SampleUsage()".to_string(),
        SampleKind::PassThrough => "SkSL::SampleUsage::PassThrough()".to_string(),
        SampleKind::UniformMatrix {
            expression,
            perspective,
        } => format!(
            "SkSL::SampleUsage::UniformMatrix(\"{expression}\", {})",
            perspective_expr(perspective)
        ),
        SampleKind::VariableMatrix => "SkSL::SampleUsage::VariableMatrix(true)".to_string(),
    }
}
