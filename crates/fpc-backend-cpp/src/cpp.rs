//! Emission of the generated processor source file.

use fpc_ir::SectionKind;

use crate::{banner, glsl, sections, Context};

const INCLUDES: &[&str] = &[
    "src/core/SkUtils.h",
    "src/gpu/GrTexture.h",
    "src/gpu/glsl/GrGLSLFragmentProcessor.h",
    "src/gpu/glsl/GrGLSLFragmentShaderBuilder.h",
    "src/gpu/glsl/GrGLSLProgramBuilder.h",
    "src/sksl/SkSLCPP.h",
    "src/sksl/SkSLUtil.h",
];

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
    out.push_str(&format!("#include \"{class}.h\"\n\n"));
    for include in INCLUDES {
        out.push_str(&format!("#include \"{include}\"\n"));
    }
    if let Some(cpp) = sections::text(module, SectionKind::Cpp) {
        out.push_str(cpp);
    }

    out.push_str(&glsl_class(ctx));
    out.push_str(&out_of_line(ctx));
    out
}

fn glsl_class(ctx: &Context) -> String {
    let class = &ctx.class_name;
    let glsl_name = format!("GrGLSL{}", ctx.name);
    let mut out = format!(
        "class {glsl_name} : public GrGLSLFragmentProcessor {{\npublic:\n    {glsl_name}() {{}}\n"
    );

    out.push_str("    void emitCode(EmitArgs& args) override {\n");
    out.push_str("        GrGLSLFPFragmentBuilder* fragBuilder = args.fFragBuilder;\n");
    out.push_str(&format!(
        "        const {class}& _outer = args.fFp.cast<{class}>();\n        (void) _outer;\n"
    ));

    out.push_str(&auto_mirrors(ctx));
    out.push_str(&add_uniforms(ctx));
    if let Some(emit_code) = sections::text(ctx.module, SectionKind::EmitCode) {
        out.push_str(emit_code);
    }
    out.push_str(&helper_functions(ctx));
    out.push_str(&glsl::emit_main(ctx));
    out.push_str("    }\nprivate:\n");

    out.push_str(&set_data(ctx));

    for binding in &ctx.analysis.uniforms {
        if binding.tracked {
            out.push_str(&format!(
                "    {} {}Prev = {};\n",
                binding.ctype.display(),
                binding.name,
                binding.tracked_sentinel()
            ));
        }
    }
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.is_uniform) {
        out.push_str(&format!("    UniformHandle {}Var;\n", binding.name));
    }
    out.push_str("};\n");
    out
}

/// Host mirrors exposed at the top of `emitCode`: initialized shader
/// globals, and constructor values referenced from `when=` conditions.
fn auto_mirrors(ctx: &Context) -> String {
    let mut out = String::new();
    let when_refs: Vec<&str> = ctx
        .analysis
        .uniforms
        .iter()
        .filter_map(|b| b.when.as_deref())
        .collect();

    for (handle, global) in ctx.module.globals.iter() {
        if let Some(binding) = ctx.analysis.binding(handle) {
            if binding.in_ctor
                && !binding.is_child
                && when_refs
                    .iter()
                    .any(|w| sections::contains_ident(w, &binding.name))
            {
                out.push_str(&format!(
                    "        auto {0} = _outer.{0};\n        (void) {0};\n",
                    binding.name
                ));
            }
            continue;
        }
        if glsl::host_auto_globals(ctx)
            .iter()
            .any(|(h, _)| *h == handle)
        {
            if let Some(init) = global.init {
                out.push_str(&format!(
                    "        auto {0} = {1};\n        (void) {0};\n",
                    global.name,
                    glsl::host_expr(ctx, init)
                ));
            }
        }
    }
    out
}

fn add_uniforms(ctx: &Context) -> String {
    let mut out = String::new();
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.is_uniform) {
        let line = format!(
            "{0}Var = args.fUniformHandler->addUniform(&_outer, kFragment_GrShaderFlag, {1}, \"{0}\");",
            binding.name,
            binding.sl.grsl_name()
        );
        match &binding.when {
            Some(when) => {
                out.push_str(&format!(
                    "        if ({when}) {{\n            {line}\n        }}\n"
                ));
            }
            None => {
                out.push_str(&format!("        {line}\n"));
            }
        }
    }
    out
}

/// Shader helper functions registered through `emitFunction`. A helper
/// that was inlined at every call site is only emitted when dead code
/// is kept.
fn helper_functions(ctx: &Context) -> String {
    let mut out = String::new();
    for (handle, function) in ctx.module.functions.iter() {
        if ctx.analysis.poisoned.contains(&handle) {
            continue;
        }
        if ctx.analysis.inlinable.contains(&handle) && ctx.settings.remove_dead_functions {
            continue;
        }
        let name = &function.name;
        let result = match function.result {
            Some(result) => ctx.module.types[result].inner.grsl_name(),
            None => "kVoid_GrSLType".to_string(),
        };
        let body = glsl::helper_body(ctx, function);

        out.push_str(&format!("        SkString {name}_name;\n"));
        if function.parameters.is_empty() {
            out.push_str(&format!(
                "        fragBuilder->emitFunction({result}, \"{name}\", 0, nullptr,\n"
            ));
        } else {
            let vars: Vec<String> = function
                .parameters
                .iter()
                .map(|p| {
                    format!(
                        "GrShaderVar(\"{}\", {})",
                        p.name,
                        ctx.module.types[p.ty].inner.grsl_name()
                    )
                })
                .collect();
            out.push_str(&format!(
                "        const GrShaderVar {name}_args[] = {{ {}}};\n",
                vars.join(", ")
            ));
            out.push_str(&format!(
                "        fragBuilder->emitFunction({result}, \"{name}\", {}, {name}_args,\n",
                function.parameters.len()
            ));
        }
        out.push_str(&format!("R\"SkSL({body})SkSL\", &{name}_name);\n"));
    }
    out
}

fn set_data(ctx: &Context) -> String {
    let class = &ctx.class_name;
    let section = ctx.module.section(SectionKind::SetData);
    let pdman = section
        .and_then(|s| s.param.as_deref())
        .unwrap_or("pdman");
    let mut out = format!(
        "    void onSetData(const GrGLSLProgramDataManager& {pdman}, const GrFragmentProcessor& _proc) override {{\n"
    );

    if let Some(section) = section {
        out.push_str(&format!(
            "        const {class}& _outer = _proc.cast<{class}>();\n        {{\n"
        ));
        for binding in ctx.analysis.uniforms.iter().filter(|b| b.is_uniform) {
            out.push_str(&format!(
                "            UniformHandle& {0} = {0}Var;\n            (void) {0};\n",
                binding.name
            ));
        }
        for binding in ctx
            .analysis
            .uniforms
            .iter()
            .filter(|b| b.in_ctor && !b.is_child && !b.is_uniform)
        {
            out.push_str(&format!(
                "            auto {0} = _outer.{0};\n            (void) {0};\n",
                binding.name
            ));
        }
        // Section text may address the manager through the canonical
        // `pdman` placeholder; rebind it to the declared parameter.
        let text = sections::bind_param(&section.text, "pdman", pdman);
        out.push_str(&text);
        if !text.ends_with('\n') && !text.is_empty() {
            out.push('\n');
        }
        out.push_str("        }\n");
        out.push_str("    }\n");
        return out;
    }

    let uploads: Vec<_> = ctx
        .analysis
        .uniforms
        .iter()
        .filter(|b| b.is_uniform && b.in_ctor)
        .collect();
    if !uploads.is_empty() {
        out.push_str(&format!(
            "        const {class}& _outer = _proc.cast<{class}>();\n"
        ));
        for binding in uploads {
            let mut lines = Vec::new();
            let name = &binding.name;
            let var = format!("{name}Var");
            if binding.tracked {
                let value = format!("{name}Value");
                lines.push(format!(
                    "const {}& {value} = _outer.{name};",
                    binding.ctype.display()
                ));
                lines.push(format!(
                    "if ({}) {{",
                    binding.tracked_compare(&format!("{name}Prev"), &value)
                ));
                lines.push(format!("    {name}Prev = {value};"));
                lines.push(format!("    {}", binding.upload_stmt(&var, &value)));
                lines.push("}".to_string());
            } else if binding.upload_is_inlinable() {
                lines.push(binding.upload_stmt(&var, &format!("(_outer.{name})")));
            } else {
                let value = format!("{name}Value");
                lines.push(format!(
                    "const {}& {value} = _outer.{name};",
                    binding.ctype.display()
                ));
                lines.push(binding.upload_stmt(&var, &value));
            }
            if binding.when.is_some() {
                out.push_str(&format!("        if ({var}.isValid()) {{\n"));
                for line in &lines {
                    out.push_str(&format!("            {line}\n"));
                }
                out.push_str("        }\n");
            } else {
                for line in &lines {
                    out.push_str(&format!("        {line}\n"));
                }
            }
        }
    }
    out.push_str("    }\n");
    out
}

fn out_of_line(ctx: &Context) -> String {
    let module = ctx.module;
    let class = &ctx.class_name;
    let mut out = format!(
        "GrGLSLFragmentProcessor* {class}::onCreateGLSLInstance() const {{\n\
         \x20   return new GrGLSL{}();\n}}\n",
        ctx.name
    );

    out.push_str(&format!(
        "void {class}::onGetGLSLProcessorKey(const GrShaderCaps& caps, GrProcessorKeyBuilder* b) const {{\n"
    ));
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.key) {
        let stmts = binding.key_stmts(&binding.name);
        match &binding.when {
            Some(when) => {
                out.push_str(&format!("    if ({when}) {{\n"));
                for stmt in &stmts {
                    out.push_str(&format!("        {stmt}\n"));
                }
                out.push_str("    }\n");
            }
            None => {
                for stmt in &stmts {
                    out.push_str(&format!("    {stmt}\n"));
                }
            }
        }
    }
    out.push_str("}\n");

    out.push_str(&format!(
        "bool {class}::onIsEqual(const GrFragmentProcessor& other) const {{\n\
         \x20   const {class}& that = other.cast<{class}>();\n\
         \x20   (void) that;\n"
    ));
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.in_equality()) {
        out.push_str(&format!(
            "    if ({0} != that.{0}) return false;\n",
            binding.name
        ));
    }
    out.push_str("    return true;\n}\n");

    out.push_str(&format!(
        "{class}::{class}(const {class}& src)\n: INHERITED(k{class}_ClassID, src.optimizationFlags())"
    ));
    for binding in ctx.analysis.uniforms.iter().filter(|b| b.has_field()) {
        out.push_str(&format!("\n, {0}(src.{0})", binding.name));
    }
    out.push_str(" {\n        this->cloneAndRegisterAllChildProcessors(src);\n}\n");

    match sections::text(module, SectionKind::Clone) {
        Some(clone) => {
            out.push_str(&format!(
                "std::unique_ptr<GrFragmentProcessor> {class}::clone() const {{\n{clone}}}\n"
            ));
        }
        None => {
            out.push_str(&format!(
                "std::unique_ptr<GrFragmentProcessor> {class}::clone() const {{\n\
                 \x20   return std::make_unique<{class}>(*this);\n}}\n"
            ));
        }
    }

    if let Some(section) = module.section(SectionKind::Test) {
        let param = section.param.as_deref().unwrap_or("testData");
        let mut text = sections::bind_param(&section.text, "testData", param);
        if !text.ends_with('\n') && !text.is_empty() {
            text.push('\n');
        }
        out.push_str(&format!(
            "GR_DEFINE_FRAGMENT_PROCESSOR_TEST({class});\n\
             #if GR_TEST_UTILS\n\
             std::unique_ptr<GrFragmentProcessor> {class}::TestCreate(GrProcessorTestData* {param}) {{\n\
             {text}}}\n\
             #endif\n"
        ));
    }
    out
}
