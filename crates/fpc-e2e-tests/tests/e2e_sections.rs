//! Literal host-code sections spliced into the generated artifacts.

mod common;

use common::Fp;
use fpc_ir::{Expression, Modifiers, ScalarKind, SectionKind, TypeInner};

#[test]
fn passive_sections_land_in_their_slots() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(
        SectionKind::Header,
        "#include \"GrClampFragmentProcessor.h\"\n",
    );
    fp.section(SectionKind::Cpp, "static constexpr float kTolerance = 0.5f;\n");
    fp.section(
        SectionKind::Class,
        "    bool usesLocalCoords() const { return true; }\n",
    );
    fp.section(SectionKind::Fields, "    SkPMColor4f fColor;\n");
    fp.section(
        SectionKind::EmitCode,
        "        fragBuilder->codeAppend(\"float prologue;\");\n",
    );

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains(
        "#include \"include/core/SkTypes.h\"\n\
         \n\
         #include \"GrClampFragmentProcessor.h\"\n\
         \n\
         #include \"src/gpu/GrFragmentProcessor.h\"\n"
    ));
    assert!(artifacts
        .header
        .contains("public:\n    bool usesLocalCoords() const { return true; }\n"));
    assert!(artifacts
        .header
        .contains("    SkPMColor4f fColor;\nprivate:\n"));

    assert!(artifacts.cpp.contains(
        "#include \"src/sksl/SkSLUtil.h\"\n\
         static constexpr float kTolerance = 0.5f;\n\
         class GrGLSLTest : public GrGLSLFragmentProcessor {"
    ));
    assert!(artifacts.cpp.contains(
        "        (void) _outer;\n        fragBuilder->codeAppend(\"float prologue;\");\n"
    ));
}

#[test]
fn constructor_params_extend_make_and_the_constructor() {
    let mut fp = Fp::new();
    fp.child("child");
    fp.section(SectionKind::ConstructorParams, "float extraArg");
    fp.out_splat(1.0);

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains(
        "Make(std::unique_ptr<GrFragmentProcessor> child, float extraArg) {"
    ));
    assert!(artifacts
        .header
        .contains("new GrTest(std::move(child), extraArg));"));
    assert!(artifacts
        .header
        .contains("    GrTest(std::unique_ptr<GrFragmentProcessor> child, float extraArg)\n"));
    assert!(artifacts
        .header
        .contains("        this->registerChild(std::move(child), SkSL::SampleUsage());\n"));
}

#[test]
fn constructor_params_splice_verbatim() {
    let mut fp = Fp::new();
    let float_ty = fp.ty(TypeInner::Scalar(ScalarKind::Float));
    fp.global(
        "w",
        float_ty,
        Modifiers {
            is_in: true,
            ..Default::default()
        },
    );
    fp.section(
        SectionKind::ConstructorParams,
        " int x, float y, std::vector<float> z ",
    );
    fp.out_splat(1.0);

    let artifacts = fp.compile("Test");
    // The extra declarations keep their embedded whitespace, and the
    // unread `in` value still travels through the constructor.
    assert!(artifacts
        .header
        .contains("Make(float w,  int x, float y, std::vector<float> z ) {"));
    assert!(artifacts.header.contains("new GrTest(w, x, y, z));"));
    assert!(artifacts.header.contains("    , w(w) {\n"));
    assert!(artifacts.header.contains("    float w;\n"));
}

#[test]
fn fields_section_splices_without_an_added_newline() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(SectionKind::Fields, " fields section ");

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains(" fields section private:\n"));
}

#[test]
fn emit_code_section_can_read_a_global_mirror() {
    let mut fp = Fp::new();
    let half = fp.half();
    let x = fp.global("x", half, Modifiers::default());
    let ten = fp.module.expressions.append(Expression::FloatLiteral(10.0));
    fp.module.globals[x].init = Some(ten);
    fp.section(
        SectionKind::EmitCode,
        "        fragBuilder->codeAppendf(\"half y = %f;\", x * 2);\n",
    );
    fp.out_splat(1.0);

    let artifacts = fp.compile("Test");
    assert!(artifacts
        .cpp
        .contains("        auto x = 10.0;\n        (void) x;\n"));
    let mirror = artifacts.cpp.find("auto x = 10.0;").unwrap();
    let section = artifacts.cpp.find("half y = %f").unwrap();
    assert!(mirror < section);
}

#[test]
fn make_and_constructor_sections_replace_the_generated_forms() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(
        SectionKind::Make,
        "    static std::unique_ptr<GrFragmentProcessor> Make() {\n\
         \x20       return nullptr;\n\
         \x20   }\n",
    );
    fp.section(
        SectionKind::Constructor,
        "    GrTest() : INHERITED(kGrTest_ClassID, kNone_OptimizationFlags) {}\n",
    );

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains("        return nullptr;\n"));
    assert!(artifacts
        .header
        .contains("    GrTest() : INHERITED(kGrTest_ClassID, kNone_OptimizationFlags) {}\n"));
    assert!(!artifacts.header.contains("new GrTest("));
}

#[test]
fn initializers_follow_the_inherited_call() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(SectionKind::Initializers, "fColor(SK_PMColor4fWHITE)");

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains(
        "    : INHERITED(kGrTest_ClassID, kNone_OptimizationFlags)\n\
         \x20   , fColor(SK_PMColor4fWHITE) {\n"
    ));
}

#[test]
fn initializers_splice_verbatim() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(SectionKind::Initializers, " initializers section");

    let artifacts = fp.compile("Test");
    assert!(artifacts.header.contains(
        "    : INHERITED(kGrTest_ClassID, kNone_OptimizationFlags)\n\
         \x20   ,  initializers section {\n"
    ));
}

#[test]
fn custom_set_data_exposes_handles_and_constructor_values() {
    let mut fp = Fp::new();
    let half = fp.half();
    fp.global(
        "value",
        half,
        Modifiers {
            is_in: true,
            ..Default::default()
        },
    );
    fp.global(
        "scale",
        half,
        Modifiers {
            uniform: true,
            ..Default::default()
        },
    );
    fp.section_with_param(
        SectionKind::SetData,
        "data",
        "            data.set1f(scale, _outer.value);\n",
    );
    fp.out_splat(1.0);

    let artifacts = fp.compile("Test");
    assert!(artifacts.cpp.contains(
        "    void onSetData(const GrGLSLProgramDataManager& data, const GrFragmentProcessor& _proc) override {\n\
         \x20       const GrTest& _outer = _proc.cast<GrTest>();\n\
         \x20       {\n\
         \x20           UniformHandle& scale = scaleVar;\n\
         \x20           (void) scale;\n\
         \x20           auto value = _outer.value;\n\
         \x20           (void) value;\n\
         \x20           data.set1f(scale, _outer.value);\n\
         \x20       }\n\
         \x20   }\n"
    ));
    // The bare `in` variable is legitimized by the custom section and
    // still travels through the constructor.
    assert!(artifacts.header.contains("Make(float value)"));
    assert!(artifacts.header.contains("    float value;\n"));
}

#[test]
fn set_data_placeholder_is_rebound_to_the_declared_parameter() {
    let mut fp = Fp::new();
    let half = fp.half();
    fp.global(
        "scale",
        half,
        Modifiers {
            uniform: true,
            ..Default::default()
        },
    );
    fp.section_with_param(
        SectionKind::SetData,
        "data",
        "            pdman.set1f(scale, 2.0f);\n",
    );
    fp.out_splat(1.0);

    let artifacts = fp.compile("Test");
    assert!(artifacts
        .cpp
        .contains("            data.set1f(scale, 2.0f);\n"));
    assert!(!artifacts.cpp.contains("pdman.set1f"));
}

#[test]
fn clone_section_replaces_the_generated_body() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section(SectionKind::Clone, "    return Make();\n");

    let artifacts = fp.compile("Test");
    assert!(artifacts.cpp.contains(
        "std::unique_ptr<GrFragmentProcessor> GrTest::clone() const {\n    return Make();\n}\n"
    ));
    assert!(!artifacts.cpp.contains("std::make_unique<GrTest>"));
}

#[test]
fn test_section_emits_the_guarded_factory() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp.section_with_param(SectionKind::Test, "d", "    return GrTest::Make();\n");

    let artifacts = fp.compile("Test");
    assert!(artifacts.cpp.ends_with(
        "GR_DEFINE_FRAGMENT_PROCESSOR_TEST(GrTest);\n\
         #if GR_TEST_UTILS\n\
         std::unique_ptr<GrFragmentProcessor> GrTest::TestCreate(GrProcessorTestData* d) {\n\
         \x20   return GrTest::Make();\n\
         }\n\
         #endif\n"
    ));
}

#[test]
fn test_factory_is_absent_without_the_section() {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    let artifacts = fp.compile("Test");
    assert!(!artifacts.cpp.contains("GR_DEFINE_FRAGMENT_PROCESSOR_TEST"));
    assert!(!artifacts.cpp.contains("GR_TEST_UTILS"));
}
