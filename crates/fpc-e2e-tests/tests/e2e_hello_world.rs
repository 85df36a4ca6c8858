//! Full-text checks of the generated artifacts for a minimal document.

mod common;

use common::Fp;
use pretty_assertions::assert_eq;

fn banner() -> String {
    let stars = "*".repeat(98);
    format!(
        "/{stars}\n *** This file was autogenerated from GrTest.fp; do not modify.\n {stars}/\n"
    )
}

/// `void main() { sk_OutColor = half4(1.0); }`
fn hello_world() -> Fp {
    let mut fp = Fp::new();
    fp.out_splat(1.0);
    fp
}

#[test]
fn header_text() {
    let artifacts = hello_world().compile("Test");
    let expected = format!(
        r#"{banner}#ifndef GrTest_DEFINED
#define GrTest_DEFINED

#include "include/core/SkM44.h"
#include "include/core/SkTypes.h"


#include "src/gpu/GrFragmentProcessor.h"

class GrTest : public GrFragmentProcessor {{
public:
    static std::unique_ptr<GrFragmentProcessor> Make() {{
        return std::unique_ptr<GrFragmentProcessor>(new GrTest());
    }}
    GrTest(const GrTest& src);
    std::unique_ptr<GrFragmentProcessor> clone() const override;
    const char* name() const override {{ return "Test"; }}
private:
    GrTest()
    : INHERITED(kGrTest_ClassID, kNone_OptimizationFlags) {{
    }}
    GrGLSLFragmentProcessor* onCreateGLSLInstance() const override;
    void onGetGLSLProcessorKey(const GrShaderCaps&,GrProcessorKeyBuilder*) const override;
    bool onIsEqual(const GrFragmentProcessor&) const override;
    GR_DECLARE_FRAGMENT_PROCESSOR_TEST
    typedef GrFragmentProcessor INHERITED;
}};
#endif
"#,
        banner = banner()
    );
    assert_eq!(artifacts.header, expected);
}

#[test]
fn cpp_text() {
    let artifacts = hello_world().compile("Test");
    let expected = format!(
        r#"{banner}#include "GrTest.h"

#include "src/core/SkUtils.h"
#include "src/gpu/GrTexture.h"
#include "src/gpu/glsl/GrGLSLFragmentProcessor.h"
#include "src/gpu/glsl/GrGLSLFragmentShaderBuilder.h"
#include "src/gpu/glsl/GrGLSLProgramBuilder.h"
#include "src/sksl/SkSLCPP.h"
#include "src/sksl/SkSLUtil.h"
class GrGLSLTest : public GrGLSLFragmentProcessor {{
public:
    GrGLSLTest() {{}}
    void emitCode(EmitArgs& args) override {{
        GrGLSLFPFragmentBuilder* fragBuilder = args.fFragBuilder;
        const GrTest& _outer = args.fFp.cast<GrTest>();
        (void) _outer;
        fragBuilder->codeAppendf(
R"SkSL(%s = half4(1.0);
)SkSL"
, args.fOutputColor);
    }}
private:
    void onSetData(const GrGLSLProgramDataManager& pdman, const GrFragmentProcessor& _proc) override {{
    }}
}};
GrGLSLFragmentProcessor* GrTest::onCreateGLSLInstance() const {{
    return new GrGLSLTest();
}}
void GrTest::onGetGLSLProcessorKey(const GrShaderCaps& caps, GrProcessorKeyBuilder* b) const {{
}}
bool GrTest::onIsEqual(const GrFragmentProcessor& other) const {{
    const GrTest& that = other.cast<GrTest>();
    (void) that;
    return true;
}}
GrTest::GrTest(const GrTest& src)
: INHERITED(kGrTest_ClassID, src.optimizationFlags()) {{
        this->cloneAndRegisterAllChildProcessors(src);
}}
std::unique_ptr<GrFragmentProcessor> GrTest::clone() const {{
    return std::make_unique<GrTest>(*this);
}}
"#,
        banner = banner()
    );
    assert_eq!(artifacts.cpp, expected);
}

#[test]
fn leading_comments_are_replayed_in_both_artifacts() {
    let mut fp = hello_world();
    fp.module.leading_comments = Some("/* first line\n * second line\n */".into());
    let artifacts = fp.compile("Test");
    // A blank line separates the replayed comments from the banner.
    assert!(artifacts
        .header
        .starts_with("/* first line\n * second line\n */\n\n/"));
    assert!(artifacts
        .cpp
        .starts_with("/* first line\n * second line\n */\n\n/"));
}

#[test]
fn integral_float_literals_keep_their_point() {
    let mut fp = Fp::new();
    fp.out_splat(2.0);
    let artifacts = fp.compile("Test");
    assert!(artifacts.cpp.contains("%s = half4(2.0);"));
}

#[test]
fn model_survives_json_interchange() {
    let fp = hello_world();
    let json = serde_json::to_string(&fp.module).expect("serialize failed");
    let module: fpc_ir::Module = serde_json::from_str(&json).expect("deserialize failed");
    let direct = fp.compile("Test");
    let roundtripped =
        fpc_backend_cpp::compile(&module, "Test", &fpc_backend_cpp::Settings::default())
            .expect("compilation failed");
    assert_eq!(direct.header, roundtripped.header);
    assert_eq!(direct.cpp, roundtripped.cpp);
}
