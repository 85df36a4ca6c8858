//! C++ backend for fragment-processor documents.
//!
//! [`compile`] turns an analyzed program model into the two generated
//! artifacts: a header declaring the `GrFragmentProcessor` subclass and
//! a source file with its GLSL emitter. The generated text is the
//! compiler's contract — consumers check it in and diff it — so every
//! byte of the output is deliberate.

use fpc_analysis::{Analysis, SemanticErrors};
use fpc_ir::Module;

mod cpp;
mod glsl;
mod header;
pub mod sections;

/// Emission options.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Skip `emitFunction` registration for helpers that were expanded
    /// at every call site.
    pub remove_dead_functions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remove_dead_functions: true,
        }
    }
}

/// The two generated artifacts.
#[derive(Clone, Debug)]
pub struct Artifacts {
    /// `Gr{Name}.h`.
    pub header: String,
    /// `Gr{Name}.cpp`.
    pub cpp: String,
}

/// Compilation failure.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The document has semantic errors; nothing was emitted.
    #[error("{0}")]
    Semantic(#[from] SemanticErrors),
    /// The model references arena slots that do not exist.
    #[error("malformed program model: {0}")]
    Invalid(#[from] fpc_ir::InvalidHandle),
}

pub(crate) struct Context<'a> {
    pub module: &'a Module,
    pub analysis: &'a Analysis,
    pub settings: &'a Settings,
    /// The processor name, e.g. `Test`.
    pub name: &'a str,
    /// The generated class name, e.g. `GrTest`.
    pub class_name: String,
}

/// Compiles a program model named `name` into its generated artifacts.
///
/// The model's handles are checked before anything indexes them.
/// Analysis always runs to completion; emission only happens when no
/// semantic errors were found.
pub fn compile(module: &Module, name: &str, settings: &Settings) -> Result<Artifacts, CompileError> {
    module.validate_handles()?;
    let analysis = fpc_analysis::analyze(module);
    if let Some(errors) = analysis.errors() {
        return Err(CompileError::Semantic(errors.clone()));
    }

    let ctx = Context {
        module,
        analysis: &analysis,
        settings,
        name,
        class_name: format!("Gr{name}"),
    };
    Ok(Artifacts {
        header: header::emit(&ctx),
        cpp: cpp::emit(&ctx),
    })
}

pub(crate) fn banner(class_name: &str) -> String {
    let stars = "*".repeat(98);
    format!(
        "/{stars}\n *** This file was autogenerated from {class_name}.fp; do not modify.\n {stars}/\n"
    )
}
