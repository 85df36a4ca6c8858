//! Semantic analysis over a fragment-processor program model.
//!
//! [`analyze`] runs every check and planning pass in one sweep and
//! never stops early: a document with five problems reports all five.
//! The resulting [`Analysis`] carries everything emission needs — the
//! uniform plan, the per-child sampling summary, inlining decisions —
//! plus the accumulated diagnostics that gate whether emission may run
//! at all.

pub mod diag;
pub mod inline;
pub mod samples;
pub mod uniforms;
pub mod validate;

use std::collections::HashSet;

use fpc_ir::{Expression, Function, GlobalVariable, Handle, Module};

pub use diag::{Diagnostic, Diagnostics, SemanticErrors};
pub use samples::{ChildSlot, MatrixClass, Perspective, SampleKind, SampleSite, SampleUsage, SiteKind};
pub use uniforms::{CType, UniformBinding};

/// Everything analysis learned about one module.
#[derive(Debug)]
pub struct Analysis {
    /// Binding plan for `in`/`uniform` globals, in declaration order.
    pub uniforms: Vec<UniformBinding>,
    /// Every `sample(...)` call site in `main`.
    pub sites: Vec<SampleSite>,
    /// One slot per child processor, with folded usage.
    pub slots: Vec<ChildSlot>,
    /// Helpers whose signatures broke the fragment-processor rules.
    pub poisoned: HashSet<Handle<Function>>,
    /// Helpers that can be expanded at their call sites.
    pub inlinable: HashSet<Handle<Function>>,
    /// `main` reads its fragment-coordinate parameter.
    pub uses_sample_coords: bool,
    errors: Option<SemanticErrors>,
}

impl Analysis {
    /// The semantic errors found, if any. Emission must not run while
    /// this is `Some`.
    pub fn errors(&self) -> Option<&SemanticErrors> {
        self.errors.as_ref()
    }

    /// Looks up the binding for a global, if it has one.
    pub fn binding(&self, var: Handle<GlobalVariable>) -> Option<&UniformBinding> {
        self.uniforms.iter().find(|b| b.var == var)
    }

    /// Looks up the slot of a child-processor global.
    pub fn slot(&self, var: Handle<GlobalVariable>) -> Option<&ChildSlot> {
        self.slots.iter().find(|s| s.var == var)
    }

    /// Looks up the classification of a sample call site.
    pub fn site(&self, expr: Handle<Expression>) -> Option<&SampleSite> {
        self.sites.iter().find(|s| s.expr == expr)
    }
}

/// Runs every analysis pass over the module.
pub fn analyze(module: &Module) -> Analysis {
    let mut diagnostics = Diagnostics::new();

    let poisoned = validate::validate(module, &mut diagnostics);
    let uniforms = uniforms::plan(module, &mut diagnostics);
    let (sites, slots) = samples::classify(module);

    let inlinable = module
        .functions
        .iter()
        .map(|(handle, _)| handle)
        .filter(|&handle| inline::is_inlinable(module, handle, &poisoned))
        .collect();

    let uses_sample_coords = module
        .main
        .expressions
        .iter()
        .any(|(_, e)| matches!(e, Expression::Coords));

    Analysis {
        uniforms,
        sites,
        slots,
        poisoned,
        inlinable,
        uses_sample_coords,
        errors: diagnostics.into_result().err(),
    }
}
