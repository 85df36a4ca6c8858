//! Helper-function inlining decisions and name planning.
//!
//! A straight-line, non-recursive helper with a value result can be
//! expanded at its call site instead of being emitted as a shader
//! function. The generated result and argument variable names derive
//! from a signature mangle plus the call site's source offset, so two
//! call sites of the same helper never collide and editing one call
//! cannot rename the temporaries of another.

use std::collections::HashSet;

use fpc_ir::{Expression, Function, Handle, Module, Statement};

/// Generated variable names for one inlined call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineNames {
    /// Receives the helper's return value.
    pub result: String,
    /// One per formal parameter, bound before the body.
    pub args: Vec<String>,
}

/// Decides whether a helper can be expanded at its call sites.
pub fn is_inlinable(
    module: &Module,
    handle: Handle<Function>,
    poisoned: &HashSet<Handle<Function>>,
) -> bool {
    if poisoned.contains(&handle) {
        return false;
    }
    let function = &module.functions[handle];
    let Some(result) = function.result else {
        return false;
    };
    if module.types[result].inner.is_fragment_processor() {
        return false;
    }
    if function.body.is_empty() || !function.body.iter().all(Statement::is_straight_line) {
        return false;
    }
    if !matches!(function.body.last(), Some(Statement::Return { value: Some(_) })) {
        return false;
    }
    // Self-recursion cannot be expanded.
    !function
        .expressions
        .iter()
        .any(|(_, e)| matches!(e, Expression::Call { function: f, .. } if *f == handle))
}

/// The signature mangle shared by every call site of a helper:
/// return type, name, then parameter types.
pub fn mangle(module: &Module, function: &Function) -> String {
    let mut out = String::new();
    if let Some(result) = function.result {
        out.push_str(&module.types[result].inner.sl_name());
    }
    out.push_str(&function.name);
    for parameter in &function.parameters {
        out.push_str(&module.types[parameter.ty].inner.sl_name());
    }
    out
}

/// Names the temporaries for one call site of an inlinable helper.
pub fn call_names(module: &Module, function: &Function, offset: u32) -> InlineNames {
    let mangle = mangle(module, function);
    InlineNames {
        result: format!("_inlineResult{mangle}{offset}"),
        args: (0..function.parameters.len())
            .map(|i| format!("_inlineArg{mangle}{offset}_{i}"))
            .collect(),
    }
}
