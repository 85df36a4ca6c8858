//! Fragment-processor type discipline.
//!
//! The `fragmentProcessor` type names a child-processor slot, not a
//! shader value, so it is only legal as a global declaration. Everything
//! else — locals, parameters, return types, construction, ternaries —
//! is rejected here. A helper whose signature breaks the rules is
//! *poisoned*: its name stops resolving, and every later call to it is
//! reported as an unknown identifier.

use std::collections::HashSet;

use fpc_ir::{Expression, Function, Handle, Module};

use crate::diag::Diagnostics;

/// Checks the fragment-processor type rules over the whole module.
///
/// Returns the set of poisoned helper functions; callers must not emit
/// code for them or for calls that reference them.
pub fn validate(module: &Module, diagnostics: &mut Diagnostics) -> HashSet<Handle<Function>> {
    let mut poisoned = HashSet::new();

    for (handle, function) in module.functions.iter() {
        let mut bad = false;
        if function
            .parameters
            .iter()
            .any(|p| module.types[p.ty].inner.is_fragment_processor())
        {
            diagnostics.error(
                function.line,
                "parameters of type 'fragmentProcessor' not allowed",
            );
            bad = true;
        }
        if let Some(result) = function.result {
            if module.types[result].inner.is_fragment_processor() {
                diagnostics.error(
                    function.line,
                    "functions may not return type 'fragmentProcessor'",
                );
                bad = true;
            }
        }
        if bad {
            poisoned.insert(handle);
        }
    }

    for (_, function) in module.functions.iter() {
        check_function(module, function, &poisoned, diagnostics);
    }
    check_function(module, &module.main, &poisoned, diagnostics);

    poisoned
}

fn check_function(
    module: &Module,
    function: &Function,
    poisoned: &HashSet<Handle<Function>>,
    diagnostics: &mut Diagnostics,
) {
    for (_, local) in function.locals.iter() {
        if module.types[local.ty].inner.is_fragment_processor() {
            diagnostics.error(
                local.line,
                "variables of type 'fragmentProcessor' must be global",
            );
        }
    }

    for (_, expression) in function.expressions.iter() {
        match expression {
            Expression::Construct { ty, line, .. }
                if module.types[*ty].inner.is_fragment_processor() =>
            {
                diagnostics.error(*line, "cannot construct 'fragmentProcessor'");
            }
            Expression::Ternary {
                accept,
                reject,
                line,
                ..
            } if is_fp_typed(module, function, *accept)
                || is_fp_typed(module, function, *reject) =>
            {
                diagnostics.error(
                    *line,
                    "ternary expression of type 'fragmentProcessor' not allowed",
                );
            }
            Expression::Call {
                function: callee,
                line,
                ..
            } if poisoned.contains(callee) => {
                diagnostics.error(
                    *line,
                    format!("unknown identifier '{}'", module.functions[*callee].name),
                );
            }
            _ => {}
        }
    }
}

/// Shallow type query: does this expression denote a fragment processor?
fn is_fp_typed(module: &Module, function: &Function, handle: Handle<Expression>) -> bool {
    match &function.expressions[handle] {
        Expression::Global(g) => module.types[module.globals[*g].ty]
            .inner
            .is_fragment_processor(),
        Expression::Local(l) => module.types[function.locals[*l].ty]
            .inner
            .is_fragment_processor(),
        Expression::Param(i) => function
            .parameters
            .get(*i as usize)
            .is_some_and(|p| module.types[p.ty].inner.is_fragment_processor()),
        Expression::Construct { ty, .. } => module.types[*ty].inner.is_fragment_processor(),
        Expression::Ternary {
            accept, reject, ..
        } => is_fp_typed(module, function, *accept) || is_fp_typed(module, function, *reject),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpc_ir::{
        Function, GlobalVariable, LocalVariable, Modifiers, Parameter, ScalarKind, Type, TypeInner,
        VectorSize,
    };

    fn fp_type(module: &mut Module) -> Handle<Type> {
        module.types.insert(Type {
            name: None,
            inner: TypeInner::FragmentProcessor { nullable: false },
        })
    }

    fn half4_type(module: &mut Module) -> Handle<Type> {
        module.types.insert(Type {
            name: None,
            inner: TypeInner::Vector {
                kind: ScalarKind::Half,
                size: VectorSize::Quad,
            },
        })
    }

    #[test]
    fn fp_local_is_rejected() {
        let mut module = Module::default();
        let fp = fp_type(&mut module);
        module.main.locals.append(LocalVariable {
            name: "child".into(),
            ty: fp,
            init: None,
            line: 2,
        });

        let mut diagnostics = Diagnostics::new();
        validate(&module, &mut diagnostics);
        let report = diagnostics.into_result().unwrap_err();
        assert_eq!(
            report.to_string(),
            "error: 2: variables of type 'fragmentProcessor' must be global\n1 error\n"
        );
    }

    #[test]
    fn fp_parameter_poisons_helper_and_call_sites() {
        let mut module = Module::default();
        let fp = fp_type(&mut module);
        let half4 = half4_type(&mut module);

        let mut helper = Function::new("process");
        helper.parameters.push(Parameter {
            name: "fp".into(),
            ty: fp,
        });
        helper.result = Some(half4);
        helper.line = 3;
        let helper = module.functions.append(helper);

        module.main.expressions.append(Expression::Call {
            function: helper,
            arguments: vec![],
            offset: 120,
            line: 5,
        });

        let mut diagnostics = Diagnostics::new();
        let poisoned = validate(&module, &mut diagnostics);
        assert!(poisoned.contains(&helper));
        let report = diagnostics.into_result().unwrap_err();
        assert_eq!(
            report.to_string(),
            "error: 3: parameters of type 'fragmentProcessor' not allowed\n\
             error: 5: unknown identifier 'process'\n\
             2 errors\n"
        );
    }

    #[test]
    fn fp_return_type_is_rejected() {
        let mut module = Module::default();
        let fp = fp_type(&mut module);
        let mut helper = Function::new("get");
        helper.result = Some(fp);
        helper.line = 4;
        module.functions.append(helper);

        let mut diagnostics = Diagnostics::new();
        validate(&module, &mut diagnostics);
        let report = diagnostics.into_result().unwrap_err();
        assert_eq!(
            report.to_string(),
            "error: 4: functions may not return type 'fragmentProcessor'\n1 error\n"
        );
    }

    #[test]
    fn fp_construction_and_ternary_are_rejected() {
        let mut module = Module::default();
        let fp = fp_type(&mut module);
        let child = module.globals.append(GlobalVariable {
            name: "child".into(),
            ty: fp,
            modifiers: Modifiers {
                is_in: true,
                ..Default::default()
            },
            init: None,
            line: 1,
        });

        module.main.expressions.append(Expression::Construct {
            ty: fp,
            args: vec![],
            line: 3,
        });
        let condition = module
            .main
            .expressions
            .append(Expression::BoolLiteral(true));
        let arm = module.main.expressions.append(Expression::Global(child));
        module.main.expressions.append(Expression::Ternary {
            condition,
            accept: arm,
            reject: arm,
            line: 4,
        });

        let mut diagnostics = Diagnostics::new();
        validate(&module, &mut diagnostics);
        let report = diagnostics.into_result().unwrap_err();
        assert_eq!(
            report.to_string(),
            "error: 3: cannot construct 'fragmentProcessor'\n\
             error: 4: ternary expression of type 'fragmentProcessor' not allowed\n\
             2 errors\n"
        );
    }

    #[test]
    fn clean_module_produces_no_diagnostics() {
        let module = Module::default();
        let mut diagnostics = Diagnostics::new();
        let poisoned = validate(&module, &mut diagnostics);
        assert!(poisoned.is_empty());
        assert!(diagnostics.is_empty());
    }
}
