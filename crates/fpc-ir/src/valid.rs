//! Structural checks on deserialized modules.
//!
//! Handles arrive through serde as bare indices; every later pass
//! indexes the arenas directly. A module is checked once up front so a
//! dangling handle becomes an error instead of a panic.

use thiserror::Error;

use crate::arena::{Arena, Handle};
use crate::{Expression, Function, Module, SampleArg, Statement};

/// A handle stored in the module points outside its arena.
#[derive(Clone, Debug, Error)]
#[error("dangling {kind} handle in {context}")]
pub struct InvalidHandle {
    /// What the handle was supposed to reference.
    pub kind: &'static str,
    /// Where the handle was found.
    pub context: String,
}

impl InvalidHandle {
    fn new(kind: &'static str, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }
}

impl Module {
    /// Checks every handle in the module against its arena.
    pub fn validate_handles(&self) -> Result<(), InvalidHandle> {
        for (_, global) in self.globals.iter() {
            let context = format!("global '{}'", global.name);
            if self.types.try_get(global.ty).is_none() {
                return Err(InvalidHandle::new("type", context));
            }
            if let Some(init) = global.init {
                if self.expressions.try_get(init).is_none() {
                    return Err(InvalidHandle::new("expression", context));
                }
            }
        }
        for (_, expression) in self.expressions.iter() {
            self.check_expr(expression, &self.expressions, None, "module")?;
        }
        for (_, function) in self.functions.iter() {
            self.check_function(function)?;
        }
        self.check_function(&self.main)
    }

    fn check_function(&self, function: &Function) -> Result<(), InvalidHandle> {
        let context = function.name.as_str();
        for parameter in &function.parameters {
            if self.types.try_get(parameter.ty).is_none() {
                return Err(InvalidHandle::new("type", context));
            }
        }
        if let Some(result) = function.result {
            if self.types.try_get(result).is_none() {
                return Err(InvalidHandle::new("type", context));
            }
        }
        for (_, local) in function.locals.iter() {
            if self.types.try_get(local.ty).is_none() {
                return Err(InvalidHandle::new("type", context));
            }
            if let Some(init) = local.init {
                if function.expressions.try_get(init).is_none() {
                    return Err(InvalidHandle::new("expression", context));
                }
            }
        }
        for (_, expression) in function.expressions.iter() {
            self.check_expr(expression, &function.expressions, Some(function), context)?;
        }
        self.check_block(&function.body, function, context)
    }

    fn check_block(
        &self,
        block: &[Statement],
        function: &Function,
        context: &str,
    ) -> Result<(), InvalidHandle> {
        let expr = |h: Handle<Expression>| {
            if function.expressions.try_get(h).is_none() {
                Err(InvalidHandle::new("expression", context))
            } else {
                Ok(())
            }
        };
        for statement in block {
            match statement {
                Statement::Expression(e) => expr(*e)?,
                Statement::VarDecl(l) => {
                    if function.locals.try_get(*l).is_none() {
                        return Err(InvalidHandle::new("local", context));
                    }
                }
                Statement::Assign { lhs, rhs, .. } => {
                    expr(*lhs)?;
                    expr(*rhs)?;
                }
                Statement::Return { value } => {
                    if let Some(value) = value {
                        expr(*value)?;
                    }
                }
                Statement::If {
                    condition,
                    accept,
                    reject,
                } => {
                    expr(*condition)?;
                    self.check_block(accept, function, context)?;
                    self.check_block(reject, function, context)?;
                }
            }
        }
        Ok(())
    }

    /// Checks one expression's stored handles. Sub-expressions only
    /// need to be in range here; their own contents are covered by the
    /// caller's sweep over the whole arena.
    fn check_expr(
        &self,
        expression: &Expression,
        exprs: &Arena<Expression>,
        function: Option<&Function>,
        context: &str,
    ) -> Result<(), InvalidHandle> {
        let expr = |h: Handle<Expression>| {
            if exprs.try_get(h).is_none() {
                Err(InvalidHandle::new("expression", context))
            } else {
                Ok(())
            }
        };
        let global = |h| {
            if self.globals.try_get(h).is_none() {
                Err(InvalidHandle::new("global", context))
            } else {
                Ok(())
            }
        };
        match expression {
            Expression::Global(g) => global(*g)?,
            Expression::ChildField { child, .. } => global(*child)?,
            Expression::Local(l) => {
                let ok = function.is_some_and(|f| f.locals.try_get(*l).is_some());
                if !ok {
                    return Err(InvalidHandle::new("local", context));
                }
            }
            Expression::Swizzle { base, .. } => expr(*base)?,
            Expression::Unary { expr: e, .. } => expr(*e)?,
            Expression::Binary { left, right, .. } => {
                expr(*left)?;
                expr(*right)?;
            }
            Expression::Ternary {
                condition,
                accept,
                reject,
                ..
            } => {
                expr(*condition)?;
                expr(*accept)?;
                expr(*reject)?;
            }
            Expression::Construct { ty, args, .. } => {
                if self.types.try_get(*ty).is_none() {
                    return Err(InvalidHandle::new("type", context));
                }
                for &arg in args {
                    expr(arg)?;
                }
            }
            Expression::Call {
                function: callee,
                arguments,
                ..
            } => {
                if self.functions.try_get(*callee).is_none() {
                    return Err(InvalidHandle::new("function", context));
                }
                for &arg in arguments {
                    expr(arg)?;
                }
            }
            Expression::Sample { child, arg, .. } => {
                global(*child)?;
                match arg {
                    SampleArg::InputColor(e) | SampleArg::Coords(e) | SampleArg::Matrix(e) => {
                        expr(*e)?
                    }
                    SampleArg::None => {}
                }
            }
            _ => {}
        }
        Ok(())
    }
}
