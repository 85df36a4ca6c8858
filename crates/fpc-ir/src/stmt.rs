//! Statements of the shading-language program model.

use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::expr::{BinaryOp, Expression};
use crate::func::LocalVariable;

/// A block of statements.
pub type Block = Vec<Statement>;

/// A statement in a function body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Statement {
    /// Evaluate an expression for its effect (e.g. a bare `sample` call).
    Expression(Handle<Expression>),
    /// Declare a local variable; the initializer lives on the
    /// [`LocalVariable`] itself.
    VarDecl(Handle<LocalVariable>),
    /// `lhs = rhs`, or `lhs op= rhs` when `op` is present.
    Assign {
        lhs: Handle<Expression>,
        op: Option<BinaryOp>,
        rhs: Handle<Expression>,
    },
    /// Conditional branch.
    If {
        condition: Handle<Expression>,
        accept: Block,
        reject: Block,
    },
    /// Return from the function.
    Return { value: Option<Handle<Expression>> },
}

impl Statement {
    /// Returns `true` if this statement carries no control flow, i.e. it
    /// can appear in the body of an inlinable helper.
    pub fn is_straight_line(&self) -> bool {
        matches!(
            self,
            Self::Expression(_) | Self::VarDecl(_) | Self::Assign { .. } | Self::Return { .. }
        )
    }
}
