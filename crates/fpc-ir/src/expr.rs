//! Expressions of the shading-language program model.

use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::func::{Function, LocalVariable};
use crate::global::GlobalVariable;
use crate::types::Type;

/// A vector swizzle component.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SwizzleComponent {
    X = 0,
    Y = 1,
    Z = 2,
    W = 3,
}

impl SwizzleComponent {
    /// Returns the shading-language spelling of this component.
    pub fn letter(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
            Self::W => 'w',
        }
    }
}

/// A unary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// Returns the operator's spelling.
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        }
    }

    /// Binding strength, used to decide where parentheses are required.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Multiply | Self::Divide => 6,
            Self::Add | Self::Subtract => 5,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => 4,
            Self::Equal | Self::NotEqual => 3,
            Self::LogicalAnd => 2,
            Self::LogicalOr => 1,
        }
    }
}

/// The argument a child-processor sampling call was invoked with.
///
/// The front end resolves the `sample()` overload from the argument's
/// static type, so the variant is fixed by the time the model reaches us.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum SampleArg {
    /// `sample(child)` — identity sampling.
    None,
    /// `sample(child, color)` — an explicit input color expression.
    InputColor(Handle<Expression>),
    /// `sample(child, float2)` — explicit sampling coordinates.
    Coords(Handle<Expression>),
    /// `sample(child, float3x3)` — a matrix transform.
    Matrix(Handle<Expression>),
}

/// An expression in the program model.
///
/// Expressions are stored in per-function arenas and referenced by
/// [`Handle<Expression>`]. Source positions are carried only where the
/// compiler's semantics need them: sampling and call sites keep their
/// source offset (generated names derive from it), and the constructs
/// that can fail validation keep their line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Expression {
    /// A floating-point literal.
    FloatLiteral(f64),
    /// An integer literal.
    IntLiteral(i32),
    /// A boolean literal.
    BoolLiteral(bool),
    /// The `null` literal (nullable child-processor comparisons).
    Null,
    /// `sk_InColor` — the processor's input color.
    InputColor,
    /// `sk_OutColor` — the processor's output color (assignable).
    OutputColor,
    /// The fragment coordinate parameter of `main`.
    Coords,
    /// Reference to a global variable.
    Global(Handle<GlobalVariable>),
    /// Reference to a function-local variable.
    Local(Handle<LocalVariable>),
    /// Reference to a helper-function parameter by index.
    Param(u32),
    /// A capability bit read from the shader caps, e.g.
    /// `sk_Caps.externalTextureSupport`.
    CapsBit(String),
    /// A queried field on a child processor, e.g.
    /// `child.preservesOpaqueInput`.
    ChildField {
        child: Handle<GlobalVariable>,
        field: String,
    },
    /// Swizzle vector components.
    Swizzle {
        base: Handle<Expression>,
        components: Vec<SwizzleComponent>,
    },
    /// Apply a unary operator.
    Unary {
        op: UnaryOp,
        expr: Handle<Expression>,
    },
    /// Apply a binary operator.
    Binary {
        op: BinaryOp,
        left: Handle<Expression>,
        right: Handle<Expression>,
    },
    /// `cond ? accept : reject`.
    Ternary {
        condition: Handle<Expression>,
        accept: Handle<Expression>,
        reject: Handle<Expression>,
        line: u32,
    },
    /// Construct a scalar/vector/matrix from components.
    Construct {
        ty: Handle<Type>,
        args: Vec<Handle<Expression>>,
        line: u32,
    },
    /// Call a helper function.
    Call {
        function: Handle<Function>,
        arguments: Vec<Handle<Expression>>,
        offset: u32,
        line: u32,
    },
    /// Sample a child fragment processor.
    Sample {
        child: Handle<GlobalVariable>,
        arg: SampleArg,
        offset: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn binary_precedence_orders_operators() {
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::NotEqual.precedence());
        assert!(BinaryOp::LogicalAnd.precedence() > BinaryOp::LogicalOr.precedence());
    }

    #[test]
    fn swizzle_letters() {
        let pattern = [
            SwizzleComponent::W,
            SwizzleComponent::Z,
            SwizzleComponent::Y,
            SwizzleComponent::X,
        ];
        let text: String = pattern.iter().map(|c| c.letter()).collect();
        assert_eq!(text, "wzyx");
    }

    #[test]
    fn expression_arena() {
        let mut exprs = Arena::new();
        let left = exprs.append(Expression::FloatLiteral(1.0));
        let right = exprs.append(Expression::FloatLiteral(2.0));
        let add = exprs.append(Expression::Binary {
            op: BinaryOp::Add,
            left,
            right,
        });
        assert_eq!(add.index(), 2);
        if let Expression::Binary { op, .. } = exprs[add] {
            assert_eq!(op, BinaryOp::Add);
        } else {
            panic!("expected Binary");
        }
    }
}
