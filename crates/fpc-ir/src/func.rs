//! Functions and local variables.

use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Handle};
use crate::expr::Expression;
use crate::stmt::Block;
use crate::types::Type;

/// A helper-function parameter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Handle<Type>,
}

/// A function-local variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub ty: Handle<Type>,
    /// Optional initializer, stored in the owning function's arena.
    pub init: Option<Handle<Expression>>,
    /// 1-based source line of the declaration.
    pub line: u32,
}

/// A function of the program: `main` or a user-defined helper.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Formal parameters (empty for `main` unless it takes the fragment
    /// coordinate, which is modeled by [`Function::has_coords_param`]).
    pub parameters: Vec<Parameter>,
    /// Return type; `None` means `void`.
    pub result: Option<Handle<Type>>,
    /// Whether `main` was declared as `main(float2 coord)`.
    pub has_coords_param: bool,
    /// Local variable declarations.
    pub locals: Arena<LocalVariable>,
    /// Expression arena for this function.
    pub expressions: Arena<Expression>,
    /// The function body.
    pub body: Block,
    /// 1-based source line of the declaration.
    pub line: u32,
}

impl Function {
    /// Creates an empty function with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result: None,
            has_coords_param: false,
            locals: Arena::new(),
            expressions: Arena::new(),
            body: Vec::new(),
            line: 1,
        }
    }
}
