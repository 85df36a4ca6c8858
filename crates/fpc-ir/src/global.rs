//! Global variables and their modifier sets.

use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::expr::Expression;
use crate::types::Type;

/// `layout(...)` qualifiers on a global declaration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Layout {
    /// `layout(key)` — the value contributes to the processor key.
    pub key: bool,
    /// `layout(tracked)` — uniform uploads are deduplicated against a
    /// shadow copy of the previous value.
    pub tracked: bool,
    /// `layout(ctype=T)` — overrides the inferred host storage type.
    pub ctype: Option<String>,
    /// `layout(when=expr)` — the uniform exists only when the host
    /// expression evaluates true.
    pub when: Option<String>,
}

/// Modifier set on a global declaration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Declared `uniform`.
    pub uniform: bool,
    /// Declared `in` — the value arrives through the constructor.
    pub is_in: bool,
    /// `layout(...)` qualifiers.
    pub layout: Layout,
}

/// A module-scope variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub ty: Handle<Type>,
    pub modifiers: Modifiers,
    /// Optional initializer, stored in the module's expression arena.
    pub init: Option<Handle<Expression>>,
    /// 1-based source line of the declaration.
    pub line: u32,
}
