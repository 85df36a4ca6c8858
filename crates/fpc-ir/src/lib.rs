//! Program model for fragment-processor documents.
//!
//! An arena-based typed representation of an already-parsed `.fp`
//! document: global variable declarations with their modifier sets, a
//! `main` function, optional helper functions, and named literal host-code
//! sections. The front end that produces this model is external; the
//! compiler crates consume it read-only.

pub mod arena;
mod display;
mod expr;
mod func;
mod global;
mod section;
mod stmt;
mod types;
mod valid;

pub use arena::{Arena, Handle, UniqueArena};
pub use display::{dump_module, format_float};
pub use expr::{BinaryOp, Expression, SampleArg, SwizzleComponent, UnaryOp};
pub use func::{Function, LocalVariable, Parameter};
pub use global::{GlobalVariable, Layout, Modifiers};
pub use section::{Section, SectionKind};
pub use stmt::{Block, Statement};
pub use types::{ScalarKind, Type, TypeInner, VectorSize};
pub use valid::InvalidHandle;

use serde::{Deserialize, Serialize};

/// A complete fragment-processor document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Module {
    /// Deduplicated type arena.
    pub types: UniqueArena<Type>,
    /// Module-scope variables, in declaration order.
    pub globals: Arena<GlobalVariable>,
    /// Module-scope expressions (global initializers).
    pub expressions: Arena<Expression>,
    /// User-defined helper functions.
    pub functions: Arena<Function>,
    /// The entry point.
    pub main: Function,
    /// Named literal host-code sections.
    pub sections: Vec<Section>,
    /// Comment block preceding the first declaration, replayed at the
    /// top of both generated artifacts.
    pub leading_comments: Option<String>,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            types: UniqueArena::new(),
            globals: Arena::new(),
            expressions: Arena::new(),
            functions: Arena::new(),
            main: Function::new("main"),
            sections: Vec::new(),
            leading_comments: None,
        }
    }
}

impl Module {
    /// Returns the section of the given kind, if the document declares one.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Iterates over the child-processor globals in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (Handle<GlobalVariable>, &GlobalVariable)> {
        self.globals
            .iter()
            .filter(|(_, g)| self.types[g.ty].inner.is_fragment_processor())
    }

    /// Returns the slot index of a child-processor global: its position
    /// among the fragment-processor globals, in declaration order.
    pub fn child_index(&self, handle: Handle<GlobalVariable>) -> Option<usize> {
        self.children().position(|(h, _)| h == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_indices_follow_declaration_order() {
        let mut module = Module::default();
        let fp = module.types.insert(Type {
            name: None,
            inner: TypeInner::FragmentProcessor { nullable: false },
        });
        let half = module.types.insert(Type {
            name: None,
            inner: TypeInner::Scalar(ScalarKind::Half),
        });
        let c1 = module.globals.append(GlobalVariable {
            name: "child1".into(),
            ty: fp,
            modifiers: Modifiers {
                is_in: true,
                ..Default::default()
            },
            init: None,
            line: 2,
        });
        module.globals.append(GlobalVariable {
            name: "x".into(),
            ty: half,
            modifiers: Modifiers::default(),
            init: None,
            line: 3,
        });
        let c2 = module.globals.append(GlobalVariable {
            name: "child2".into(),
            ty: fp,
            modifiers: Modifiers {
                is_in: true,
                ..Default::default()
            },
            init: None,
            line: 4,
        });
        assert_eq!(module.child_index(c1), Some(0));
        assert_eq!(module.child_index(c2), Some(1));
        assert_eq!(module.children().count(), 2);
    }

    #[test]
    fn section_lookup() {
        let mut module = Module::default();
        module.sections.push(Section {
            kind: SectionKind::Header,
            param: None,
            text: " header section ".into(),
            line: 1,
        });
        assert!(module.section(SectionKind::Header).is_some());
        assert!(module.section(SectionKind::Cpp).is_none());
    }

    #[test]
    fn module_roundtrips_through_json() {
        let module = Module::default();
        let json = serde_json::to_string(&module).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert!(back.globals.is_empty());
        assert_eq!(back.main.name, "main");
    }
}
