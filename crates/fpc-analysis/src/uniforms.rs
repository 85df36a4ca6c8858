//! Uniform and constructor-parameter planning.
//!
//! Every `in` or `uniform` global becomes a [`UniformBinding`] that
//! records how the value travels from the host: whether it arrives
//! through the constructor, whether a shader uniform is declared for
//! it, which C++ storage type holds it, and how uploads are rendered.

use fpc_ir::{Expression, GlobalVariable, Handle, Module, ScalarKind, SectionKind, TypeInner};

use crate::diag::Diagnostics;

/// The C++ storage type backing an `in`/`uniform` variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CType {
    SkRect,
    SkPoint,
    SkMatrix,
    SkM44,
    Float,
    Int32,
    Bool,
    /// A child-processor slot.
    ChildProcessor,
    /// A `layout(ctype=...)` override.
    Custom(String),
}

impl CType {
    /// C++ spelling, as written in field and parameter declarations.
    pub fn display(&self) -> &str {
        match self {
            Self::SkRect => "SkRect",
            Self::SkPoint => "SkPoint",
            Self::SkMatrix => "SkMatrix",
            Self::SkM44 => "SkM44",
            Self::Float => "float",
            Self::Int32 => "int32_t",
            Self::Bool => "bool",
            Self::ChildProcessor => "std::unique_ptr<GrFragmentProcessor>",
            Self::Custom(name) => name,
        }
    }

    fn resolve(sl: &TypeInner, override_name: Option<&str>) -> Self {
        if let Some(name) = override_name {
            return Self::Custom(name.to_string());
        }
        match *sl {
            TypeInner::Scalar(ScalarKind::Half | ScalarKind::Float) => Self::Float,
            TypeInner::Scalar(ScalarKind::Bool) => Self::Bool,
            TypeInner::Scalar(ScalarKind::Int) => Self::Int32,
            TypeInner::Vector { size, .. } => match size.count() {
                2 => Self::SkPoint,
                3 => Self::Custom("SkPoint3".to_string()),
                _ => Self::SkRect,
            },
            TypeInner::Matrix { columns, .. } => match columns.count() {
                4 => Self::SkM44,
                _ => Self::SkMatrix,
            },
            TypeInner::FragmentProcessor { .. } => Self::ChildProcessor,
        }
    }
}

/// How one `in`/`uniform` global is wired between host and shader.
#[derive(Clone, Debug)]
pub struct UniformBinding {
    pub var: Handle<GlobalVariable>,
    pub name: String,
    /// The shading-language type, kept for GrSL tokens and key layout.
    pub sl: TypeInner,
    pub ctype: CType,
    /// A shader uniform is declared and uploaded.
    pub is_uniform: bool,
    /// The value arrives through the constructor.
    pub in_ctor: bool,
    /// A child-processor slot rather than a data value.
    pub is_child: bool,
    /// Contributes to the processor key.
    pub key: bool,
    /// Uploads are skipped when the value has not changed.
    pub tracked: bool,
    /// Host condition guarding the uniform's existence.
    pub when: Option<String>,
}

impl UniformBinding {
    /// Whether the generated class stores this value in a field.
    /// Children are registered, not stored, so they get none.
    pub fn has_field(&self) -> bool {
        self.in_ctor && !self.is_child
    }

    /// Whether `onIsEqual` compares this value.
    pub fn in_equality(&self) -> bool {
        self.in_ctor && !self.is_child
    }

    /// Whether the upload can read `_outer` directly, without staging
    /// the value in a named local first.
    pub fn upload_is_inlinable(&self) -> bool {
        !matches!(self.ctype, CType::SkPoint)
    }

    /// Renders the `pdman` upload statement for this uniform.
    ///
    /// `var` is the C++ uniform-handle expression and `value` the C++
    /// value expression (already parenthesized where the caller needs
    /// to take its address).
    pub fn upload_stmt(&self, var: &str, value: &str) -> String {
        match &self.ctype {
            CType::SkRect => {
                format!("pdman.set4fv({var}, 1, reinterpret_cast<const float*>(&{value}));")
            }
            CType::SkPoint => format!("pdman.set2f({var}, {value}.fX, {value}.fY);"),
            CType::SkMatrix => format!("pdman.setSkMatrix({var}, {value});"),
            CType::SkM44 => format!("pdman.setSkM44({var}, {value});"),
            CType::Float => format!("pdman.set1f({var}, {value});"),
            CType::Int32 => format!("pdman.set1i({var}, {value});"),
            CType::Bool => format!("pdman.set1i({var}, {value} ? 1 : 0);"),
            CType::Custom(name) if name == "SkPMColor4f" => {
                format!("pdman.set4fv({var}, 1, {value}.vec());")
            }
            CType::ChildProcessor => String::new(),
            CType::Custom(_) => {
                let count = component_count(&self.sl);
                format!("pdman.set{count}fv({var}, 1, reinterpret_cast<const float*>(&{value}));")
            }
        }
    }

    /// The never-matches initial value of a tracked uniform's shadow copy.
    pub fn tracked_sentinel(&self) -> String {
        match &self.ctype {
            CType::SkRect => "SkRect::MakeEmpty()".to_string(),
            CType::SkPoint => "SkPoint::Make(SK_FloatNaN, SK_FloatNaN)".to_string(),
            CType::SkMatrix => "SkMatrix::InvalidMatrix()".to_string(),
            CType::SkM44 => "SkM44(SkM44::kNaN_Constructor)".to_string(),
            CType::Float => "SK_FloatNaN".to_string(),
            CType::Int32 => "SK_MaxS32".to_string(),
            CType::Bool => "false".to_string(),
            CType::Custom(name) if name == "SkPMColor4f" => {
                "{SK_FloatNaN, SK_FloatNaN, SK_FloatNaN, SK_FloatNaN}".to_string()
            }
            CType::ChildProcessor | CType::Custom(_) => "{}".to_string(),
        }
    }

    /// The "value changed" test guarding a tracked upload.
    pub fn tracked_compare(&self, prev: &str, value: &str) -> String {
        match self.ctype {
            // An empty rect never matches a meaningful value, and the
            // sentinel is itself empty.
            CType::SkRect => format!("{prev}.isEmpty() || {prev} != {value}"),
            _ => format!("{prev} != {value}"),
        }
    }

    /// Renders the `b->add32(...)` statements hashing this value into
    /// the processor key.
    pub fn key_stmts(&self, value: &str) -> Vec<String> {
        match &self.sl {
            TypeInner::Scalar(ScalarKind::Half | ScalarKind::Float) => {
                vec![format!("b->add32(sk_bit_cast<uint32_t>({value}));")]
            }
            TypeInner::Scalar(ScalarKind::Bool | ScalarKind::Int) => {
                vec![format!("b->add32((uint32_t) {value});")]
            }
            TypeInner::Vector { size, .. } if size.count() == 2 => vec![
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fX));"),
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fY));"),
            ],
            TypeInner::Vector { .. } => vec![
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fLeft));"),
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fTop));"),
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fRight));"),
                format!("b->add32(sk_bit_cast<uint32_t>({value}.fBottom));"),
            ],
            _ => vec![format!("b->add32((uint32_t) {value});")],
        }
    }
}

fn component_count(sl: &TypeInner) -> u32 {
    match *sl {
        TypeInner::Scalar(_) => 1,
        TypeInner::Vector { size, .. } => size.count(),
        TypeInner::Matrix { columns, rows, .. } => columns.count() * rows.count(),
        TypeInner::FragmentProcessor { .. } => 0,
    }
}

/// Whether any shader function reads the global.
fn read_in_shader(module: &Module, var: Handle<GlobalVariable>) -> bool {
    std::iter::once(&module.main)
        .chain(module.functions.iter().map(|(_, f)| f))
        .any(|function| {
            function
                .expressions
                .iter()
                .any(|(_, e)| matches!(e, Expression::Global(g) if *g == var))
        })
}

/// Builds the binding plan for every `in`/`uniform` global.
///
/// An `in` variable the shader reads, with no uniform, no
/// `layout(key)`, and no custom `@setData` section, would arrive
/// through the constructor and then have no value on the shader side;
/// that is reported as an error here. An unread one is a plain
/// constructor value (it may feed `@constructorParams` host code).
pub fn plan(module: &Module, diagnostics: &mut Diagnostics) -> Vec<UniformBinding> {
    let has_set_data = module.section(SectionKind::SetData).is_some();
    let mut bindings = Vec::new();

    for (handle, global) in module.globals.iter() {
        let sl = module.types[global.ty].inner.clone();
        let modifiers = &global.modifiers;

        if sl.is_fragment_processor() {
            bindings.push(UniformBinding {
                var: handle,
                name: global.name.clone(),
                sl,
                ctype: CType::ChildProcessor,
                is_uniform: false,
                in_ctor: true,
                is_child: true,
                key: false,
                tracked: false,
                when: None,
            });
            continue;
        }

        if !modifiers.uniform && !modifiers.is_in {
            continue;
        }

        if modifiers.is_in
            && !modifiers.uniform
            && !modifiers.layout.key
            && !has_set_data
            && read_in_shader(module, handle)
        {
            diagnostics.error(
                global.line,
                "'in' variable must be either 'uniform' or 'layout(key)', \
                 or there must be a custom @setData function",
            );
        }

        let ctype = CType::resolve(&sl, modifiers.layout.ctype.as_deref());
        bindings.push(UniformBinding {
            var: handle,
            name: global.name.clone(),
            sl,
            ctype,
            is_uniform: modifiers.uniform,
            in_ctor: modifiers.is_in,
            is_child: false,
            key: modifiers.layout.key,
            tracked: modifiers.layout.tracked,
            when: modifiers.layout.when.clone(),
        });
    }

    bindings
}
