//! Type system for the fragment-processor program model.

use serde::{Deserialize, Serialize};

/// The kind of a scalar type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// Medium-precision floating point.
    Half,
    /// Full-precision floating point.
    Float,
}

impl ScalarKind {
    /// Returns the shading-language spelling of this scalar.
    pub fn sl_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Half => "half",
            Self::Float => "float",
        }
    }
}

/// Number of components in a vector, or rows/columns in a matrix.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum VectorSize {
    /// 2 components.
    Bi = 2,
    /// 3 components.
    Tri = 3,
    /// 4 components.
    Quad = 4,
}

impl VectorSize {
    /// Component count as a number.
    pub fn count(self) -> u32 {
        self as u32
    }
}

/// A named type.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub name: Option<String>,
    pub inner: TypeInner,
}

/// The concrete shape of a type.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TypeInner {
    /// A single scalar value.
    Scalar(ScalarKind),
    /// A vector of scalars.
    Vector { kind: ScalarKind, size: VectorSize },
    /// A square matrix of scalars.
    Matrix {
        kind: ScalarKind,
        columns: VectorSize,
        rows: VectorSize,
    },
    /// A child fragment processor handle. Only legal as a global
    /// declaration; everywhere else it is a semantic error.
    FragmentProcessor {
        /// `fragmentProcessor?` — the slot may be left empty.
        nullable: bool,
    },
}

impl TypeInner {
    /// Returns the shading-language spelling, e.g. `half4` or `float3x3`.
    pub fn sl_name(&self) -> String {
        match *self {
            Self::Scalar(kind) => kind.sl_name().to_string(),
            Self::Vector { kind, size } => format!("{}{}", kind.sl_name(), size.count()),
            Self::Matrix {
                kind,
                columns,
                rows,
            } => format!("{}{}x{}", kind.sl_name(), columns.count(), rows.count()),
            Self::FragmentProcessor { nullable: false } => "fragmentProcessor".to_string(),
            Self::FragmentProcessor { nullable: true } => "fragmentProcessor?".to_string(),
        }
    }

    /// Returns the GrSL type token used in generated host code,
    /// e.g. `kHalf4_GrSLType`.
    pub fn grsl_name(&self) -> String {
        let mut name = self.sl_name();
        if let Some(first) = name.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        format!("k{name}_GrSLType")
    }

    /// Returns `true` for the fragment-processor handle type.
    pub fn is_fragment_processor(&self) -> bool {
        matches!(self, Self::FragmentProcessor { .. })
    }

    /// Returns `true` for scalar and vector floating-point types.
    pub fn is_float_or_vector(&self) -> bool {
        matches!(
            self,
            Self::Scalar(ScalarKind::Half | ScalarKind::Float)
                | Self::Vector {
                    kind: ScalarKind::Half | ScalarKind::Float,
                    ..
                }
        )
    }
}
