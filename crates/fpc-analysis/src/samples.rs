//! Child-processor sampling analysis.
//!
//! Every `sample(child, ...)` call site in `main` is collected and
//! classified, then the per-site contributions are folded into one
//! [`SampleUsage`] per child slot. The merge is commutative and
//! monotone, so the fold is order-independent: a child sampled with two
//! different uniform matrices degrades to variable-matrix sampling no
//! matter which call site is seen first.

use fpc_ir::{
    format_float, Expression, Function, GlobalVariable, Handle, Module, SampleArg, TypeInner,
};

/// Whether a matrix transform can introduce perspective.
#[derive(Clone, Debug, PartialEq)]
pub enum Perspective {
    /// Statically known from the matrix expression.
    Known(bool),
    /// Decided at run time by a host expression.
    Runtime(String),
}

/// The merged classification of how a child is sampled.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleKind {
    /// Never sampled.
    None,
    /// Sampled without a transform (identity or explicit input color).
    PassThrough,
    /// Every matrix sample site agrees on one uniform expression.
    UniformMatrix {
        expression: String,
        perspective: Perspective,
    },
    /// Matrix sampling whose transform varies per draw or per site.
    VariableMatrix,
}

/// The folded sampling summary for one child slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleUsage {
    pub kind: SampleKind,
    /// Some site supplied explicit coordinates.
    pub explicit_coords: bool,
    /// Some site passed the fragment coordinate through unmodified.
    pub default_coords: bool,
}

impl SampleUsage {
    pub fn none() -> Self {
        Self {
            kind: SampleKind::None,
            explicit_coords: false,
            default_coords: false,
        }
    }

    pub fn is_sampled(&self) -> bool {
        self.kind != SampleKind::None || self.explicit_coords
    }

    /// Combines the contributions of two sample sites.
    pub fn merge(self, other: Self) -> Self {
        use SampleKind::*;
        let kind = match (self.kind, other.kind) {
            (None, k) | (k, None) => k,
            (PassThrough, PassThrough) => PassThrough,
            (PassThrough, k) | (k, PassThrough) => k,
            (VariableMatrix, _) | (_, VariableMatrix) => VariableMatrix,
            (
                UniformMatrix {
                    expression: a,
                    perspective: ap,
                },
                UniformMatrix {
                    expression: b,
                    perspective: bp,
                },
            ) => {
                if a == b && ap == bp {
                    UniformMatrix {
                        expression: a,
                        perspective: ap,
                    }
                } else {
                    VariableMatrix
                }
            }
        };
        Self {
            kind,
            explicit_coords: self.explicit_coords || other.explicit_coords,
            default_coords: self.default_coords || other.default_coords,
        }
    }
}

/// How one matrix sample argument classifies.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixClass {
    /// A compile-time constant expression.
    Constant { text: String, perspective: bool },
    /// A plain (non-`in`) uniform; perspective is known from its value
    /// at upload time, so it is treated as potentially perspective.
    Uniform { name: String },
    /// An `in uniform`; perspective is queried from the host value.
    InUniform { name: String },
    /// Anything else.
    Variable,
}

/// The shape of one `sample(...)` call site.
#[derive(Clone, Debug, PartialEq)]
pub enum SiteKind {
    /// `sample(child)`.
    PassThrough,
    /// `sample(child, color)`.
    InputColor,
    /// `sample(child, float2)`; `default` marks the bare fragment
    /// coordinate.
    ExplicitCoords { default: bool },
    /// `sample(child, float3x3)`.
    Matrix(MatrixClass),
}

/// One `sample(...)` call site in `main`.
#[derive(Clone, Debug)]
pub struct SampleSite {
    pub expr: Handle<Expression>,
    pub child: Handle<GlobalVariable>,
    pub offset: u32,
    pub kind: SiteKind,
}

/// A child-processor slot with its folded usage.
#[derive(Clone, Debug)]
pub struct ChildSlot {
    pub var: Handle<GlobalVariable>,
    pub index: usize,
    pub usage: SampleUsage,
}

/// Collects and classifies every sample site, then folds per-child
/// usages. Children that are never sampled still get a slot.
pub fn classify(module: &Module) -> (Vec<SampleSite>, Vec<ChildSlot>) {
    let mut sites = Vec::new();
    for (handle, expression) in module.main.expressions.iter() {
        if let Expression::Sample { child, arg, offset } = expression {
            sites.push(SampleSite {
                expr: handle,
                child: *child,
                offset: *offset,
                kind: classify_site(module, &module.main, *arg),
            });
        }
    }

    let slots = module
        .children()
        .enumerate()
        .map(|(index, (var, _))| {
            let usage = sites
                .iter()
                .filter(|site| site.child == var)
                .map(|site| site_usage(&site.kind))
                .fold(SampleUsage::none(), SampleUsage::merge);
            ChildSlot { var, index, usage }
        })
        .collect();

    (sites, slots)
}

fn classify_site(module: &Module, main: &Function, arg: SampleArg) -> SiteKind {
    match arg {
        SampleArg::None => SiteKind::PassThrough,
        SampleArg::InputColor(_) => SiteKind::InputColor,
        SampleArg::Coords(coords) => SiteKind::ExplicitCoords {
            default: matches!(main.expressions[coords], Expression::Coords),
        },
        SampleArg::Matrix(matrix) => SiteKind::Matrix(classify_matrix(module, main, matrix)),
    }
}

fn site_usage(kind: &SiteKind) -> SampleUsage {
    match kind {
        SiteKind::PassThrough | SiteKind::InputColor => SampleUsage {
            kind: SampleKind::PassThrough,
            explicit_coords: false,
            default_coords: false,
        },
        SiteKind::ExplicitCoords { default } => SampleUsage {
            kind: SampleKind::None,
            explicit_coords: true,
            default_coords: *default,
        },
        SiteKind::Matrix(class) => SampleUsage {
            kind: match class {
                MatrixClass::Constant { text, perspective } => SampleKind::UniformMatrix {
                    expression: text.clone(),
                    perspective: Perspective::Known(*perspective),
                },
                MatrixClass::Uniform { name } => SampleKind::UniformMatrix {
                    expression: name.clone(),
                    perspective: Perspective::Known(true),
                },
                MatrixClass::InUniform { name } => SampleKind::UniformMatrix {
                    expression: name.clone(),
                    perspective: Perspective::Runtime(format!("{name}.hasPerspective()")),
                },
                MatrixClass::Variable => SampleKind::VariableMatrix,
            },
            explicit_coords: false,
            default_coords: false,
        },
    }
}

fn classify_matrix(module: &Module, main: &Function, handle: Handle<Expression>) -> MatrixClass {
    match &main.expressions[handle] {
        Expression::Global(g) => {
            let global = &module.globals[*g];
            match (global.modifiers.uniform, global.modifiers.is_in) {
                (true, false) => MatrixClass::Uniform {
                    name: global.name.clone(),
                },
                (true, true) => MatrixClass::InUniform {
                    name: global.name.clone(),
                },
                _ => MatrixClass::Variable,
            }
        }
        Expression::Construct { ty, args, .. }
            if matches!(module.types[*ty].inner, TypeInner::Matrix { .. }) =>
        {
            match constant_values(main, args) {
                Some(values) => MatrixClass::Constant {
                    text: constant_text(module, main, handle),
                    perspective: has_perspective(&values),
                },
                None => MatrixClass::Variable,
            }
        }
        _ => MatrixClass::Variable,
    }
}

/// Evaluates constructor arguments that are all numeric literals.
fn constant_values(main: &Function, args: &[Handle<Expression>]) -> Option<Vec<f64>> {
    args.iter()
        .map(|&arg| match &main.expressions[arg] {
            Expression::FloatLiteral(v) => Some(*v),
            Expression::IntLiteral(v) => Some(f64::from(*v)),
            Expression::Unary {
                op: fpc_ir::UnaryOp::Negate,
                expr,
            } => match &main.expressions[*expr] {
                Expression::FloatLiteral(v) => Some(-v),
                Expression::IntLiteral(v) => Some(-f64::from(*v)),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// A constant column-major 3x3 matrix is affine when its projective row
/// is (0, 0, 1). The single-argument diagonal form scales that row's
/// last entry, so it is affine only for scale 1.
fn has_perspective(values: &[f64]) -> bool {
    match values.len() {
        1 => values[0] != 1.0,
        9 => !(values[2] == 0.0 && values[5] == 0.0 && values[8] == 1.0),
        _ => true,
    }
}

/// Formats a constant matrix expression back to shading-language text.
fn constant_text(module: &Module, main: &Function, handle: Handle<Expression>) -> String {
    match &main.expressions[handle] {
        Expression::FloatLiteral(v) => format_float(*v),
        Expression::IntLiteral(v) => v.to_string(),
        Expression::Unary {
            op: fpc_ir::UnaryOp::Negate,
            expr,
        } => format!("-{}", constant_text(module, main, *expr)),
        Expression::Construct { ty, args, .. } => {
            let args: Vec<String> = args
                .iter()
                .map(|&arg| constant_text(module, main, arg))
                .collect();
            format!("{}({})", module.types[*ty].inner.sl_name(), args.join(", "))
        }
        _ => String::new(),
    }
}
