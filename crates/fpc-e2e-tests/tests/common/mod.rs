#![allow(dead_code)]

use fpc_backend_cpp::{Artifacts, Settings};
use fpc_ir::{
    Expression, GlobalVariable, Handle, Layout, Modifiers, Module, ScalarKind, Section,
    SectionKind, Statement, Type, TypeInner, VectorSize,
};

/// Builder for fragment-processor program models, standing in for the
/// external front end.
pub struct Fp {
    pub module: Module,
}

impl Fp {
    pub fn new() -> Self {
        Self {
            module: Module::default(),
        }
    }

    pub fn ty(&mut self, inner: TypeInner) -> Handle<Type> {
        self.module.types.insert(Type { name: None, inner })
    }

    pub fn half(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Scalar(ScalarKind::Half))
    }

    pub fn bool_ty(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Scalar(ScalarKind::Bool))
    }

    pub fn int_ty(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Scalar(ScalarKind::Int))
    }

    pub fn half2(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Vector {
            kind: ScalarKind::Half,
            size: VectorSize::Bi,
        })
    }

    pub fn half4(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Vector {
            kind: ScalarKind::Half,
            size: VectorSize::Quad,
        })
    }

    pub fn float2(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Vector {
            kind: ScalarKind::Float,
            size: VectorSize::Bi,
        })
    }

    pub fn float3x3(&mut self) -> Handle<Type> {
        self.ty(TypeInner::Matrix {
            kind: ScalarKind::Float,
            columns: VectorSize::Tri,
            rows: VectorSize::Tri,
        })
    }

    pub fn fp_ty(&mut self, nullable: bool) -> Handle<Type> {
        self.ty(TypeInner::FragmentProcessor { nullable })
    }

    pub fn global(
        &mut self,
        name: &str,
        ty: Handle<Type>,
        modifiers: Modifiers,
    ) -> Handle<GlobalVariable> {
        let line = self.module.globals.len() as u32 + 1;
        self.module.globals.append(GlobalVariable {
            name: name.into(),
            ty,
            modifiers,
            init: None,
            line,
        })
    }

    pub fn in_uniform(&mut self, name: &str, ty: Handle<Type>) -> Handle<GlobalVariable> {
        self.global(
            name,
            ty,
            Modifiers {
                uniform: true,
                is_in: true,
                ..Default::default()
            },
        )
    }

    pub fn in_var(&mut self, name: &str, ty: Handle<Type>, layout: Layout) -> Handle<GlobalVariable> {
        self.global(
            name,
            ty,
            Modifiers {
                is_in: true,
                layout,
                ..Default::default()
            },
        )
    }

    pub fn child(&mut self, name: &str) -> Handle<GlobalVariable> {
        let fp = self.fp_ty(false);
        self.global(
            name,
            fp,
            Modifiers {
                is_in: true,
                ..Default::default()
            },
        )
    }

    pub fn section(&mut self, kind: SectionKind, text: &str) {
        self.module.sections.push(Section {
            kind,
            param: None,
            text: text.into(),
            line: 1,
        });
    }

    pub fn section_with_param(&mut self, kind: SectionKind, param: &str, text: &str) {
        self.module.sections.push(Section {
            kind,
            param: Some(param.into()),
            text: text.into(),
            line: 1,
        });
    }

    /// Appends an expression to `main`'s arena.
    pub fn expr(&mut self, expression: Expression) -> Handle<Expression> {
        self.module.main.expressions.append(expression)
    }

    pub fn stmt(&mut self, statement: Statement) {
        self.module.main.body.push(statement);
    }

    /// `sk_OutColor = rhs;`
    pub fn out_assign(&mut self, rhs: Handle<Expression>) {
        let lhs = self.expr(Expression::OutputColor);
        self.stmt(Statement::Assign {
            lhs,
            op: None,
            rhs,
        });
    }

    /// `sk_OutColor = half4(value);`
    pub fn out_splat(&mut self, value: f64) {
        let half4 = self.half4();
        let literal = self.expr(Expression::FloatLiteral(value));
        let construct = self.expr(Expression::Construct {
            ty: half4,
            args: vec![literal],
            line: 1,
        });
        self.out_assign(construct);
    }

    pub fn compile(&self, name: &str) -> Artifacts {
        fpc_backend_cpp::compile(&self.module, name, &Settings::default())
            .expect("compilation failed")
    }

    pub fn compile_with(&self, name: &str, settings: &Settings) -> Artifacts {
        fpc_backend_cpp::compile(&self.module, name, settings).expect("compilation failed")
    }

    /// Compiles a document that must fail, returning the rendered
    /// error report.
    pub fn compile_err(&self, name: &str) -> String {
        fpc_backend_cpp::compile(&self.module, name, &Settings::default())
            .expect_err("compilation unexpectedly succeeded")
            .to_string()
    }
}
