//! Lowering of the shader body into `codeAppendf` chunks.
//!
//! The shader text is rendered as one or more raw-string chunks with
//! printf-style placeholders for every value that is only known to the
//! host: uniform names, constructor-supplied scalars, child sample
//! results. A chunk must be split whenever a statement needs host code
//! to run first (an `invokeChild` call producing a sample string), so
//! the writer buffers shader text and flushes it on demand. When a
//! flush cuts the buffer at a statement boundary, the statement's
//! trailing newline is carried over to the start of the next chunk so
//! the concatenated shader text is unchanged.

use fpc_analysis::{inline, MatrixClass, SampleKind, SiteKind};
use fpc_ir::{
    format_float, BinaryOp, Expression, Function, GlobalVariable, Handle, SampleArg, ScalarKind,
    SectionKind, Statement, TypeInner, UnaryOp,
};

use crate::{sections, Context};

/// Shader text plus the host expressions backing its placeholders.
#[derive(Clone, Debug, Default)]
pub(crate) struct GlslText {
    pub text: String,
    pub args: Vec<String>,
}

/// Renders the body of `main` into the host code of `emitCode`.
pub(crate) fn emit_main(ctx: &Context) -> String {
    let mut writer = BlockWriter::new(ctx);
    writer.global_decls();
    for statement in &ctx.module.main.body {
        writer.statement(statement);
    }
    writer.finish()
}

/// Renders a helper function's body for `emitFunction`. Helper bodies
/// are emitted as plain shader text, so placeholders are disabled.
pub(crate) fn helper_body(ctx: &Context, function: &Function) -> String {
    let formatter = Formatter {
        ctx,
        function,
        inline_params: None,
        placeholders: false,
    };
    let mut out = String::new();
    for statement in &function.body {
        let mut text = GlslText::default();
        formatter.statement(statement, 0, &mut text);
        out.push_str(&text.text);
        out.push('\n');
    }
    out
}

/// Non-uniform module globals with an initializer that shader code or
/// a spliced host-code section reads. They become both a host `auto`
/// mirror and a shader-side declaration.
pub(crate) fn host_auto_globals<'a>(
    ctx: &Context<'a>,
) -> Vec<(Handle<GlobalVariable>, &'a GlobalVariable)> {
    ctx.module
        .globals
        .iter()
        .filter(|(handle, global)| {
            !global.modifiers.uniform
                && !global.modifiers.is_in
                && global.init.is_some()
                && !ctx.module.types[global.ty].inner.is_fragment_processor()
                && (referenced_in_main(ctx, *handle)
                    || referenced_in_section(ctx, &global.name))
        })
        .collect()
}

fn referenced_in_main(ctx: &Context, var: Handle<GlobalVariable>) -> bool {
    ctx.module
        .main
        .expressions
        .iter()
        .any(|(_, e)| matches!(e, Expression::Global(g) if *g == var))
}

fn referenced_in_section(ctx: &Context, name: &str) -> bool {
    [SectionKind::EmitCode, SectionKind::SetData]
        .into_iter()
        .filter_map(|kind| ctx.module.section(kind))
        .any(|section| sections::contains_ident(&section.text, name))
}

/// Renders a global initializer as a host C++ expression, for the
/// `auto` mirror declared at the top of `emitCode`.
pub(crate) fn host_expr(ctx: &Context, handle: Handle<Expression>) -> String {
    let exprs = &ctx.module.expressions;
    match &exprs[handle] {
        Expression::FloatLiteral(v) => format_float(*v),
        Expression::IntLiteral(v) => v.to_string(),
        Expression::BoolLiteral(v) => v.to_string(),
        Expression::CapsBit(bit) => format!("sk_Caps.{bit}"),
        Expression::Global(g) => format!("_outer.{}", ctx.module.globals[*g].name),
        Expression::ChildField { child, field } => {
            let index = ctx.module.child_index(*child).unwrap_or(0);
            format!("_outer.childProcessor({index})->{field}()")
        }
        Expression::Unary { op, expr } => {
            let token = match op {
                UnaryOp::Negate => "-",
                UnaryOp::LogicalNot => "!",
            };
            format!("{token}{}", host_expr(ctx, *expr))
        }
        Expression::Binary { op, left, right } => format!(
            "{} {} {}",
            host_expr(ctx, *left),
            op.token(),
            host_expr(ctx, *right)
        ),
        _ => String::new(),
    }
}

struct BlockWriter<'a> {
    ctx: &'a Context<'a>,
    out: String,
    buffer: String,
    args: Vec<String>,
}

impl<'a> BlockWriter<'a> {
    fn new(ctx: &'a Context<'a>) -> Self {
        Self {
            ctx,
            out: String::new(),
            buffer: String::new(),
            args: Vec::new(),
        }
    }

    fn formatter(&self) -> Formatter<'a> {
        Formatter {
            ctx: self.ctx,
            function: &self.ctx.module.main,
            inline_params: None,
            placeholders: true,
        }
    }

    /// Shader-side declarations mirroring the host `auto` globals.
    fn global_decls(&mut self) {
        for (_, global) in host_auto_globals(self.ctx) {
            let sl = self.ctx.module.types[global.ty].inner.clone();
            let name = &global.name;
            match sl {
                TypeInner::Scalar(ScalarKind::Bool) => {
                    self.buffer
                        .push_str(&format!("{} {name} = %s;\n", sl.sl_name()));
                    self.args
                        .push(format!("({name} ? \"true\" : \"false\")"));
                }
                TypeInner::Scalar(ScalarKind::Half | ScalarKind::Float) => {
                    self.buffer
                        .push_str(&format!("{} {name} = %f;\n", sl.sl_name()));
                    self.args.push(name.clone());
                }
                TypeInner::Scalar(ScalarKind::Int) => {
                    self.buffer
                        .push_str(&format!("{} {name} = %d;\n", sl.sl_name()));
                    self.args.push(name.clone());
                }
                _ => {
                    // Non-scalar constants are spliced as shader text.
                    if let Some(init) = global.init {
                        let text = host_expr(self.ctx, init);
                        self.buffer
                            .push_str(&format!("{} {name} = {text};\n", sl.sl_name()));
                    }
                }
            }
        }
    }

    fn statement(&mut self, statement: &Statement) {
        let had_inline = self.write_statement(statement, 0, "");
        self.buffer.push('\n');
        if had_inline {
            self.buffer.push('\n');
        }
    }

    /// Writes one statement. A statement whose shader text needs host
    /// code first (`invokeChild` lines) flushes the pending chunk at
    /// that point, so inside an `if` the cut lands mid-statement: the
    /// branch header stays in the previous chunk and the branch body
    /// opens the next one. `prefix` is the newline-plus-indent owed to
    /// the statement by its enclosing block; it is written after the
    /// flush so it opens the next chunk.
    fn write_statement(&mut self, statement: &Statement, depth: usize, prefix: &str) -> bool {
        let formatter = self.formatter();

        if let Statement::If {
            condition,
            accept,
            reject,
        } = statement
        {
            let mut host_lines = Vec::new();
            formatter.expr_sample_lines(*condition, &mut host_lines);
            self.host_lines(&host_lines);

            let mut inline_blocks = Vec::new();
            formatter.expr_inline_blocks(*condition, &mut inline_blocks);
            let had_inline = !inline_blocks.is_empty();
            for block in inline_blocks {
                self.buffer.push_str(&block.text);
                self.args.extend(block.args);
            }

            self.buffer.push_str(prefix);
            let mut text = GlslText::default();
            text.text.push_str("if (");
            formatter.expr(*condition, 0, &mut text);
            text.text.push_str(") {");
            self.buffer.push_str(&text.text);
            self.args.extend(text.args);

            self.write_block(accept, depth);
            if !reject.is_empty() {
                self.buffer.push_str(" else {");
                self.write_block(reject, depth);
            }
            return had_inline;
        }

        let mut host_lines = Vec::new();
        formatter.statement_sample_lines(statement, &mut host_lines);
        self.host_lines(&host_lines);

        let mut inline_blocks = Vec::new();
        formatter.statement_inline_blocks(statement, &mut inline_blocks);
        let had_inline = !inline_blocks.is_empty();
        for block in inline_blocks {
            self.buffer.push_str(&block.text);
            self.args.extend(block.args);
        }

        self.buffer.push_str(prefix);
        let mut text = GlslText::default();
        formatter.statement(statement, depth, &mut text);
        self.buffer.push_str(&text.text);
        self.args.extend(text.args);
        had_inline
    }

    fn write_block(&mut self, block: &[Statement], depth: usize) {
        let prefix = format!("\n{}", "    ".repeat(depth + 1));
        for statement in block {
            self.write_statement(statement, depth + 1, &prefix);
        }
        self.buffer.push('\n');
        self.buffer.push_str(&"    ".repeat(depth));
        self.buffer.push('}');
    }

    fn host_lines(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        self.flush(false);
        for line in lines {
            self.out.push_str("        ");
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    fn flush(&mut self, last: bool) {
        let mut text = std::mem::take(&mut self.buffer);
        let args = std::mem::take(&mut self.args);
        let mut carried = false;
        if !last && text.ends_with('\n') {
            text.pop();
            carried = true;
        }
        if text.is_empty() && args.is_empty() {
            if carried {
                self.buffer.push('\n');
            }
            return;
        }
        self.out.push_str("        fragBuilder->codeAppendf(\n");
        self.out.push_str(&format!("R\"SkSL({text})SkSL\"\n"));
        if args.is_empty() {
            self.out.push_str(");\n");
        } else {
            self.out.push_str(&format!(", {});\n", args.join(", ")));
        }
        if carried {
            self.buffer.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.flush(true);
        self.out
    }
}

struct Formatter<'a> {
    ctx: &'a Context<'a>,
    function: &'a Function,
    /// Substitute names for `Param` references when expanding an
    /// inlined call site.
    inline_params: Option<&'a [String]>,
    placeholders: bool,
}

impl<'a> Formatter<'a> {
    fn format(&self, handle: Handle<Expression>) -> GlslText {
        let mut out = GlslText::default();
        self.expr(handle, 0, &mut out);
        out
    }

    fn statement(&self, statement: &Statement, depth: usize, out: &mut GlslText) {
        match statement {
            Statement::Expression(e) => {
                self.expr(*e, 0, out);
                out.text.push(';');
            }
            Statement::VarDecl(l) => {
                let local = &self.function.locals[*l];
                let sl = self.ctx.module.types[local.ty].inner.sl_name();
                out.text.push_str(&format!("{sl} {}", local.name));
                if let Some(init) = local.init {
                    out.text.push_str(" = ");
                    self.expr(init, 0, out);
                }
                out.text.push(';');
            }
            Statement::Assign { lhs, op, rhs } => {
                self.expr(*lhs, 0, out);
                match op {
                    Some(op) => out.text.push_str(&format!(" {}= ", op.token())),
                    None => out.text.push_str(" = "),
                }
                self.expr(*rhs, 0, out);
                out.text.push(';');
            }
            Statement::Return { value } => {
                out.text.push_str("return");
                if let Some(value) = value {
                    out.text.push(' ');
                    self.expr(*value, 0, out);
                }
                out.text.push(';');
            }
            Statement::If {
                condition,
                accept,
                reject,
            } => {
                out.text.push_str("if (");
                self.expr(*condition, 0, out);
                out.text.push_str(") {");
                self.block(accept, depth, out);
                if !reject.is_empty() {
                    out.text.push_str(" else {");
                    self.block(reject, depth, out);
                }
            }
        }
    }

    fn block(&self, block: &[Statement], depth: usize, out: &mut GlslText) {
        for statement in block {
            out.text.push('\n');
            out.text.push_str(&"    ".repeat(depth + 1));
            self.statement(statement, depth + 1, out);
        }
        out.text.push('\n');
        out.text.push_str(&"    ".repeat(depth));
        out.text.push('}');
    }

    fn expr(&self, handle: Handle<Expression>, prec: u8, out: &mut GlslText) {
        match &self.function.expressions[handle] {
            Expression::FloatLiteral(v) => out.text.push_str(&format_float(*v)),
            Expression::IntLiteral(v) => out.text.push_str(&v.to_string()),
            Expression::BoolLiteral(v) => out.text.push_str(&v.to_string()),
            Expression::Null => out.text.push_str("null"),
            Expression::InputColor => self.placeholder(out, "%s", "args.fInputColor"),
            Expression::OutputColor => self.placeholder(out, "%s", "args.fOutputColor"),
            Expression::Coords => self.placeholder(out, "%s", "args.fSampleCoord"),
            Expression::Global(g) => self.global(*g, out),
            Expression::Local(l) => out.text.push_str(&self.function.locals[*l].name),
            Expression::Param(i) => {
                let name = match self.inline_params {
                    Some(names) => names.get(*i as usize).cloned().unwrap_or_default(),
                    None => self
                        .function
                        .parameters
                        .get(*i as usize)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                };
                out.text.push_str(&name);
            }
            Expression::CapsBit(bit) => {
                if self.placeholders {
                    let arg = format!("(sk_Caps.{bit} ? \"true\" : \"false\")");
                    self.placeholder(out, "%s", &arg);
                } else {
                    out.text.push_str(&format!("sk_Caps.{bit}"));
                }
            }
            Expression::ChildField { child, field } => {
                let index = self.ctx.module.child_index(*child).unwrap_or(0);
                let arg = format!(
                    "(_outer.childProcessor({index})->{field}() ? \"true\" : \"false\")"
                );
                self.placeholder(out, "%s", &arg);
            }
            Expression::Swizzle { base, components } => {
                self.expr(*base, 8, out);
                out.text.push('.');
                for component in components {
                    out.text.push(component.letter());
                }
            }
            Expression::Unary { op, expr } => {
                out.text.push(match op {
                    UnaryOp::Negate => '-',
                    UnaryOp::LogicalNot => '!',
                });
                self.expr(*expr, 7, out);
            }
            Expression::Binary { op, left, right } => {
                if let Some(arg) = self.child_null_compare(*op, *left, *right) {
                    self.placeholder(out, "%s", &arg);
                    return;
                }
                let wrap = op.precedence() < prec;
                if wrap {
                    out.text.push('(');
                }
                self.expr(*left, op.precedence(), out);
                out.text.push_str(&format!(" {} ", op.token()));
                self.expr(*right, op.precedence() + 1, out);
                if wrap {
                    out.text.push(')');
                }
            }
            Expression::Ternary {
                condition,
                accept,
                reject,
                ..
            } => {
                let wrap = prec > 0;
                if wrap {
                    out.text.push('(');
                }
                self.expr(*condition, 1, out);
                out.text.push_str(" ? ");
                self.expr(*accept, 0, out);
                out.text.push_str(" : ");
                self.expr(*reject, 0, out);
                if wrap {
                    out.text.push(')');
                }
            }
            Expression::Construct { ty, args, .. } => {
                out.text
                    .push_str(&self.ctx.module.types[*ty].inner.sl_name());
                out.text.push('(');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.text.push_str(", ");
                    }
                    self.expr(arg, 0, out);
                }
                out.text.push(')');
            }
            Expression::Call {
                function,
                arguments,
                offset,
                ..
            } => {
                let callee = &self.ctx.module.functions[*function];
                if self.ctx.analysis.inlinable.contains(function) {
                    let names = inline::call_names(self.ctx.module, callee, *offset);
                    out.text.push_str(&names.result);
                } else {
                    self.placeholder(out, "%s", &format!("{}_name.c_str()", callee.name));
                    out.text.push('(');
                    for (i, &arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            out.text.push_str(", ");
                        }
                        self.expr(arg, 0, out);
                    }
                    out.text.push(')');
                }
            }
            Expression::Sample { offset, .. } => {
                self.placeholder(out, "%s", &format!("_sample{offset}.c_str()"));
            }
        }
    }

    fn placeholder(&self, out: &mut GlslText, text: &str, arg: &str) {
        out.text.push_str(text);
        out.args.push(arg.to_string());
    }

    fn global(&self, handle: Handle<GlobalVariable>, out: &mut GlslText) {
        let global = &self.ctx.module.globals[handle];
        if !self.placeholders {
            out.text.push_str(&global.name);
            return;
        }
        match self.ctx.analysis.binding(handle) {
            Some(binding) if binding.is_uniform => {
                let arg = format!(
                    "args.fUniformHandler->getUniformCStr({}Var)",
                    binding.name
                );
                self.placeholder(out, "%s", &arg);
            }
            Some(binding) if binding.in_ctor && !binding.is_child => {
                self.host_value(&binding.sl, &binding.name, out);
            }
            _ => out.text.push_str(&global.name),
        }
    }

    /// A constructor-supplied value spliced straight into the shader
    /// text, formatted by its type.
    fn host_value(&self, sl: &TypeInner, name: &str, out: &mut GlslText) {
        match sl {
            TypeInner::Scalar(ScalarKind::Half | ScalarKind::Float) => {
                self.placeholder(out, "%f", &format!("_outer.{name}"));
            }
            TypeInner::Scalar(ScalarKind::Int) => {
                self.placeholder(out, "%d", &format!("_outer.{name}"));
            }
            TypeInner::Scalar(ScalarKind::Bool) => {
                let arg = format!("(_outer.{name} ? \"true\" : \"false\")");
                self.placeholder(out, "%s", &arg);
            }
            TypeInner::Vector { size, .. } if size.count() == 2 => {
                out.text.push_str(&format!("{}(%f, %f)", sl.sl_name()));
                out.args.push(format!("_outer.{name}.fX"));
                out.args.push(format!("_outer.{name}.fY"));
            }
            TypeInner::Vector { size, .. } if size.count() == 4 => {
                out.text
                    .push_str(&format!("{}(%f, %f, %f, %f)", sl.sl_name()));
                for field in ["fLeft", "fTop", "fRight", "fBottom"] {
                    out.args.push(format!("_outer.{name}.{field}"));
                }
            }
            _ => self.placeholder(out, "%s", &format!("_outer.{name}")),
        }
    }

    /// `child != null` is decided on the host, so the whole comparison
    /// collapses to a spliced boolean.
    fn child_null_compare(
        &self,
        op: BinaryOp,
        left: Handle<Expression>,
        right: Handle<Expression>,
    ) -> Option<String> {
        if !self.placeholders || !matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) {
            return None;
        }
        let child = match (
            &self.function.expressions[left],
            &self.function.expressions[right],
        ) {
            (Expression::Global(g), Expression::Null)
            | (Expression::Null, Expression::Global(g)) => *g,
            _ => return None,
        };
        if !self.ctx.module.types[self.ctx.module.globals[child].ty]
            .inner
            .is_fragment_processor()
        {
            return None;
        }
        let index = self.ctx.module.child_index(child)?;
        Some(match op {
            BinaryOp::NotEqual => {
                format!("_outer.childProcessor({index}) ? \"true\" : \"false\"")
            }
            _ => format!("_outer.childProcessor({index}) ? \"false\" : \"true\""),
        })
    }

    /// Collects host `invokeChild` lines for every sample site in the
    /// statement, innermost first.
    fn statement_sample_lines(&self, statement: &Statement, out: &mut Vec<String>) {
        self.walk_statement(statement, &mut |h| {
            if matches!(self.function.expressions[h], Expression::Sample { .. }) {
                self.sample_site_lines(h, out);
            }
        });
    }

    fn expr_sample_lines(&self, expr: Handle<Expression>, out: &mut Vec<String>) {
        self.walk_expr(expr, &mut |h| {
            if matches!(self.function.expressions[h], Expression::Sample { .. }) {
                self.sample_site_lines(h, out);
            }
        });
    }

    fn sample_site_lines(&self, handle: Handle<Expression>, out: &mut Vec<String>) {
        let Some(site) = self.ctx.analysis.site(handle) else {
            return;
        };
        let Some(slot) = self.ctx.analysis.slot(site.child) else {
            return;
        };
        let index = slot.index;
        let offset = site.offset;
        let arg = match self.function.expressions[handle] {
            Expression::Sample { arg, .. } => arg,
            _ => return,
        };

        match &site.kind {
            SiteKind::PassThrough | SiteKind::ExplicitCoords { default: true } => {
                out.push(format!(
                    "SkString _sample{offset} = this->invokeChild({index}, args);"
                ));
            }
            SiteKind::InputColor => {
                let SampleArg::InputColor(input) = arg else {
                    return;
                };
                if matches!(self.function.expressions[input], Expression::InputColor) {
                    out.push(format!("SkString _input{offset}(args.fInputColor);"));
                } else {
                    out.push(self.sk_string_line(&format!("_input{offset}"), input));
                }
                out.push(format!(
                    "SkString _sample{offset} = this->invokeChild({index}, _input{offset}.c_str(), args);"
                ));
            }
            SiteKind::ExplicitCoords { default: false } => {
                let SampleArg::Coords(coords) = arg else {
                    return;
                };
                out.push(self.sk_string_line(&format!("_coords{offset}"), coords));
                out.push(format!(
                    "SkString _sample{offset} = this->invokeChild({index}, args, _coords{offset}.c_str());"
                ));
            }
            SiteKind::Matrix(class) => {
                if matches!(slot.usage.kind, SampleKind::UniformMatrix { .. }) {
                    out.push(format!(
                        "SkString _sample{offset} = this->invokeChildWithMatrix({index}, args);"
                    ));
                    return;
                }
                let SampleArg::Matrix(matrix) = arg else {
                    return;
                };
                let line = match class {
                    MatrixClass::Uniform { name } | MatrixClass::InUniform { name } => {
                        format!(
                            "SkString _matrix{offset}(args.fUniformHandler->getUniformCStr({name}Var));"
                        )
                    }
                    _ => self.sk_string_line(&format!("_matrix{offset}"), matrix),
                };
                out.push(line);
                out.push(format!(
                    "SkString _sample{offset} = this->invokeChildWithMatrix({index}, args, _matrix{offset}.c_str());"
                ));
            }
        }
    }

    /// Builds one `SkString` host line holding a formatted shader
    /// fragment: a plain constructor when the text has no placeholders,
    /// `SkStringPrintf` otherwise.
    fn sk_string_line(&self, var: &str, expr: Handle<Expression>) -> String {
        let formatted = self.format(expr);
        if formatted.args.is_empty() {
            format!("SkString {var}(\"{}\");", formatted.text)
        } else {
            format!(
                "SkString {var} = SkStringPrintf(\"{}\", {});",
                formatted.text,
                formatted.args.join(", ")
            )
        }
    }

    /// Collects the shader-side expansions of inlined calls in the
    /// statement, innermost first.
    fn statement_inline_blocks(&self, statement: &Statement, out: &mut Vec<GlslText>) {
        self.walk_statement(statement, &mut |h| {
            self.inline_block_at(h, out);
        });
    }

    fn expr_inline_blocks(&self, expr: Handle<Expression>, out: &mut Vec<GlslText>) {
        self.walk_expr(expr, &mut |h| {
            self.inline_block_at(h, out);
        });
    }

    fn inline_block_at(&self, handle: Handle<Expression>, out: &mut Vec<GlslText>) {
        if let Expression::Call {
            function,
            arguments,
            offset,
            ..
        } = &self.function.expressions[handle]
        {
            if self.ctx.analysis.inlinable.contains(function) {
                out.push(self.inline_expansion(*function, arguments, *offset));
            }
        }
    }

    fn inline_expansion(
        &self,
        callee: Handle<Function>,
        arguments: &[Handle<Expression>],
        offset: u32,
    ) -> GlslText {
        let module = self.ctx.module;
        let function = &module.functions[callee];
        let names = inline::call_names(module, function, offset);
        let mut block = GlslText::default();

        if let Some(result) = function.result {
            let sl = module.types[result].inner.sl_name();
            block.text.push_str(&format!("{sl} {};\n", names.result));
        }
        for (i, (&argument, parameter)) in
            arguments.iter().zip(&function.parameters).enumerate()
        {
            let sl = module.types[parameter.ty].inner.sl_name();
            let formatted = self.format(argument);
            block
                .text
                .push_str(&format!("{sl} {} = {};\n", names.args[i], formatted.text));
            block.args.extend(formatted.args);
        }
        block.text.push_str("{\n");

        let body_formatter = Formatter {
            ctx: self.ctx,
            function,
            inline_params: Some(&names.args),
            placeholders: true,
        };
        for statement in &function.body {
            match statement {
                Statement::Return { value: Some(value) } => {
                    let formatted = body_formatter.format(*value);
                    block.text.push_str(&format!(
                        "    {} = {};\n",
                        names.result, formatted.text
                    ));
                    block.args.extend(formatted.args);
                }
                Statement::Return { value: None } => {}
                other => {
                    let mut text = GlslText::default();
                    body_formatter.statement(other, 1, &mut text);
                    block.text.push_str("    ");
                    block.text.push_str(&text.text);
                    block.text.push('\n');
                    block.args.extend(text.args);
                }
            }
        }
        block.text.push_str("}\n");
        block
    }

    /// Post-order walk over every expression reachable from a statement.
    fn walk_statement(&self, statement: &Statement, visit: &mut dyn FnMut(Handle<Expression>)) {
        match statement {
            Statement::Expression(e) => self.walk_expr(*e, visit),
            Statement::VarDecl(l) => {
                if let Some(init) = self.function.locals[*l].init {
                    self.walk_expr(init, visit);
                }
            }
            Statement::Assign { lhs, rhs, .. } => {
                self.walk_expr(*lhs, visit);
                self.walk_expr(*rhs, visit);
            }
            Statement::Return { value } => {
                if let Some(value) = value {
                    self.walk_expr(*value, visit);
                }
            }
            Statement::If {
                condition,
                accept,
                reject,
            } => {
                self.walk_expr(*condition, visit);
                for s in accept {
                    self.walk_statement(s, visit);
                }
                for s in reject {
                    self.walk_statement(s, visit);
                }
            }
        }
    }

    fn walk_expr(&self, handle: Handle<Expression>, visit: &mut dyn FnMut(Handle<Expression>)) {
        match &self.function.expressions[handle] {
            Expression::Swizzle { base, .. } => self.walk_expr(*base, visit),
            Expression::Unary { expr, .. } => self.walk_expr(*expr, visit),
            Expression::Binary { left, right, .. } => {
                self.walk_expr(*left, visit);
                self.walk_expr(*right, visit);
            }
            Expression::Ternary {
                condition,
                accept,
                reject,
                ..
            } => {
                self.walk_expr(*condition, visit);
                self.walk_expr(*accept, visit);
                self.walk_expr(*reject, visit);
            }
            Expression::Construct { args, .. } => {
                for &arg in args {
                    self.walk_expr(arg, visit);
                }
            }
            Expression::Call { arguments, .. } => {
                for &arg in arguments {
                    self.walk_expr(arg, visit);
                }
            }
            Expression::Sample { arg, .. } => match arg {
                SampleArg::InputColor(e) | SampleArg::Coords(e) | SampleArg::Matrix(e) => {
                    self.walk_expr(*e, visit)
                }
                SampleArg::None => {}
            },
            _ => {}
        }
        visit(handle);
    }
}
