//! Debug text dump of a program model.

use std::fmt::Write;

use crate::Module;

/// Formats a shading-language float literal.
///
/// Integral values keep a trailing `.0` so the emitted text stays a
/// float literal (`2` becomes `2.0`).
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Renders a human-readable dump of the module for debugging.
pub fn dump_module(module: &Module) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Globals:");
    for (handle, global) in module.globals.iter() {
        let mut mods = String::new();
        if global.modifiers.is_in {
            mods.push_str("in ");
        }
        if global.modifiers.uniform {
            mods.push_str("uniform ");
        }
        if global.modifiers.layout.key {
            mods.push_str("key ");
        }
        if global.modifiers.layout.tracked {
            mods.push_str("tracked ");
        }
        let _ = writeln!(
            out,
            "  [{}] {}{} {} (line {})",
            handle.index(),
            mods,
            module.types[global.ty].inner.sl_name(),
            global.name,
            global.line,
        );
    }

    let _ = writeln!(out, "Functions:");
    for (handle, function) in module.functions.iter() {
        let _ = writeln!(
            out,
            "  [{}] {} ({} params, {} statements)",
            handle.index(),
            function.name,
            function.parameters.len(),
            function.body.len(),
        );
    }
    let _ = writeln!(out, "  main ({} statements)", module.main.body.len());

    let _ = writeln!(out, "Sections:");
    for section in &module.sections {
        match &section.param {
            Some(param) => {
                let _ = writeln!(out, "  @{}({})", section.kind.name(), param);
            }
            None => {
                let _ = writeln!(out, "  @{}", section.kind.name());
            }
        }
    }

    out
}
