//! Rendering of expression trees back to Wexpr text.
//!
//! Compact output separates sibling tokens with single spaces. Human-readable
//! output puts every array element and map pair on its own line, indented one
//! tab per nesting level, with the closing paren back at the container's own
//! level. Both forms re-parse to the same tree.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::{is_reserved, is_whitespace, WriteOptions};
use crate::expr::Expression;

/// Render `expr` at the given indent level.
///
/// `indent` is the nesting level the node sits at; the caller is assumed to
/// have already emitted any indentation for the opening token. No trailing
/// newline is emitted.
pub(crate) fn render(expr: &Expression, options: &WriteOptions, indent: usize) -> String {
    let mut out = String::new();
    write_expression(&mut out, expr, options, indent);
    out
}

fn write_expression(out: &mut String, expr: &Expression, options: &WriteOptions, indent: usize) {
    match expr {
        Expression::Null => out.push_str("null"),
        Expression::Value(value) => write_value(out, value),
        Expression::BinaryData(bytes) => {
            out.push('<');
            out.push_str(&STANDARD.encode(bytes));
            out.push('>');
        }
        Expression::Array(items) => write_array(out, items, options, indent),
        Expression::Map(pairs) => write_map(out, pairs, options, indent),
    }
}

fn write_array(out: &mut String, items: &[Expression], options: &WriteOptions, indent: usize) {
    if items.is_empty() {
        out.push_str("#()");
        return;
    }

    if options.human_readable {
        out.push_str("#(\n");
        for item in items {
            push_indent(out, indent + 1);
            write_expression(out, item, options, indent + 1);
            out.push('\n');
        }
        push_indent(out, indent);
        out.push(')');
    } else {
        out.push_str("#(");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_expression(out, item, options, indent);
        }
        out.push(')');
    }
}

fn write_map(
    out: &mut String,
    pairs: &[(String, Expression)],
    options: &WriteOptions,
    indent: usize,
) {
    if pairs.is_empty() {
        out.push_str("@()");
        return;
    }

    if options.human_readable {
        out.push_str("@(\n");
        for (key, value) in pairs {
            push_indent(out, indent + 1);
            write_value(out, key);
            out.push(' ');
            write_expression(out, value, options, indent + 1);
            out.push('\n');
        }
        push_indent(out, indent);
        out.push(')');
    } else {
        out.push_str("@(");
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_value(out, key);
            out.push(' ');
            write_expression(out, value, options, indent);
        }
        out.push(')');
    }
}

/// Write a string scalar, quoting and escaping when the bareword form would
/// not read back as the same value.
fn write_value(out: &mut String, value: &str) {
    if !needs_quoting(value) {
        out.push_str(value);
        return;
    }

    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// The bare words `null` and `nil` parse as Null, so values spelling them
/// must be quoted to survive a round trip.
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value == "null"
        || value == "nil"
        || value.chars().any(|c| is_reserved(c) || is_whitespace(c))
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}
