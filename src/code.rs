//! Code fragments: format strings with typed placeholders, embeddable in one
//! another and rendered to text last.
//!
//! Placeholders:
//! - `$L` literal text, or an embedded [`CodeBlock`]
//! - `$S` a quoted, escaped string literal
//! - `$T` a type, rendered fully qualified
//! - `$N` an identifier (validated)
//! - `$$` a literal dollar sign
//! - `$>` / `$<` increase / decrease indentation for the following lines
use std::fmt;

use thiserror::Error;

use crate::types::{is_identifier, TypeName};

const INDENT: &str = "  ";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlock {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Type(TypeName),
    Code(CodeBlock),
    Indent,
    Unindent,
}

/// A positional argument for [`CodeBlock::of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Literal(String),
    Str(String),
    Type(TypeName),
    Name(String),
    Code(CodeBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("dangling '$' at the end of format `{format}`")]
    DanglingDollar { format: String },
    #[error("unknown placeholder '${placeholder}' in format `{format}`")]
    UnknownPlaceholder { placeholder: char, format: String },
    #[error("format `{format}` needs more than {given} argument(s)")]
    MissingArgument { format: String, given: usize },
    #[error("format `{format}` consumed {used} argument(s) but {given} were given")]
    UnusedArguments { format: String, used: usize, given: usize },
    #[error("argument {index} of format `{format}` does not fit '${placeholder}': {found}")]
    MismatchedArgument { format: String, index: usize, placeholder: char, found: String },
    #[error("`{name}` is not a valid identifier")]
    InvalidName { name: String },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Arg {
    pub fn lit(value: impl fmt::Display) -> Self {
        Arg::Literal(value.to_string())
    }
    pub fn str(value: impl Into<String>) -> Self {
        Arg::Str(value.into())
    }
    pub fn ty(value: impl Into<TypeName>) -> Self {
        Arg::Type(value.into())
    }
    pub fn name(value: impl Into<String>) -> Self {
        Arg::Name(value.into())
    }
    pub fn code(value: CodeBlock) -> Self {
        Arg::Code(value)
    }
}

impl From<CodeBlock> for Arg {
    fn from(value: CodeBlock) -> Self {
        Arg::Code(value)
    }
}

impl From<TypeName> for Arg {
    fn from(value: TypeName) -> Self {
        Arg::Type(value)
    }
}

impl CodeBlock {
    pub fn of<I>(format: &str, args: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = Arg>,
    {
        let args = args.into_iter().collect::<Vec<_>>();
        let mut out = CodeBlock::default();
        let mut next_arg = 0usize;
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push_char(c);
                continue;
            }
            let Some(placeholder) = chars.next() else {
                return Err(FormatError::DanglingDollar { format: format.to_string() });
            };
            match placeholder {
                '$' => out.push_char('$'),
                '>' => out.parts.push(Part::Indent),
                '<' => out.parts.push(Part::Unindent),
                'L' | 'S' | 'T' | 'N' => {
                    let Some(arg) = args.get(next_arg) else {
                        return Err(FormatError::MissingArgument {
                            format: format.to_string(),
                            given: args.len(),
                        });
                    };
                    out.push_arg(format, next_arg, placeholder, arg)?;
                    next_arg += 1;
                }
                other => {
                    return Err(FormatError::UnknownPlaceholder {
                        placeholder: other,
                        format: format.to_string(),
                    });
                }
            }
        }

        if next_arg != args.len() {
            return Err(FormatError::UnusedArguments {
                format: format.to_string(),
                used: next_arg,
                given: args.len(),
            });
        }
        Ok(out)
    }

    /// Verbatim text; no placeholder processing.
    pub fn raw(text: impl Into<String>) -> Self {
        let mut out = CodeBlock::default();
        out.push_str(&text.into());
        out
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn append(&mut self, other: CodeBlock) {
        for part in other.parts {
            match part {
                Part::Text(text) => self.push_str(&text),
                part => self.parts.push(part),
            }
        }
    }

    pub fn join<I>(blocks: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = CodeBlock>,
    {
        let mut out = CodeBlock::default();
        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.append(block);
        }
        out
    }

    fn push_arg(
        &mut self,
        format: &str,
        index: usize,
        placeholder: char,
        arg: &Arg,
    ) -> Result<(), FormatError> {
        let mismatch = |found: &str| FormatError::MismatchedArgument {
            format: format.to_string(),
            index,
            placeholder,
            found: found.to_string(),
        };
        match (placeholder, arg) {
            ('L', Arg::Literal(text) | Arg::Name(text)) => self.push_str(text),
            ('L', Arg::Str(text)) => self.push_str(text),
            ('L', Arg::Type(ty)) | ('T', Arg::Type(ty)) => self.parts.push(Part::Type(ty.clone())),
            ('L', Arg::Code(code)) => self.parts.push(Part::Code(code.clone())),
            ('S', Arg::Str(text) | Arg::Literal(text) | Arg::Name(text)) => {
                self.push_str(&string_literal(text))
            }
            ('N', Arg::Name(name)) => {
                if !is_identifier(name) {
                    return Err(FormatError::InvalidName { name: name.clone() });
                }
                self.push_str(name)
            }
            (_, Arg::Code(_)) => return Err(mismatch("code block")),
            (_, Arg::Type(ty)) => return Err(mismatch(&format!("type {ty}"))),
            (_, Arg::Literal(text) | Arg::Str(text) | Arg::Name(text)) => {
                return Err(mismatch(&format!("text `{text}`")));
            }
        }
        Ok(())
    }

    fn push_char(&mut self, c: char) {
        match self.parts.last_mut() {
            Some(Part::Text(text)) => text.push(c),
            _ => self.parts.push(Part::Text(c.to_string())),
        }
    }

    fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(Part::Text(text)) => text.push_str(s),
            _ => self.parts.push(Part::Text(s.to_string())),
        }
    }

    fn render(&self, out: &mut Renderer) {
        for part in &self.parts {
            match part {
                Part::Text(text) => out.write(text),
                Part::Type(ty) => out.write(&ty.to_string()),
                Part::Code(code) => code.render(out),
                Part::Indent => out.indent += 1,
                Part::Unindent => out.indent = out.indent.saturating_sub(1),
            }
        }
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Renderer::default();
        self.render(&mut out);
        f.write_str(&out.buf)
    }
}

#[derive(Default)]
struct Renderer {
    buf: String,
    indent: usize,
    mid_line: bool,
}

impl Renderer {
    fn write(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.buf.push('\n');
                self.mid_line = false;
                continue;
            }
            if !self.mid_line {
                for _ in 0..self.indent {
                    self.buf.push_str(INDENT);
                }
                self.mid_line = true;
            }
            self.buf.push(c);
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Java string literal, double-quoted. Anything outside printable ASCII is
/// written as `\uXXXX` per UTF-16 unit.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for unit in s.encode_utf16() {
        match unit {
            0x22 => out.push_str("\\\""),
            _ => push_escaped_unit(&mut out, unit),
        }
    }
    out.push('"');
    out
}

/// Java char literal for one UTF-16 unit.
pub fn char_literal(unit: u16) -> String {
    let mut out = String::with_capacity(8);
    out.push('\'');
    match unit {
        0x27 => out.push_str("\\'"),
        _ => push_escaped_unit(&mut out, unit),
    }
    out.push('\'');
    out
}

fn push_escaped_unit(out: &mut String, unit: u16) {
    match unit {
        0x5C => out.push_str("\\\\"),
        0x08 => out.push_str("\\b"),
        0x09 => out.push_str("\\t"),
        0x0A => out.push_str("\\n"),
        0x0C => out.push_str("\\f"),
        0x0D => out.push_str("\\r"),
        0x20..=0x7E => out.push(unit as u8 as char),
        _ => out.push_str(&format!("\\u{unit:04x}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassName, Primitive};

    #[test]
    fn placeholders_render_in_order() {
        let list = ClassName::new("java.util", "List");
        let block = CodeBlock::of(
            "$T $N = $L; // $S costs $$5",
            [Arg::ty(list), Arg::name("items"), Arg::lit(42), Arg::str("tab\there")],
        )
        .unwrap();
        assert_eq!(block.to_string(), r#"java.util.List items = 42; // "tab\there" costs $5"#);
    }

    #[test]
    fn embedded_blocks_follow_indentation() {
        let inner = CodeBlock::of("first();\nsecond();\n", []).unwrap();
        let outer = CodeBlock::of("run {\n$>$L$<}", [Arg::code(inner)]).unwrap();
        assert_eq!(outer.to_string(), "run {\n  first();\n  second();\n}");
    }

    #[test]
    fn malformed_formats_are_rejected() {
        assert!(matches!(
            CodeBlock::of("$L and $L", [Arg::lit(1)]),
            Err(FormatError::MissingArgument { given: 1, .. })
        ));
        assert!(matches!(
            CodeBlock::of("$L", [Arg::lit(1), Arg::lit(2)]),
            Err(FormatError::UnusedArguments { used: 1, given: 2, .. })
        ));
        assert!(matches!(
            CodeBlock::of("$Q", []),
            Err(FormatError::UnknownPlaceholder { placeholder: 'Q', .. })
        ));
        assert!(matches!(CodeBlock::of("cost: $", []), Err(FormatError::DanglingDollar { .. })));
        assert!(matches!(
            CodeBlock::of("$T", [Arg::lit("x")]),
            Err(FormatError::MismatchedArgument { placeholder: 'T', .. })
        ));
        assert!(matches!(
            CodeBlock::of("$N", [Arg::name("not valid")]),
            Err(FormatError::InvalidName { .. })
        ));
    }

    #[test]
    fn join_separates_blocks() {
        let args = [1, 2, 3].map(|n| CodeBlock::of("$L", [Arg::lit(n)]).unwrap());
        let call = CodeBlock::of(
            "$T.of($L)",
            [Arg::ty(TypeName::Primitive(Primitive::Int).boxed()), Arg::code(CodeBlock::join(args, ", "))],
        )
        .unwrap();
        assert_eq!(call.to_string(), "java.lang.Integer.of(1, 2, 3)");
    }

    #[test]
    fn literals_escape_non_printable_and_non_ascii() {
        assert_eq!(string_literal("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(string_literal("caf\u{e9}"), r#""caf\u00e9""#);
        assert_eq!(string_literal("\u{1F600}"), r#""\ud83d\ude00""#);
        assert_eq!(char_literal('\'' as u16), r"'\''");
        assert_eq!(char_literal('"' as u16), "'\"'");
        assert_eq!(char_literal(0x0007), r"'\u0007'");
        assert_eq!(char_literal('\\' as u16), r"'\\'");
    }
}
