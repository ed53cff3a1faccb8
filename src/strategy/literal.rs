//! Values with a literal form. These never go through the trust policy.
use crate::code::{char_literal, Arg, CodeBlock, FormatError};
use crate::error::InlineError;
use crate::runtime::Value;
use crate::types::{Primitive, TypeName};

/// Objects have no literal form and are refused with
/// [`InlineError::NotALiteral`]; the engine routes them elsewhere.
pub fn inline_literal(value: &Value) -> Result<CodeBlock, InlineError> {
    let code = match value {
        Value::Null => CodeBlock::raw("null"),
        Value::Bool(b) => CodeBlock::raw(b.to_string()),
        Value::Char(unit) => CodeBlock::raw(char_literal(*unit)),
        Value::Byte(n) => CodeBlock::raw(format!("(byte) {n}")),
        Value::Short(n) => CodeBlock::raw(format!("(short) {n}")),
        Value::Int(n) => CodeBlock::raw(n.to_string()),
        Value::Long(n) => CodeBlock::raw(format!("{n}L")),
        Value::Float(x) => float_literal(f64::from(*x), format!("{x:?}"), Primitive::Float, 'f')?,
        Value::Double(x) => float_literal(*x, format!("{x:?}"), Primitive::Double, 'd')?,
        Value::Str(s) => CodeBlock::of("$S", [Arg::str(s.as_str())])?,
        Value::Class(ty) => CodeBlock::of("$T.class", [Arg::ty(ty.erasure())])?,
        Value::Enum { ty, constant } => {
            CodeBlock::of("$T.$N", [Arg::ty(TypeName::Class(ty.clone())), Arg::name(constant.as_str())])?
        }
        Value::Object(obj) => {
            return Err(InlineError::NotALiteral { ty: obj.runtime_type().type_name() });
        }
    };
    Ok(code)
}

/// `shortest` is the shortest round-tripping text of the value at its own
/// precision; Rust's `{:?}` always includes a `.` or an exponent.
fn float_literal(
    value: f64,
    shortest: String,
    primitive: Primitive,
    suffix: char,
) -> Result<CodeBlock, FormatError> {
    let wrapper = Arg::ty(primitive.boxed());
    if value.is_nan() {
        CodeBlock::of("$T.NaN", [wrapper])
    } else if value == f64::INFINITY {
        CodeBlock::of("$T.POSITIVE_INFINITY", [wrapper])
    } else if value == f64::NEG_INFINITY {
        CodeBlock::of("$T.NEGATIVE_INFINITY", [wrapper])
    } else {
        Ok(CodeBlock::raw(format!("{shortest}{suffix}")))
    }
}
