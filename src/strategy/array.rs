use crate::code::{Arg, CodeBlock};
use crate::engine::Engine;
use crate::error::InlineError;
use crate::runtime::{ObjRef, Value};
use crate::types::TypeName;

/// `T[] a = new T[n];` then `a[i] = ...;` for every index in order.
pub(crate) fn inline_array(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    ty: &TypeName,
    elements: &[Value],
) -> Result<CodeBlock, InlineError> {
    let (base, dims) = ty.array_base();
    let name = engine.new_name(&ty.hint(), &Value::Object(obj.clone()));
    engine.emit(
        "$T $N = new $T[$L]$L",
        [
            Arg::ty(ty.clone()),
            Arg::name(&name),
            Arg::ty(base.clone()),
            Arg::lit(elements.len()),
            Arg::lit("[]".repeat(dims.saturating_sub(1))),
        ],
    )?;
    for (index, element) in elements.iter().enumerate() {
        let element = engine.dispatch(element)?;
        engine.emit("$N[$L] = $L", [Arg::name(&name), Arg::lit(index), Arg::code(element)])?;
    }
    Ok(CodeBlock::of("$N", [Arg::name(name)])?)
}
