use crate::code::{Arg, CodeBlock};
use crate::engine::Engine;
use crate::error::InlineError;
use crate::runtime::{ClassRef, ObjRef, Value};
use crate::types::TypeName;

/// Plain objects: `new T()` followed by one setter call per field, in
/// declaration order, with the field's current value.
///
/// The class is fully validated before anything is emitted.
pub(crate) fn inline_bean(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    class: &ClassRef,
) -> Result<CodeBlock, InlineError> {
    let ty = TypeName::Class(class.name().clone());
    if !class.is_public() {
        return Err(InlineError::NotPublicType { ty });
    }
    if !class.has_public_no_arg_constructor() {
        return Err(InlineError::MissingConstructor { ty });
    }

    let mut setters = Vec::new();
    for field in class.fields() {
        let Some(setter) = field.setter() else {
            return Err(InlineError::MissingSetter {
                ty,
                field: field.name().to_string(),
                field_ty: field.ty().clone(),
            });
        };
        if field.getter().is_none() {
            return Err(InlineError::MissingGetter {
                ty,
                field: field.name().to_string(),
                field_ty: field.ty().clone(),
            });
        }
        setters.push((field.name().to_string(), setter.to_string()));
    }

    let name = engine.new_name(class.name().simple_name(), &Value::Object(obj.clone()));
    engine.emit("$T $N = new $T()", [Arg::ty(ty.clone()), Arg::name(&name), Arg::ty(ty)])?;
    for (field, setter) in setters {
        let current = obj.field(&field);
        let current = engine.dispatch(&current)?;
        engine.emit("$N.$N($L)", [Arg::name(&name), Arg::name(setter), Arg::code(current)])?;
    }
    Ok(CodeBlock::of("$N", [Arg::name(name)])?)
}
