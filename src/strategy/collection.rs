//! Lists, sets and maps, rebuilt through insertion-ordered `java.util`
//! implementations sized to their element count.
use crate::code::{Arg, CodeBlock};
use crate::engine::Engine;
use crate::error::InlineError;
use crate::runtime::{jdk, ObjRef, Value};
use crate::types::ClassName;

pub(crate) fn inline_list(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    hint: &str,
    elements: &[Value],
) -> Result<CodeBlock, InlineError> {
    let concrete = jdk::ARRAY_LIST.name().clone();
    inline_collection(engine, obj, hint, jdk::list_name(), concrete, elements)
}

pub(crate) fn inline_set(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    hint: &str,
    elements: &[Value],
) -> Result<CodeBlock, InlineError> {
    let concrete = jdk::LINKED_HASH_SET.name().clone();
    inline_collection(engine, obj, hint, jdk::set_name(), concrete, elements)
}

pub(crate) fn inline_map(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    hint: &str,
    entries: &[(Value, Value)],
) -> Result<CodeBlock, InlineError> {
    let concrete = jdk::LINKED_HASH_MAP.name().clone();
    let name = declare(engine, obj, hint, jdk::map_name(), concrete, entries.len())?;
    for (key, value) in entries {
        let key = engine.dispatch(key)?;
        let value = engine.dispatch(value)?;
        engine.emit("$N.put($L, $L)", [Arg::name(&name), Arg::code(key), Arg::code(value)])?;
    }
    Ok(CodeBlock::of("$N", [Arg::name(name)])?)
}

fn inline_collection(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    hint: &str,
    interface: ClassName,
    concrete: ClassName,
    elements: &[Value],
) -> Result<CodeBlock, InlineError> {
    let name = declare(engine, obj, hint, interface, concrete, elements.len())?;
    for element in elements {
        let element = engine.dispatch(element)?;
        engine.emit("$N.add($L)", [Arg::name(&name), Arg::code(element)])?;
    }
    Ok(CodeBlock::of("$N", [Arg::name(name)])?)
}

fn declare(
    engine: &mut Engine<'_>,
    obj: &ObjRef,
    hint: &str,
    interface: ClassName,
    concrete: ClassName,
    size: usize,
) -> Result<String, InlineError> {
    let name = engine.new_name(hint, &Value::Object(obj.clone()));
    engine.emit(
        "$T $N = new $T($L)",
        [Arg::ty(interface), Arg::name(&name), Arg::ty(concrete), Arg::lit(size)],
    )?;
    Ok(name)
}
