//! How values become code.
//!
//! Registered [`TypeStrategy`] implementations are consulted first, in
//! registration order, strictly first-match. Anything they decline falls
//! back to the built-in strategy picked by the object's runtime shape.
pub mod array;
pub mod bean;
pub mod collection;
pub mod literal;

use std::fmt;
use std::rc::Rc;

use crate::code::CodeBlock;
use crate::engine::Engine;
use crate::error::InlineError;
use crate::runtime::{ObjRef, ObjectData, RuntimeType, Value};

// -------------------------------- Registry -------------------------------- //

/// A pluggable way to inline some values. Only trusted, non-literal values
/// are ever offered.
pub trait TypeStrategy {
    fn can_handle(&self, value: &Value) -> bool;

    /// Produce an expression for `value`. Use [`Engine::inlined`] for
    /// sub-values and [`Engine::emit`] for any statements needed first.
    fn inline(&self, engine: &mut Engine<'_>, value: &Value) -> Result<CodeBlock, InlineError>;
}

#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Rc<dyn TypeStrategy>>,
}

impl StrategyRegistry {
    pub fn register(&mut self, strategy: Rc<dyn TypeStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn find(&self, value: &Value) -> Option<&Rc<dyn TypeStrategy>> {
        self.strategies.iter().find(|s| s.can_handle(value))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry").field("len", &self.strategies.len()).finish()
    }
}

// ------------------------------ Closures ---------------------------------- //

/// A [`TypeStrategy`] made of two closures.
pub struct FnStrategy<P, F> {
    predicate: P,
    inline: F,
}

pub fn from_fns<P, F>(predicate: P, inline: F) -> FnStrategy<P, F>
where
    P: Fn(&Value) -> bool,
    F: Fn(&mut Engine<'_>, &Value) -> Result<CodeBlock, InlineError>,
{
    FnStrategy { predicate, inline }
}

impl<P, F> TypeStrategy for FnStrategy<P, F>
where
    P: Fn(&Value) -> bool,
    F: Fn(&mut Engine<'_>, &Value) -> Result<CodeBlock, InlineError>,
{
    fn can_handle(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn inline(&self, engine: &mut Engine<'_>, value: &Value) -> Result<CodeBlock, InlineError> {
        (self.inline)(engine, value)
    }
}

// ------------------------------ Built-ins --------------------------------- //

/// Fallback for objects no registered strategy claimed.
pub(crate) fn inline_builtin(engine: &mut Engine<'_>, obj: &ObjRef) -> Result<CodeBlock, InlineError> {
    // Elements are cloned out so the walk never holds a borrow of `obj`.
    let (ty, data) = {
        let object = obj.borrow();
        (object.runtime_type().clone(), object.data().clone())
    };
    match (data, ty) {
        (ObjectData::Array(elements), ty) => array::inline_array(engine, obj, &ty.type_name(), &elements),
        (ObjectData::List(elements), ty) => {
            collection::inline_list(engine, obj, &ty.type_name().hint(), &elements)
        }
        (ObjectData::Set(elements), ty) => {
            collection::inline_set(engine, obj, &ty.type_name().hint(), &elements)
        }
        (ObjectData::Map(entries), ty) => {
            collection::inline_map(engine, obj, &ty.type_name().hint(), &entries)
        }
        (ObjectData::Bean(_), RuntimeType::Class(class)) => bean::inline_bean(engine, obj, &class),
        (ObjectData::Bean(_), ty) => Err(InlineError::MissingConstructor { ty: ty.type_name() }),
    }
}
