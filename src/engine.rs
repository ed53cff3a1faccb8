//! Scoped emission: walks one value graph depth-first and collects the
//! statements needed to rebuild it.
//!
//! - Built-in strategies emit into the current scope, so everything they
//!   reach shares one flat statement list and one name table. A repeated or
//!   self-referencing object resolves to its already-declared variable.
//! - [`Engine::inlined`], the entry point for registered strategies, opens a
//!   child scope per sub-value and closes it into a single expression. Child
//!   scopes see none of the parent's names, so an object still under
//!   construction reached this way is a circular reference.
pub mod guard;
pub mod names;
pub mod scope;

use tracing::{debug, trace};

use crate::code::{Arg, CodeBlock};
use crate::error::InlineError;
use crate::inliner::InlinerConfig;
use crate::runtime::{ObjRef, RuntimeType, Value};
use crate::strategy;

pub use guard::RecursionGuard;
pub use names::NameAllocator;
pub use scope::Scope;

/// Per-call state handed to [`TypeStrategy`](crate::strategy::TypeStrategy)
/// implementations.
pub struct Engine<'a> {
    config: &'a InlinerConfig,
    names: NameAllocator,
    guard: RecursionGuard,
    scope: Scope,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(config: &'a InlinerConfig) -> Self {
        Self {
            config,
            names: NameAllocator::new(config.name_prefix()),
            guard: RecursionGuard::default(),
            scope: Scope::default(),
        }
    }

    /// Inline `value` in the outermost scope and close it.
    pub(crate) fn run(mut self, value: &Value) -> Result<CodeBlock, InlineError> {
        let result = self.dispatch(value)?;
        let scope = std::mem::take(&mut self.scope);
        Ok(scope.close(result, &value.declared_type())?)
    }

    /// Inline a sub-value as a self-contained expression. Statements it
    /// needs are hidden inside a closure; nothing is added to the caller's
    /// scope.
    pub fn inlined(&mut self, value: &Value) -> Result<CodeBlock, InlineError> {
        let parent = std::mem::take(&mut self.scope);
        self.scope = Scope::child_of(parent);
        trace!(depth = self.guard.depth(), "child scope opened");

        let result = self.dispatch(value);

        let parent = self.scope.take_parent().unwrap_or_default();
        let child = std::mem::replace(&mut self.scope, parent);
        trace!(depth = self.guard.depth(), statements = !child.is_empty(), "child scope closed");
        Ok(child.close(result?, &value.declared_type())?)
    }

    /// Append a statement to the current scope.
    pub fn emit<I>(&mut self, format: &str, args: I) -> Result<(), InlineError>
    where
        I: IntoIterator<Item = Arg>,
    {
        let statement = CodeBlock::of(format, args)?;
        self.scope.push(statement);
        Ok(())
    }

    pub fn emit_code(&mut self, statement: CodeBlock) {
        self.scope.push(statement);
    }

    /// Allocate a fresh local name. Objects are recorded under it in the
    /// current scope, so later visits resolve to the name.
    pub fn new_name(&mut self, hint: &str, value: &Value) -> String {
        let name = self.names.allocate(hint);
        if let Value::Object(obj) = value {
            self.scope.declare(obj.identity(), name.clone());
        }
        name
    }

    /// Name an object was declared under in the current scope.
    pub fn get_name(&self, value: &Value) -> Option<&str> {
        value.as_object().and_then(|obj| self.scope.name_of(obj.identity()))
    }

    /// Inline `value` into the current scope.
    pub(crate) fn dispatch(&mut self, value: &Value) -> Result<CodeBlock, InlineError> {
        match value {
            Value::Object(obj) => self.dispatch_object(obj),
            literal => strategy::literal::inline_literal(literal),
        }
    }

    fn dispatch_object(&mut self, obj: &ObjRef) -> Result<CodeBlock, InlineError> {
        let ty = obj.runtime_type();
        let literal_array = matches!(&ty, RuntimeType::Array(component) if component.is_literal_component());
        if !literal_array && !self.config.trust().is_trusted(&ty) {
            debug!(ty = %ty.type_name(), "untrusted type rejected");
            return Err(InlineError::UntrustedType { ty: ty.type_name() });
        }

        let id = obj.identity();
        if let Some(name) = self.scope.name_of(id) {
            trace!(name, "reusing declared object");
            return Ok(CodeBlock::of("$N", [Arg::name(name)])?);
        }
        if !self.guard.enter(id) {
            debug!(ty = %ty.type_name(), "object revisited while under construction");
            return Err(InlineError::CircularReference { ty: ty.type_name() });
        }
        let result = self.construct(obj, &ty, literal_array);
        self.guard.leave(id);
        result
    }

    fn construct(
        &mut self,
        obj: &ObjRef,
        ty: &RuntimeType,
        literal_array: bool,
    ) -> Result<CodeBlock, InlineError> {
        let value = Value::Object(obj.clone());
        if !literal_array {
            let config = self.config;
            if let Some(custom) = config.strategies().find(&value) {
                debug!(ty = %ty.type_name(), "using registered type inliner");
                return custom.inline(self, &value);
            }
        }
        trace!(ty = %ty.type_name(), "using built-in strategy");
        strategy::inline_builtin(self, obj)
    }
}
