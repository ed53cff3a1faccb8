//! The public entry point: configure trust and strategies, then turn values
//! into single Java expressions.
use std::rc::Rc;

use tracing::debug;

use crate::code::CodeBlock;
use crate::engine::{Engine, NameAllocator};
use crate::error::InlineError;
use crate::runtime::Value;
use crate::strategy::{StrategyRegistry, TypeStrategy};
use crate::trust::TrustPolicy;
use crate::types::TypeName;

pub const DEFAULT_NAME_PREFIX: &str = "$$inline$";

/// Everything an inlining call reads. Borrowed immutably for the whole
/// call, so rules and strategies cannot change under a running traversal.
#[derive(Debug, Clone)]
pub struct InlinerConfig {
    trust: TrustPolicy,
    strategies: StrategyRegistry,
    name_prefix: String,
}

impl InlinerConfig {
    pub fn trust(&self) -> &TrustPolicy {
        &self.trust
    }
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }
}

impl Default for InlinerConfig {
    fn default() -> Self {
        Self {
            trust: TrustPolicy::new(),
            strategies: StrategyRegistry::default(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

/// ```ignore
/// let inliner = Inliner::new()
///     .trust_types_assignable_to([jdk::list_name()])
///     .trust_exact_types([person.name()]);
/// let expr = inliner.inlined(&value)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inliner {
    config: InlinerConfig,
}

impl Inliner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust these runtime classes, and not their subclasses.
    pub fn trust_exact_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.config.trust.add_exact(types);
        self
    }

    /// Trust everything assignable to these types.
    pub fn trust_types_assignable_to<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.config.trust.add_assignable(types);
        self
    }

    /// Consulted after every strategy added before it.
    pub fn add_type_inliner(mut self, strategy: impl TypeStrategy + 'static) -> Self {
        self.config.strategies.register(Rc::new(strategy));
        self
    }

    pub fn use_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.name_prefix = prefix.into();
        self
    }

    pub fn config(&self) -> &InlinerConfig {
        &self.config
    }

    /// Build one expression that evaluates to a copy of `value`.
    ///
    /// Each call starts with fresh names and a fresh recursion guard. On
    /// error nothing of the attempt is returned.
    pub fn inlined(&self, value: &Value) -> Result<CodeBlock, InlineError> {
        let prefix = self.config.name_prefix();
        if !NameAllocator::is_valid_prefix(prefix) {
            return Err(InlineError::InvalidNamePrefix { prefix: prefix.to_string() });
        }
        debug!(ty = %value.declared_type(), "inlining");
        let expr = Engine::new(&self.config).run(value)?;
        debug!(ty = %value.declared_type(), "inlined");
        Ok(expr)
    }
}
