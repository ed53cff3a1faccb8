//! Allow-list of types the inliner may serialize.
//!
//! - exact rules match one runtime class and nothing derived from it
//! - assignable rules match a supertype and everything assignable to it
//!
//! Literal kinds (null, primitives and wrappers, strings, class literals,
//! enum constants, arrays of those) never reach the policy.
use crate::runtime::RuntimeType;
use crate::types::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Exact,
    Assignable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustRule {
    pub kind: RuleKind,
    pub ty: TypeName,
}

#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    rules: Vec<TrustRule>,
}

impl TrustRule {
    pub fn matches(&self, runtime: &RuntimeType) -> bool {
        match self.kind {
            RuleKind::Exact => runtime.type_name() == self.ty.erasure(),
            RuleKind::Assignable => runtime.is_assignable_to(&self.ty),
        }
    }
}

impl TrustPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exact<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        for ty in types {
            self.insert(RuleKind::Exact, ty.into());
        }
    }

    pub fn add_assignable<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        for ty in types {
            self.insert(RuleKind::Assignable, ty.into());
        }
    }

    pub fn is_trusted(&self, runtime: &RuntimeType) -> bool {
        self.rules.iter().any(|rule| rule.matches(runtime))
    }

    pub fn rules(&self) -> &[TrustRule] {
        &self.rules
    }

    // set semantics
    fn insert(&mut self, kind: RuleKind, ty: TypeName) {
        let rule = TrustRule { kind, ty: ty.erasure() };
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{jdk, ClassDescriptor, ClassRef};
    use crate::types::{ClassName, Primitive};

    fn class(ty: &ClassRef) -> RuntimeType {
        RuntimeType::Class(ty.clone())
    }

    #[test]
    fn exact_rules_reject_subclasses() {
        let base = ClassDescriptor::builder(ClassName::new("com.example", "Base")).build();
        let derived =
            ClassDescriptor::builder(ClassName::new("com.example", "Derived")).extends(&base).build();

        let mut policy = TrustPolicy::new();
        policy.add_exact([base.name().clone()]);
        assert!(policy.is_trusted(&class(&base)));
        assert!(!policy.is_trusted(&class(&derived)));
    }

    #[test]
    fn assignable_rules_accept_implementations() {
        let mut policy = TrustPolicy::new();
        policy.add_assignable([jdk::list_name(), jdk::map_name()]);
        assert!(policy.is_trusted(&class(&jdk::ARRAY_LIST)));
        assert!(policy.is_trusted(&class(&jdk::LINKED_LIST)));
        assert!(policy.is_trusted(&class(&jdk::TREE_MAP)));
        assert!(!policy.is_trusted(&class(&jdk::HASH_SET)));
    }

    #[test]
    fn array_types_follow_component_assignability() {
        let person = ClassDescriptor::builder(ClassName::new("com.example", "Person")).build();
        let people = RuntimeType::array_of(class(&person));

        let mut exact = TrustPolicy::new();
        exact.add_exact([TypeName::array_of(person.name().clone())]);
        assert!(exact.is_trusted(&people));

        let mut objects = TrustPolicy::new();
        objects.add_assignable([TypeName::array_of(jdk::object_name())]);
        assert!(objects.is_trusted(&people));
        assert!(!objects.is_trusted(&RuntimeType::array_of(RuntimeType::Primitive(Primitive::Int))));
    }

    #[test]
    fn duplicate_rules_are_collapsed() {
        let mut policy = TrustPolicy::new();
        policy.add_assignable([jdk::set_name(), jdk::set_name()]);
        policy.add_exact([jdk::set_name()]);
        assert_eq!(policy.rules().len(), 2);
    }
}
