use std::collections::HashMap;

use crate::types::{is_identifier, IDENTIFIER};

/// Hands out local variable names for one top-level inlining call.
///
/// A name is `prefix + hint`, and repeats of the same base get `$1`, `$2`, ...
/// Hints are reduced to `[A-Za-z0-9_]`, so the `$` separator can never
/// collide with another base. The prefix may be empty; a base that is then a
/// keyword or starts with a digit gets a leading `_`.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
    counters: HashMap<String, usize>,
}

impl NameAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counters: HashMap::new() }
    }

    pub fn is_valid_prefix(prefix: &str) -> bool {
        prefix.is_empty() || IDENTIFIER.is_match(prefix)
    }

    pub fn allocate(&mut self, hint: &str) -> String {
        let mut base = format!("{}{}", self.prefix, sanitize(hint));
        if !is_identifier(&base) {
            base.insert(0, '_');
        }
        let count = self.counters.entry(base.clone()).or_insert(0);
        let name = if *count == 0 { base } else { format!("{base}${count}") };
        *count += 1;
        name
    }
}

fn sanitize(hint: &str) -> String {
    let out = hint
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>();
    if out.is_empty() { "value".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_suffixed() {
        let mut names = NameAllocator::new("$$inline$");
        assert_eq!(names.allocate("Person"), "$$inline$Person");
        assert_eq!(names.allocate("Person"), "$$inline$Person$1");
        assert_eq!(names.allocate("ArrayList"), "$$inline$ArrayList");
        assert_eq!(names.allocate("Person"), "$$inline$Person$2");
    }

    #[test]
    fn hints_are_reduced_to_identifier_characters() {
        let mut names = NameAllocator::new("v_");
        assert_eq!(names.allocate("Map.Entry"), "v_MapEntry");
        assert_eq!(names.allocate("$$$"), "v_value");
        assert_eq!(names.allocate("Tricky$1"), "v_Tricky1");
        assert_eq!(names.allocate("Tricky1"), "v_Tricky1$1");
    }

    #[test]
    fn prefixes_must_start_an_identifier() {
        assert!(NameAllocator::is_valid_prefix("$$inline$"));
        assert!(NameAllocator::is_valid_prefix("_tmp"));
        assert!(!NameAllocator::is_valid_prefix("9lives"));
        assert!(NameAllocator::is_valid_prefix(""));
        assert!(!NameAllocator::is_valid_prefix("has space"));
    }

    #[test]
    fn empty_prefix_still_yields_identifiers() {
        let mut names = NameAllocator::new("");
        assert_eq!(names.allocate("Person"), "Person");
        assert_eq!(names.allocate("int"), "_int");
        assert_eq!(names.allocate("int"), "_int$1");
        assert_eq!(names.allocate("9lives"), "_9lives");
        assert_eq!(names.allocate("intArray"), "intArray");
    }
}
