//! Descriptors for the `java.lang` / `java.util` classes graphs are built from.
use once_cell::sync::Lazy;

use super::{ClassDescriptor, ClassRef};
use crate::types::{ClassName, Primitive};

// --------------------------------- Names ---------------------------------- //

fn lang(simple: &str) -> ClassName {
    ClassName::new("java.lang", simple)
}

fn util(simple: &str) -> ClassName {
    ClassName::new("java.util", simple)
}

pub fn object_name() -> ClassName {
    lang("Object")
}
pub fn string_name() -> ClassName {
    lang("String")
}
pub fn class_name() -> ClassName {
    lang("Class")
}
pub fn list_name() -> ClassName {
    util("List")
}
pub fn set_name() -> ClassName {
    util("Set")
}
pub fn map_name() -> ClassName {
    util("Map")
}
pub fn supplier_name() -> ClassName {
    ClassName::new("java.util.function", "Supplier")
}

// ------------------------------ Descriptors ------------------------------- //

pub static OBJECT: Lazy<ClassRef> = Lazy::new(|| ClassDescriptor::builder(object_name()).build());

pub static STRING: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(string_name()).extends(&OBJECT).implements(&CHAR_SEQUENCE).build()
});
static CHAR_SEQUENCE: Lazy<ClassRef> =
    Lazy::new(|| ClassDescriptor::builder(lang("CharSequence")).interface().build());

pub static ITERABLE: Lazy<ClassRef> =
    Lazy::new(|| ClassDescriptor::builder(lang("Iterable")).interface().build());
pub static COLLECTION: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("Collection")).interface().implements(&ITERABLE).build()
});
pub static LIST: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(list_name()).interface().implements(&COLLECTION).build()
});
pub static SET: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(set_name()).interface().implements(&COLLECTION).build()
});
pub static SORTED_SET: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("SortedSet")).interface().implements(&SET).build()
});
pub static MAP: Lazy<ClassRef> =
    Lazy::new(|| ClassDescriptor::builder(map_name()).interface().build());
pub static SORTED_MAP: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("SortedMap")).interface().implements(&MAP).build()
});

pub static ARRAY_LIST: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("ArrayList")).extends(&OBJECT).implements(&LIST).build()
});
pub static LINKED_LIST: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("LinkedList")).extends(&OBJECT).implements(&LIST).build()
});
pub static HASH_SET: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("HashSet")).extends(&OBJECT).implements(&SET).build()
});
pub static LINKED_HASH_SET: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("LinkedHashSet")).extends(&HASH_SET).implements(&SET).build()
});
pub static TREE_SET: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("TreeSet")).extends(&OBJECT).implements(&SORTED_SET).build()
});
pub static HASH_MAP: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("HashMap")).extends(&OBJECT).implements(&MAP).build()
});
pub static LINKED_HASH_MAP: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("LinkedHashMap")).extends(&HASH_MAP).implements(&MAP).build()
});
pub static TREE_MAP: Lazy<ClassRef> = Lazy::new(|| {
    ClassDescriptor::builder(util("TreeMap")).extends(&OBJECT).implements(&SORTED_MAP).build()
});

/// Known descriptor by canonical name.
pub fn lookup(canonical: &str) -> Option<ClassRef> {
    let known: [&Lazy<ClassRef>; 18] = [
        &OBJECT,
        &STRING,
        &CHAR_SEQUENCE,
        &ITERABLE,
        &COLLECTION,
        &LIST,
        &SET,
        &SORTED_SET,
        &MAP,
        &SORTED_MAP,
        &ARRAY_LIST,
        &LINKED_LIST,
        &HASH_SET,
        &LINKED_HASH_SET,
        &TREE_SET,
        &HASH_MAP,
        &LINKED_HASH_MAP,
        &TREE_MAP,
    ];
    known
        .into_iter()
        .map(|class| ClassRef::clone(class))
        .find(|class| class.name().canonical_name() == canonical)
}

/// Supertypes every array has.
pub fn is_array_supertype(name: &ClassName) -> bool {
    *name == object_name()
        || *name == lang("Cloneable")
        || *name == ClassName::new("java.io", "Serializable")
}

/// Classes whose instances have a literal form.
pub fn is_literal_class(name: &ClassName) -> bool {
    *name == string_name()
        || *name == class_name()
        || Primitive::ALL.into_iter().any(|p| p.boxed() == *name)
}

// --------------------------------- Tests ---------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_see_their_interfaces() {
        assert!(LINKED_HASH_SET.is_subtype_of(&set_name()));
        assert!(LINKED_HASH_SET.is_subtype_of(&util("HashSet")));
        assert!(TREE_SET.is_subtype_of(&util("Collection")));
        assert!(ARRAY_LIST.is_subtype_of(&lang("Iterable")));
        assert!(!ARRAY_LIST.is_subtype_of(&set_name()));
        assert!(TREE_MAP.is_subtype_of(&map_name()));
    }

    #[test]
    fn lookup_by_canonical_name() {
        assert!(lookup("java.util.LinkedHashMap").is_some());
        assert!(lookup("java.util.Vector").is_none());
    }

    #[test]
    fn wrappers_and_strings_are_literal_classes() {
        assert!(is_literal_class(&lang("Integer")));
        assert!(is_literal_class(&lang("Character")));
        assert!(is_literal_class(&string_name()));
        assert!(!is_literal_class(&object_name()));
    }
}
