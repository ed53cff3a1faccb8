//! Java type names as they appear in generated source.
//!
//! Rendering is always fully qualified; import resolution belongs to whoever
//! places the generated fragments into a compilation unit.
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A single Java identifier (ASCII subset).
pub static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex is valid")
});

pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s) && !is_keyword(s)
}

fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "abstract" | "assert" | "boolean" | "break" | "byte" | "case" | "catch" | "char"
            | "class" | "const" | "continue" | "default" | "do" | "double" | "else" | "enum"
            | "extends" | "final" | "finally" | "float" | "for" | "goto" | "if" | "implements"
            | "import" | "instanceof" | "int" | "interface" | "long" | "native" | "new"
            | "package" | "private" | "protected" | "public" | "return" | "short" | "static"
            | "strictfp" | "super" | "switch" | "synchronized" | "this" | "throw" | "throws"
            | "transient" | "try" | "void" | "volatile" | "while" | "true" | "false" | "null"
    )
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

/// `java.util.Map.Entry` is package `java.util`, simple names `[Map, Entry]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    package: String,
    simple_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Primitive(Primitive),
    Class(ClassName),
    Array(Box<TypeName>),
    Parameterized { raw: ClassName, args: Vec<TypeName> },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Char,
        Primitive::Byte,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Char => "char",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == s)
    }

    pub fn boxed(self) -> ClassName {
        let simple = match self {
            Primitive::Boolean => "Boolean",
            Primitive::Char => "Character",
            Primitive::Byte => "Byte",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
        };
        ClassName::new("java.lang", simple)
    }

    pub fn unboxed(name: &ClassName) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed() == *name)
    }
}

impl ClassName {
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self { package: package.into(), simple_names: vec![simple_name.into()] }
    }

    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.simple_names.push(simple_name.into());
        out
    }

    /// Parse a canonical name. Segments up to the first one starting with an
    /// uppercase letter form the package; the rest are (nested) simple names.
    pub fn parse(canonical: &str) -> Option<Self> {
        let segments = canonical.split('.').collect::<Vec<_>>();
        if segments.iter().any(|s| !is_identifier(s)) {
            return None;
        }
        let split = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_ascii_uppercase()))
            .unwrap_or(segments.len() - 1);
        Some(Self {
            package: segments[..split].join("."),
            simple_names: segments[split..].iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    pub fn canonical_name(&self) -> String {
        self.to_string()
    }
}

impl TypeName {
    pub fn array_of(component: impl Into<TypeName>) -> Self {
        TypeName::Array(Box::new(component.into()))
    }

    pub fn parameterized(raw: ClassName, args: Vec<TypeName>) -> Self {
        TypeName::Parameterized { raw, args }
    }

    /// Parse `int`, `java.lang.String`, `int[][]`. Type arguments are not
    /// accepted; runtime types are always raw.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(component) = s.strip_suffix("[]") {
            return Self::parse(component).map(TypeName::array_of);
        }
        match Primitive::from_keyword(s) {
            Some(p) => Some(TypeName::Primitive(p)),
            None => ClassName::parse(s).map(TypeName::Class),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeName::Primitive(_))
    }

    /// Primitives become their wrapper class; everything else is unchanged.
    pub fn boxed(&self) -> TypeName {
        match self {
            TypeName::Primitive(p) => TypeName::Class(p.boxed()),
            other => other.clone(),
        }
    }

    /// Drop type arguments, recursively through arrays.
    pub fn erasure(&self) -> TypeName {
        match self {
            TypeName::Parameterized { raw, .. } => TypeName::Class(raw.clone()),
            TypeName::Array(component) => TypeName::array_of(component.erasure()),
            other => other.clone(),
        }
    }

    /// Innermost non-array component and the array depth.
    pub fn array_base(&self) -> (&TypeName, usize) {
        let mut current = self;
        let mut dims = 0;
        while let TypeName::Array(component) = current {
            current = component;
            dims += 1;
        }
        (current, dims)
    }

    /// `int[][]` becomes `intArrayArray`; used as a naming hint.
    pub fn hint(&self) -> String {
        match self {
            TypeName::Primitive(p) => p.keyword().to_string(),
            TypeName::Class(name) | TypeName::Parameterized { raw: name, .. } => {
                name.simple_name().to_string()
            }
            TypeName::Array(component) => format!("{}Array", component.hint()),
        }
    }
}

impl From<Primitive> for TypeName {
    fn from(value: Primitive) -> Self {
        TypeName::Primitive(value)
    }
}

impl From<ClassName> for TypeName {
    fn from(value: ClassName) -> Self {
        TypeName::Class(value)
    }
}

impl From<&ClassName> for TypeName {
    fn from(value: &ClassName) -> Self {
        TypeName::Class(value.clone())
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.package.is_empty() {
            write!(f, "{}.", self.package)?;
        }
        write!(f, "{}", self.simple_names.join("."))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Primitive(p) => f.write_str(p.keyword()),
            TypeName::Class(name) => write!(f, "{name}"),
            TypeName::Array(component) => write!(f, "{component}[]"),
            TypeName::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}
