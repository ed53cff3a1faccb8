//! JSON graph documents: class descriptors, a table of objects that may
//! reference each other (and themselves) by id, and the root value.
//!
//! ```json
//! {
//!   "classes": [{"name": "com.example.Node", "fields": [{"name": "next", "type": "com.example.Node"}]}],
//!   "trust": {"exact": ["com.example.Node"]},
//!   "objects": {"n": {"class": "com.example.Node", "fields": {"next": {"ref": "n"}}}},
//!   "root": {"ref": "n"}
//! }
//! ```
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::inliner::Inliner;
use crate::path_de::{from_slice_with_path, from_str_with_path, PathError};
use crate::runtime::{jdk, ClassDescriptor, ClassRef, FieldDescriptor, ObjRef, Object, RuntimeType, Value};
use crate::types::{ClassName, Primitive, TypeName};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub trust: TrustDecl,
    #[serde(default)]
    pub objects: IndexMap<String, ObjectDecl>,
    pub root: ValueDecl,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustDecl {
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub assignable: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub kind: KindDecl,
    #[serde(default = "yes")]
    pub public: bool,
    /// public no-argument constructor
    #[serde(default = "yes")]
    pub constructor: bool,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDecl {
    #[default]
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "yes")]
    pub setter: bool,
    #[serde(default = "yes")]
    pub getter: bool,
}

/// Exactly one of `array`, `list`, `set`, `map`, `fields` must be present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDecl {
    #[serde(default)]
    pub class: Option<String>,
    /// Component type of an `array`.
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub array: Option<Vec<ValueDecl>>,
    #[serde(default)]
    pub list: Option<Vec<ValueDecl>>,
    #[serde(default)]
    pub set: Option<Vec<ValueDecl>>,
    #[serde(default)]
    pub map: Option<Vec<(ValueDecl, ValueDecl)>>,
    #[serde(default)]
    pub fields: Option<IndexMap<String, ValueDecl>>,
}

/// `null`, booleans, numbers and strings stand for themselves; everything
/// else is a single-key object such as `{"long": 1}` or `{"ref": "id"}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValueDecl {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Str(String),
    Tagged(TaggedValue),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggedValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Class(String),
    Enum(EnumDecl),
    Ref(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDecl {
    #[serde(rename = "type")]
    pub ty: String,
    pub constant: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Decode(#[from] PathError),
    #[error("`{0}` is not a valid type name")]
    InvalidType(String),
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),
    #[error("unknown object id `{0}`")]
    UnknownObject(String),
    #[error("object `{id}`: {message}")]
    InvalidObject { id: String, message: String },
    #[error("{value} does not fit in a `{ty}`")]
    OutOfRange { ty: &'static str, value: String },
    #[error("char {0:?} needs more than one UTF-16 unit")]
    WideChar(char),
}

/// A decoded document: live objects plus the trust rules it asked for.
#[derive(Debug)]
pub struct Graph {
    pub root: Value,
    pub classes: IndexMap<String, ClassRef>,
    pub objects: IndexMap<String, ObjRef>,
    pub trust_exact: Vec<TypeName>,
    pub trust_assignable: Vec<TypeName>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

fn yes() -> bool {
    true
}

impl GraphDocument {
    pub fn parse(src: &str) -> Result<Self, DocumentError> {
        Ok(from_str_with_path(src)?)
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(from_slice_with_path(bytes)?)
    }

    /// Build the object graph. Objects are allocated first and filled
    /// second, so any object may refer to any other.
    pub fn load(self) -> Result<Graph, DocumentError> {
        let mut loader = Loader::default();
        for decl in &self.classes {
            loader.declare_class(decl)?;
        }
        for (id, decl) in &self.objects {
            let obj = loader.allocate(id, decl)?;
            loader.objects.insert(id.clone(), obj);
        }
        for (id, decl) in &self.objects {
            loader.fill(id, decl)?;
        }
        let root = loader.value(&self.root)?;
        let trust_exact: Vec<TypeName> =
            self.trust.exact.iter().map(|s| parse_type(s)).collect::<Result<_, _>>()?;
        let trust_assignable: Vec<TypeName> =
            self.trust.assignable.iter().map(|s| parse_type(s)).collect::<Result<_, _>>()?;
        debug!(classes = loader.classes.len(), objects = loader.objects.len(), "graph document loaded");
        Ok(Graph {
            root,
            classes: loader.classes,
            objects: loader.objects,
            trust_exact,
            trust_assignable,
        })
    }
}

impl Graph {
    /// Add the document's own trust rules to `inliner`.
    pub fn configure(&self, inliner: Inliner) -> Inliner {
        inliner
            .trust_exact_types(self.trust_exact.iter().cloned())
            .trust_types_assignable_to(self.trust_assignable.iter().cloned())
    }
}

#[derive(Default)]
struct Loader {
    classes: IndexMap<String, ClassRef>,
    objects: IndexMap<String, ObjRef>,
    boxed: HashMap<String, ClassRef>,
}

impl Loader {
    fn declare_class(&mut self, decl: &ClassDecl) -> Result<(), DocumentError> {
        let name = ClassName::parse(&decl.name).ok_or_else(|| DocumentError::InvalidType(decl.name.clone()))?;
        let canonical = name.canonical_name();
        if self.classes.contains_key(&canonical) || jdk::lookup(&canonical).is_some() {
            return Err(DocumentError::DuplicateClass(canonical));
        }
        let mut builder = ClassDescriptor::builder(name);
        builder = match decl.kind {
            KindDecl::Class => builder,
            KindDecl::Interface => builder.interface(),
            KindDecl::Enum => builder.enumeration(),
        };
        if !decl.public {
            builder = builder.non_public();
        }
        if !decl.constructor {
            builder = builder.without_no_arg_constructor();
        }
        if let Some(superclass) = &decl.extends {
            builder = builder.extends(&self.class(superclass)?);
        }
        for interface in &decl.implements {
            builder = builder.implements(&self.class(interface)?);
        }
        for field in &decl.fields {
            let mut descriptor = FieldDescriptor::new(field.name.as_str(), parse_type(&field.ty)?);
            if !field.setter {
                descriptor = descriptor.without_setter();
            }
            if !field.getter {
                descriptor = descriptor.without_getter();
            }
            builder = builder.field(descriptor);
        }
        self.classes.insert(canonical, builder.build());
        Ok(())
    }

    /// Declared, well-known, or a wrapper/literal class made on demand.
    fn class(&mut self, canonical: &str) -> Result<ClassRef, DocumentError> {
        if let Some(class) = self.classes.get(canonical) {
            return Ok(class.clone());
        }
        if let Some(class) = jdk::lookup(canonical) {
            return Ok(class);
        }
        if let Some(class) = self.boxed.get(canonical) {
            return Ok(class.clone());
        }
        match ClassName::parse(canonical) {
            Some(name) if jdk::is_literal_class(&name) => {
                let class = ClassDescriptor::builder(name).extends(&jdk::OBJECT).build();
                self.boxed.insert(canonical.to_string(), class.clone());
                Ok(class)
            }
            _ => Err(DocumentError::UnknownClass(canonical.to_string())),
        }
    }

    fn runtime_type(&mut self, ty: &TypeName) -> Result<RuntimeType, DocumentError> {
        match ty.erasure() {
            TypeName::Primitive(p) => Ok(RuntimeType::Primitive(p)),
            TypeName::Array(component) => Ok(RuntimeType::array_of(self.runtime_type(&component)?)),
            TypeName::Class(name) | TypeName::Parameterized { raw: name, .. } => {
                Ok(RuntimeType::Class(self.class(&name.canonical_name())?))
            }
        }
    }

    fn allocate(&mut self, id: &str, decl: &ObjectDecl) -> Result<ObjRef, DocumentError> {
        let invalid = |message: &str| DocumentError::InvalidObject { id: id.to_string(), message: message.to_string() };
        let shapes = [
            decl.array.is_some(),
            decl.list.is_some(),
            decl.set.is_some(),
            decl.map.is_some(),
            decl.fields.is_some(),
        ];
        if shapes.into_iter().filter(|present| *present).count() != 1 {
            return Err(invalid("needs exactly one of `array`, `list`, `set`, `map`, `fields`"));
        }
        let class = |loader: &mut Self, default: &StaticClass| match &decl.class {
            Some(name) => loader.class(name),
            None => Ok(ClassRef::clone(default)),
        };
        let object = if decl.array.is_some() {
            if decl.class.is_some() {
                return Err(invalid("arrays take a `component`, not a `class`"));
            }
            let component = decl.component.as_deref().ok_or_else(|| invalid("arrays need a `component`"))?;
            Object::array(self.runtime_type(&parse_type(component)?)?, Vec::new())
        } else if decl.list.is_some() {
            Object::list(&class(&mut *self, &jdk::ARRAY_LIST)?, Vec::new())
        } else if decl.set.is_some() {
            Object::set(&class(&mut *self, &jdk::LINKED_HASH_SET)?, Vec::new())
        } else if decl.map.is_some() {
            Object::map(&class(&mut *self, &jdk::LINKED_HASH_MAP)?, Vec::new())
        } else {
            let name = decl.class.as_deref().ok_or_else(|| invalid("objects with `fields` need a `class`"))?;
            Object::bean(&self.class(name)?)
        };
        if decl.component.is_some() && decl.array.is_none() {
            return Err(invalid("only arrays take a `component`"));
        }
        Ok(ObjRef::new(object))
    }

    fn fill(&mut self, id: &str, decl: &ObjectDecl) -> Result<(), DocumentError> {
        let obj = self.objects.get(id).cloned().ok_or_else(|| DocumentError::UnknownObject(id.to_string()))?;
        if let Some(elements) = &decl.array {
            let component = match obj.runtime_type() {
                RuntimeType::Array(component) => component.type_name(),
                other => other.type_name(),
            };
            for element in elements {
                obj.push(coerce(self.value(element)?, &component)?);
            }
        }
        for element in decl.list.iter().chain(decl.set.iter()).flatten() {
            obj.push(self.value(element)?);
        }
        for (key, value) in decl.map.iter().flatten() {
            obj.put(self.value(key)?, self.value(value)?);
        }
        if let Some(fields) = &decl.fields {
            let class = obj.borrow().class().cloned();
            for (name, value) in fields {
                let field_ty = class
                    .as_ref()
                    .and_then(|class| class.field(name))
                    .map(|field| field.ty().clone())
                    .ok_or_else(|| DocumentError::InvalidObject {
                        id: id.to_string(),
                        message: format!("no field `{name}`"),
                    })?;
                obj.set_field(name.as_str(), coerce(self.value(value)?, &field_ty)?);
            }
        }
        Ok(())
    }

    fn value(&mut self, decl: &ValueDecl) -> Result<Value, DocumentError> {
        let value = match decl {
            ValueDecl::Null => Value::Null,
            ValueDecl::Bool(b) => Value::Bool(*b),
            ValueDecl::Str(s) => Value::string(s.as_str()),
            ValueDecl::Number(n) => number(n)?,
            ValueDecl::Tagged(tagged) => match tagged {
                TaggedValue::Byte(n) => Value::Byte(*n),
                TaggedValue::Short(n) => Value::Short(*n),
                TaggedValue::Int(n) => Value::Int(*n),
                TaggedValue::Long(n) => Value::Long(*n),
                TaggedValue::Float(x) => Value::Float(*x),
                TaggedValue::Double(x) => Value::Double(*x),
                TaggedValue::Char(c) => {
                    let unit = u16::try_from(u32::from(*c)).map_err(|_| DocumentError::WideChar(*c))?;
                    Value::Char(unit)
                }
                TaggedValue::Class(ty) => Value::Class(parse_type(ty)?),
                TaggedValue::Enum(decl) => Value::Enum {
                    ty: ClassName::parse(&decl.ty).ok_or_else(|| DocumentError::InvalidType(decl.ty.clone()))?,
                    constant: decl.constant.clone(),
                },
                TaggedValue::Ref(id) => Value::Object(
                    self.objects.get(id).cloned().ok_or_else(|| DocumentError::UnknownObject(id.clone()))?,
                ),
            },
        };
        Ok(value)
    }
}

type StaticClass = once_cell::sync::Lazy<ClassRef>;

fn parse_type(s: &str) -> Result<TypeName, DocumentError> {
    TypeName::parse(s).ok_or_else(|| DocumentError::InvalidType(s.to_string()))
}

/// Bare numbers: `int` when they fit, then `long`, otherwise `double`.
fn number(n: &serde_json::Number) -> Result<Value, DocumentError> {
    if let Some(n) = n.as_i64() {
        return Ok(i32::try_from(n).map(Value::Int).unwrap_or(Value::Long(n)));
    }
    if n.is_u64() {
        return Err(DocumentError::OutOfRange { ty: "long", value: n.to_string() });
    }
    n.as_f64()
        .map(Value::Double)
        .ok_or_else(|| DocumentError::OutOfRange { ty: "double", value: n.to_string() })
}

/// Widen or narrow a bare number to a primitive or wrapper slot's type.
fn coerce(value: Value, target: &TypeName) -> Result<Value, DocumentError> {
    let p = match target {
        TypeName::Primitive(p) => *p,
        TypeName::Class(name) => match Primitive::unboxed(name) {
            Some(p) => p,
            None => return Ok(value),
        },
        _ => return Ok(value),
    };
    let converted = match (p, &value) {
        (Primitive::Byte, Value::Int(n)) => i8::try_from(*n).ok().map(Value::Byte),
        (Primitive::Short, Value::Int(n)) => i16::try_from(*n).ok().map(Value::Short),
        (Primitive::Long, Value::Int(n)) => Some(Value::Long(i64::from(*n))),
        (Primitive::Float, Value::Int(n)) => Some(Value::Float(*n as f32)),
        (Primitive::Float, Value::Long(n)) => Some(Value::Float(*n as f32)),
        (Primitive::Float, Value::Double(x)) => Some(Value::Float(*x as f32)),
        (Primitive::Double, Value::Int(n)) => Some(Value::Double(f64::from(*n))),
        (Primitive::Double, Value::Long(n)) => Some(Value::Double(*n as f64)),
        (Primitive::Byte | Primitive::Short | Primitive::Int, Value::Long(_)) => None,
        _ => Some(value.clone()),
    };
    converted.ok_or_else(|| DocumentError::OutOfRange { ty: p.keyword(), value: format!("{value:?}") })
}
