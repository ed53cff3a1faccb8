//! The live object graph handed to the inliner.
//!
//! There is no reflection to lean on, so every class an object can have is
//! described up front by a [`ClassDescriptor`]: its supertypes (for trust
//! checks), its visibility and constructor (for the bean strategy), and an
//! ordered list of fields with their accessors.
//!
//! Objects live behind shared [`ObjRef`] handles so graphs may be cyclic.
//! Identity is the address of the shared allocation.
pub mod jdk;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{ClassName, Primitive, TypeName};

pub type ClassRef = Arc<ClassDescriptor>;

// ------------------------------- Classes ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: ClassName,
    kind: ClassKind,
    public: bool,
    no_arg_constructor: bool,
    superclass: Option<ClassRef>,
    interfaces: Vec<ClassRef>,
    fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone)]
pub struct ClassBuilder {
    inner: ClassDescriptor,
}

/// A field plus the accessor pair the bean strategy goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeName,
    setter: Option<String>,
    getter: Option<String>,
}

impl ClassDescriptor {
    /// Public, with a public no-arg constructor, no supertypes, no fields.
    pub fn builder(name: ClassName) -> ClassBuilder {
        ClassBuilder {
            inner: ClassDescriptor {
                name,
                kind: ClassKind::Class,
                public: true,
                no_arg_constructor: true,
                superclass: None,
                interfaces: Vec::new(),
                fields: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }
    pub fn kind(&self) -> ClassKind {
        self.kind
    }
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }
    pub fn is_public(&self) -> bool {
        self.public
    }
    pub fn has_public_no_arg_constructor(&self) -> bool {
        self.no_arg_constructor && self.kind == ClassKind::Class
    }
    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }
    pub fn interfaces(&self) -> &[ClassRef] {
        &self.interfaces
    }

    /// Fields in declaration order: inherited ones first, like the JVM lays
    /// them out.
    pub fn fields(&self) -> Vec<&FieldDescriptor> {
        let mut out = match &self.superclass {
            Some(parent) => parent.fields(),
            None => Vec::new(),
        };
        out.extend(self.fields.iter());
        out
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name).or_else(|| {
            self.superclass.as_ref().and_then(|parent| parent.field(name))
        })
    }

    /// Reflexive, transitive subtype check by name. Every class and interface
    /// is a subtype of `java.lang.Object`.
    pub fn is_subtype_of(&self, target: &ClassName) -> bool {
        if &self.name == target || *target == jdk::object_name() {
            return true;
        }
        self.superclass.iter().chain(self.interfaces.iter()).any(|sup| sup.is_subtype_of(target))
    }
}

impl ClassBuilder {
    pub fn interface(mut self) -> Self {
        self.inner.kind = ClassKind::Interface;
        self.inner.no_arg_constructor = false;
        self
    }
    pub fn enumeration(mut self) -> Self {
        self.inner.kind = ClassKind::Enum;
        self.inner.no_arg_constructor = false;
        self
    }
    pub fn non_public(mut self) -> Self {
        self.inner.public = false;
        self
    }
    pub fn without_no_arg_constructor(mut self) -> Self {
        self.inner.no_arg_constructor = false;
        self
    }
    pub fn extends(mut self, superclass: &ClassRef) -> Self {
        self.inner.superclass = Some(superclass.clone());
        self
    }
    pub fn implements(mut self, interface: &ClassRef) -> Self {
        self.inner.interfaces.push(interface.clone());
        self
    }
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.inner.fields.push(field);
        self
    }
    pub fn build(self) -> ClassRef {
        Arc::new(self.inner)
    }
}

impl FieldDescriptor {
    /// A field with conventional accessors: `setName` and `getName`
    /// (`isName` for a primitive boolean).
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        let name = name.into();
        let ty = ty.into();
        let capitalized = capitalize(&name);
        let getter = match ty {
            TypeName::Primitive(Primitive::Boolean) => format!("is{capitalized}"),
            _ => format!("get{capitalized}"),
        };
        Self { setter: Some(format!("set{capitalized}")), getter: Some(getter), name, ty }
    }

    pub fn without_setter(mut self) -> Self {
        self.setter = None;
        self
    }
    pub fn without_getter(mut self) -> Self {
        self.getter = None;
        self
    }
    pub fn with_setter(mut self, setter: impl Into<String>) -> Self {
        self.setter = Some(setter.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }
    pub fn setter(&self) -> Option<&str> {
        self.setter.as_deref()
    }
    pub fn getter(&self) -> Option<&str> {
        self.getter.as_deref()
    }

    /// What an unassigned field holds: zero for primitives, null otherwise.
    pub fn default_value(&self) -> Value {
        match self.ty {
            TypeName::Primitive(p) => match p {
                Primitive::Boolean => Value::Bool(false),
                Primitive::Char => Value::Char(0),
                Primitive::Byte => Value::Byte(0),
                Primitive::Short => Value::Short(0),
                Primitive::Int => Value::Int(0),
                Primitive::Long => Value::Long(0),
                Primitive::Float => Value::Float(0.0),
                Primitive::Double => Value::Double(0.0),
            },
            _ => Value::Null,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------- Runtime types ------------------------------- //

/// The runtime class of an object. Arrays have no descriptor of their own;
/// they are described by their component.
#[derive(Debug, Clone)]
pub enum RuntimeType {
    Primitive(Primitive),
    Class(ClassRef),
    Array(Box<RuntimeType>),
}

impl RuntimeType {
    pub fn array_of(component: RuntimeType) -> Self {
        RuntimeType::Array(Box::new(component))
    }

    pub fn type_name(&self) -> TypeName {
        match self {
            RuntimeType::Primitive(p) => TypeName::Primitive(*p),
            RuntimeType::Class(class) => TypeName::Class(class.name().clone()),
            RuntimeType::Array(component) => TypeName::array_of(component.type_name()),
        }
    }

    /// Java assignment compatibility against a (possibly parameterized)
    /// target; type arguments are ignored.
    pub fn is_assignable_to(&self, target: &TypeName) -> bool {
        let target = target.erasure();
        match (self, &target) {
            (RuntimeType::Primitive(p), TypeName::Primitive(q)) => p == q,
            (RuntimeType::Class(class), TypeName::Class(name)) => class.is_subtype_of(name),
            (RuntimeType::Array(_), TypeName::Class(name)) => jdk::is_array_supertype(name),
            (RuntimeType::Array(component), TypeName::Array(target_component)) => {
                match (component.as_ref(), target_component.as_ref()) {
                    (RuntimeType::Primitive(p), TypeName::Primitive(q)) => p == q,
                    (RuntimeType::Primitive(_), _) | (_, TypeName::Primitive(_)) => false,
                    (component, target_component) => component.is_assignable_to(target_component),
                }
            }
            _ => false,
        }
    }

    /// Components whose values always have a literal form: primitives and
    /// their wrappers, strings, class literals, enums, and arrays of these.
    pub fn is_literal_component(&self) -> bool {
        match self {
            RuntimeType::Primitive(_) => true,
            RuntimeType::Class(class) => class.is_enum() || jdk::is_literal_class(class.name()),
            RuntimeType::Array(component) => component.is_literal_component(),
        }
    }
}

// -------------------------------- Values ---------------------------------- //

/// A value in the graph. Primitive variants stand for both the primitive
/// and its wrapper.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// One UTF-16 unit, like a Java `char`.
    Char(u16),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Class(TypeName),
    Enum { ty: ClassName, constant: String },
    Object(ObjRef),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn enum_constant(ty: &ClassRef, constant: impl Into<String>) -> Self {
        Value::Enum { ty: ty.name().clone(), constant: constant.into() }
    }

    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Type used for declarations and closure casts: wrappers for
    /// primitives, the collection interface for collections.
    pub fn declared_type(&self) -> TypeName {
        match self {
            Value::Null => TypeName::Class(jdk::object_name()),
            Value::Bool(_) => Primitive::Boolean.boxed().into(),
            Value::Char(_) => Primitive::Char.boxed().into(),
            Value::Byte(_) => Primitive::Byte.boxed().into(),
            Value::Short(_) => Primitive::Short.boxed().into(),
            Value::Int(_) => Primitive::Int.boxed().into(),
            Value::Long(_) => Primitive::Long.boxed().into(),
            Value::Float(_) => Primitive::Float.boxed().into(),
            Value::Double(_) => Primitive::Double.boxed().into(),
            Value::Str(_) => TypeName::Class(jdk::string_name()),
            Value::Class(_) => TypeName::Class(jdk::class_name()),
            Value::Enum { ty, .. } => TypeName::Class(ty.clone()),
            Value::Object(obj) => obj.declared_type(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Byte(value)
    }
}
impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Short(value)
    }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}
impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}
impl From<ObjRef> for Value {
    fn from(value: ObjRef) -> Self {
        Value::Object(value)
    }
}

// ------------------------------- Objects ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

#[derive(Debug)]
pub struct Object {
    ty: RuntimeType,
    data: ObjectData,
}

/// Runtime shape; selects the built-in strategy.
#[derive(Debug, Clone)]
pub enum ObjectData {
    Array(Vec<Value>),
    List(Vec<Value>),
    /// Iteration order; element uniqueness is the caller's business.
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Bean(IndexMap<String, Value>),
}

#[derive(Clone)]
pub struct ObjRef(Rc<RefCell<Object>>);

impl Object {
    pub fn array(component: RuntimeType, elements: Vec<Value>) -> Self {
        Self { ty: RuntimeType::array_of(component), data: ObjectData::Array(elements) }
    }
    pub fn list(class: &ClassRef, elements: Vec<Value>) -> Self {
        Self { ty: RuntimeType::Class(class.clone()), data: ObjectData::List(elements) }
    }
    pub fn set(class: &ClassRef, elements: Vec<Value>) -> Self {
        Self { ty: RuntimeType::Class(class.clone()), data: ObjectData::Set(elements) }
    }
    pub fn map(class: &ClassRef, entries: Vec<(Value, Value)>) -> Self {
        Self { ty: RuntimeType::Class(class.clone()), data: ObjectData::Map(entries) }
    }
    pub fn bean(class: &ClassRef) -> Self {
        Self { ty: RuntimeType::Class(class.clone()), data: ObjectData::Bean(IndexMap::new()) }
    }

    pub fn runtime_type(&self) -> &RuntimeType {
        &self.ty
    }
    pub fn data(&self) -> &ObjectData {
        &self.data
    }
    pub fn data_mut(&mut self) -> &mut ObjectData {
        &mut self.data
    }

    pub fn class(&self) -> Option<&ClassRef> {
        match &self.ty {
            RuntimeType::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl ObjRef {
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    pub fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.borrow().ty.clone()
    }

    pub fn declared_type(&self) -> TypeName {
        let object = self.borrow();
        match (&object.data, &object.ty) {
            (ObjectData::List(_), _) => TypeName::Class(jdk::list_name()),
            (ObjectData::Set(_), _) => TypeName::Class(jdk::set_name()),
            (ObjectData::Map(_), _) => TypeName::Class(jdk::map_name()),
            (_, ty) => ty.type_name(),
        }
    }

    /// Current value of a bean field; unassigned fields read as the
    /// declared type's default.
    pub fn field(&self, name: &str) -> Value {
        let object = self.borrow();
        if let ObjectData::Bean(fields) = &object.data {
            if let Some(value) = fields.get(name) {
                return value.clone();
            }
        }
        object
            .class()
            .and_then(|class| class.field(name))
            .map(FieldDescriptor::default_value)
            .unwrap_or(Value::Null)
    }

    /// No-op unless this object is a bean.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        if let ObjectData::Bean(fields) = &mut self.borrow_mut().data {
            fields.insert(name.into(), value.into());
        }
    }

    /// Append to an array, list or set.
    pub fn push(&self, value: impl Into<Value>) {
        match &mut self.borrow_mut().data {
            ObjectData::Array(elements) | ObjectData::List(elements) | ObjectData::Set(elements) => {
                elements.push(value.into())
            }
            ObjectData::Map(_) | ObjectData::Bean(_) => {}
        }
    }

    /// Append an entry to a map. Keys are not deduplicated.
    pub fn put(&self, key: impl Into<Value>, value: impl Into<Value>) {
        if let ObjectData::Map(entries) = &mut self.borrow_mut().data {
            entries.push((key.into(), value.into()));
        }
    }
}

impl fmt::Debug for ObjRef {
    // Graphs may be cyclic; never descend.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjRef({} @ {:#x})", object.ty.type_name(), self.identity().0),
            Err(_) => write!(f, "ObjRef(<borrowed> @ {:#x})", self.identity().0),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ClassRef {
        ClassDescriptor::builder(ClassName::new("com.example", "Person"))
            .field(FieldDescriptor::new("name", jdk::string_name()))
            .field(FieldDescriptor::new("age", Primitive::Int))
            .field(FieldDescriptor::new("active", Primitive::Boolean))
            .build()
    }

    #[test]
    fn field_descriptors_derive_bean_accessors() {
        let class = person();
        let fields = class.fields();
        assert_eq!(fields[0].setter(), Some("setName"));
        assert_eq!(fields[0].getter(), Some("getName"));
        assert_eq!(fields[2].getter(), Some("isActive"));
        assert_eq!(FieldDescriptor::new("x", Primitive::Int).without_setter().setter(), None);
    }

    #[test]
    fn inherited_fields_come_first() {
        let base = ClassDescriptor::builder(ClassName::new("com.example", "Base"))
            .field(FieldDescriptor::new("id", Primitive::Long))
            .build();
        let derived = ClassDescriptor::builder(ClassName::new("com.example", "Derived"))
            .extends(&base)
            .field(FieldDescriptor::new("label", jdk::string_name()))
            .build();
        let names = derived.fields().iter().map(|f| f.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["id", "label"]);
        assert!(derived.is_subtype_of(base.name()));
        assert!(!base.is_subtype_of(derived.name()));
    }

    #[test]
    fn unassigned_fields_read_as_defaults() {
        let obj = ObjRef::new(Object::bean(&person()));
        assert!(matches!(obj.field("age"), Value::Int(0)));
        assert!(matches!(obj.field("name"), Value::Null));
        obj.set_field("name", "Ada");
        assert!(matches!(obj.field("name"), Value::Str(ref s) if s == "Ada"));
    }

    #[test]
    fn identity_is_per_allocation() {
        let a = ObjRef::new(Object::list(&jdk::ARRAY_LIST, vec![]));
        let b = ObjRef::new(Object::list(&jdk::ARRAY_LIST, vec![]));
        assert_eq!(a.identity(), a.clone().identity());
        assert_ne!(a.identity(), b.identity());
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn arrays_are_covariant_for_references_only() {
        let strings = RuntimeType::array_of(RuntimeType::Class(ClassRef::clone(&jdk::STRING)));
        let object_array = TypeName::array_of(jdk::object_name());
        assert!(strings.is_assignable_to(&object_array));
        assert!(strings.is_assignable_to(&TypeName::Class(jdk::object_name())));

        let ints = RuntimeType::array_of(RuntimeType::Primitive(Primitive::Int));
        assert!(!ints.is_assignable_to(&object_array));
        assert!(ints.is_assignable_to(&TypeName::array_of(Primitive::Int)));
        assert!(!ints.is_assignable_to(&TypeName::array_of(Primitive::Long)));
    }

    #[test]
    fn literal_components() {
        assert!(RuntimeType::Primitive(Primitive::Byte).is_literal_component());
        assert!(RuntimeType::Class(ClassRef::clone(&jdk::STRING)).is_literal_component());
        let color = ClassDescriptor::builder(ClassName::new("com.example", "Color")).enumeration().build();
        assert!(RuntimeType::array_of(RuntimeType::Class(color)).is_literal_component());
        assert!(!RuntimeType::Class(person()).is_literal_component());
        assert!(!RuntimeType::Class(ClassRef::clone(&jdk::OBJECT)).is_literal_component());
    }
}
