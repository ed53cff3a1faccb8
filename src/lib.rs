//! Turn live, possibly cyclic object graphs into single Java expressions
//! that rebuild them.
//!
//! Only types allowed by a [`TrustPolicy`] are inlined. Registered
//! [`TypeStrategy`] implementations take precedence over the built-in
//! handling of arrays, collections, maps and plain beans.
pub mod cli;
pub mod code;
pub mod document;
pub mod engine;
pub mod error;
pub mod inliner;
pub mod path_de;
pub mod runtime;
pub mod strategy;
pub mod trust;
pub mod types;

pub use code::{Arg, CodeBlock, FormatError};
pub use engine::Engine;
pub use error::InlineError;
pub use inliner::{Inliner, InlinerConfig, DEFAULT_NAME_PREFIX};
pub use runtime::{ClassDescriptor, ClassRef, FieldDescriptor, ObjRef, Object, RuntimeType, Value};
pub use strategy::{from_fns, TypeStrategy};
pub use trust::TrustPolicy;
pub use types::{ClassName, Primitive, TypeName};
