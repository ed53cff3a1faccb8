use thiserror::Error;

use crate::code::FormatError;
use crate::types::TypeName;

/// Everything that can abort an inlining call. All of them are discovered
/// while walking the graph and none leave partial output behind.
#[derive(Debug, Error)]
pub enum InlineError {
    #[error("`{ty}` is not trusted for inlining; trust it or one of its supertypes first")]
    UntrustedType { ty: TypeName },

    #[error("`{ty}` is not public")]
    NotPublicType { ty: TypeName },

    #[error("`{ty}` has no public no-argument constructor")]
    MissingConstructor { ty: TypeName },

    #[error("field `{field}` of type `{field_ty}` on `{ty}` has no public setter")]
    MissingSetter { ty: TypeName, field: String, field_ty: TypeName },

    #[error("field `{field}` of type `{field_ty}` on `{ty}` has no public getter")]
    MissingGetter { ty: TypeName, field: String, field_ty: TypeName },

    #[error("circular reference to `{ty}` reached through a registered type inliner")]
    CircularReference { ty: TypeName },

    #[error("`{ty}` has no literal form")]
    NotALiteral { ty: TypeName },

    #[error("name prefix `{prefix}` cannot start a Java identifier")]
    InvalidNamePrefix { prefix: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}
