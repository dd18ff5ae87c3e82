//! Domain types for callable declarations and their validation schemas.
//!
//! Everything here is plain data: declarations are assembled with builders,
//! schemas are immutable once built, and argument containers are owned by a
//! single invocation.

mod arguments;
mod constraint;
mod error;
mod schema;
mod signature;
mod types;

pub use arguments::{BoundArguments, CallArgs};
pub use constraint::ConstraintStep;
pub use error::{
    BindError, FieldError, FieldPath, InjectError, InvocationError, PathSegment,
    SchemaBuildError, ValidationError,
};
pub use schema::{CallableSchema, InvocationNature, ParameterSpec, ReturnSpec};
pub use signature::{Annotation, FieldInfo, Param, ParamKind, Signature};
pub use types::{DeclaredType, ModelField, ModelSchema};
