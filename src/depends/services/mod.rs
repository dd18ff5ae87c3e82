//! Injection services: schema building, binding, validation and invocation.

mod binder;
mod builder;
mod caster;
mod injector;
mod wrapper;

pub use binder::bind;
pub use builder::build_schema;
pub use caster::{coerce, validate, validate_return};
pub use injector::{ExtraPolicy, InjectOptions, Injector, inject};
pub use wrapper::{Callable, Injected, Invocation, ValidatedIter, ValidatedStream};
