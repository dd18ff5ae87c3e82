//! Signature-driven argument binding and validation for callables.
//!
//! A callable is described once by a [`domain::Signature`]. Wrapping it with
//! [`services::inject`] (or a configured [`services::Injector`]) builds an
//! immutable [`domain::CallableSchema`] and returns an
//! [`services::Injected`] adapter. Every call through the adapter binds
//! positional and keyword arguments to the declared parameters, coerces and
//! validates them, runs the wrapped body, and validates the returned value
//! (or each streamed item).
//!
//! # Architecture
//!
//! - **Domain**: declarations, schemas, argument containers and errors
//! - **Services**: schema building, binding, casting and the invocation
//!   adapters
//!
//! # Example
//!
//! ```
//! use agentdeps::depends::domain::{CallArgs, DeclaredType, Param, Signature};
//! use agentdeps::depends::services::{Callable, inject};
//! use serde_json::json;
//!
//! let signature = Signature::new("add")
//!     .param(Param::positional("a").typed(DeclaredType::Integer))
//!     .param(Param::positional("b").typed(DeclaredType::Integer))
//!     .returns_type(DeclaredType::Float);
//!
//! let add = inject(
//!     &signature,
//!     Callable::plain(|args| {
//!         let a: i64 = args.get_as("a")?;
//!         let b: i64 = args.get_as("b")?;
//!         Ok(json!(a + b))
//!     }),
//! )
//! .expect("signature is well formed");
//!
//! let result = add
//!     .call(CallArgs::new().arg(json!("1")).arg(json!("2")))
//!     .expect("arguments coerce to integers");
//! assert_eq!(result, json!(3.0));
//! ```

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
