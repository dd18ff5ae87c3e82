//! Agentdeps: signature-driven argument injection for agent tools.
//!
//! This crate binds loosely typed call-site arguments (typically JSON
//! produced by a language model) to explicitly declared callable
//! signatures, coerces them into the declared types, and validates return
//! values and streamed items on the way out.
//!
//! # Architecture
//!
//! Agentdeps follows hexagonal architecture principles:
//!
//! - **Domain**: Pure declarations, schemas and errors
//! - **Ports**: Abstract trait interfaces for tool lookup and execution
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`depends`]: Schema building, binding, casting and invocation adapters
//! - [`tools`]: Function tools executed through injected callables

pub mod depends;
pub mod tools;
