//! Function tools whose LLM-supplied arguments are bound and validated by
//! [`crate::depends`].
//!
//! An agent turn produces tool calls carrying raw JSON argument text. The
//! execution service looks the tool up, feeds the arguments through the
//! injected function, and reports an outcome whose content is either the
//! tool's result or an actionable error message for the model. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
