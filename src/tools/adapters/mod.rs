//! Adapter implementations for the tool ports.

pub mod memory;
