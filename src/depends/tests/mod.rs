//! Unit tests for the injection engine.

mod builder_tests;
mod injector_tests;
