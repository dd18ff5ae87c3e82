//! Unit tests for the in-memory tool registry.

use super::{countdown_tool, forecast_tool};
use crate::tools::{
    adapters::memory::InMemoryToolRegistry,
    ports::{ToolRegistry, ToolRegistryError},
};
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> InMemoryToolRegistry {
    InMemoryToolRegistry::with_tools([forecast_tool(), countdown_tool()])
        .expect("tool names are unique")
}

#[rstest]
fn registered_tool_is_found_by_name(registry: InMemoryToolRegistry) {
    let found = registry.find_by_name("forecast").expect("lookup should succeed");

    assert_eq!(found.map(|tool| tool.name().to_owned()), Some("forecast".to_owned()));
}

#[rstest]
fn unknown_tool_is_absent(registry: InMemoryToolRegistry) {
    let found = registry.find_by_name("missing").expect("lookup should succeed");

    assert!(found.is_none());
}

#[rstest]
fn listing_is_ordered_by_name(registry: InMemoryToolRegistry) {
    let names: Vec<String> = registry
        .list()
        .expect("listing should succeed")
        .iter()
        .map(|tool| tool.name().to_owned())
        .collect();

    assert_eq!(names, ["countdown", "forecast"]);
}

#[rstest]
fn duplicate_names_are_rejected(registry: InMemoryToolRegistry) {
    let result = registry.register(forecast_tool());

    assert!(matches!(
        result,
        Err(ToolRegistryError::DuplicateTool(ref name)) if name == "forecast"
    ));
}
