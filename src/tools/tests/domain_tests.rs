//! Unit tests for tool domain types.

use super::forecast_tool;
use crate::tools::domain::{ToolCall, ToolCallId, ToolDefinition, ToolDomainError};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("", "description", ToolDomainError::EmptyToolName)]
#[case("  ", "description", ToolDomainError::EmptyToolName)]
#[case("name", " ", ToolDomainError::EmptyToolDescription)]
fn definition_requires_name_and_description(
    #[case] name: &str,
    #[case] description: &str,
    #[case] expected: ToolDomainError,
) {
    let function = forecast_tool().function().clone();

    let result = ToolDefinition::new(name, description, function);

    assert_eq!(result.err(), Some(expected));
}

#[rstest]
fn definition_trims_name_and_description() {
    let function = forecast_tool().function().clone();

    let tool = ToolDefinition::new("  forecast ", " Weather ", function).expect("valid definition");

    assert_eq!(tool.name(), "forecast");
    assert_eq!(tool.description(), "Weather");
}

#[rstest]
fn descriptor_advertises_parameters_schema() {
    let descriptor = forecast_tool().descriptor();

    assert_eq!(
        descriptor,
        json!({
            "name": "forecast",
            "description": "Weather forecast for a city",
            "parameters": {
                "type": "object",
                "properties": {
                    "city": { "type": "string" },
                    "days": { "type": "integer", "minimum": 1.0, "default": 1 },
                },
                "required": ["city"],
                "additionalProperties": false,
            },
        })
    );
}

#[rstest]
#[case("", json!({}))]
#[case("   ", json!({}))]
#[case(r#"{"city": "Oslo", "days": "3"}"#, json!({"city": "Oslo", "days": "3"}))]
fn arguments_parse_into_keyword_mapping(#[case] raw: &str, #[case] expected: serde_json::Value) {
    let call = ToolCall::generated("forecast", raw);

    let parsed = call.parse_arguments().expect("arguments should parse");

    assert_eq!(serde_json::Value::Object(parsed), expected);
}

#[rstest]
fn non_object_arguments_are_rejected() {
    let call = ToolCall::generated("forecast", "[1, 2]");

    assert_eq!(
        call.parse_arguments(),
        Err(ToolDomainError::ArgumentsNotObject("array".to_owned()))
    );
}

#[rstest]
fn malformed_arguments_are_rejected() {
    let call = ToolCall::generated("forecast", "{\"city\":");

    assert!(matches!(
        call.parse_arguments(),
        Err(ToolDomainError::MalformedArguments(_))
    ));
}

#[rstest]
fn call_ids_are_trimmed_and_non_empty() {
    assert_eq!(
        ToolCallId::new("  call_1 ").map(|id| id.to_string()),
        Ok("call_1".to_owned())
    );
    assert_eq!(ToolCallId::new(" "), Err(ToolDomainError::EmptyCallId));
}

#[rstest]
fn generated_call_ids_are_unique() {
    let first = ToolCallId::generate();
    let second = ToolCallId::generate();

    assert_ne!(first, second);
    assert!(first.as_str().starts_with("call-"));
}
