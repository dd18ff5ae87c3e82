//! Unit tests for the tools module.

mod domain_tests;
mod registry_tests;

use crate::depends::{
    domain::{ConstraintStep, DeclaredType, InvocationError, Param, Signature},
    services::{Callable, inject},
};
use crate::tools::domain::ToolDefinition;
use serde_json::json;

/// `forecast(city: str, days: int >= 1 = 1) -> str`
fn forecast_tool() -> ToolDefinition {
    let signature = Signature::new("forecast")
        .param(Param::positional("city").typed(DeclaredType::String))
        .param(
            Param::positional("days")
                .typed(DeclaredType::Integer)
                .with_constraint(ConstraintStep::Ge(1.0))
                .with_default(json!(1)),
        )
        .returns_type(DeclaredType::String);
    let function = inject(
        &signature,
        Callable::plain(|args| {
            let city: String = args.get_as("city")?;
            let days: i64 = args.get_as("days")?;
            if city == "Atlantis" {
                return Err(InvocationError::message("no forecasts for sunken cities"));
            }
            Ok(json!(format!("{days}-day forecast for {city}: sunny")))
        }),
    )
    .expect("signature is well formed");
    ToolDefinition::new("forecast", "Weather forecast for a city", function)
        .expect("definition is valid")
}

/// `countdown(start: int) -> int`, yielding `start` down to one.
fn countdown_tool() -> ToolDefinition {
    let signature = Signature::new("countdown")
        .param(Param::positional("start").typed(DeclaredType::Integer))
        .returns_type(DeclaredType::Integer);
    let function = inject(
        &signature,
        Callable::sync_stream(|args| {
            let start: i64 = args.get_as("start")?;
            Ok((1..=start).rev().map(|n| json!(n.to_string())))
        }),
    )
    .expect("signature is well formed");
    ToolDefinition::new("countdown", "Counts down to one", function).expect("definition is valid")
}
