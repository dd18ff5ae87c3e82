//! Behaviour tests for executing model-requested tool calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use agentdeps::depends::{
    domain::{DeclaredType, Param, Signature},
    services::{Callable, inject},
};
use agentdeps::tools::{
    adapters::memory::InMemoryToolRegistry,
    domain::{ToolCall, ToolDefinition, ToolOutcome},
    ports::ToolExecutor,
    services::ToolExecutionService,
};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

type TestService = ToolExecutionService<InMemoryToolRegistry, DefaultClock>;

#[derive(Default)]
struct ToolExecutionWorld {
    service: Option<TestService>,
    add_runs: Arc<AtomicUsize>,
    last_outcome: Option<ToolOutcome>,
}

impl ToolExecutionWorld {
    fn service(&self) -> Result<&TestService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre!("test service should exist"))
    }

    fn outcome(&self) -> Result<&ToolOutcome, eyre::Report> {
        self.last_outcome
            .as_ref()
            .ok_or_else(|| eyre!("a tool call should have been executed"))
    }
}

#[fixture]
fn world() -> ToolExecutionWorld {
    ToolExecutionWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn add_tool(runs: Arc<AtomicUsize>) -> Result<ToolDefinition, eyre::Report> {
    let signature = Signature::new("add")
        .param(Param::positional("a").typed(DeclaredType::Integer))
        .param(Param::positional("b").typed(DeclaredType::Integer))
        .returns_type(DeclaredType::Float);
    let function = inject(
        &signature,
        Callable::plain(move |args| {
            runs.fetch_add(1, Ordering::SeqCst);
            let a: i64 = args.get_as("a")?;
            let b: i64 = args.get_as("b")?;
            Ok(json!(a + b))
        }),
    )
    .wrap_err("add signature should be well formed")?;
    ToolDefinition::new("add", "Adds two integers", function)
        .wrap_err("add definition should be valid")
}

fn countdown_tool() -> Result<ToolDefinition, eyre::Report> {
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
    .wrap_err("countdown signature should be well formed")?;
    ToolDefinition::new("countdown", "Counts down to one", function)
        .wrap_err("countdown definition should be valid")
}

#[given("a tool registry with the calculator tools")]
fn calculator_tools(world: &mut ToolExecutionWorld) -> Result<(), eyre::Report> {
    let registry = InMemoryToolRegistry::with_tools([
        add_tool(Arc::clone(&world.add_runs))?,
        countdown_tool()?,
    ])
    .wrap_err("tool names should be unique")?;
    world.service = Some(ToolExecutionService::new(
        Arc::new(registry),
        Arc::new(DefaultClock),
    ));
    world.last_outcome = None;
    Ok(())
}

#[when(r#"the model calls "{tool}" with arguments '{arguments}'"#)]
fn model_calls_tool(
    world: &mut ToolExecutionWorld,
    tool: String,
    arguments: String,
) -> Result<(), eyre::Report> {
    let call = ToolCall::generated(tool, arguments);
    let outcome = run_async(world.service()?.execute(&call)).wrap_err("execution should succeed")?;
    world.last_outcome = Some(outcome);
    Ok(())
}

#[then(r#"the tool outcome succeeds with content "{content}""#)]
fn outcome_succeeds(world: &ToolExecutionWorld, content: String) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if outcome.is_error() {
        return Err(eyre!("expected success, got error '{}'", outcome.content()));
    }
    if outcome.content() != content {
        return Err(eyre!(
            "expected content '{content}', got '{}'",
            outcome.content()
        ));
    }
    Ok(())
}

#[then(r#"the tool call is rejected mentioning "{fragment}""#)]
fn outcome_rejected(world: &ToolExecutionWorld, fragment: String) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if !outcome.is_error() {
        return Err(eyre!("expected rejection, got '{}'", outcome.content()));
    }
    if !outcome.content().contains(&fragment) {
        return Err(eyre!(
            "expected '{}' to mention '{fragment}'",
            outcome.content()
        ));
    }
    Ok(())
}

#[then(r"the add tool has run {count:usize} times")]
fn add_tool_run_count(world: &ToolExecutionWorld, count: usize) -> Result<(), eyre::Report> {
    let runs = world.add_runs.load(Ordering::SeqCst);
    if runs != count {
        return Err(eyre!("expected {count} runs of add, got {runs}"));
    }
    Ok(())
}

#[scenario(
    path = "tests/features/tool_execution.feature",
    name = "String arguments are coerced to declared types"
)]
#[tokio::test(flavor = "multi_thread")]
async fn string_arguments_are_coerced(world: ToolExecutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tool_execution.feature",
    name = "Missing argument is rejected before the tool runs"
)]
#[tokio::test(flavor = "multi_thread")]
async fn missing_argument_is_rejected(world: ToolExecutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tool_execution.feature",
    name = "Uncoercible argument is rejected with its field name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn uncoercible_argument_is_rejected(world: ToolExecutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tool_execution.feature",
    name = "Unknown tool is rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_is_rejected(world: ToolExecutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tool_execution.feature",
    name = "Streamed items are validated and collected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn streamed_items_are_collected(world: ToolExecutionWorld) {
    let _ = world;
}
