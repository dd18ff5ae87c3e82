//! Immutable per-callable validation schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::constraint::LengthKind;
use super::{ConstraintStep, DeclaredType, ParamKind};

/// Calling convention of a wrapped callable, fixed at wrap time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationNature {
    /// Synchronous call returning one value.
    Plain,
    /// Asynchronous call returning one value.
    Awaited,
    /// Synchronous lazy sequence of values.
    SyncStream,
    /// Asynchronous lazy sequence of values.
    AsyncStream,
}

impl InvocationNature {
    /// Returns `true` for the two streaming natures.
    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self, Self::SyncStream | Self::AsyncStream)
    }
}

impl fmt::Display for InvocationNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Plain => "plain",
            Self::Awaited => "awaited",
            Self::SyncStream => "sync-stream",
            Self::AsyncStream => "async-stream",
        };
        f.write_str(label)
    }
}

/// Validation metadata for one declared parameter.
///
/// For variadic parameters `declared_type` is the element type applied to
/// each collected value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub(crate) name: String,
    pub(crate) kind: ParamKind,
    pub(crate) declared_type: Option<DeclaredType>,
    pub(crate) constraints: Vec<ConstraintStep>,
    pub(crate) alias: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
}

impl ParameterSpec {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter kind.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Returns the declared type, or `None` for pass-through parameters.
    #[must_use]
    pub const fn declared_type(&self) -> Option<&DeclaredType> {
        self.declared_type.as_ref()
    }

    /// Returns the constraint steps in application order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintStep] {
        &self.constraints
    }

    /// Returns the call-site alias.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the keyword a call site must use for this parameter.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns `true` when a call must supply this parameter.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none() && !self.kind.is_variadic()
    }

    fn json_schema(&self) -> Value {
        let mut schema = match self.declared_type.as_ref().map(DeclaredType::json_schema) {
            Some(Value::Object(object)) => object,
            _ => Map::new(),
        };
        let length_kind = match &self.declared_type {
            Some(DeclaredType::List(_)) => LengthKind::Items,
            Some(DeclaredType::Map(_) | DeclaredType::Model(_)) => LengthKind::Properties,
            _ => LengthKind::Text,
        };
        for step in &self.constraints {
            step.annotate_json_schema(&mut schema, length_kind);
        }
        if let Some(description) = &self.description {
            schema.insert(
                "description".to_owned(),
                Value::String(description.clone()),
            );
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_owned(), default.clone());
        }
        Value::Object(schema)
    }
}

/// Validation metadata for a callable's return value, or for each item of a
/// streaming callable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSpec {
    pub(crate) declared_type: Option<DeclaredType>,
    pub(crate) constraints: Vec<ConstraintStep>,
}

impl ReturnSpec {
    /// Returns the declared type.
    #[must_use]
    pub const fn declared_type(&self) -> Option<&DeclaredType> {
        self.declared_type.as_ref()
    }

    /// Returns the constraint steps in application order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintStep] {
        &self.constraints
    }
}

/// Immutable description of a callable's parameters and return value.
///
/// Built once per wrapped callable and shared read-only by every
/// invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableSchema {
    pub(crate) name: String,
    pub(crate) parameters: Vec<ParameterSpec>,
    pub(crate) return_spec: Option<ReturnSpec>,
    pub(crate) nature: InvocationNature,
}

impl CallableSchema {
    /// Returns the callable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter specs in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Finds a parameter by declared name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|spec| spec.name == name)
    }

    /// Returns the return spec, if the callable declares a return type.
    #[must_use]
    pub const fn return_spec(&self) -> Option<&ReturnSpec> {
        self.return_spec.as_ref()
    }

    /// Returns the invocation nature.
    #[must_use]
    pub const fn nature(&self) -> InvocationNature {
        self.nature
    }

    /// Returns the variadic-positional parameter, if declared.
    #[must_use]
    pub fn var_positional(&self) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|spec| spec.kind == ParamKind::VarPositional)
    }

    /// Returns the variadic-keyword parameter, if declared.
    #[must_use]
    pub fn var_keyword(&self) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|spec| spec.kind == ParamKind::VarKeyword)
    }

    /// Renders the keyword-addressable parameters as a JSON Schema object.
    ///
    /// Positional-only and variadic-positional parameters cannot be supplied
    /// through a keyword mapping and are omitted. A variadic-keyword
    /// parameter becomes `additionalProperties`.
    #[must_use]
    pub fn parameters_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for spec in &self.parameters {
            if !matches!(
                spec.kind,
                ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
            ) {
                continue;
            }
            properties.insert(spec.lookup_key().to_owned(), spec.json_schema());
            if spec.is_required() {
                required.push(Value::String(spec.lookup_key().to_owned()));
            }
        }

        let additional = self
            .var_keyword()
            .map_or(Value::Bool(false), |spec| match spec.json_schema() {
                Value::Object(object) if object.is_empty() => Value::Bool(true),
                other => other,
            });

        let mut schema = Map::new();
        schema.insert("type".to_owned(), Value::String("object".to_owned()));
        schema.insert("properties".to_owned(), Value::Object(properties));
        schema.insert("required".to_owned(), Value::Array(required));
        schema.insert("additionalProperties".to_owned(), additional);
        Value::Object(schema)
    }
}
