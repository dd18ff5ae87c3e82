//! Explicit callable declarations consumed by the schema builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{ConstraintStep, DeclaredType};

/// How a parameter may be supplied at a call site.
///
/// The variants are ordered: a well-formed declaration lists its parameters
/// in non-decreasing kind order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Only by position.
    PositionalOnly,
    /// By position or by keyword.
    PositionalOrKeyword,
    /// Collects surplus positional arguments.
    VarPositional,
    /// Only by keyword.
    KeywordOnly,
    /// Collects surplus keyword arguments.
    VarKeyword,
}

impl ParamKind {
    /// Returns `true` for the two collecting kinds.
    #[must_use]
    pub const fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }

    /// Returns `true` when the parameter can consume a positional argument.
    #[must_use]
    pub const fn accepts_positional(self) -> bool {
        matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PositionalOnly => "positional-only",
            Self::PositionalOrKeyword => "positional-or-keyword",
            Self::VarPositional => "variadic-positional",
            Self::KeywordOnly => "keyword-only",
            Self::VarKeyword => "variadic-keyword",
        };
        f.write_str(label)
    }
}

/// Field metadata carrying an alias and an optional default.
///
/// A `FieldInfo` without a default marks the parameter as required even when
/// it is attached through an [`Annotation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInfo {
    /// External name used at call sites.
    pub alias: Option<String>,
    /// Value used when the argument is absent.
    pub default: Option<Value>,
}

impl FieldInfo {
    /// Creates empty field metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A compound type: a base type plus ordered metadata.
///
/// # Examples
///
/// ```
/// use agentdeps::depends::domain::{Annotation, ConstraintStep, DeclaredType, FieldInfo};
///
/// let annotation = Annotation::new(DeclaredType::Integer)
///     .with_constraint(ConstraintStep::Ge(10.0))
///     .with_field(FieldInfo::new().with_alias("b"));
/// assert_eq!(annotation.constraints().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    base: DeclaredType,
    constraints: Vec<ConstraintStep>,
    field: Option<FieldInfo>,
}

impl Annotation {
    /// Creates an annotation with no metadata.
    #[must_use]
    pub const fn new(base: DeclaredType) -> Self {
        Self {
            base,
            constraints: Vec::new(),
            field: None,
        }
    }

    /// Appends a constraint step.
    #[must_use]
    pub fn with_constraint(mut self, step: ConstraintStep) -> Self {
        self.constraints.push(step);
        self
    }

    /// Attaches field metadata. A later call replaces an earlier one.
    #[must_use]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.field = Some(field);
        self
    }

    /// Returns the base type.
    #[must_use]
    pub const fn base(&self) -> &DeclaredType {
        &self.base
    }

    /// Returns the constraint steps in order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintStep] {
        &self.constraints
    }

    /// Returns the attached field metadata.
    #[must_use]
    pub const fn field(&self) -> Option<&FieldInfo> {
        self.field.as_ref()
    }

    pub(crate) fn into_parts(self) -> (DeclaredType, Vec<ConstraintStep>, Option<FieldInfo>) {
        (self.base, self.constraints, self.field)
    }
}

impl From<DeclaredType> for Annotation {
    fn from(base: DeclaredType) -> Self {
        Self::new(base)
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) kind: ParamKind,
    pub(crate) annotation: Option<Annotation>,
    pub(crate) constraints: Vec<ConstraintStep>,
    pub(crate) alias: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
}

impl Param {
    /// Creates a parameter of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            constraints: Vec::new(),
            alias: None,
            default: None,
            description: None,
        }
    }

    /// Creates a positional-only parameter.
    #[must_use]
    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOnly)
    }

    /// Creates a positional-or-keyword parameter.
    #[must_use]
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    /// Creates a keyword-only parameter.
    #[must_use]
    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordOnly)
    }

    /// Creates a parameter collecting surplus positional arguments.
    #[must_use]
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarPositional)
    }

    /// Creates a parameter collecting surplus keyword arguments.
    #[must_use]
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarKeyword)
    }

    /// Declares the parameter type with no extra metadata.
    #[must_use]
    pub fn typed(self, declared_type: DeclaredType) -> Self {
        self.annotated(Annotation::new(declared_type))
    }

    /// Declares the parameter type as a compound annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Appends a constraint step after any annotation constraints.
    #[must_use]
    pub fn with_constraint(mut self, step: ConstraintStep) -> Self {
        self.constraints.push(step);
        self
    }

    /// Sets the external call-site name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the default used when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets a human-readable description, surfaced in JSON Schema output.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

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
}

/// Declaration of a callable: its name, parameters, and return annotation.
///
/// For streaming callables the return annotation describes each produced
/// item.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub(crate) name: String,
    pub(crate) params: Vec<Param>,
    pub(crate) returns: Option<Annotation>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declares the return annotation.
    #[must_use]
    pub fn returns(mut self, annotation: Annotation) -> Self {
        self.returns = Some(annotation);
        self
    }

    /// Declares a plain return type.
    #[must_use]
    pub fn returns_type(self, declared_type: DeclaredType) -> Self {
        self.returns(Annotation::new(declared_type))
    }

    /// Returns the callable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}
