//! Error types for schema building, binding, validation and invocation.
//!
//! Binding failures (the call-site shape does not fit the declaration) and
//! validation failures (a value does not fit its declared type) are distinct
//! types so callers can tell them apart.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::{InvocationNature, ParamKind};

/// Malformed callable declaration. Raised at wrap time only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaBuildError {
    /// Two parameters share a name.
    #[error("duplicate parameter '{parameter}' in '{callable}'")]
    DuplicateParameter {
        /// Callable name.
        callable: String,
        /// Repeated parameter name.
        parameter: String,
    },

    /// An alias collides with another parameter's name or alias.
    #[error("alias '{alias}' of parameter '{parameter}' in '{callable}' is already in use")]
    DuplicateAlias {
        /// Callable name.
        callable: String,
        /// Parameter carrying the alias.
        parameter: String,
        /// Colliding alias.
        alias: String,
    },

    /// More than one parameter of a collecting kind.
    #[error("'{callable}' declares more than one {kind} parameter ('{parameter}')")]
    DuplicateVariadic {
        /// Callable name.
        callable: String,
        /// Second parameter of the collecting kind.
        parameter: String,
        /// The repeated kind.
        kind: ParamKind,
    },

    /// A parameter appears after one of a later kind.
    #[error("{kind} parameter '{parameter}' cannot follow a {previous} parameter in '{callable}'")]
    MisplacedParameter {
        /// Callable name.
        callable: String,
        /// Offending parameter.
        parameter: String,
        /// Kind of the offending parameter.
        kind: ParamKind,
        /// Kind of the parameter it follows.
        previous: ParamKind,
    },

    /// A required positional parameter follows one with a default.
    #[error("required parameter '{parameter}' follows a parameter with a default in '{callable}'")]
    RequiredAfterDefault {
        /// Callable name.
        callable: String,
        /// Offending parameter.
        parameter: String,
    },

    /// A collecting parameter was given an alias or a default.
    #[error("{kind} parameter '{parameter}' in '{callable}' cannot have an alias or default")]
    VariadicWithMetadata {
        /// Callable name.
        callable: String,
        /// Offending parameter.
        parameter: String,
        /// Its kind.
        kind: ParamKind,
    },

    /// Constraint steps were declared without a base type.
    #[error("parameter '{parameter}' in '{callable}' has constraints but no declared type")]
    ConstraintWithoutType {
        /// Callable name.
        callable: String,
        /// Offending parameter.
        parameter: String,
    },
}

/// Call-site arguments that do not fit the declaration.
///
/// The wrapped body is never invoked when binding fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindError {
    /// A required parameter received no value.
    #[error("missing required argument '{parameter}' for '{callable}'")]
    MissingArgument {
        /// Callable name.
        callable: String,
        /// Name (or alias) the caller should have supplied.
        parameter: String,
    },

    /// More positional values than positional parameters.
    #[error("'{callable}' takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        /// Callable name.
        callable: String,
        /// Number of positional parameters.
        expected: usize,
        /// Number of positional values supplied.
        given: usize,
    },

    /// A keyword matched no parameter and nothing collects it.
    #[error("unexpected keyword argument '{keyword}' for '{callable}'")]
    UnexpectedKeyword {
        /// Callable name.
        callable: String,
        /// The unmatched keyword.
        keyword: String,
    },

    /// A parameter was supplied both by position and by keyword.
    #[error("'{callable}' got multiple values for argument '{parameter}'")]
    MultipleValues {
        /// Callable name.
        callable: String,
        /// Parameter supplied twice.
        parameter: String,
    },
}

/// One segment of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Parameter name, model field, or mapping key.
    Key(String),
    /// Sequence position.
    Index(usize),
}

/// Location of a value inside the arguments or return value.
///
/// Renders dotted, for example `a`, `args.1`, `point.x`, or `return`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Name of the root segment used for return values.
    pub const RETURN: &'static str = "return";

    /// Creates a path rooted at a parameter name.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(name.into())])
    }

    /// Creates the path of a return value.
    #[must_use]
    pub fn return_value() -> Self {
        Self::root(Self::RETURN)
    }

    /// Returns a child path for a key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Returns a child path for a sequence position.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns `true` when the path lies inside a return value.
    #[must_use]
    pub fn is_return_value(&self) -> bool {
        matches!(self.0.first(), Some(PathSegment::Key(key)) if key == Self::RETURN)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

/// A single value that failed coercion or a constraint step.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Where the value sits.
    pub path: FieldPath,
    /// The offending raw value.
    pub value: Value,
    /// Why it was rejected.
    pub reason: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(path: FieldPath, value: Value, reason: impl Into<String>) -> Self {
        Self {
            path,
            value,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (input: {})", self.path, self.reason, self.value)
    }
}

/// Values that do not fit their declared types.
///
/// Collects every failing field of one validation pass.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{} validation error(s) for '{callable}': {}", .errors.len(), format_errors(.errors))]
pub struct ValidationError {
    callable: String,
    errors: Vec<FieldError>,
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates a validation error from collected field errors.
    #[must_use]
    pub fn new(callable: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            callable: callable.into(),
            errors,
        }
    }

    /// Returns the callable name.
    #[must_use]
    pub fn callable(&self) -> &str {
        &self.callable
    }

    /// Returns the individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `true` when some error is located at the given dotted path.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|error| error.path.to_string() == path)
    }

    /// Returns `true` when every error lies inside a return value, so the
    /// body has already run.
    #[must_use]
    pub fn is_return_value(&self) -> bool {
        !self.errors.is_empty() && self.errors.iter().all(|error| error.path.is_return_value())
    }
}

/// Failure raised by a wrapped body.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// A bound argument could not be read as the requested Rust type.
    #[error("cannot read argument '{name}': {reason}")]
    Argument {
        /// Parameter name.
        name: String,
        /// Deserialization failure.
        reason: String,
    },

    /// The body reported a failure message.
    #[error("{0}")]
    Message(String),

    /// The body failed with an underlying error.
    #[error("invocation failed: {0}")]
    Source(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvocationError {
    /// Creates an argument read failure.
    #[must_use]
    pub fn argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Argument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a failure from a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an underlying error.
    pub fn from_error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Arc::new(err))
    }
}

/// Any per-call failure of an injected callable.
#[derive(Debug, Clone, Error)]
pub enum InjectError {
    /// Arguments did not fit the declaration.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Arguments or the return value did not fit their types.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The wrapped body failed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// The callable was invoked through the adapter of another nature.
    #[error("'{callable}' is a {actual} callable and cannot be invoked as {requested}")]
    NatureMismatch {
        /// Callable name.
        callable: String,
        /// Nature fixed at wrap time.
        actual: InvocationNature,
        /// Nature of the adapter used.
        requested: InvocationNature,
    },
}
