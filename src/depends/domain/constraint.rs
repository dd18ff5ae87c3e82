//! Refinement and transform steps applied after base-type coercion.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;
type TransformFn = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// One step of a compound type: either a predicate that must hold or a
/// transform that replaces the value.
///
/// Steps run in declaration order after the value has been coerced into its
/// declared type. A failing predicate stops the chain.
///
/// # Examples
///
/// ```
/// use agentdeps::depends::domain::ConstraintStep;
/// use serde_json::json;
///
/// let step = ConstraintStep::Ge(10.0);
/// assert!(step.apply(json!(12)).is_ok());
/// assert!(step.apply(json!(3)).is_err());
/// ```
#[derive(Clone)]
pub enum ConstraintStep {
    /// Numeric value must be greater than or equal to the bound.
    Ge(f64),
    /// Numeric value must be strictly greater than the bound.
    Gt(f64),
    /// Numeric value must be less than or equal to the bound.
    Le(f64),
    /// Numeric value must be strictly less than the bound.
    Lt(f64),
    /// Numeric value must be an exact multiple of the divisor.
    MultipleOf(f64),
    /// String, array, or object must have at least this many elements.
    MinLength(usize),
    /// String, array, or object must have at most this many elements.
    MaxLength(usize),
    /// Value must equal one of the listed values.
    OneOf(Vec<Value>),
    /// Named custom predicate.
    Predicate {
        /// Name reported when the predicate fails.
        name: String,
        /// The check itself.
        check: Arc<PredicateFn>,
    },
    /// Named custom transform; an `Err` fails validation with its message.
    Transform {
        /// Name reported when the transform fails.
        name: String,
        /// The transform itself.
        apply: Arc<TransformFn>,
    },
}

impl ConstraintStep {
    /// Creates a named predicate step.
    #[must_use]
    pub fn predicate<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Creates a named transform step.
    #[must_use]
    pub fn transform<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Transform {
            name: name.into(),
            apply: Arc::new(apply),
        }
    }

    /// Applies the step, returning the (possibly replaced) value.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the predicate does not hold, the
    /// value has the wrong shape for the step, or the transform fails.
    pub fn apply(&self, value: Value) -> Result<Value, String> {
        match self {
            Self::Ge(bound) => check_number(value, |number| number >= *bound, || {
                format!("input should be greater than or equal to {bound}")
            }),
            Self::Gt(bound) => check_number(value, |number| number > *bound, || {
                format!("input should be greater than {bound}")
            }),
            Self::Le(bound) => check_number(value, |number| number <= *bound, || {
                format!("input should be less than or equal to {bound}")
            }),
            Self::Lt(bound) => check_number(value, |number| number < *bound, || {
                format!("input should be less than {bound}")
            }),
            Self::MultipleOf(divisor) => check_number(
                value,
                |number| is_multiple_of(number, *divisor),
                || format!("input should be a multiple of {divisor}"),
            ),
            Self::MinLength(min) => check_length(value, |length| length >= *min, || {
                format!("input should have at least {min} items")
            }),
            Self::MaxLength(max) => check_length(value, |length| length <= *max, || {
                format!("input should have at most {max} items")
            }),
            Self::OneOf(options) => {
                if options.contains(&value) {
                    Ok(value)
                } else {
                    let rendered: Vec<String> = options.iter().map(ToString::to_string).collect();
                    Err(format!("input should be one of [{}]", rendered.join(", ")))
                }
            }
            Self::Predicate { name, check } => {
                if check(&value) {
                    Ok(value)
                } else {
                    Err(format!("predicate '{name}' failed"))
                }
            }
            Self::Transform { name, apply } => {
                apply(value).map_err(|reason| format!("transform '{name}' failed: {reason}"))
            }
        }
    }

    /// Adds the JSON Schema keyword for this step, when one exists.
    pub(crate) fn annotate_json_schema(
        &self,
        schema: &mut Map<String, Value>,
        length_kind: LengthKind,
    ) {
        let (keyword, value) = match self {
            Self::Ge(bound) => ("minimum", Value::from(*bound)),
            Self::Gt(bound) => ("exclusiveMinimum", Value::from(*bound)),
            Self::Le(bound) => ("maximum", Value::from(*bound)),
            Self::Lt(bound) => ("exclusiveMaximum", Value::from(*bound)),
            Self::MultipleOf(divisor) => ("multipleOf", Value::from(*divisor)),
            Self::MinLength(min) => (length_kind.min_keyword(), Value::from(*min)),
            Self::MaxLength(max) => (length_kind.max_keyword(), Value::from(*max)),
            Self::OneOf(options) => ("enum", Value::Array(options.clone())),
            Self::Predicate { .. } | Self::Transform { .. } => return,
        };
        schema.insert(keyword.to_owned(), value);
    }
}

/// Which JSON Schema length keywords apply to a declared type.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LengthKind {
    Text,
    Items,
    Properties,
}

impl LengthKind {
    const fn min_keyword(self) -> &'static str {
        match self {
            Self::Text => "minLength",
            Self::Items => "minItems",
            Self::Properties => "minProperties",
        }
    }

    const fn max_keyword(self) -> &'static str {
        match self {
            Self::Text => "maxLength",
            Self::Items => "maxItems",
            Self::Properties => "maxProperties",
        }
    }
}

impl fmt::Debug for ConstraintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ge(bound) => f.debug_tuple("Ge").field(bound).finish(),
            Self::Gt(bound) => f.debug_tuple("Gt").field(bound).finish(),
            Self::Le(bound) => f.debug_tuple("Le").field(bound).finish(),
            Self::Lt(bound) => f.debug_tuple("Lt").field(bound).finish(),
            Self::MultipleOf(divisor) => f.debug_tuple("MultipleOf").field(divisor).finish(),
            Self::MinLength(min) => f.debug_tuple("MinLength").field(min).finish(),
            Self::MaxLength(max) => f.debug_tuple("MaxLength").field(max).finish(),
            Self::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Self::Predicate { name, .. } => {
                f.debug_struct("Predicate").field("name", name).finish()
            }
            Self::Transform { name, .. } => {
                f.debug_struct("Transform").field("name", name).finish()
            }
        }
    }
}

impl PartialEq for ConstraintStep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ge(left), Self::Ge(right))
            | (Self::Gt(left), Self::Gt(right))
            | (Self::Le(left), Self::Le(right))
            | (Self::Lt(left), Self::Lt(right))
            | (Self::MultipleOf(left), Self::MultipleOf(right)) => {
                left.to_bits() == right.to_bits()
            }
            (Self::MinLength(left), Self::MinLength(right))
            | (Self::MaxLength(left), Self::MaxLength(right)) => left == right,
            (Self::OneOf(left), Self::OneOf(right)) => left == right,
            (
                Self::Predicate {
                    name: left_name,
                    check: left,
                },
                Self::Predicate {
                    name: right_name,
                    check: right,
                },
            ) => left_name == right_name && Arc::ptr_eq(left, right),
            (
                Self::Transform {
                    name: left_name,
                    apply: left,
                },
                Self::Transform {
                    name: right_name,
                    apply: right,
                },
            ) => left_name == right_name && Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

fn check_number(
    value: Value,
    holds: impl FnOnce(f64) -> bool,
    reason: impl FnOnce() -> String,
) -> Result<Value, String> {
    let Some(number) = value.as_f64() else {
        return Err("input should be a number".to_owned());
    };
    if holds(number) { Ok(value) } else { Err(reason()) }
}

fn check_length(
    value: Value,
    holds: impl FnOnce(usize) -> bool,
    reason: impl FnOnce() -> String,
) -> Result<Value, String> {
    let length = match &value {
        Value::String(text) => text.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(entries) => entries.len(),
        _ => return Err("input should be a string, list, or mapping".to_owned()),
    };
    if holds(length) { Ok(value) } else { Err(reason()) }
}

#[expect(
    clippy::float_arithmetic,
    reason = "multiple-of checks on floating point inputs need division"
)]
fn is_multiple_of(number: f64, divisor: f64) -> bool {
    if divisor == 0.0 {
        return false;
    }
    let quotient = number / divisor;
    (quotient - quotient.round()).abs() < f64::EPSILON * quotient.abs().max(1.0)
}
