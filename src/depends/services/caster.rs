//! Validator/caster: coerces bound values into their declared types.
//!
//! Coercion is lax in the usual way for loosely typed callers: numeric
//! strings become numbers, integral floats become integers, and
//! `"true"`/`"false"` style strings become booleans. Strings are never
//! produced from other types.

use serde_json::{Map, Number, Value};

use crate::depends::domain::{
    BoundArguments, CallableSchema, ConstraintStep, DeclaredType, FieldError, FieldPath,
    ModelSchema, ParamKind, ValidationError,
};

/// Validates every bound argument of one invocation.
///
/// Parameters without a declared type pass through unchanged, as do values
/// filled from defaults. Variadic values are validated one by one against
/// the element type. All failures of the pass are collected.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every value that failed coercion or
/// a constraint step.
pub fn validate(
    schema: &CallableSchema,
    mut bound: BoundArguments,
) -> Result<BoundArguments, ValidationError> {
    let mut errors = Vec::new();
    let mut validated = BoundArguments::default();

    for spec in schema.parameters() {
        let path = FieldPath::root(spec.name());
        let declared = spec.declared_type();
        let constraints = spec.constraints();
        match spec.kind() {
            ParamKind::VarPositional => {
                let values = bound.take_var_positional();
                let mut items = Vec::with_capacity(values.len());
                for (index, value) in values.into_iter().enumerate() {
                    let item_path = path.index(index);
                    if let Some(item) =
                        collect(apply_field(declared, constraints, value, &item_path), &mut errors)
                    {
                        items.push(item);
                    }
                }
                validated.set_var_positional(items);
            }
            ParamKind::VarKeyword => {
                let values = bound.take_var_keyword();
                let mut entries = Map::new();
                for (key, value) in values {
                    let entry_path = path.key(key.as_str());
                    if let Some(entry) =
                        collect(apply_field(declared, constraints, value, &entry_path), &mut errors)
                    {
                        entries.insert(key, entry);
                    }
                }
                validated.set_var_keyword(entries);
            }
            _ => {
                let defaulted = bound.is_defaulted(spec.name());
                let Some(value) = bound.take_named(spec.name()) else {
                    continue;
                };
                if defaulted {
                    validated.insert_default(spec.name(), value);
                } else if let Some(value) =
                    collect(apply_field(declared, constraints, value, &path), &mut errors)
                {
                    validated.insert_supplied(spec.name(), value);
                }
            }
        }
    }

    if errors.is_empty() {
        tracing::trace!(callable = schema.name(), "arguments validated");
        Ok(validated)
    } else {
        Err(ValidationError::new(schema.name(), errors))
    }
}

/// Validates a return value, or one streamed item, against the return spec.
///
/// Without a return spec the value passes through unchanged.
///
/// # Errors
///
/// Returns [`ValidationError`] located at `return` when the value fails
/// coercion or a constraint step.
pub fn validate_return(schema: &CallableSchema, raw: Value) -> Result<Value, ValidationError> {
    let Some(spec) = schema.return_spec() else {
        return Ok(raw);
    };
    apply_field(
        spec.declared_type(),
        spec.constraints(),
        raw,
        &FieldPath::return_value(),
    )
    .map_err(|errors| ValidationError::new(schema.name(), errors))
}

fn collect(result: Result<Value, Vec<FieldError>>, errors: &mut Vec<FieldError>) -> Option<Value> {
    match result {
        Ok(value) => Some(value),
        Err(mut failures) => {
            errors.append(&mut failures);
            None
        }
    }
}

fn apply_field(
    declared: Option<&DeclaredType>,
    constraints: &[ConstraintStep],
    value: Value,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    let Some(declared) = declared else {
        return Ok(value);
    };
    let mut current = coerce(declared, value, path)?;
    for step in constraints {
        let snapshot = current.clone();
        current = step
            .apply(current)
            .map_err(|reason| vec![FieldError::new(path.clone(), snapshot, reason)])?;
    }
    Ok(current)
}

/// Coerces a raw value into a declared type.
///
/// # Errors
///
/// Returns one [`FieldError`] per offending value; containers and models
/// report every failing element.
pub fn coerce(
    declared: &DeclaredType,
    value: Value,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    let single = |value: Value, reason: String| vec![FieldError::new(path.clone(), value, reason)];
    match declared {
        DeclaredType::Any => Ok(value),
        DeclaredType::Integer => coerce_integer(&value)
            .ok_or_else(|| single(value, "input should be a valid integer".to_owned())),
        DeclaredType::Float => coerce_float(&value)
            .ok_or_else(|| single(value, "input should be a valid number".to_owned())),
        DeclaredType::String => match value {
            Value::String(_) => Ok(value),
            other => Err(single(other, "input should be a valid string".to_owned())),
        },
        DeclaredType::Boolean => coerce_boolean(&value)
            .ok_or_else(|| single(value, "input should be a valid boolean".to_owned())),
        DeclaredType::Null => match value {
            Value::Null => Ok(Value::Null),
            other => Err(single(other, "input should be null".to_owned())),
        },
        DeclaredType::Optional(inner) => match value {
            Value::Null => Ok(Value::Null),
            other => coerce(inner, other, path),
        },
        DeclaredType::Union(members) => members
            .iter()
            .find_map(|member| coerce(member, value.clone(), path).ok())
            .ok_or_else(|| single(value, format!("input does not match {declared}"))),
        DeclaredType::Literal(options) => {
            if options.contains(&value) {
                Ok(value)
            } else {
                Err(single(value, format!("input should be {declared}")))
            }
        }
        DeclaredType::List(element) => match value {
            Value::Array(items) => coerce_list(element, items, path),
            other => Err(single(other, "input should be a valid list".to_owned())),
        },
        DeclaredType::Map(element) => match value {
            Value::Object(entries) => coerce_map(element, entries, path),
            other => Err(single(other, "input should be a valid mapping".to_owned())),
        },
        DeclaredType::Model(model) => match value {
            Value::Object(entries) => coerce_model(model, entries, path),
            other => Err(single(
                other,
                format!("input should be a valid mapping for {}", model.name()),
            )),
        },
    }
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(value.clone()),
        Value::Number(number) => number.as_f64().and_then(integral_float),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| trimmed.parse::<u64>().map(Value::from))
                .ok()
        }
        Value::Bool(flag) => Some(Value::from(i64::from(*flag))),
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "the float is checked to be integral and inside the i64 range first"
)]
fn integral_float(number: f64) -> Option<Value> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then(|| Value::from(number as i64))
}

fn coerce_float(value: &Value) -> Option<Value> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    Number::from_f64(number).map(Value::Number)
}

fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "f" | "n" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_list(
    element: &DeclaredType,
    items: Vec<Value>,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut coerced = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if let Some(value) = collect(coerce(element, item, &path.index(index)), &mut errors) {
            coerced.push(value);
        }
    }
    if errors.is_empty() {
        Ok(Value::Array(coerced))
    } else {
        Err(errors)
    }
}

fn coerce_map(
    element: &DeclaredType,
    entries: Map<String, Value>,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut coerced = Map::new();
    for (key, entry) in entries {
        let entry_path = path.key(key.as_str());
        if let Some(value) = collect(coerce(element, entry, &entry_path), &mut errors) {
            coerced.insert(key, value);
        }
    }
    if errors.is_empty() {
        Ok(Value::Object(coerced))
    } else {
        Err(errors)
    }
}

fn coerce_model(
    model: &ModelSchema,
    mut entries: Map<String, Value>,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut coerced = Map::new();
    for field in model.fields() {
        let field_path = path.key(field.name());
        match entries.remove(field.lookup_key()) {
            Some(raw) => {
                let outcome = coerce(field.field_type(), raw, &field_path);
                if let Some(value) = collect(outcome, &mut errors) {
                    coerced.insert(field.name().to_owned(), value);
                }
            }
            None => match field.default() {
                Some(default) => {
                    coerced.insert(field.name().to_owned(), default.clone());
                }
                None => errors.push(FieldError::new(
                    field_path,
                    Value::Object(entries.clone()),
                    "field required",
                )),
            },
        }
    }
    if errors.is_empty() {
        Ok(Value::Object(coerced))
    } else {
        Err(errors)
    }
}
