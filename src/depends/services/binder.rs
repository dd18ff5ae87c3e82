//! Call binder: matches call-site arguments to declared parameters.

use serde_json::{Map, Value};

use crate::depends::domain::{
    BindError, BoundArguments, CallArgs, CallableSchema, ParamKind, ParameterSpec,
};

use super::ExtraPolicy;

/// Binds positional and keyword arguments to a schema's parameters.
///
/// Positional values are consumed left to right by positional-capable
/// parameters; the rest go to the variadic-positional parameter. Keyword
/// values are looked up by alias when the parameter has one, otherwise by
/// name; the rest go to the variadic-keyword parameter or are handled by
/// `extra`. An aliased parameter is never matched by its declared name, so
/// a keyword equal to that name is treated as unmatched.
///
/// # Errors
///
/// Returns [`BindError`] when a required argument is missing, too many
/// positional values are supplied, a keyword matches nothing under
/// [`ExtraPolicy::Forbid`], or a parameter is supplied twice.
pub fn bind(
    schema: &CallableSchema,
    args: CallArgs,
    extra: ExtraPolicy,
) -> Result<BoundArguments, BindError> {
    let (positional, mut keyword) = args.into_parts();
    let given = positional.len();
    let mut positional = positional.into_iter();
    let mut bound = BoundArguments::default();

    for spec in schema.parameters() {
        match spec.kind() {
            ParamKind::PositionalOnly => match positional.next() {
                Some(value) => bound.insert_supplied(spec.name(), value),
                None => bind_default(schema, spec, &mut bound)?,
            },
            ParamKind::PositionalOrKeyword => match positional.next() {
                Some(value) => {
                    if keyword.contains_key(spec.lookup_key()) {
                        return Err(BindError::MultipleValues {
                            callable: schema.name().to_owned(),
                            parameter: spec.lookup_key().to_owned(),
                        });
                    }
                    bound.insert_supplied(spec.name(), value);
                }
                None => bind_keyword(schema, spec, &mut keyword, &mut bound)?,
            },
            ParamKind::VarPositional => bound.set_var_positional(positional.by_ref().collect()),
            ParamKind::KeywordOnly => bind_keyword(schema, spec, &mut keyword, &mut bound)?,
            ParamKind::VarKeyword => bound.set_var_keyword(std::mem::take(&mut keyword)),
        }
    }

    if positional.next().is_some() {
        return Err(BindError::TooManyPositional {
            callable: schema.name().to_owned(),
            expected: schema
                .parameters()
                .iter()
                .filter(|spec| spec.kind().accepts_positional())
                .count(),
            given,
        });
    }

    reject_extra_keywords(schema, &keyword, extra)?;

    tracing::trace!(
        callable = schema.name(),
        named = bound.named().len(),
        var_positional = bound.var_positional().len(),
        var_keyword = bound.var_keyword().len(),
        "arguments bound"
    );
    Ok(bound)
}

fn bind_keyword(
    schema: &CallableSchema,
    spec: &ParameterSpec,
    keyword: &mut Map<String, Value>,
    bound: &mut BoundArguments,
) -> Result<(), BindError> {
    match keyword.remove(spec.lookup_key()) {
        Some(value) => {
            bound.insert_supplied(spec.name(), value);
            Ok(())
        }
        None => bind_default(schema, spec, bound),
    }
}

fn bind_default(
    schema: &CallableSchema,
    spec: &ParameterSpec,
    bound: &mut BoundArguments,
) -> Result<(), BindError> {
    let default = spec
        .default()
        .cloned()
        .ok_or_else(|| BindError::MissingArgument {
            callable: schema.name().to_owned(),
            parameter: spec.lookup_key().to_owned(),
        })?;
    bound.insert_default(spec.name(), default);
    Ok(())
}

fn reject_extra_keywords(
    schema: &CallableSchema,
    keyword: &Map<String, Value>,
    extra: ExtraPolicy,
) -> Result<(), BindError> {
    let Some(unexpected) = keyword.keys().next() else {
        return Ok(());
    };
    match extra {
        ExtraPolicy::Forbid => Err(BindError::UnexpectedKeyword {
            callable: schema.name().to_owned(),
            keyword: unexpected.clone(),
        }),
        ExtraPolicy::Ignore => {
            tracing::trace!(
                callable = schema.name(),
                ignored = keyword.len(),
                "ignoring unmatched keyword arguments"
            );
            Ok(())
        }
    }
}
