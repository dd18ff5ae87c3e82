//! Type model builder: turns a [`Signature`] into a [`CallableSchema`].

use std::collections::HashSet;

use crate::depends::domain::{
    Annotation, CallableSchema, ConstraintStep, DeclaredType, FieldInfo, InvocationNature, Param,
    ParamKind, ParameterSpec, ReturnSpec, SchemaBuildError, Signature,
};

/// Builds the validation schema for a declared callable.
///
/// Annotations are unwrapped into a base type plus ordered constraint
/// steps; field metadata attached to an annotation is folded into the
/// parameter's alias and default. Explicit [`Param::with_alias`] and
/// [`Param::with_default`] settings take precedence over folded metadata.
///
/// # Errors
///
/// Returns [`SchemaBuildError`] when parameter names or aliases collide,
/// parameter kinds are out of order, a collecting kind repeats or carries an
/// alias or default, a required positional parameter follows a defaulted
/// one, or constraints are declared without a type.
pub fn build_schema(
    signature: &Signature,
    nature: InvocationNature,
) -> Result<CallableSchema, SchemaBuildError> {
    let callable = signature.name();
    let mut names = HashSet::new();
    let mut lookup_keys = HashSet::new();
    let mut previous_kind: Option<ParamKind> = None;
    let mut seen_positional_default = false;
    let mut parameters = Vec::with_capacity(signature.params().len());

    for param in signature.params() {
        if !names.insert(param.name.as_str()) {
            return Err(SchemaBuildError::DuplicateParameter {
                callable: callable.to_owned(),
                parameter: param.name.clone(),
            });
        }
        check_kind_order(callable, param, previous_kind)?;
        previous_kind = Some(param.kind);

        let spec = build_parameter(callable, param)?;

        if spec.kind.accepts_positional() {
            if spec.default.is_some() {
                seen_positional_default = true;
            } else if seen_positional_default {
                return Err(SchemaBuildError::RequiredAfterDefault {
                    callable: callable.to_owned(),
                    parameter: spec.name.clone(),
                });
            }
        }

        if !spec.kind.is_variadic() && !lookup_keys.insert(spec.lookup_key().to_owned()) {
            return Err(SchemaBuildError::DuplicateAlias {
                callable: callable.to_owned(),
                parameter: spec.name.clone(),
                alias: spec.lookup_key().to_owned(),
            });
        }

        parameters.push(spec);
    }

    let return_spec = signature.returns.clone().map(|annotation| {
        let (declared_type, constraints, _) = annotation.into_parts();
        ReturnSpec {
            declared_type: Some(declared_type),
            constraints,
        }
    });

    tracing::debug!(
        callable,
        %nature,
        parameters = parameters.len(),
        has_return_spec = return_spec.is_some(),
        "built callable schema"
    );

    Ok(CallableSchema {
        name: callable.to_owned(),
        parameters,
        return_spec,
        nature,
    })
}

fn check_kind_order(
    callable: &str,
    param: &Param,
    previous_kind: Option<ParamKind>,
) -> Result<(), SchemaBuildError> {
    let Some(previous) = previous_kind else {
        return Ok(());
    };
    if param.kind.is_variadic() && param.kind == previous {
        return Err(SchemaBuildError::DuplicateVariadic {
            callable: callable.to_owned(),
            parameter: param.name.clone(),
            kind: param.kind,
        });
    }
    if param.kind < previous {
        return Err(SchemaBuildError::MisplacedParameter {
            callable: callable.to_owned(),
            parameter: param.name.clone(),
            kind: param.kind,
            previous,
        });
    }
    Ok(())
}

fn build_parameter(callable: &str, param: &Param) -> Result<ParameterSpec, SchemaBuildError> {
    let (declared_type, mut constraints, field) = match param.annotation.clone() {
        Some(annotation) => unwrap_annotation(annotation),
        None => (None, Vec::new(), None),
    };
    constraints.extend(param.constraints.iter().cloned());

    if declared_type.is_none() && !constraints.is_empty() {
        return Err(SchemaBuildError::ConstraintWithoutType {
            callable: callable.to_owned(),
            parameter: param.name.clone(),
        });
    }

    let field = field.unwrap_or_default();
    let alias = param.alias.clone().or(field.alias);
    let default = param.default.clone().or(field.default);

    if param.kind.is_variadic() && (alias.is_some() || default.is_some()) {
        return Err(SchemaBuildError::VariadicWithMetadata {
            callable: callable.to_owned(),
            parameter: param.name.clone(),
            kind: param.kind,
        });
    }

    Ok(ParameterSpec {
        name: param.name.clone(),
        kind: param.kind,
        declared_type: declared_type.map(|declared| element_type(param.kind, declared)),
        constraints,
        alias,
        default,
        description: param.description.clone(),
    })
}

fn unwrap_annotation(
    annotation: Annotation,
) -> (Option<DeclaredType>, Vec<ConstraintStep>, Option<FieldInfo>) {
    let (base, constraints, field) = annotation.into_parts();
    (Some(base), constraints, field)
}

/// Collecting parameters validate each collected value, so a declared
/// `List(T)` or `Map(T)` on them stands for its element type `T`.
fn element_type(kind: ParamKind, declared: DeclaredType) -> DeclaredType {
    match (kind, declared) {
        (ParamKind::VarPositional, DeclaredType::List(element))
        | (ParamKind::VarKeyword, DeclaredType::Map(element)) => *element,
        (_, other) => other,
    }
}
