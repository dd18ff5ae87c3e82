//! Unit tests for schema building.

use crate::depends::{
    domain::{
        Annotation, CallableSchema, ConstraintStep, DeclaredType, FieldInfo, InvocationNature,
        Param, ParamKind, SchemaBuildError, Signature,
    },
    services::build_schema,
};
use rstest::rstest;
use serde_json::json;

fn build(signature: &Signature) -> Result<CallableSchema, SchemaBuildError> {
    build_schema(signature, InvocationNature::Plain)
}

#[rstest]
fn unannotated_parameters_have_no_declared_type() {
    let signature = Signature::new("f")
        .param(Param::positional("a"))
        .param(Param::positional("b"));

    let schema = build(&signature).expect("schema should build");

    assert_eq!(schema.parameters().len(), 2);
    assert!(schema.parameters().iter().all(|spec| spec.declared_type().is_none()));
    assert!(schema.return_spec().is_none());
}

#[rstest]
fn annotation_is_unwrapped_into_type_constraints_and_field() {
    let annotation = Annotation::new(DeclaredType::Integer)
        .with_constraint(ConstraintStep::Ge(10.0))
        .with_field(FieldInfo::new().with_alias("b").with_default(json!(10)));
    let signature = Signature::new("f").param(Param::positional("a").annotated(annotation));

    let schema = build(&signature).expect("schema should build");
    let spec = schema.parameter("a").expect("parameter a");

    assert_eq!(spec.declared_type(), Some(&DeclaredType::Integer));
    assert_eq!(spec.constraints(), &[ConstraintStep::Ge(10.0)]);
    assert_eq!(spec.alias(), Some("b"));
    assert_eq!(spec.lookup_key(), "b");
    assert_eq!(spec.default(), Some(&json!(10)));
    assert!(!spec.is_required());
}

#[rstest]
fn explicit_param_metadata_wins_over_field_metadata() {
    let annotation = Annotation::new(DeclaredType::Integer)
        .with_field(FieldInfo::new().with_alias("from_field").with_default(json!(1)));
    let signature = Signature::new("f").param(
        Param::positional("a")
            .annotated(annotation)
            .with_alias("explicit")
            .with_default(json!(2)),
    );

    let schema = build(&signature).expect("schema should build");
    let spec = schema.parameter("a").expect("parameter a");

    assert_eq!(spec.alias(), Some("explicit"));
    assert_eq!(spec.default(), Some(&json!(2)));
}

#[rstest]
fn param_constraints_follow_annotation_constraints() {
    let signature = Signature::new("f").param(
        Param::positional("a")
            .annotated(
                Annotation::new(DeclaredType::Integer).with_constraint(ConstraintStep::Ge(1.0)),
            )
            .with_constraint(ConstraintStep::Le(5.0)),
    );

    let schema = build(&signature).expect("schema should build");
    let spec = schema.parameter("a").expect("parameter a");

    assert_eq!(
        spec.constraints(),
        &[ConstraintStep::Ge(1.0), ConstraintStep::Le(5.0)]
    );
}

#[rstest]
#[case(ParamKind::VarPositional, DeclaredType::list(DeclaredType::Float), DeclaredType::Float)]
#[case(ParamKind::VarKeyword, DeclaredType::map(DeclaredType::Integer), DeclaredType::Integer)]
#[case(ParamKind::VarPositional, DeclaredType::String, DeclaredType::String)]
fn variadic_types_are_unwrapped_to_element_type(
    #[case] kind: ParamKind,
    #[case] declared: DeclaredType,
    #[case] expected: DeclaredType,
) {
    let signature = Signature::new("f").param(Param::new("rest", kind).typed(declared));

    let schema = build(&signature).expect("schema should build");

    assert_eq!(
        schema.parameter("rest").and_then(|spec| spec.declared_type()),
        Some(&expected)
    );
}

#[rstest]
fn keyword_only_after_var_positional_is_accepted() {
    let signature = Signature::new("f")
        .param(Param::positional("a"))
        .param(Param::var_positional("args"))
        .param(Param::keyword_only("b"))
        .param(Param::var_keyword("kwargs"));

    let schema = build(&signature).expect("schema should build");

    assert_eq!(schema.var_positional().map(|spec| spec.name()), Some("args"));
    assert_eq!(schema.var_keyword().map(|spec| spec.name()), Some("kwargs"));
}

#[rstest]
fn duplicate_parameter_names_are_rejected() {
    let signature = Signature::new("f")
        .param(Param::positional("a"))
        .param(Param::keyword_only("a"));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::DuplicateParameter { ref parameter, .. }) if parameter == "a"
    ));
}

#[rstest]
fn alias_colliding_with_another_name_is_rejected() {
    let signature = Signature::new("f")
        .param(Param::positional("a").with_alias("b"))
        .param(Param::positional("b"));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::DuplicateAlias { ref alias, .. }) if alias == "b"
    ));
}

#[rstest]
#[case(ParamKind::VarPositional)]
#[case(ParamKind::VarKeyword)]
fn repeated_variadic_kind_is_rejected(#[case] kind: ParamKind) {
    let signature = Signature::new("f")
        .param(Param::new("first", kind))
        .param(Param::new("second", kind));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::DuplicateVariadic { kind: repeated, .. }) if repeated == kind
    ));
}

#[rstest]
#[case(ParamKind::VarKeyword, ParamKind::VarPositional)]
#[case(ParamKind::KeywordOnly, ParamKind::PositionalOrKeyword)]
#[case(ParamKind::VarPositional, ParamKind::PositionalOnly)]
fn parameters_out_of_kind_order_are_rejected(#[case] first: ParamKind, #[case] second: ParamKind) {
    let signature = Signature::new("f")
        .param(Param::new("first", first))
        .param(Param::new("second", second));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::MisplacedParameter { kind, previous, .. })
            if kind == second && previous == first
    ));
}

#[rstest]
fn required_positional_after_default_is_rejected() {
    let signature = Signature::new("f")
        .param(Param::positional("a").with_default(json!(1)))
        .param(Param::positional("b"));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::RequiredAfterDefault { ref parameter, .. }) if parameter == "b"
    ));
}

#[rstest]
fn required_keyword_only_after_default_is_accepted() {
    let signature = Signature::new("f")
        .param(Param::positional("a").with_default(json!(1)))
        .param(Param::keyword_only("b"));

    assert!(build(&signature).is_ok());
}

#[rstest]
fn variadic_with_default_is_rejected() {
    let signature =
        Signature::new("f").param(Param::var_positional("args").with_default(json!([])));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::VariadicWithMetadata { .. })
    ));
}

#[rstest]
fn constraints_without_type_are_rejected() {
    let signature =
        Signature::new("f").param(Param::positional("a").with_constraint(ConstraintStep::Ge(0.0)));

    let result = build(&signature);

    assert!(matches!(
        result,
        Err(SchemaBuildError::ConstraintWithoutType { .. })
    ));
}

#[rstest]
fn building_is_deterministic() {
    let signature = Signature::new("f")
        .param(Param::positional("a").typed(DeclaredType::Integer))
        .param(Param::keyword_only("b").with_alias("bee").with_default(json!("x")))
        .returns_type(DeclaredType::Float);

    let first = build(&signature).expect("schema should build");
    let second = build(&signature).expect("schema should build");

    assert_eq!(first, second);
}

#[rstest]
fn parameters_json_schema_lists_keyword_addressable_parameters() {
    let signature = Signature::new("search")
        .param(Param::positional_only("context"))
        .param(
            Param::positional("query")
                .typed(DeclaredType::String)
                .with_constraint(ConstraintStep::MinLength(1))
                .with_description("Search terms"),
        )
        .param(
            Param::keyword_only("limit")
                .typed(DeclaredType::Integer)
                .with_alias("max_results")
                .with_default(json!(10)),
        );

    let schema = build(&signature).expect("schema should build");

    assert_eq!(
        schema.parameters_json_schema(),
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Search terms",
                },
                "max_results": { "type": "integer", "default": 10 },
            },
            "required": ["query"],
            "additionalProperties": false,
        })
    );
}

#[rstest]
fn untyped_var_keyword_allows_additional_properties() {
    let signature = Signature::new("f")
        .param(Param::positional("a"))
        .param(Param::var_keyword("kwargs"));

    let schema = build(&signature).expect("schema should build");

    assert_eq!(
        schema.parameters_json_schema().get("additionalProperties"),
        Some(&json!(true))
    );
}
