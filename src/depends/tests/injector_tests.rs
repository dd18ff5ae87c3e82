//! Unit tests for the injector entry points and schema cache.

use std::sync::Arc;

use crate::depends::{
    domain::{CallArgs, DeclaredType, Param, SchemaBuildError, Signature},
    services::{Callable, ExtraPolicy, InjectOptions, Injector, inject},
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn signature() -> Signature {
    Signature::new("f")
        .param(Param::positional("a").typed(DeclaredType::Integer))
        .returns_type(DeclaredType::Integer)
}

fn identity() -> Callable {
    Callable::plain(|args| args.get_as::<Value>("a"))
}

#[fixture]
fn injector() -> Injector {
    Injector::default()
}

#[rstest]
fn default_options_cast_and_forbid_extras(injector: Injector) {
    assert_eq!(injector.options(), InjectOptions::default());
    assert!(injector.options().cast);
    assert_eq!(injector.options().extra, ExtraPolicy::Forbid);
}

#[rstest]
fn rewrapping_a_callable_reuses_its_schema(injector: Injector) {
    let callable = identity();

    let first = injector
        .inject(&signature(), callable.clone())
        .expect("signature is well formed");
    let second = injector
        .inject(&signature(), callable)
        .expect("signature is well formed");

    assert!(Arc::ptr_eq(first.schema(), second.schema()));
    assert_eq!(injector.cached_schemas(), 1);
    assert_eq!(
        second.call(CallArgs::new().arg(json!("5"))).ok(),
        Some(json!(5))
    );
}

#[rstest]
fn distinct_callables_get_distinct_schemas(injector: Injector) {
    injector
        .inject(&signature(), identity())
        .expect("signature is well formed");
    injector
        .inject(&signature(), identity())
        .expect("signature is well formed");

    assert_eq!(injector.cached_schemas(), 2);
}

#[rstest]
fn different_signature_for_the_same_callable_builds_its_own_schema(injector: Injector) {
    let callable = identity();
    let wider = Signature::new("g")
        .param(Param::positional("a").typed(DeclaredType::String))
        .param(Param::positional("b").typed(DeclaredType::Integer));

    let first = injector
        .inject(&signature(), callable.clone())
        .expect("signature is well formed");
    let second = injector
        .inject(&wider, callable.clone())
        .expect("signature is well formed");

    assert_eq!(first.name(), "f");
    assert_eq!(second.name(), "g");
    assert_eq!(second.schema().parameters().len(), 2);
    assert_eq!(injector.cached_schemas(), 2);

    let again = injector
        .inject(&wider, callable)
        .expect("signature is well formed");
    assert!(Arc::ptr_eq(second.schema(), again.schema()));
}

#[rstest]
fn malformed_signature_fails_for_an_already_cached_callable(injector: Injector) {
    let callable = identity();
    injector
        .inject(&signature(), callable.clone())
        .expect("signature is well formed");
    let malformed = Signature::new("bad")
        .param(Param::var_keyword("kwargs"))
        .param(Param::positional("a"));

    let result = injector.inject(&malformed, callable);

    assert!(matches!(
        result,
        Err(SchemaBuildError::MisplacedParameter { .. })
    ));
    assert_eq!(injector.cached_schemas(), 1);
}

#[rstest]
fn evicting_a_callable_drops_its_schemas(injector: Injector) {
    let callable = identity();
    let other = identity();
    injector
        .inject(&signature(), callable.clone())
        .expect("signature is well formed");
    injector
        .inject(&Signature::new("g"), callable.clone())
        .expect("signature is well formed");
    injector
        .inject(&signature(), other)
        .expect("signature is well formed");

    assert_eq!(injector.evict(&callable), 2);
    assert_eq!(injector.evict(&callable), 0);
    assert_eq!(injector.cached_schemas(), 1);

    injector.clear();
    assert_eq!(injector.cached_schemas(), 0);
}

#[rstest]
fn bare_inject_builds_equal_schemas_each_time() {
    let callable = identity();

    let first = inject(&signature(), callable.clone()).expect("signature is well formed");
    let second = inject(&signature(), callable).expect("signature is well formed");

    assert!(!Arc::ptr_eq(first.schema(), second.schema()));
    assert_eq!(first.schema(), second.schema());
}

#[rstest]
fn malformed_signature_is_not_cached(injector: Injector) {
    let malformed = Signature::new("bad")
        .param(Param::var_keyword("kwargs"))
        .param(Param::positional("a"));

    let result = injector.inject(&malformed, identity());

    assert!(matches!(
        result,
        Err(SchemaBuildError::MisplacedParameter { .. })
    ));
    assert_eq!(injector.cached_schemas(), 0);
}

#[rstest]
#[case(r#"{}"#, InjectOptions::default())]
#[case(r#"{"cast": false}"#, InjectOptions::bind_only())]
#[case(r#"{"extra": "ignore"}"#, InjectOptions::lenient())]
fn options_deserialize_with_defaults(#[case] raw: &str, #[case] expected: InjectOptions) {
    let options: InjectOptions = serde_json::from_str(raw).expect("options should parse");

    assert_eq!(options, expected);
}
