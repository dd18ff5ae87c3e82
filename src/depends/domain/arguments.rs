//! Call-site arguments and their bound, per-invocation form.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::InvocationError;

/// Raw arguments supplied at a call site.
///
/// # Examples
///
/// ```
/// use agentdeps::depends::domain::CallArgs;
/// use serde_json::json;
///
/// let args = CallArgs::new().arg(json!(1)).kwarg("b", json!("2"));
/// assert_eq!(args.positional().len(), 1);
/// assert_eq!(args.keyword().get("b"), Some(&json!("2")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: Map<String, Value>,
}

impl CallArgs {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates arguments from positional values only.
    #[must_use]
    pub fn from_positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keyword: Map::new(),
        }
    }

    /// Creates arguments from a keyword mapping only.
    #[must_use]
    pub const fn from_keyword(keyword: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keyword,
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    /// Adds a keyword argument, replacing an earlier one with the same key.
    #[must_use]
    pub fn kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.keyword.insert(key.into(), value);
        self
    }

    /// Returns the positional arguments.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Returns the keyword arguments.
    #[must_use]
    pub const fn keyword(&self) -> &Map<String, Value> {
        &self.keyword
    }

    pub(crate) fn into_parts(self) -> (Vec<Value>, Map<String, Value>) {
        (self.positional, self.keyword)
    }
}

/// Arguments matched to declared parameters for one invocation.
///
/// Holds raw values straight after binding and validated values once the
/// caster has run; the wrapped body receives the validated form. Named
/// parameters are keyed by declared name, never by alias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    named: BTreeMap<String, Value>,
    defaulted: BTreeSet<String>,
    var_positional: Vec<Value>,
    var_keyword: Map<String, Value>,
}

impl BoundArguments {
    pub(crate) fn insert_supplied(&mut self, name: &str, value: Value) {
        self.named.insert(name.to_owned(), value);
    }

    pub(crate) fn insert_default(&mut self, name: &str, value: Value) {
        self.defaulted.insert(name.to_owned());
        self.named.insert(name.to_owned(), value);
    }

    pub(crate) fn set_var_positional(&mut self, values: Vec<Value>) {
        self.var_positional = values;
    }

    pub(crate) fn set_var_keyword(&mut self, values: Map<String, Value>) {
        self.var_keyword = values;
    }

    pub(crate) fn take_named(&mut self, name: &str) -> Option<Value> {
        self.named.remove(name)
    }

    pub(crate) fn take_var_positional(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.var_positional)
    }

    pub(crate) fn take_var_keyword(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.var_keyword)
    }

    /// Returns the value bound to a named parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Deserializes the value bound to a named parameter.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Argument`] when the parameter is not bound
    /// or its value does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, InvocationError> {
        let value = self
            .named
            .get(name)
            .ok_or_else(|| InvocationError::argument(name, "argument is not bound"))?;
        T::deserialize(value).map_err(|error| InvocationError::argument(name, error.to_string()))
    }

    /// Returns `true` when the parameter was filled from its default.
    #[must_use]
    pub fn is_defaulted(&self, name: &str) -> bool {
        self.defaulted.contains(name)
    }

    /// Returns the named parameter values keyed by declared name.
    #[must_use]
    pub const fn named(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    /// Returns the values collected by the variadic-positional parameter.
    #[must_use]
    pub fn var_positional(&self) -> &[Value] {
        &self.var_positional
    }

    /// Returns the values collected by the variadic-keyword parameter.
    #[must_use]
    pub const fn var_keyword(&self) -> &Map<String, Value> {
        &self.var_keyword
    }
}
