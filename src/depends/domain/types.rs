//! Declared types understood by the caster.

use serde_json::{Map, Value, json};
use std::fmt;

/// Type descriptor attached to a parameter, model field, or return value.
///
/// Runtime values are `serde_json::Value`s; a declared type describes which
/// values are accepted and how lax inputs (for example the string `"1"` for
/// an integer) are coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Any value, passed through unmodified.
    Any,
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// UTF-8 string.
    String,
    /// Boolean flag.
    Boolean,
    /// The null value.
    Null,
    /// Ordered sequence with a uniform element type.
    List(Box<DeclaredType>),
    /// String-keyed mapping with a uniform value type.
    Map(Box<DeclaredType>),
    /// Null or the inner type.
    Optional(Box<DeclaredType>),
    /// First member, left to right, that accepts the value.
    Union(Vec<DeclaredType>),
    /// One of a fixed set of values.
    Literal(Vec<Value>),
    /// Structured object with named fields.
    Model(ModelSchema),
}

impl DeclaredType {
    /// Creates a list type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a string-keyed map type.
    #[must_use]
    pub fn map(value: Self) -> Self {
        Self::Map(Box::new(value))
    }

    /// Creates an optional type.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a union of the given members.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    /// Creates a literal type accepting exactly the given values.
    #[must_use]
    pub fn literal(values: impl IntoIterator<Item = Value>) -> Self {
        Self::Literal(values.into_iter().collect())
    }

    /// Returns `true` when the type accepts every value unchanged.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Renders the type as a JSON Schema fragment.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Any => json!({}),
            Self::Integer => json!({ "type": "integer" }),
            Self::Float => json!({ "type": "number" }),
            Self::String => json!({ "type": "string" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Null => json!({ "type": "null" }),
            Self::List(element) => json!({ "type": "array", "items": element.json_schema() }),
            Self::Map(value) => json!({
                "type": "object",
                "additionalProperties": value.json_schema(),
            }),
            Self::Optional(inner) => json!({ "anyOf": [inner.json_schema(), { "type": "null" }] }),
            Self::Union(members) => json!({
                "anyOf": members.iter().map(Self::json_schema).collect::<Vec<_>>(),
            }),
            Self::Literal(values) => json!({ "enum": values }),
            Self::Model(model) => model.json_schema(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Null => write!(f, "null"),
            Self::List(element) => write!(f, "list[{element}]"),
            Self::Map(value) => write!(f, "map[string, {value}]"),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
            Self::Union(members) => {
                let rendered: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "union[{}]", rendered.join(", "))
            }
            Self::Literal(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "literal[{}]", rendered.join(", "))
            }
            Self::Model(model) => write!(f, "{}", model.name()),
        }
    }
}

/// A field of a [`ModelSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelField {
    name: String,
    field_type: DeclaredType,
    alias: Option<String>,
    default: Option<Value>,
}

impl ModelField {
    /// Creates a required field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            field_type,
            alias: None,
            default: None,
        }
    }

    /// Sets the key the field is read from in incoming objects.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Makes the field optional with the given default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared field type.
    #[must_use]
    pub const fn field_type(&self) -> &DeclaredType {
        &self.field_type
    }

    /// Returns the optional alias.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the optional default.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the key looked up in incoming objects.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Structured object type, the equivalent of a data model class.
///
/// # Examples
///
/// ```
/// use agentdeps::depends::domain::{DeclaredType, ModelField, ModelSchema};
///
/// let model = ModelSchema::new("Point")
///     .with_field(ModelField::new("x", DeclaredType::Integer))
///     .with_field(ModelField::new("y", DeclaredType::Integer));
/// assert_eq!(model.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    fields: Vec<ModelField>,
}

impl ModelSchema {
    /// Creates a model with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: ModelField) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut property = field.field_type.json_schema();
            if let (Some(default), Value::Object(object)) = (&field.default, &mut property) {
                object.insert("default".to_owned(), default.clone());
            }
            properties.insert(field.lookup_key().to_owned(), property);
            if field.default.is_none() {
                required.push(Value::String(field.lookup_key().to_owned()));
            }
        }
        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
