//! Entry points: the bare [`inject`] function and the configured
//! [`Injector`] with its schema cache.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::depends::domain::{CallableSchema, SchemaBuildError, Signature};

use super::{Callable, Injected, build_schema};

/// Handling of keyword arguments that match no parameter when no
/// variadic-keyword parameter collects them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPolicy {
    /// Reject the call with a binding error.
    #[default]
    Forbid,
    /// Drop the unmatched keywords.
    Ignore,
}

/// Per-wrap configuration.
///
/// Deserializes from configuration with missing fields taking their
/// defaults:
///
/// ```
/// use agentdeps::depends::services::{ExtraPolicy, InjectOptions};
///
/// let options: InjectOptions = serde_json::from_str(r#"{"extra": "ignore"}"#)
///     .expect("valid options");
/// assert!(options.cast);
/// assert_eq!(options.extra, ExtraPolicy::Ignore);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectOptions {
    /// Coerce and validate arguments and return values. When `false`,
    /// arguments are only bound.
    pub cast: bool,
    /// Policy for unmatched keyword arguments.
    pub extra: ExtraPolicy,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            cast: true,
            extra: ExtraPolicy::Forbid,
        }
    }
}

impl InjectOptions {
    /// Validating options that ignore unmatched keywords.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            cast: true,
            extra: ExtraPolicy::Ignore,
        }
    }

    /// Options that bind arguments without coercing them.
    #[must_use]
    pub const fn bind_only() -> Self {
        Self {
            cast: false,
            extra: ExtraPolicy::Forbid,
        }
    }
}

/// Wraps a callable with default options.
///
/// The schema is built on every call; use an [`Injector`] to share schemas
/// between repeated wraps of one callable.
///
/// # Errors
///
/// Returns [`SchemaBuildError`] when the signature is malformed.
pub fn inject(signature: &Signature, callable: Callable) -> Result<Injected, SchemaBuildError> {
    Injector::wrap(signature, callable, InjectOptions::default())
}

#[derive(Debug)]
struct CachedSchema {
    signature: Signature,
    schema: Arc<CallableSchema>,
    // Keeps the body alive so its address cannot be reused by another
    // callable while the entry exists.
    _callable: Callable,
}

/// Configured injector that caches schemas per callable and signature.
///
/// Clones of a [`Callable`] share an identity, so wrapping them again with
/// an equal [`Signature`] returns the schema built the first time. A
/// different signature for the same callable builds and caches its own
/// schema.
///
/// Every cache entry holds a clone of its callable, so wrapped bodies stay
/// alive until [`Injector::evict`] or [`Injector::clear`] drops the entry or
/// the injector itself is dropped.
#[derive(Debug, Default)]
pub struct Injector {
    options: InjectOptions,
    cache: RwLock<HashMap<usize, Vec<CachedSchema>>>,
}

impl Injector {
    /// Creates an injector with the given options.
    #[must_use]
    pub fn new(options: InjectOptions) -> Self {
        Self {
            options,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the options applied to every wrap.
    #[must_use]
    pub const fn options(&self) -> InjectOptions {
        self.options
    }

    /// Wraps a callable, reusing the schema cached for this callable and an
    /// equal signature when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaBuildError`] when the signature is malformed.
    pub fn inject(
        &self,
        signature: &Signature,
        callable: Callable,
    ) -> Result<Injected, SchemaBuildError> {
        let identity = callable.identity();
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&identity)
            .and_then(|entries| find_schema(entries, signature));
        if let Some(schema) = cached {
            tracing::debug!(callable = schema.name(), "schema served from cache");
            return Ok(Injected::new(schema, callable, self.options));
        }

        let built = Arc::new(build_schema(signature, callable.nature())?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let entries = cache.entry(identity).or_default();
        let schema = if let Some(existing) = find_schema(entries, signature) {
            existing
        } else {
            entries.push(CachedSchema {
                signature: signature.clone(),
                schema: Arc::clone(&built),
                _callable: callable.clone(),
            });
            built
        };
        Ok(Injected::new(schema, callable, self.options))
    }

    /// Drops every schema cached for the callable and releases the clone
    /// held by the cache. Returns the number of schemas removed.
    #[must_use = "the count reports whether anything was cached"]
    pub fn evict(&self, callable: &Callable) -> usize {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&callable.identity())
            .map_or(0, |entries| entries.len())
    }

    /// Drops every cached schema.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the number of cached schemas.
    #[must_use]
    pub fn cached_schemas(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    fn wrap(
        signature: &Signature,
        callable: Callable,
        options: InjectOptions,
    ) -> Result<Injected, SchemaBuildError> {
        let schema = build_schema(signature, callable.nature())?;
        Ok(Injected::new(Arc::new(schema), callable, options))
    }
}

fn find_schema(entries: &[CachedSchema], signature: &Signature) -> Option<Arc<CallableSchema>> {
    entries
        .iter()
        .find(|entry| entry.signature == *signature)
        .map(|entry| Arc::clone(&entry.schema))
}
