//! Invocation wrapper: one adapter per [`InvocationNature`].

use futures::future::BoxFuture;
use futures::FutureExt;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::depends::domain::{
    BoundArguments, CallArgs, CallableSchema, InjectError, InvocationError, InvocationNature,
    ValidationError,
};

use super::{InjectOptions, bind, validate, validate_return};

type PlainBody = dyn Fn(BoundArguments) -> Result<Value, InvocationError> + Send + Sync;
type AwaitedBody =
    dyn Fn(BoundArguments) -> BoxFuture<'static, Result<Value, InvocationError>> + Send + Sync;
type ValueIter = Box<dyn Iterator<Item = Value> + Send>;
type SyncStreamBody =
    dyn Fn(BoundArguments) -> Result<ValueIter, InvocationError> + Send + Sync;
type AsyncStreamBody =
    dyn Fn(BoundArguments) -> Result<BoxStream<'static, Value>, InvocationError> + Send + Sync;

#[derive(Clone)]
enum Body {
    Plain(Arc<PlainBody>),
    Awaited(Arc<AwaitedBody>),
    SyncStream(Arc<SyncStreamBody>),
    AsyncStream(Arc<AsyncStreamBody>),
}

/// A callable body tagged with its invocation nature.
///
/// Bodies receive validated [`BoundArguments`]. The nature is chosen by the
/// constructor and never probed at call time.
#[derive(Clone)]
pub struct Callable {
    body: Body,
}

impl Callable {
    /// Wraps a synchronous body returning one value.
    pub fn plain<F>(body: F) -> Self
    where
        F: Fn(BoundArguments) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        Self {
            body: Body::Plain(Arc::new(body)),
        }
    }

    /// Wraps an asynchronous body returning one value.
    pub fn awaited<F, Fut>(body: F) -> Self
    where
        F: Fn(BoundArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, InvocationError>> + Send + 'static,
    {
        Self {
            body: Body::Awaited(Arc::new(move |bound| body(bound).boxed())),
        }
    }

    /// Wraps a body producing a lazy sequence of values.
    pub fn sync_stream<F, I>(body: F) -> Self
    where
        F: Fn(BoundArguments) -> Result<I, InvocationError> + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self {
            body: Body::SyncStream(Arc::new(
                move |bound| -> Result<ValueIter, InvocationError> {
                    Ok(Box::new(body(bound)?.into_iter()))
                },
            )),
        }
    }

    /// Wraps a body producing an asynchronous stream of values.
    pub fn async_stream<F, S>(body: F) -> Self
    where
        F: Fn(BoundArguments) -> Result<S, InvocationError> + Send + Sync + 'static,
        S: Stream<Item = Value> + Send + 'static,
    {
        Self {
            body: Body::AsyncStream(Arc::new(
                move |bound| -> Result<BoxStream<'static, Value>, InvocationError> {
                    Ok(body(bound)?.boxed())
                },
            )),
        }
    }

    /// Returns the nature fixed by the constructor.
    #[must_use]
    pub const fn nature(&self) -> InvocationNature {
        match self.body {
            Body::Plain(_) => InvocationNature::Plain,
            Body::Awaited(_) => InvocationNature::Awaited,
            Body::SyncStream(_) => InvocationNature::SyncStream,
            Body::AsyncStream(_) => InvocationNature::AsyncStream,
        }
    }

    /// Address of the shared body; equal for clones of one callable.
    pub(crate) fn identity(&self) -> usize {
        match &self.body {
            Body::Plain(body) => Arc::as_ptr(body).cast::<()>().addr(),
            Body::Awaited(body) => Arc::as_ptr(body).cast::<()>().addr(),
            Body::SyncStream(body) => Arc::as_ptr(body).cast::<()>().addr(),
            Body::AsyncStream(body) => Arc::as_ptr(body).cast::<()>().addr(),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("nature", &self.nature())
            .finish_non_exhaustive()
    }
}

/// A callable paired with its schema, ready to be invoked.
///
/// Each call binds, validates, invokes, and validates the result. Invoking
/// through the adapter of another nature fails with
/// [`InjectError::NatureMismatch`] before any argument is bound.
#[derive(Debug, Clone)]
pub struct Injected {
    schema: Arc<CallableSchema>,
    callable: Callable,
    options: InjectOptions,
}

/// Result of [`Injected::invoke`], shaped by the callable's nature.
pub enum Invocation {
    /// Value of a plain call.
    Value(Value),
    /// Pending value of an awaited call.
    Future(BoxFuture<'static, Result<Value, InjectError>>),
    /// Validated lazy sequence.
    Iter(ValidatedIter),
    /// Validated asynchronous stream.
    Stream(ValidatedStream),
}

impl Invocation {
    /// Drives the invocation to a single value.
    ///
    /// Sequences and streams are drained into a JSON array.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the awaited body or by item
    /// validation.
    pub async fn into_value(self) -> Result<Value, InjectError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Future(pending) => pending.await,
            Self::Iter(items) => Ok(Value::Array(items.collect::<Result<Vec<_>, _>>()?)),
            Self::Stream(mut items) => {
                let mut collected = Vec::new();
                while let Some(item) = items.next().await {
                    collected.push(item?);
                }
                Ok(Value::Array(collected))
            }
        }
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Future(_) => f.write_str("Future(..)"),
            Self::Iter(items) => f.debug_tuple("Iter").field(items).finish(),
            Self::Stream(items) => f.debug_tuple("Stream").field(items).finish(),
        }
    }
}

impl Injected {
    pub(crate) const fn new(
        schema: Arc<CallableSchema>,
        callable: Callable,
        options: InjectOptions,
    ) -> Self {
        Self {
            schema,
            callable,
            options,
        }
    }

    /// Returns the shared schema.
    #[must_use]
    pub const fn schema(&self) -> &Arc<CallableSchema> {
        &self.schema
    }

    /// Returns the callable name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the invocation nature.
    #[must_use]
    pub const fn nature(&self) -> InvocationNature {
        self.callable.nature()
    }

    /// Returns the options the callable was wrapped with.
    #[must_use]
    pub const fn options(&self) -> InjectOptions {
        self.options
    }

    /// Invokes a plain callable.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] on a nature mismatch, a binding or validation
    /// failure, or a failure raised by the body.
    pub fn call(&self, args: CallArgs) -> Result<Value, InjectError> {
        let Body::Plain(body) = &self.callable.body else {
            return Err(self.mismatch(InvocationNature::Plain));
        };
        let bound = self.prepare(args)?;
        let raw = body(bound)?;
        Ok(self.finish(raw)?)
    }

    /// Invokes an awaited callable.
    ///
    /// Binding and validation complete before the body is first polled.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] on a nature mismatch, a binding or validation
    /// failure, or a failure raised by the body.
    pub async fn call_async(&self, args: CallArgs) -> Result<Value, InjectError> {
        self.start_awaited(args)?.await
    }

    /// Invokes a sync-stream callable.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] on a nature mismatch, a binding or validation
    /// failure, or a failure raised while creating the sequence. Item
    /// failures are yielded by the returned iterator.
    pub fn iter(&self, args: CallArgs) -> Result<ValidatedIter, InjectError> {
        let Body::SyncStream(body) = &self.callable.body else {
            return Err(self.mismatch(InvocationNature::SyncStream));
        };
        let bound = self.prepare(args)?;
        let items = body(bound)?;
        Ok(ValidatedIter {
            inner: Some(items),
            schema: Arc::clone(&self.schema),
            cast: self.options.cast,
        })
    }

    /// Invokes an async-stream callable.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] on a nature mismatch, a binding or validation
    /// failure, or a failure raised while creating the stream. Item
    /// failures are yielded by the returned stream.
    pub fn stream(&self, args: CallArgs) -> Result<ValidatedStream, InjectError> {
        let Body::AsyncStream(body) = &self.callable.body else {
            return Err(self.mismatch(InvocationNature::AsyncStream));
        };
        let bound = self.prepare(args)?;
        let items = body(bound)?;
        Ok(ValidatedStream {
            inner: Some(items),
            schema: Arc::clone(&self.schema),
            cast: self.options.cast,
        })
    }

    /// Invokes through whichever adapter matches the callable's nature.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] when binding or input validation fails, or
    /// when a plain body fails.
    pub fn invoke(&self, args: CallArgs) -> Result<Invocation, InjectError> {
        match self.nature() {
            InvocationNature::Plain => self.call(args).map(Invocation::Value),
            InvocationNature::Awaited => self.start_awaited(args).map(Invocation::Future),
            InvocationNature::SyncStream => self.iter(args).map(Invocation::Iter),
            InvocationNature::AsyncStream => self.stream(args).map(Invocation::Stream),
        }
    }

    fn start_awaited(
        &self,
        args: CallArgs,
    ) -> Result<BoxFuture<'static, Result<Value, InjectError>>, InjectError> {
        let Body::Awaited(body) = &self.callable.body else {
            return Err(self.mismatch(InvocationNature::Awaited));
        };
        let bound = self.prepare(args)?;
        let pending = body(bound);
        let schema = Arc::clone(&self.schema);
        let cast = self.options.cast;
        Ok(async move {
            let raw = pending.await?;
            Ok(check_output(&schema, cast, raw)?)
        }
        .boxed())
    }

    fn prepare(&self, args: CallArgs) -> Result<BoundArguments, InjectError> {
        let bound = bind(&self.schema, args, self.options.extra)?;
        if self.options.cast {
            Ok(validate(&self.schema, bound)?)
        } else {
            Ok(bound)
        }
    }

    fn finish(&self, raw: Value) -> Result<Value, ValidationError> {
        check_output(&self.schema, self.options.cast, raw)
    }

    fn mismatch(&self, requested: InvocationNature) -> InjectError {
        InjectError::NatureMismatch {
            callable: self.schema.name().to_owned(),
            actual: self.nature(),
            requested,
        }
    }
}

fn check_output(schema: &CallableSchema, cast: bool, raw: Value) -> Result<Value, ValidationError> {
    if cast {
        validate_return(schema, raw)
    } else {
        Ok(raw)
    }
}

/// Lazy sequence that validates each produced item.
///
/// Ends after the first failing item.
pub struct ValidatedIter {
    inner: Option<ValueIter>,
    schema: Arc<CallableSchema>,
    cast: bool,
}

impl Iterator for ValidatedIter {
    type Item = Result<Value, ValidationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.inner.as_mut()?.next();
        let Some(raw) = raw else {
            self.inner = None;
            return None;
        };
        let item = check_output(&self.schema, self.cast, raw);
        if item.is_err() {
            self.inner = None;
        }
        tracing::trace!(callable = self.schema.name(), ok = item.is_ok(), "stream item validated");
        Some(item)
    }
}

impl fmt::Debug for ValidatedIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedIter")
            .field("callable", &self.schema.name())
            .field("finished", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}

/// Asynchronous stream that validates each produced item.
///
/// Items are pulled from the inner stream one at a time. Dropping this
/// stream drops the inner producer. Ends after the first failing item.
pub struct ValidatedStream {
    inner: Option<BoxStream<'static, Value>>,
    schema: Arc<CallableSchema>,
    cast: bool,
}

impl Stream for ValidatedStream {
    type Item = Result<Value, ValidationError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            Poll::Ready(Some(raw)) => {
                let item = check_output(&this.schema, this.cast, raw);
                if item.is_err() {
                    this.inner = None;
                }
                tracing::trace!(
                    callable = this.schema.name(),
                    ok = item.is_ok(),
                    "stream item validated"
                );
                Poll::Ready(Some(item))
            }
        }
    }
}

impl fmt::Debug for ValidatedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedStream")
            .field("callable", &self.schema.name())
            .field("finished", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}
