//! Field resolvers: deferred value producers keyed by sequence number.
//!
//! A resolver is invoked once per build with the sequence number the build
//! was assigned. Errors are never raised when a resolver is registered; they
//! surface only when a build runs it.

use std::{convert::Infallible, fmt, future::Future, sync::Arc};

use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    BoxError, FactoryResult,
    result_ext::{FactoryResultExt, encode},
};

type SyncFn = dyn Fn(u64) -> FactoryResult<Value> + Send + Sync;
type AsyncFn = dyn Fn(u64) -> BoxFuture<'static, FactoryResult<Value>> + Send + Sync;

/// A field value computed from the build's sequence number.
///
/// Construct resolvers with [`each`], [`try_each`], or the synchronous
/// [`crate::sync::each`] and [`crate::sync::try_each`].
#[derive(Clone)]
pub enum Resolver {
    /// Produces its value immediately.
    Sync(Arc<SyncFn>),
    /// Produces its value after suspending.
    Async(Arc<AsyncFn>),
}

impl Resolver {
    /// Returns `true` when the resolver never suspends.
    #[must_use]
    pub const fn is_sync(&self) -> bool {
        matches!(self, Self::Sync(_))
    }

    pub(crate) fn resolve(&self, sequence: u64) -> BoxFuture<'static, FactoryResult<Value>> {
        match self {
            Self::Sync(produce) => future::ready(produce(sequence)).boxed(),
            Self::Async(produce) => produce(sequence),
        }
    }

    /// Run a synchronous resolver; `None` for asynchronous ones.
    pub(crate) fn resolve_now(&self, sequence: u64) -> Option<FactoryResult<Value>> {
        match self {
            Self::Sync(produce) => Some(produce(sequence)),
            Self::Async(_) => None,
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_sync() {
            "Resolver::Sync(..)"
        } else {
            "Resolver::Async(..)"
        })
    }
}

/// A resolver guaranteed never to suspend.
///
/// Only synchronous resolvers can be placed in a [`crate::sync::SyncTemplate`].
#[derive(Clone)]
pub struct SyncResolver(Arc<SyncFn>);

impl SyncResolver {
    pub(crate) fn from_fn<F>(produce: F) -> Self
    where
        F: Fn(u64) -> FactoryResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(produce))
    }
}

impl fmt::Debug for SyncResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SyncResolver(..)")
    }
}

impl From<SyncResolver> for Resolver {
    fn from(resolver: SyncResolver) -> Self {
        Self::Sync(resolver.0)
    }
}

/// Build an asynchronous resolver from `produce(sequence)`.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::{Template, each};
/// use serde_json::json;
///
/// let template = Template::new()
///     .field("name", json!("Kid"))
///     .field("birthday", each(|seq| async move { format!("2017-05-{seq:02}") }));
/// assert_eq!(template.len(), 2);
/// ```
pub fn each<V, F, Fut>(produce: F) -> Resolver
where
    V: Serialize + 'static,
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = V> + Send + 'static,
{
    try_each(move |sequence| produce(sequence).map(Ok::<V, Infallible>))
}

/// Build a fallible asynchronous resolver.
///
/// An `Err` returned by `produce` aborts the build and reaches the caller
/// unmodified inside [`crate::FactoryError::Callback`].
pub fn try_each<V, E, F, Fut>(produce: F) -> Resolver
where
    V: Serialize,
    E: Into<BoxError>,
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    Resolver::Async(Arc::new(move |sequence| {
        produce(sequence)
            .map(|produced| produced.into_factory().and_then(|value| encode(&value)))
            .boxed()
    }))
}

/// Build a synchronous resolver from `produce(sequence)`.
///
/// Exposed as [`crate::sync::each`].
pub fn each_sync<V, F>(produce: F) -> SyncResolver
where
    V: Serialize,
    F: Fn(u64) -> V + Send + Sync + 'static,
{
    SyncResolver::from_fn(move |sequence| encode(&produce(sequence)))
}

/// Build a fallible synchronous resolver.
///
/// Exposed as [`crate::sync::try_each`].
pub fn try_each_sync<V, E, F>(produce: F) -> SyncResolver
where
    V: Serialize,
    E: Into<BoxError>,
    F: Fn(u64) -> Result<V, E> + Send + Sync + 'static,
{
    SyncResolver::from_fn(move |sequence| {
        produce(sequence)
            .into_factory()
            .and_then(|value| encode(&value))
    })
}
