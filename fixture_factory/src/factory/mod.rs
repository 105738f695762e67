//! Factories: the public composition surface.
//!
//! A [`Factory`] builds records of type `R` and returns values of type `T`
//! (`T` is `R` until [`Factory::transform`] changes it). A build:
//!
//! 1. takes the next sequence number, synchronously, when `build` is called;
//! 2. resolves every template field for that number, letting pending
//!    resolvers overlap;
//! 3. deep-merges the caller's overrides onto the resolved defaults;
//! 4. runs derivations in registration order;
//! 5. decodes the record and runs the transform stages in order.
//!
//! Any failure aborts the build and is returned to the caller.

mod blueprint;
pub(crate) mod sync;

use std::{convert::Infallible, fmt, future::Future, marker::PhantomData, sync::Arc};

use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    BoxError, FactoryConfig, FactoryError, FactoryResult, Resolver, Template,
    derivation::Derivation,
    pipeline::Pipeline,
    result_ext::encode,
    sequence::SequenceCounter,
    template::SyncTemplate,
};

use blueprint::Blueprint;

/// Path reported when caller-supplied overrides fail to serialise.
const OVERRIDES: &str = "<overrides>";

/// Asynchronous factory for records of type `R`, yielding `T`.
///
/// Factories are cheap to clone; a clone shares the original's sequence
/// counter. Every composition operator returns a new factory with its own
/// counter and leaves `self` untouched.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::{Template, each, make_factory};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Kid {
///     name: String,
///     grade: u8,
///     birthday: String,
/// }
///
/// let kids = make_factory::<Kid>(
///     Template::new()
///         .field("name", json!("Kid"))
///         .field("grade", json!(1))
///         .field("birthday", each(|seq| async move { format!("2017-05-{seq:02}") })),
/// );
///
/// futures::executor::block_on(async {
///     let jimmy = kids.build(json!({"name": "Jimmy"})).await?;
///     assert_eq!(jimmy.name, "Jimmy");
///     assert_eq!(jimmy.birthday, "2017-05-01");
///
///     let next = kids.build_default().await?;
///     assert_eq!(next.birthday, "2017-05-02");
///     Ok::<_, fixture_factory::FactoryError>(())
/// })?;
/// # Ok::<_, fixture_factory::FactoryError>(())
/// ```
pub struct Factory<R, T = R> {
    blueprint: Arc<Blueprint>,
    pipeline: Pipeline<T>,
    sequence: Arc<SequenceCounter>,
    record: PhantomData<fn() -> R>,
}

/// Create an asynchronous factory from `template`.
#[must_use]
pub fn make_factory<R>(template: Template) -> Factory<R>
where
    R: DeserializeOwned + Send + 'static,
{
    make_factory_with_config(template, FactoryConfig::default())
}

/// Create an asynchronous factory from `template` using `config`.
#[must_use]
pub fn make_factory_with_config<R>(template: Template, config: FactoryConfig) -> Factory<R>
where
    R: DeserializeOwned + Send + 'static,
{
    Factory::from_parts(Blueprint::new(template, config), Pipeline::decoding())
}

/// Create an asynchronous factory from a template that never suspends.
///
/// Fields are resolved synchronously inside the build, which still returns a
/// future so the factory composes with asynchronous ones.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::{make_factory_from_sync, sync::{self, SyncTemplate}};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Ticket {
///     number: u64,
/// }
///
/// let tickets = make_factory_from_sync::<Ticket>(
///     SyncTemplate::new().field("number", sync::each(|seq| seq * 100)),
/// );
/// let ticket = futures::executor::block_on(tickets.build_default())?;
/// assert_eq!(ticket.number, 100);
/// # Ok::<_, fixture_factory::FactoryError>(())
/// ```
#[must_use]
pub fn make_factory_from_sync<R>(template: SyncTemplate) -> Factory<R>
where
    R: DeserializeOwned + Send + 'static,
{
    sync::make_sync_factory(template).into_async()
}

impl<R, T> Factory<R, T>
where
    R: DeserializeOwned + Send + 'static,
    T: Send + 'static,
{
    fn from_parts(blueprint: Blueprint, pipeline: Pipeline<T>) -> Self {
        Self {
            sequence: blueprint.fresh_counter(),
            blueprint: Arc::new(blueprint),
            pipeline,
            record: PhantomData,
        }
    }

    /// Build one value, merging `overrides` onto the template defaults.
    ///
    /// The sequence number is taken when this method is called, not when the
    /// returned future is first polled.
    ///
    /// # Errors
    ///
    /// The future resolves to the first resolver, derivation, or transform
    /// failure, or to [`crate::FactoryError::Decode`] when the merged record
    /// does not fit `R`.
    pub fn build(&self, overrides: Value) -> BoxFuture<'static, FactoryResult<T>> {
        self.launch(Ok(overrides))
    }

    /// Build one value without overrides.
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn build_default(&self) -> BoxFuture<'static, FactoryResult<T>> {
        self.launch(Ok(Value::Object(Map::new())))
    }

    /// Build one value with overrides taken from a serialisable partial.
    ///
    /// Fields the partial skips while serialising keep their defaults;
    /// fields serialised as `null` override with `null`.
    ///
    /// # Errors
    ///
    /// See [`Factory::build`]; additionally resolves to
    /// [`crate::FactoryError::Encode`] when `overrides` cannot be serialised.
    /// The sequence number is consumed either way.
    pub fn build_with<P>(&self, overrides: &P) -> BoxFuture<'static, FactoryResult<T>>
    where
        P: Serialize + ?Sized,
    {
        self.launch(encode(overrides).map_err(|err| err.at_field(OVERRIDES)))
    }

    fn launch(&self, overrides: FactoryResult<Value>) -> BoxFuture<'static, FactoryResult<T>> {
        let label = self.blueprint.config().label();
        let Some(sequence) = self.sequence.advance() else {
            return future::ready(Err(FactoryError::sequence_exhausted(label))).boxed();
        };
        tracing::debug!(factory = label, sequence, "building record");
        // Resolvers are invoked now so nested factories number in call order;
        // the futures they return only run once the build is awaited.
        let resolving = self.blueprint.resolve(sequence);
        let blueprint = Arc::clone(&self.blueprint);
        let pipeline = self.pipeline.clone();
        async move {
            let overrides = overrides?;
            let resolved = resolving.await?;
            let record = blueprint.assemble(resolved, overrides)?;
            pipeline.run(record).await
        }
        .boxed()
    }

    /// Build `count` values with the same overrides.
    ///
    /// All `count` sequence numbers are taken, in order, when this method is
    /// called. The builds then run one after another; the first failure is
    /// returned and the remaining builds are abandoned.
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn build_list(
        &self,
        count: usize,
        overrides: &Value,
    ) -> BoxFuture<'static, FactoryResult<Vec<T>>> {
        tracing::debug!(
            factory = self.blueprint.config().label(),
            count,
            "building record list"
        );
        let pending: Vec<_> = (0..count)
            .map(|_| self.launch(Ok(overrides.clone())))
            .collect();
        async move {
            let mut built = Vec::with_capacity(pending.len());
            for item in pending {
                built.push(item.await?);
            }
            Ok(built)
        }
        .boxed()
    }

    /// A new factory whose template has `fields` replacing the matching
    /// entries.
    ///
    /// Derivations and transform stages carry over; the sequence counter
    /// starts afresh.
    #[must_use]
    pub fn extend(&self, fields: Template) -> Self {
        Self::from_parts(self.blueprint.extended(&fields), self.pipeline.clone())
    }

    /// A new factory over the field-wise union of both templates.
    ///
    /// On a name collision `other`'s field wins. Derivations of both run,
    /// ours first. Transform stages are not carried over: the combined
    /// factory decodes straight into `V`. Fields from either side resolve
    /// against the combined factory's own counter.
    #[must_use]
    pub fn combine<R2, T2, V>(&self, other: &Factory<R2, T2>) -> Factory<V>
    where
        V: DeserializeOwned + Send + 'static,
    {
        Factory::from_parts(
            self.blueprint.combined(&other.blueprint),
            Pipeline::decoding(),
        )
    }

    /// A new factory that passes each built value through `transform`.
    ///
    /// Overrides, `extend`, and derivations on the result still target the
    /// record shape `R`.
    #[must_use]
    pub fn transform<U, F, Fut>(&self, transform: F) -> Factory<R, U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.try_transform(move |built| transform(built).map(Ok::<U, Infallible>))
    }

    /// Fallible form of [`Factory::transform`]; an `Err` aborts the build.
    #[must_use]
    pub fn try_transform<U, E, F, Fut>(&self, transform: F) -> Factory<R, U>
    where
        U: Send + 'static,
        E: Into<BoxError>,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        Factory {
            sequence: self.blueprint.fresh_counter(),
            blueprint: Arc::clone(&self.blueprint),
            pipeline: self.pipeline.then(transform),
            record: PhantomData,
        }
    }

    /// A new factory that sets `field` from the merged record.
    ///
    /// Derivations run in registration order and always overwrite `field`.
    /// A derivation must not read a field set by a later one.
    ///
    /// The merged record is decoded into `R` before `derive` runs, so the
    /// derived field must already decode: give it a template default or mark
    /// it `#[serde(default)]`. Otherwise the build fails with
    /// [`FactoryError::Decode`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixture_factory::{Template, make_factory};
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Debug, Deserialize)]
    /// struct Person {
    ///     first_name: String,
    ///     last_name: String,
    ///     #[serde(default)]
    ///     full_name: String,
    /// }
    ///
    /// let people = make_factory::<Person>(
    ///     Template::new()
    ///         .field("first_name", json!("James"))
    ///         .field("last_name", json!("Bond")),
    /// )
    /// .with_derivation("full_name", |person: &Person| {
    ///     format!("{} {}", person.first_name, person.last_name)
    /// });
    ///
    /// let bond = futures::executor::block_on(people.build_default())?;
    /// assert_eq!(bond.full_name, "James Bond");
    /// # Ok::<_, fixture_factory::FactoryError>(())
    /// ```
    #[must_use]
    pub fn with_derivation<V, F>(&self, field: impl Into<String>, derive: F) -> Self
    where
        V: Serialize,
        F: Fn(&R) -> V + Send + Sync + 'static,
    {
        self.try_with_derivation(field, move |record: &R| {
            Ok::<V, Infallible>(derive(record))
        })
    }

    /// Fallible form of [`Factory::with_derivation`].
    #[must_use]
    pub fn try_with_derivation<V, E, F>(&self, field: impl Into<String>, derive: F) -> Self
    where
        V: Serialize,
        E: Into<BoxError>,
        F: Fn(&R) -> Result<V, E> + Send + Sync + 'static,
    {
        Self::from_parts(
            self.blueprint
                .derived(Derivation::typed(field.into(), derive)),
            self.pipeline.clone(),
        )
    }

    /// A resolver that fills a field with a value built by this factory.
    ///
    /// Each parent build runs one build of this factory with no overrides,
    /// advancing this factory's own counter.
    #[must_use]
    pub fn field(&self) -> Resolver
    where
        T: Serialize,
    {
        let factory = self.clone();
        Resolver::Async(Arc::new(move |_: u64| {
            let built = factory.build_default();
            async move { built.await.and_then(|value| encode(&value)) }.boxed()
        }))
    }

    /// The sequence number of the most recent build, if any.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.sequence.last()
    }

    /// The template this factory builds from.
    #[must_use]
    pub fn template(&self) -> &Template {
        self.blueprint.template()
    }

    /// The configuration this factory was created with.
    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        self.blueprint.config()
    }
}

impl<R, T> Clone for Factory<R, T> {
    fn clone(&self) -> Self {
        Self {
            blueprint: Arc::clone(&self.blueprint),
            pipeline: self.pipeline.clone(),
            sequence: Arc::clone(&self.sequence),
            record: PhantomData,
        }
    }
}

impl<R, T> fmt::Debug for Factory<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("label", &self.blueprint.config().label())
            .field(
                "fields",
                &self.blueprint.template().field_names().collect::<Vec<_>>(),
            )
            .field("derivations", &self.blueprint.derivation_count())
            .field("transform_stages", &self.pipeline.stages())
            .field("sequence", &self.sequence.last())
            .finish()
    }
}
