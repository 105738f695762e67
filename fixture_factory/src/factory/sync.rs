//! The synchronous engine.
//!
//! [`SyncFactory`] mirrors [`Factory`] for templates whose resolvers never
//! suspend. Builds return their value directly, so the engine can be used from
//! plain `#[test]` functions without an executor.

use std::{convert::Infallible, fmt, marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::{Factory, OVERRIDES, blueprint::Blueprint};
use crate::{
    BoxError, FactoryConfig, FactoryError, FactoryResult, Template,
    derivation::Derivation,
    pipeline::{Pipeline, SyncPipeline},
    resolver::SyncResolver,
    result_ext::encode,
    sequence::SequenceCounter,
    template::SyncTemplate,
};

/// Synchronous factory for records of type `R`, yielding `T`.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::sync::{self, SyncTemplate, make_sync_factory};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Person {
///     first_name: String,
///     last_name: String,
///     full_name: String,
/// }
///
/// let people = make_sync_factory::<Person>(
///     SyncTemplate::new()
///         .field("first_name", json!("Robert"))
///         .field("last_name", json!("Bobberson"))
///         .field("full_name", json!(""))
///         .field("nickname", sync::each(|seq| format!("bob-{seq}"))),
/// )
/// .with_derivation("full_name", |p: &Person| format!("{} {}", p.first_name, p.last_name));
///
/// let james = people.build(json!({"first_name": "James", "last_name": "Bond"}))?;
/// assert_eq!(james.full_name, "James Bond");
/// assert_eq!(people.sequence(), Some(1));
/// # Ok::<_, fixture_factory::FactoryError>(())
/// ```
pub struct SyncFactory<R, T = R> {
    blueprint: Arc<Blueprint>,
    pipeline: SyncPipeline<T>,
    sequence: Arc<SequenceCounter>,
    record: PhantomData<fn() -> R>,
}

/// Create a synchronous factory from `template`.
#[must_use]
pub fn make_sync_factory<R>(template: SyncTemplate) -> SyncFactory<R>
where
    R: DeserializeOwned + 'static,
{
    make_sync_factory_with_config(template, FactoryConfig::default())
}

/// Create a synchronous factory from `template` using `config`.
#[must_use]
pub fn make_sync_factory_with_config<R>(
    template: SyncTemplate,
    config: FactoryConfig,
) -> SyncFactory<R>
where
    R: DeserializeOwned + 'static,
{
    SyncFactory::from_parts(
        Blueprint::new(template.into_template(), config),
        SyncPipeline::decoding(),
    )
}

impl<R, T> SyncFactory<R, T>
where
    R: DeserializeOwned + 'static,
    T: 'static,
{
    fn from_parts(blueprint: Blueprint, pipeline: SyncPipeline<T>) -> Self {
        Self {
            sequence: blueprint.fresh_counter(),
            blueprint: Arc::new(blueprint),
            pipeline,
            record: PhantomData,
        }
    }

    /// Build one value, merging `overrides` onto the template defaults.
    ///
    /// # Errors
    ///
    /// Returns the first resolver, derivation, or transform failure, or
    /// [`crate::FactoryError::Decode`] when the merged record does not fit
    /// `R`.
    pub fn build(&self, overrides: Value) -> FactoryResult<T> {
        self.launch(Ok(overrides))
    }

    /// Build one value without overrides.
    ///
    /// # Errors
    ///
    /// See [`SyncFactory::build`].
    pub fn build_default(&self) -> FactoryResult<T> {
        self.launch(Ok(Value::Object(Map::new())))
    }

    /// Build one value with overrides taken from a serialisable partial.
    ///
    /// # Errors
    ///
    /// See [`SyncFactory::build`]; additionally returns
    /// [`crate::FactoryError::Encode`] when `overrides` cannot be serialised.
    pub fn build_with<P>(&self, overrides: &P) -> FactoryResult<T>
    where
        P: Serialize + ?Sized,
    {
        self.launch(encode(overrides).map_err(|err| err.at_field(OVERRIDES)))
    }

    fn launch(&self, overrides: FactoryResult<Value>) -> FactoryResult<T> {
        let label = self.blueprint.config().label();
        let sequence = self
            .sequence
            .advance()
            .ok_or_else(|| FactoryError::sequence_exhausted(label))?;
        tracing::debug!(factory = label, sequence, "building record");
        let overrides = overrides?;
        let resolved = self.blueprint.resolve_now(sequence)?;
        let record = self.blueprint.assemble(resolved, overrides)?;
        self.pipeline.run(record)
    }

    /// Build `count` values with the same overrides, in order.
    ///
    /// Stops at the first failure; no sequence numbers are taken for the
    /// builds after it.
    ///
    /// # Errors
    ///
    /// See [`SyncFactory::build`].
    pub fn build_list(&self, count: usize, overrides: &Value) -> FactoryResult<Vec<T>> {
        tracing::debug!(
            factory = self.blueprint.config().label(),
            count,
            "building record list"
        );
        (0..count).map(|_| self.build(overrides.clone())).collect()
    }

    /// A new factory whose template has `fields` replacing the matching
    /// entries.
    #[must_use]
    pub fn extend(&self, fields: SyncTemplate) -> Self {
        Self::from_parts(
            self.blueprint.extended(fields.as_template()),
            self.pipeline.clone(),
        )
    }

    /// A new factory over the field-wise union of both templates.
    ///
    /// Collision and ordering rules match [`Factory::combine`].
    #[must_use]
    pub fn combine<R2, T2, V>(&self, other: &SyncFactory<R2, T2>) -> SyncFactory<V>
    where
        V: DeserializeOwned + 'static,
    {
        SyncFactory::from_parts(
            self.blueprint.combined(&other.blueprint),
            SyncPipeline::decoding(),
        )
    }

    /// A new factory that passes each built value through `transform`.
    #[must_use]
    pub fn transform<U, F>(&self, transform: F) -> SyncFactory<R, U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.try_transform(move |built| Ok::<U, Infallible>(transform(built)))
    }

    /// Fallible form of [`SyncFactory::transform`].
    #[must_use]
    pub fn try_transform<U, E, F>(&self, transform: F) -> SyncFactory<R, U>
    where
        U: 'static,
        E: Into<BoxError>,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        SyncFactory {
            sequence: self.blueprint.fresh_counter(),
            blueprint: Arc::clone(&self.blueprint),
            pipeline: self.pipeline.then(transform),
            record: PhantomData,
        }
    }

    /// A new factory that sets `field` from the merged record.
    ///
    /// The merged record is decoded into `R` before `derive` runs, so the
    /// derived field must already decode: give it a template default or mark
    /// it `#[serde(default)]`. Otherwise the build fails with
    /// [`FactoryError::Decode`].
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

    /// Fallible form of [`SyncFactory::with_derivation`].
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
    #[must_use]
    pub fn field(&self) -> SyncResolver
    where
        T: Serialize,
    {
        let factory = self.clone();
        SyncResolver::from_fn(move |_: u64| {
            factory
                .build_default()
                .and_then(|value| encode(&value))
        })
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

    /// Convert into an asynchronous factory sharing this one's counter.
    #[must_use]
    pub fn into_async(self) -> Factory<R, T>
    where
        R: Send,
        T: Send,
    {
        Factory {
            blueprint: self.blueprint,
            pipeline: Pipeline::from(self.pipeline),
            sequence: self.sequence,
            record: PhantomData,
        }
    }
}

impl<R, T> Clone for SyncFactory<R, T> {
    fn clone(&self) -> Self {
        Self {
            blueprint: Arc::clone(&self.blueprint),
            pipeline: self.pipeline.clone(),
            sequence: Arc::clone(&self.sequence),
            record: PhantomData,
        }
    }
}

impl<R, T> fmt::Debug for SyncFactory<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFactory")
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
