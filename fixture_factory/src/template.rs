//! Templates: the default-value specification a factory builds from.

use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    FactoryError, FactoryResult,
    error::ROOT,
    resolver::{Resolver, SyncResolver},
    result_ext::encode,
};

/// How a single field obtains its default value.
#[derive(Clone, Debug)]
pub enum FieldSpec {
    /// A fixed value used for every build unless overridden.
    Literal(Value),
    /// A value computed from the build's sequence number.
    Each(Resolver),
    /// An object-valued field with its own template.
    Nested(Template),
}

impl FieldSpec {
    /// Serialise `value` into a literal field.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Encode`] when `value` cannot be serialised.
    pub fn literal<V: Serialize + ?Sized>(value: &V) -> FactoryResult<Self> {
        encode(value).map(Self::Literal)
    }

    fn first_async_field(&self) -> Option<String> {
        match self {
            Self::Literal(_) => None,
            Self::Each(resolver) => (!resolver.is_sync()).then(String::new),
            Self::Nested(template) => template.first_async_field(),
        }
    }
}

impl From<Value> for FieldSpec {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<Resolver> for FieldSpec {
    fn from(resolver: Resolver) -> Self {
        Self::Each(resolver)
    }
}

impl From<SyncResolver> for FieldSpec {
    fn from(resolver: SyncResolver) -> Self {
        Self::Each(resolver.into())
    }
}

impl From<Template> for FieldSpec {
    fn from(template: Template) -> Self {
        Self::Nested(template)
    }
}

impl From<SyncTemplate> for FieldSpec {
    fn from(template: SyncTemplate) -> Self {
        Self::Nested(template.0)
    }
}

/// Ordered mapping from field name to [`FieldSpec`].
///
/// Templates are immutable once handed to a factory; composition operators
/// copy them.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::{Template, each};
/// use serde_json::json;
///
/// let aisle = Template::from_value(json!({"name": "Junk Food Aisle", "budget": 3000}))?;
/// let store = Template::new()
///     .field("name", json!("Corner Store"))
///     .field("aisle", aisle)
///     .field("code", each(|seq| async move { format!("store-{seq}") }));
/// assert_eq!(
///     store.field_names().collect::<Vec<_>>(),
///     ["name", "aisle", "code"]
/// );
/// # Ok::<_, fixture_factory::FactoryError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Template {
    fields: IndexMap<String, FieldSpec>,
}

impl Template {
    /// Create an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the spec for `name`.
    ///
    /// Replacing keeps the field's original position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }

    /// Build a template of literal fields from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::NotAnObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> FactoryResult<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(FactoryError::not_an_object(ROOT)),
        }
    }

    /// Build a template of literal fields from a default record.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Encode`] when `record` cannot be serialised
    /// and [`FactoryError::NotAnObject`] when it does not serialise to an
    /// object.
    pub fn from_record<R: Serialize>(record: &R) -> FactoryResult<Self> {
        encode(record)
            .map_err(|err| err.at_field(ROOT))
            .and_then(Self::from_value)
    }

    /// Copy this template, replacing or adding every field of `other`.
    ///
    /// Each field is replaced whole: a replaced resolver or nested template is
    /// not merged with the one it shadows.
    #[must_use]
    pub fn with_fields(&self, other: &Self) -> Self {
        let mut fields = self.fields.clone();
        for (name, spec) in &other.fields {
            fields.insert(name.clone(), spec.clone());
        }
        Self { fields }
    }

    /// Look up the spec for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Returns `true` when the template defines `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the template has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` when no resolver anywhere in the template suspends.
    #[must_use]
    pub fn is_sync(&self) -> bool {
        self.first_async_field().is_none()
    }

    fn first_async_field(&self) -> Option<String> {
        self.fields.iter().find_map(|(name, spec)| {
            spec.first_async_field().map(|inner| {
                if inner.is_empty() {
                    name.clone()
                } else {
                    format!("{name}.{inner}")
                }
            })
        })
    }

    /// Resolve every field for `sequence`, letting pending resolvers overlap.
    ///
    /// The first failure aborts the remaining resolutions.
    pub(crate) fn resolve(&self, sequence: u64) -> BoxFuture<'static, FactoryResult<Value>> {
        let pending: Vec<_> = self
            .fields
            .iter()
            .map(|(name, spec)| {
                let name = name.clone();
                let value = match spec {
                    FieldSpec::Literal(value) => {
                        future::ready(Ok::<_, FactoryError>(value.clone())).boxed()
                    }
                    FieldSpec::Each(resolver) => resolver.resolve(sequence),
                    FieldSpec::Nested(template) => template.resolve(sequence),
                };
                value.map(move |resolved| match resolved {
                    Ok(value) => Ok((name, value)),
                    Err(err) => Err(err.at_field(&name)),
                })
            })
            .collect();

        async move {
            let fields = future::try_join_all(pending).await?;
            Ok(Value::Object(fields.into_iter().collect()))
        }
        .boxed()
    }

    /// Resolve every field for `sequence` without suspending.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::PendingResolver`] when an asynchronous resolver
    /// is reached, or the first resolver failure.
    pub(crate) fn resolve_now(&self, sequence: u64) -> FactoryResult<Value> {
        self.fields
            .iter()
            .map(|(name, spec)| {
                let value = match spec {
                    FieldSpec::Literal(value) => Ok(value.clone()),
                    FieldSpec::Each(resolver) => resolver
                        .resolve_now(sequence)
                        .unwrap_or_else(|| Err(FactoryError::pending_resolver(""))),
                    FieldSpec::Nested(template) => template.resolve_now(sequence),
                };
                value
                    .map(|value| (name.clone(), value))
                    .map_err(|err| err.at_field(name))
            })
            .collect::<FactoryResult<Map<String, Value>>>()
            .map(Value::Object)
    }
}

impl<K, S> FromIterator<(K, S)> for Template
where
    K: Into<String>,
    S: Into<FieldSpec>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        }
    }
}

/// A field spec admissible in a [`SyncTemplate`].
#[derive(Clone, Debug)]
pub enum SyncField {
    /// A fixed value.
    Literal(Value),
    /// A synchronous resolver.
    Each(SyncResolver),
    /// A nested synchronous template.
    Nested(SyncTemplate),
}

impl From<Value> for SyncField {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<SyncResolver> for SyncField {
    fn from(resolver: SyncResolver) -> Self {
        Self::Each(resolver)
    }
}

impl From<SyncTemplate> for SyncField {
    fn from(template: SyncTemplate) -> Self {
        Self::Nested(template)
    }
}

impl From<SyncField> for FieldSpec {
    fn from(field: SyncField) -> Self {
        match field {
            SyncField::Literal(value) => Self::Literal(value),
            SyncField::Each(resolver) => Self::Each(resolver.into()),
            SyncField::Nested(template) => Self::Nested(template.0),
        }
    }
}

/// A template whose resolvers never suspend.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::{Template, each, sync::{self, SyncTemplate}};
/// use serde_json::json;
///
/// let kid = SyncTemplate::new()
///     .field("name", json!("Kid"))
///     .field("grade", sync::each(|seq| seq % 12));
/// assert!(kid.as_template().is_sync());
///
/// let pending = Template::new().field("grade", each(|seq| async move { seq }));
/// assert!(SyncTemplate::try_from(pending).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SyncTemplate(Template);

impl SyncTemplate {
    /// Create an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the spec for `name`.
    #[must_use]
    pub fn field(self, name: impl Into<String>, spec: impl Into<SyncField>) -> Self {
        Self(self.0.field(name, FieldSpec::from(spec.into())))
    }

    /// Build a template of literal fields from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::NotAnObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> FactoryResult<Self> {
        Template::from_value(value).map(Self)
    }

    /// Build a template of literal fields from a default record.
    ///
    /// # Errors
    ///
    /// See [`Template::from_record`].
    pub fn from_record<R: Serialize>(record: &R) -> FactoryResult<Self> {
        Template::from_record(record).map(Self)
    }

    /// Copy this template, replacing or adding every field of `other`.
    #[must_use]
    pub fn with_fields(&self, other: &Self) -> Self {
        Self(self.0.with_fields(&other.0))
    }

    /// Borrow the underlying template.
    #[must_use]
    pub const fn as_template(&self) -> &Template {
        &self.0
    }

    /// Unwrap into the underlying template.
    #[must_use]
    pub fn into_template(self) -> Template {
        self.0
    }
}

impl TryFrom<Template> for SyncTemplate {
    type Error = FactoryError;

    fn try_from(template: Template) -> Result<Self, Self::Error> {
        match template.first_async_field() {
            Some(field) => Err(FactoryError::pending_resolver(field)),
            None => Ok(Self(template)),
        }
    }
}
