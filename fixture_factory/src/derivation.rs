//! Derivations: fields computed from the merged record.
//!
//! Derivations run after defaults and overrides have been merged and before
//! any transform stage. They run strictly in registration order, each seeing
//! the outputs of the ones registered before it, and always overwrite their
//! target field: an override for the target itself has no effect, while
//! overrides for the inputs a derivation reads are honoured.

use std::{fmt, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    BoxError, FactoryError, FactoryResult,
    result_ext::{FactoryResultExt, decode, encode},
};

type DeriveFn = dyn Fn(&Value) -> FactoryResult<Value> + Send + Sync;

/// A named computation over the record built so far.
#[derive(Clone)]
pub(crate) struct Derivation {
    field: String,
    derive: Arc<DeriveFn>,
}

impl Derivation {
    /// Wrap a computation over the decoded record `R`.
    pub(crate) fn typed<R, V, E, F>(field: String, derive: F) -> Self
    where
        R: DeserializeOwned + 'static,
        V: Serialize,
        E: Into<BoxError>,
        F: Fn(&R) -> Result<V, E> + Send + Sync + 'static,
    {
        Self {
            field,
            derive: Arc::new(move |record: &Value| {
                let typed: R = decode(record.clone())?;
                derive(&typed).into_factory().and_then(|value| encode(&value))
            }),
        }
    }

    fn apply(&self, record: &mut Value) -> FactoryResult<()> {
        if !record.is_object() {
            return Err(FactoryError::not_an_object(&self.field));
        }
        let value = (self.derive)(record).map_err(|err| err.at_field(&self.field))?;
        if let Some(fields) = record.as_object_mut() {
            fields.insert(self.field.clone(), value);
        }
        Ok(())
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Apply `derivations` to `record` in order.
///
/// # Errors
///
/// Returns the first derivation failure; later derivations do not run.
pub(crate) fn apply_all(derivations: &[Derivation], mut record: Value) -> FactoryResult<Value> {
    for derivation in derivations {
        tracing::trace!(field = %derivation.field, "applying derivation");
        derivation.apply(&mut record)?;
    }
    Ok(record)
}
