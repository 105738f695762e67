//! Primary error enum for factory builds.

use thiserror::Error;

/// Boxed error type accepted from caller-supplied resolvers, derivations, and
/// transform stages.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building a record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactoryError {
    /// Failure raised by a resolver, derivation, or transform stage.
    ///
    /// The caller's error is carried as-is: `Display` and `source()` report
    /// the original error, and [`FactoryError::downcast_ref`] recovers it.
    #[error(transparent)]
    Callback(BoxError),

    /// A produced value could not be serialised into the record tree.
    #[error("failed to encode value for field '{field}': {source}")]
    Encode {
        /// Dotted path of the field whose value failed to serialise.
        field: String,
        /// Underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The merged record does not decode into the record type.
    #[error("failed to decode built record: {source}")]
    Decode {
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// An asynchronous resolver was reached on the synchronous resolution path.
    #[error("field '{field}' has an asynchronous resolver and cannot be resolved synchronously")]
    PendingResolver {
        /// Dotted path of the offending field.
        field: String,
    },

    /// The factory has handed out every sequence number it can represent.
    #[error("factory '{factory}' has no sequence numbers left")]
    SequenceExhausted {
        /// Label of the exhausted factory.
        factory: String,
    },

    /// A JSON object was required but another kind of value was found.
    #[error("expected an object at '{field}'")]
    NotAnObject {
        /// Dotted path (or derivation target) where an object was expected.
        field: String,
    },
}
