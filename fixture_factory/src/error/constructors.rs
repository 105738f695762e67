//! Constructors and path helpers for `FactoryError`.

use super::{BoxError, FactoryError};

/// Placeholder path used for errors concerning a whole record.
pub(crate) const ROOT: &str = "<root>";

impl FactoryError {
    /// Wrap a caller error raised by a resolver, derivation, or transform.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixture_factory::FactoryError;
    ///
    /// let err = FactoryError::callback(std::io::Error::other("disk full"));
    /// assert_eq!(err.to_string(), "disk full");
    /// ```
    #[must_use]
    pub fn callback<E: Into<BoxError>>(err: E) -> Self {
        Self::Callback(err.into())
    }

    /// Borrow the caller's original error when it has type `E`.
    ///
    /// Returns `None` for engine errors and for callback errors of another
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixture_factory::FactoryError;
    ///
    /// let err = FactoryError::callback(std::io::Error::other("disk full"));
    /// let io = err.downcast_ref::<std::io::Error>();
    /// assert_eq!(io.map(std::io::Error::kind), Some(std::io::ErrorKind::Other));
    /// ```
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Callback(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Construct an encoding error for the value produced at `field`.
    #[must_use]
    pub fn encode(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            field: field.into(),
            source,
        }
    }

    /// Construct a decoding error for a built record.
    #[must_use]
    pub const fn decode(source: serde_json::Error) -> Self {
        Self::Decode { source }
    }

    /// Construct an error for an async resolver met on the sync path.
    #[must_use]
    pub fn pending_resolver(field: impl Into<String>) -> Self {
        Self::PendingResolver {
            field: field.into(),
        }
    }

    /// Construct an error for a value that should have been an object.
    #[must_use]
    pub fn not_an_object(field: impl Into<String>) -> Self {
        Self::NotAnObject {
            field: field.into(),
        }
    }

    /// Construct an error for a factory whose counter has run out.
    #[must_use]
    pub fn sequence_exhausted(factory: impl Into<String>) -> Self {
        Self::SequenceExhausted {
            factory: factory.into(),
        }
    }

    /// Prefix the field path of path-carrying variants with `name`.
    ///
    /// Resolution errors are raised without knowing where the resolver sits
    /// in the template; each enclosing template level calls this on the way
    /// out so the final path reads `outer.inner`.
    #[must_use]
    pub(crate) fn at_field(self, name: &str) -> Self {
        match self {
            Self::Encode { field, source } => Self::Encode {
                field: join_path(name, &field),
                source,
            },
            Self::PendingResolver { field } => Self::PendingResolver {
                field: join_path(name, &field),
            },
            other => other,
        }
    }
}

fn join_path(outer: &str, inner: &str) -> String {
    if inner.is_empty() {
        outer.to_owned()
    } else {
        format!("{outer}.{inner}")
    }
}
