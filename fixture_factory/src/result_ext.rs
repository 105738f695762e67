//! Extensions for mapping errors to `FactoryResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| FactoryError::…(e))`
//! patterns when converting caller and serialisation errors into the crate's
//! [`FactoryResult<T>`] alias.
//!
//! - Use [`FactoryResultExt::into_factory`] for caller errors (anything that
//!   converts into a boxed error). The error is kept unmodified inside
//!   [`FactoryError::Callback`].
//! - Use [`FactoryJsonExt`] for `serde_json::Error` results that should be
//!   attributed to encoding or decoding a record.
//!
//! # Examples
//!
//! ```
//! use fixture_factory::{FactoryResult, FactoryResultExt};
//!
//! fn parse_grade(raw: &str) -> FactoryResult<u8> {
//!     raw.parse::<u8>().into_factory()
//! }
//!
//! assert_eq!(parse_grade("3").ok(), Some(3));
//! assert!(parse_grade("three").is_err());
//! ```

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{BoxError, FactoryError, FactoryResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<BoxError>`
/// into a `FactoryResult<T>`.
pub trait FactoryResultExt<T> {
    /// Convert `Result<T, E>` into `FactoryResult<T>`, keeping the original
    /// error inside [`FactoryError::Callback`].
    ///
    /// # Errors
    ///
    /// Propagates the original error after boxing.
    fn into_factory(self) -> FactoryResult<T>;
}

impl<T, E> FactoryResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn into_factory(self) -> FactoryResult<T> {
        self.map_err(FactoryError::callback)
    }
}

/// Extension tailored to `serde_json::Error` results raised while moving
/// values in and out of the record tree.
pub trait FactoryJsonExt<T> {
    /// Attribute a serialisation failure to `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Encode`] when the input is `Err`.
    fn into_encode(self, field: &str) -> FactoryResult<T>;

    /// Attribute a deserialisation failure to the built record.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Decode`] when the input is `Err`.
    fn into_decode(self) -> FactoryResult<T>;
}

impl<T> FactoryJsonExt<T> for Result<T, serde_json::Error> {
    fn into_encode(self, field: &str) -> FactoryResult<T> {
        self.map_err(|source| FactoryError::encode(field, source))
    }

    fn into_decode(self) -> FactoryResult<T> {
        self.map_err(FactoryError::decode)
    }
}

/// Serialise `value` into the record tree.
///
/// The error carries an empty field path; callers that know where the value
/// lands extend it via the template's path tracking.
pub(crate) fn encode<V: Serialize + ?Sized>(value: &V) -> FactoryResult<Value> {
    serde_json::to_value(value).into_encode("")
}

/// Decode a finished record tree into `R`.
pub(crate) fn decode<R: DeserializeOwned>(value: Value) -> FactoryResult<R> {
    serde_json::from_value(value).into_decode()
}
