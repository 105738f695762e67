//! Factory configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FactoryResult, result_ext::FactoryJsonExt};

const DEFAULT_LABEL: &str = "factory";

/// Settings applied when a factory is created.
///
/// Factories derived through `extend`, `combine`, or `transform` inherit the
/// configuration of their (left-hand) source but always start a fresh
/// counter at [`first_sequence`](Self::first_sequence).
///
/// # Examples
///
/// ```rust
/// use fixture_factory::FactoryConfig;
/// use serde_json::json;
///
/// let config = FactoryConfig::from_value(json!({"first_sequence": 10}))?;
/// assert_eq!(config.first_sequence, 10);
/// assert_eq!(config.label(), "factory");
///
/// let config = FactoryConfig::new().with_label("kids");
/// assert_eq!(config.first_sequence, 1);
/// assert_eq!(config.label(), "kids");
/// # Ok::<_, fixture_factory::FactoryError>(())
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Sequence number observed by the first build.
    ///
    /// The counter never wraps. Once `u64::MAX` has been handed out, further
    /// builds fail with [`FactoryError::SequenceExhausted`].
    ///
    /// [`FactoryError::SequenceExhausted`]: crate::FactoryError::SequenceExhausted
    pub first_sequence: u64,
    /// Name reported in tracing events.
    pub label: Option<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            first_sequence: 1,
            label: None,
        }
    }
}

impl FactoryConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sequence number observed by the first build.
    #[must_use]
    pub fn with_first_sequence(mut self, first_sequence: u64) -> Self {
        self.first_sequence = first_sequence;
        self
    }

    /// Set the label reported in tracing events.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Load a configuration from a JSON value; missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FactoryError::Decode`] when `value` has the wrong
    /// shape.
    pub fn from_value(value: Value) -> FactoryResult<Self> {
        serde_json::from_value(value).into_decode()
    }

    /// Label used in tracing events.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }
}
