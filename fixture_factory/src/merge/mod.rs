//! Deep merge of build overrides onto resolved defaults.
//!
//! Overrides are partial JSON trees. The rules are dispatched on the
//! [`ValueKind`] of the default and of the override:
//!
//! - a key absent from the overrides keeps its default;
//! - scalars, arrays, and explicit `null` replace the default outright
//!   (arrays are never concatenated, `null` never recurses);
//! - an object overriding an object merges recursively, so sibling
//!   sub-fields keep their defaults;
//! - an object overriding anything else (including `null`) replaces it.
//!
//! # Examples
//!
//! ```rust
//! use fixture_factory::merge::merged;
//! use serde_json::json;
//!
//! let defaults = json!({
//!     "name": "Corner Store",
//!     "aisle": {"typeOfFood": "Junk Food", "budget": 3000, "tags": ["a", "b", "c"]},
//!     "manager": "Pat",
//! });
//! let built = merged(
//!     defaults,
//!     json!({"aisle": {"budget": 9999, "tags": ["a", "b"]}, "manager": null}),
//! );
//! assert_eq!(built["aisle"]["typeOfFood"], "Junk Food");
//! assert_eq!(built["aisle"]["budget"], 9999);
//! assert_eq!(built["aisle"]["tags"], json!(["a", "b"]));
//! assert!(built["manager"].is_null());
//! ```

use serde_json::{Map, Value};

/// Structural kind of a JSON value as seen by the merge rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueKind {
    /// Explicit `null`.
    Null,
    /// Booleans, numbers, and strings.
    Scalar,
    /// Arrays; always replaced, never merged element-wise.
    Array,
    /// Plain objects; merged key by key.
    Object,
}

impl ValueKind {
    /// Classify `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Scalar,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// Overlay `overrides` onto `target`, updating `target` in place.
///
/// Keys present in `overrides` but absent from `target` are inserted, so
/// optional fields left out of a template can still be supplied at build
/// time.
///
/// # Examples
///
/// ```rust
/// use fixture_factory::merge::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// // `null` short-circuits the recursion.
/// merge_value(&mut acc, json!({"b": null}));
/// assert_eq!(acc["b"], json!(null));
/// ```
pub fn merge_value(target: &mut Value, overrides: Value) {
    match (ValueKind::of(target), overrides) {
        (ValueKind::Object, Value::Object(map)) => merge_object(target, map),
        (_, replacement) => *target = replacement,
    }
}

/// Merge `overrides` onto `defaults` and return the result.
#[must_use]
pub fn merged(mut defaults: Value, overrides: Value) -> Value {
    merge_value(&mut defaults, overrides);
    defaults
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}
