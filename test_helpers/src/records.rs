//! Sample record types used throughout the factory test suites.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pupil with a name, a grade, and a birthday.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Kid {
    /// Given name.
    pub name: String,
    /// School grade.
    pub grade: u64,
    /// ISO date string.
    pub birthday: String,
}

/// A person whose full name is usually derived from its parts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// `first_name` and `last_name` joined with a space.
    pub full_name: String,
}

/// A shop with a single nested aisle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GroceryStore {
    /// Shop name.
    pub name: String,
    /// The shop's aisle.
    pub aisle: Aisle,
}

/// An aisle inside a [`GroceryStore`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Aisle {
    /// Aisle name.
    pub name: String,
    /// Kind of food stocked.
    pub type_of_food: String,
    /// Budget in whole currency units.
    pub budget: u64,
    /// Free-form labels.
    pub tags: Vec<String>,
}

/// A pet; one half of a combined record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Pet {
    /// Pet name.
    pub pet_name: String,
    /// Species.
    pub species: String,
}

/// An owner; the other half of a combined record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Owner {
    /// Owner name.
    pub owner_name: String,
    /// Contact number.
    pub phone: String,
}

/// The union of [`Pet`] and [`Owner`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PetOwner {
    /// Pet name.
    pub pet_name: String,
    /// Species.
    pub species: String,
    /// Owner name.
    pub owner_name: String,
    /// Contact number.
    pub phone: String,
}

/// Error raised by failing resolvers, derivations, and transforms in tests.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("sample failure: {reason}")]
pub struct SampleError {
    /// Human-readable cause.
    pub reason: String,
}

impl SampleError {
    /// Create an error with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
