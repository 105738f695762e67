//! Test helpers shared across crates.
//!
//! This crate provides sample record types, latency helpers for exercising
//! asynchronous resolvers, a call recorder, and text helpers for behavioural
//! step definitions.

pub mod latency;
pub mod records;
pub mod recorder;
pub mod text;

pub use recorder::Recorder;
pub use records::{Aisle, GroceryStore, Kid, Owner, Person, Pet, PetOwner, SampleError};
