//! Shared fixtures for the behavioural scenarios.

use fixture_factory::{Factory, FactoryError, sync::SyncFactory};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::{GroceryStore, Kid, Person};

/// Scenario state shared between steps.
#[derive(Debug, Default, ScenarioState)]
pub struct FactoryWorld {
    /// Kid factory under test.
    pub kids: Slot<SyncFactory<Kid>>,
    /// Factory produced by an `extend` step.
    pub extended_kids: Slot<SyncFactory<Kid>>,
    /// Kids built so far, in build order.
    pub built_kids: Slot<Vec<Kid>>,
    /// Grocery store factory under test.
    pub stores: Slot<Factory<GroceryStore>>,
    /// Most recently built store.
    pub built_store: Slot<GroceryStore>,
    /// Person factory under test.
    pub people: Slot<SyncFactory<Person>>,
    /// Most recently built person.
    pub built_person: Slot<Person>,
    /// Error returned by the last failing build.
    pub error: Slot<FactoryError>,
}

/// Creates a clean world for each scenario.
#[fixture]
pub fn factory_world() -> FactoryWorld {
    FactoryWorld::default()
}
