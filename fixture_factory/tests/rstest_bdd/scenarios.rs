//! Binds the behavioural feature files to the step registry.

use crate::fixtures::{FactoryWorld, factory_world};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/sequencing.feature",
    fixtures = [factory_world: FactoryWorld]
);
scenarios!(
    "tests/features/overrides.feature",
    fixtures = [factory_world: FactoryWorld]
);
scenarios!(
    "tests/features/derivations.feature",
    fixtures = [factory_world: FactoryWorld]
);
