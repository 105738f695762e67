//! `rstest-bdd` behavioural suite for `fixture_factory`.
//!
//! [`fixtures`] holds the shared scenario state, [`steps`] registers the step
//! implementations, and [`scenarios`] binds the `.feature` files to them.

mod fixtures;
mod scenarios;
mod steps;
