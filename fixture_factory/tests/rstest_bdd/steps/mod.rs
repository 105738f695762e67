//! Step definitions, grouped by feature.

mod derivation_steps;
mod override_steps;
mod sequencing_steps;

use anyhow::{Result, anyhow, ensure};
use fixture_factory::FactoryResult;
use rstest_bdd::Slot;
use rstest_bdd_macros::then;

use crate::fixtures::FactoryWorld;

/// Stores a build outcome: the value on success, the error otherwise.
fn record_outcome<T>(slot: &Slot<T>, world: &FactoryWorld, outcome: FactoryResult<T>) {
    match outcome {
        Ok(value) => slot.set(value),
        Err(err) => world.error.set(err),
    }
}

#[then("the build fails to decode")]
fn build_fails_to_decode(factory_world: &FactoryWorld) -> Result<()> {
    let err = factory_world
        .error
        .take()
        .ok_or_else(|| anyhow!("expected the build to fail"))?;
    ensure!(
        matches!(err, fixture_factory::FactoryError::Decode { .. }),
        "expected a decode error, got {err:?}"
    );
    Ok(())
}

#[then("the build fails with reason {reason}")]
fn build_fails_with_reason(factory_world: &FactoryWorld, reason: String) -> Result<()> {
    let err = factory_world
        .error
        .take()
        .ok_or_else(|| anyhow!("expected the build to fail"))?;
    let sample = err
        .downcast_ref::<test_helpers::SampleError>()
        .ok_or_else(|| anyhow!("expected a SampleError, got {err:?}"))?;
    ensure!(
        sample.reason == test_helpers::text::unquote(&reason),
        "unexpected reason {}",
        sample.reason
    );
    Ok(())
}
