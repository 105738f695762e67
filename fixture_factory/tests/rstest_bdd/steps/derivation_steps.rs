//! Steps for derived fields.

use anyhow::{Result, anyhow, ensure};
use fixture_factory::sync::{SyncFactory, SyncTemplate, make_sync_factory};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};
use test_helpers::{Person, SampleError, text::unquote};

use super::record_outcome;
use crate::fixtures::FactoryWorld;

fn base_people() -> Result<SyncFactory<Person>> {
    let template = SyncTemplate::from_value(json!({
        "first_name": "Robert",
        "last_name": "Bobberson",
        "full_name": "",
    }))?;
    Ok(make_sync_factory(template))
}

#[given("a person factory deriving full names")]
fn person_factory(factory_world: &FactoryWorld) -> Result<()> {
    let people = base_people()?.with_derivation("full_name", |person: &Person| {
        format!("{} {}", person.first_name, person.last_name)
    });
    factory_world.people.set(people);
    Ok(())
}

#[given("a person factory whose derivation rejects {surname}")]
fn rejecting_person_factory(factory_world: &FactoryWorld, surname: String) -> Result<()> {
    let rejected = unquote(&surname).to_owned();
    let people = base_people()?.try_with_derivation("full_name", move |person: &Person| {
        if person.last_name == rejected {
            Err(SampleError::new("no spies"))
        } else {
            Ok(format!("{} {}", person.first_name, person.last_name))
        }
    });
    factory_world.people.set(people);
    Ok(())
}

fn build_person(world: &FactoryWorld, overrides: Value) -> Result<()> {
    let people = world
        .people
        .get()
        .ok_or_else(|| anyhow!("person factory should be set"))?;
    record_outcome(&world.built_person, world, people.build(overrides));
    Ok(())
}

#[when("I build a person with first name {first} and last name {last}")]
fn build_named_person(factory_world: &FactoryWorld, first: String, last: String) -> Result<()> {
    build_person(
        factory_world,
        json!({ "first_name": unquote(&first), "last_name": unquote(&last) }),
    )
}

#[when("I build a person with full name {full}")]
fn build_person_with_full_name(factory_world: &FactoryWorld, full: String) -> Result<()> {
    build_person(factory_world, json!({ "full_name": unquote(&full) }))
}

#[then("the full name is {expected}")]
fn full_name_is(factory_world: &FactoryWorld, expected: String) -> Result<()> {
    let actual = factory_world
        .built_person
        .with_ref(|person| person.full_name.clone())
        .ok_or_else(|| anyhow!("no person has been built"))?;
    ensure!(actual == unquote(&expected), "full name is {actual}");
    Ok(())
}
