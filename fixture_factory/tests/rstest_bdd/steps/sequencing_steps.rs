//! Steps for sequenced builds, overrides, and `extend`.

use anyhow::{Result, anyhow, ensure};
use fixture_factory::sync::{self, SyncTemplate, make_sync_factory};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;
use test_helpers::{Kid, text::unquote};

use crate::fixtures::FactoryWorld;

#[given("a kid factory with sequenced birthdays")]
fn kid_factory(factory_world: &FactoryWorld) {
    let kids = make_sync_factory::<Kid>(
        SyncTemplate::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1))
            .field("birthday", sync::each(|seq| format!("2017-05-{seq:02}"))),
    );
    factory_world.kids.set(kids);
}

fn kids(world: &FactoryWorld) -> Result<sync::SyncFactory<Kid>> {
    world
        .kids
        .get()
        .ok_or_else(|| anyhow!("kid factory should be set"))
}

fn push_kids(world: &FactoryWorld, kids: Vec<Kid>) {
    let mut built = world.built_kids.take().unwrap_or_default();
    built.extend(kids);
    world.built_kids.set(built);
}

#[when("I build {count:usize} kids")]
fn build_kids(factory_world: &FactoryWorld, count: usize) -> Result<()> {
    let built = kids(factory_world)?.build_list(count, &json!({}))?;
    push_kids(factory_world, built);
    Ok(())
}

#[when("I build a kid named {name}")]
fn build_named_kid(factory_world: &FactoryWorld, name: String) -> Result<()> {
    let kid = kids(factory_world)?.build(json!({ "name": unquote(&name) }))?;
    push_kids(factory_world, vec![kid]);
    Ok(())
}

#[when("I extend the kid factory with grade {grade:u64}")]
fn extend_kids(factory_world: &FactoryWorld, grade: u64) -> Result<()> {
    let extended = kids(factory_world)?.extend(SyncTemplate::new().field("grade", json!(grade)));
    factory_world.extended_kids.set(extended);
    factory_world.built_kids.clear();
    Ok(())
}

#[when("I build {count:usize} kid from the extended factory")]
fn build_extended(factory_world: &FactoryWorld, count: usize) -> Result<()> {
    let extended = factory_world
        .extended_kids
        .get()
        .ok_or_else(|| anyhow!("extended factory should be set"))?;
    push_kids(factory_world, extended.build_list(count, &json!({}))?);
    Ok(())
}

fn kid_at(world: &FactoryWorld, index: usize) -> Result<Kid> {
    world
        .built_kids
        .with_ref(|kids| kids.get(index.saturating_sub(1)).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("kid {index} has not been built"))
}

#[then("kid {index:usize} has birthday {birthday}")]
fn kid_birthday(factory_world: &FactoryWorld, index: usize, birthday: String) -> Result<()> {
    let actual = kid_at(factory_world, index)?.birthday;
    ensure!(actual == unquote(&birthday), "kid {index} has birthday {actual}");
    Ok(())
}

#[then("kid {index:usize} is named {name}")]
fn kid_name(factory_world: &FactoryWorld, index: usize, name: String) -> Result<()> {
    let actual = kid_at(factory_world, index)?.name;
    ensure!(actual == unquote(&name), "kid {index} is named {actual}");
    Ok(())
}

#[then("kid {index:usize} is in grade {grade:u64}")]
fn kid_grade(factory_world: &FactoryWorld, index: usize, grade: u64) -> Result<()> {
    let actual = kid_at(factory_world, index)?.grade;
    ensure!(actual == grade, "kid {index} is in grade {actual}");
    Ok(())
}

#[then("the kid factory sequence is {expected:u64}")]
fn kid_sequence(factory_world: &FactoryWorld, expected: u64) -> Result<()> {
    let actual = kids(factory_world)?.sequence();
    ensure!(actual == Some(expected), "sequence is {actual:?}");
    Ok(())
}
