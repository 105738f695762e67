//! Steps for deep-merge overrides on nested records.

use anyhow::{Result, anyhow, ensure};
use fixture_factory::{Factory, Template, make_factory};
use futures::executor::block_on;
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};
use test_helpers::{Aisle, GroceryStore, text::json_arg};

use super::record_outcome;
use crate::fixtures::FactoryWorld;

#[given("a grocery store factory")]
fn grocery_store_factory(factory_world: &FactoryWorld) -> Result<()> {
    let aisle = Template::from_value(json!({
        "name": "Junk Food Aisle",
        "typeOfFood": "Junk Food",
        "budget": 3000,
        "tags": ["a", "b", "c"],
    }))?;
    let stores = make_factory::<GroceryStore>(
        Template::new()
            .field("name", json!("Corner Store"))
            .field("aisle", aisle),
    );
    factory_world.stores.set(stores);
    Ok(())
}

fn build_store(world: &FactoryWorld, overrides: Value) -> Result<()> {
    let stores: Factory<GroceryStore> = world
        .stores
        .get()
        .ok_or_else(|| anyhow!("store factory should be set"))?;
    record_outcome(&world.built_store, world, block_on(stores.build(overrides)));
    Ok(())
}

#[when("I build a store with aisle budget {budget:u64} and {count:usize} tags")]
fn build_store_with_budget(factory_world: &FactoryWorld, budget: u64, count: usize) -> Result<()> {
    let tags: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .take(count)
        .map(|tag| (*tag).to_owned())
        .collect();
    build_store(
        factory_world,
        json!({ "aisle": { "budget": budget, "tags": tags } }),
    )
}

#[when("I build a store whose aisle is {aisle}")]
fn build_store_with_aisle(factory_world: &FactoryWorld, aisle: String) -> Result<()> {
    build_store(factory_world, json!({ "aisle": json_arg(&aisle) }))
}

fn built_aisle(world: &FactoryWorld) -> Result<Aisle> {
    world
        .built_store
        .with_ref(|store| store.aisle.clone())
        .ok_or_else(|| anyhow!("no store has been built"))
}

#[then("the aisle type of food is {expected}")]
fn aisle_type_of_food(factory_world: &FactoryWorld, expected: String) -> Result<()> {
    let actual = built_aisle(factory_world)?.type_of_food;
    ensure!(
        json!(actual) == json_arg(&expected),
        "aisle stocks {actual}"
    );
    Ok(())
}

#[then("the aisle budget is {expected:u64}")]
fn aisle_budget(factory_world: &FactoryWorld, expected: u64) -> Result<()> {
    let actual = built_aisle(factory_world)?.budget;
    ensure!(actual == expected, "aisle budget is {actual}");
    Ok(())
}

#[then("the aisle has {count:usize} tags")]
fn aisle_tags(factory_world: &FactoryWorld, count: usize) -> Result<()> {
    let actual = built_aisle(factory_world)?.tags.len();
    ensure!(actual == count, "aisle has {actual} tags");
    Ok(())
}
