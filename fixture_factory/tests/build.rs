//! Building records: sequencing, lists, and failure propagation.

use anyhow::{Result, anyhow, ensure};
use fixture_factory::{Factory, FactoryError, Template, each, make_factory, try_each};
use futures::executor::block_on;
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;
use test_helpers::{Kid, Recorder, SampleError, latency};

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Pupil {
    name: String,
    grade: u8,
}

#[fixture]
fn pupils() -> Factory<Pupil> {
    make_factory(
        Template::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1)),
    )
}

#[fixture]
fn kids() -> Factory<Kid> {
    make_factory(
        Template::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1))
            .field(
                "birthday",
                each(|seq| async move { format!("2017-05-{seq:02}") }),
            ),
    )
}

#[rstest]
fn override_replaces_only_named_fields(pupils: Factory<Pupil>) -> Result<()> {
    let jimmy = block_on(pupils.build(json!({"name": "Jimmy"})))?;
    ensure!(
        jimmy
            == Pupil {
                name: "Jimmy".into(),
                grade: 1,
            },
        "unexpected pupil {jimmy:?}"
    );
    Ok(())
}

#[rstest]
fn literal_templates_build_idempotently(pupils: Factory<Pupil>) -> Result<()> {
    let first = block_on(pupils.build(json!({"grade": 4})))?;
    let second = block_on(pupils.build(json!({"grade": 4})))?;
    ensure!(first == second, "builds differ: {first:?} vs {second:?}");
    ensure!(pupils.sequence() == Some(2), "both builds take a number");
    Ok(())
}

#[rstest]
fn sequential_builds_take_consecutive_numbers(kids: Factory<Kid>) -> Result<()> {
    let first = block_on(kids.build_default())?;
    let second = block_on(kids.build_default())?;
    ensure!(first.birthday == "2017-05-01", "first was {}", first.birthday);
    ensure!(second.birthday == "2017-05-02", "second was {}", second.birthday);
    Ok(())
}

#[rstest]
fn build_list_applies_overrides_to_every_item(pupils: Factory<Pupil>) -> Result<()> {
    let bruces = block_on(pupils.build_list(3, &json!({"name": "Bruce"})))?;
    ensure!(bruces.len() == 3, "expected three pupils");
    for bruce in &bruces {
        ensure!(bruce.name == "Bruce" && bruce.grade == 1, "unexpected {bruce:?}");
    }
    Ok(())
}

#[rstest]
#[tokio::test]
async fn call_order_fixes_numbers_under_latency() -> Result<()> {
    let kids = make_factory::<Kid>(
        Template::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1))
            .field(
                "birthday",
                each(|seq| async move {
                    latency::delayed(
                        latency::reverse_stagger(seq, 3),
                        format!("2017-05-{seq:02}"),
                    )
                    .await
                }),
            ),
    );
    let first = kids.build_default();
    let second = kids.build_default();
    let third = kids.build_default();
    let (first, second, third) = tokio::try_join!(first, second, third)?;
    ensure!(first.birthday == "2017-05-01", "first was {}", first.birthday);
    ensure!(second.birthday == "2017-05-02", "second was {}", second.birthday);
    ensure!(third.birthday == "2017-05-03", "third was {}", third.birthday);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn fields_of_one_build_resolve_concurrently() -> Result<()> {
    let log = Recorder::default();
    let slow_log = log.clone();
    let fast_log = log.clone();
    let factory = make_factory::<serde_json::Value>(
        Template::new()
            .field(
                "slow",
                each(move |_| {
                    let log = slow_log.clone();
                    async move {
                        latency::delayed(20, ()).await;
                        log.record("slow");
                    }
                }),
            )
            .field(
                "fast",
                each(move |_| {
                    let log = fast_log.clone();
                    async move { log.record("fast") }
                }),
            ),
    );
    factory.build_default().await?;
    ensure!(log.entries() == ["fast", "slow"], "order was {:?}", log.entries());
    Ok(())
}

#[rstest]
fn resolver_errors_reach_the_caller_unmodified() -> Result<()> {
    let factory = make_factory::<Kid>(
        Template::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1))
            .field(
                "birthday",
                try_each(|_| async { Err::<String, _>(SampleError::new("calendar offline")) }),
            ),
    );
    let err = block_on(factory.build_default())
        .err()
        .ok_or_else(|| anyhow!("build should fail"))?;
    ensure!(
        err.downcast_ref::<SampleError>() == Some(&SampleError::new("calendar offline")),
        "unexpected error {err:?}"
    );
    ensure!(err.to_string() == "sample failure: calendar offline");
    Ok(())
}

#[rstest]
fn build_list_aborts_on_first_failure() -> Result<()> {
    let log = Recorder::default();
    let seen = log.clone();
    let factory = make_factory::<Kid>(
        Template::new()
            .field("name", json!("Kid"))
            .field("grade", json!(1))
            .field(
                "birthday",
                try_each(move |seq| {
                    let log = seen.clone();
                    async move {
                        log.record(format!("resolve {seq}"));
                        if seq == 2 {
                            Err(SampleError::new("second kid"))
                        } else {
                            Ok(format!("2017-05-{seq:02}"))
                        }
                    }
                }),
            ),
    );
    let outcome = block_on(factory.build_list(4, &json!({})));
    ensure!(outcome.is_err(), "list should fail");
    ensure!(
        log.entries() == ["resolve 1", "resolve 2"],
        "later builds should not run: {:?}",
        log.entries()
    );
    ensure!(factory.sequence() == Some(4), "all numbers were reserved");
    Ok(())
}

#[rstest]
fn missing_template_field_fails_to_decode(pupils: Factory<Pupil>) -> Result<()> {
    let partial = pupils.extend(Template::new().field("grade", json!(null)));
    let err = block_on(partial.build_default())
        .err()
        .ok_or_else(|| anyhow!("null grade cannot decode"))?;
    ensure!(matches!(err, FactoryError::Decode { .. }), "got {err:?}");
    Ok(())
}
