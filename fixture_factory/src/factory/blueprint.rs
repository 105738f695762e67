//! The record-shaping half of a factory shared by both engines.

use std::sync::Arc;

use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use serde_json::Value;

use crate::{
    FactoryConfig, FactoryResult, Template,
    derivation::{Derivation, apply_all},
    merge::merged,
    sequence::SequenceCounter,
};

/// Template, derivations, and configuration of a factory.
///
/// Blueprints are immutable; every composition operator produces a new one.
#[derive(Debug)]
pub(crate) struct Blueprint {
    template: Template,
    derivations: Vec<Derivation>,
    config: FactoryConfig,
    immediate: bool,
}

impl Blueprint {
    pub(crate) fn new(template: Template, config: FactoryConfig) -> Self {
        Self::with_derivations(template, Vec::new(), config)
    }

    fn with_derivations(
        template: Template,
        derivations: Vec<Derivation>,
        config: FactoryConfig,
    ) -> Self {
        let immediate = template.is_sync();
        Self {
            template,
            derivations,
            config,
            immediate,
        }
    }

    pub(crate) const fn template(&self) -> &Template {
        &self.template
    }

    pub(crate) const fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub(crate) fn derivation_count(&self) -> usize {
        self.derivations.len()
    }

    /// A counter for a newly created factory.
    pub(crate) fn fresh_counter(&self) -> Arc<SequenceCounter> {
        Arc::new(SequenceCounter::starting_at(self.config.first_sequence))
    }

    /// Copy with `fields` replacing the matching template entries.
    pub(crate) fn extended(&self, fields: &Template) -> Self {
        Self::with_derivations(
            self.template.with_fields(fields),
            self.derivations.clone(),
            self.config.clone(),
        )
    }

    /// Field-wise union with `other`; `other` wins on name collisions and its
    /// derivations run after ours.
    pub(crate) fn combined(&self, other: &Self) -> Self {
        let derivations = self
            .derivations
            .iter()
            .chain(&other.derivations)
            .cloned()
            .collect();
        Self::with_derivations(
            self.template.with_fields(&other.template),
            derivations,
            self.config.clone(),
        )
    }

    /// Copy with `derivation` registered after the existing ones.
    pub(crate) fn derived(&self, derivation: Derivation) -> Self {
        let mut derivations = self.derivations.clone();
        derivations.push(derivation);
        Self::with_derivations(self.template.clone(), derivations, self.config.clone())
    }

    /// Resolve the template, skipping the concurrent path when nothing can
    /// suspend.
    pub(crate) fn resolve(&self, sequence: u64) -> BoxFuture<'static, FactoryResult<Value>> {
        if self.immediate {
            future::ready(self.template.resolve_now(sequence)).boxed()
        } else {
            self.template.resolve(sequence)
        }
    }

    pub(crate) fn resolve_now(&self, sequence: u64) -> FactoryResult<Value> {
        self.template.resolve_now(sequence)
    }

    /// Merge `overrides` onto the resolved defaults, then run derivations.
    ///
    /// A top-level `null` means "no overrides"; `null` only replaces a
    /// default when it is given for a field.
    pub(crate) fn assemble(&self, resolved: Value, overrides: Value) -> FactoryResult<Value> {
        let record = if overrides.is_null() {
            resolved
        } else {
            merged(resolved, overrides)
        };
        apply_all(&self.derivations, record)
    }
}
