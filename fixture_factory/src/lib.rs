//! Composable factories for test fixtures.
//!
//! A factory is created from a [`Template`] describing every field's default:
//! a literal, a resolver computed from the factory's sequence number, or a
//! nested template. Each build takes the next sequence number, resolves the
//! template, deep-merges caller overrides (see [`merge`]), applies
//! derivations, decodes the record into `R`, and runs any transform stages.
//!
//! Factories compose without mutation. [`Factory::extend`] replaces template
//! fields, [`Factory::combine`] unions two templates,
//! [`Factory::transform`] post-processes built values, and
//! [`Factory::with_derivation`] computes fields from the merged record. Every
//! operator returns a new factory with its own counter.
//!
//! The [`sync`] module offers the same surface for templates whose resolvers
//! never suspend, returning values directly instead of futures.

pub mod merge;

mod config;
mod derivation;
mod error;
mod factory;
mod pipeline;
mod resolver;
mod result_ext;
mod sequence;
mod template;

/// The synchronous engine and the template types it accepts.
pub mod sync {
    pub use crate::{
        factory::sync::{SyncFactory, make_sync_factory, make_sync_factory_with_config},
        resolver::{SyncResolver, each_sync as each, try_each_sync as try_each},
        template::{SyncField, SyncTemplate},
    };
}

pub use config::FactoryConfig;
pub use error::{BoxError, FactoryError};
pub use factory::{Factory, make_factory, make_factory_from_sync, make_factory_with_config};
pub use resolver::{Resolver, each, try_each};
pub use result_ext::{FactoryJsonExt, FactoryResultExt};
pub use template::{FieldSpec, Template};

/// Result type returned by factory builds.
pub type FactoryResult<T> = Result<T, FactoryError>;
