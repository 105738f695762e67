//! Error types produced while building fixtures.

mod constructors;
mod types;

pub use types::{BoxError, FactoryError};

pub(crate) use constructors::ROOT;
