//! Transform pipelines: post-processing stages applied to a built record.
//!
//! Every pipeline starts by decoding the merged record tree into the record
//! type. Each `then` call returns a new pipeline that feeds the previous
//! output to one more stage; the source pipeline is shared, never mutated.

use std::{future::Future, sync::Arc};

use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    BoxError, FactoryResult,
    result_ext::{FactoryResultExt, decode},
};

type AsyncRun<T> = dyn Fn(Value) -> BoxFuture<'static, FactoryResult<T>> + Send + Sync;
type SyncRun<T> = dyn Fn(Value) -> FactoryResult<T> + Send + Sync;

/// Asynchronous pipeline producing `T` from a record tree.
pub(crate) struct Pipeline<T> {
    run: Arc<AsyncRun<T>>,
    stages: usize,
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            stages: self.stages,
        }
    }
}

impl<T> Pipeline<T> {
    /// Number of transform stages after the decode step.
    pub(crate) const fn stages(&self) -> usize {
        self.stages
    }

    pub(crate) fn run(&self, record: Value) -> BoxFuture<'static, FactoryResult<T>> {
        (self.run)(record)
    }
}

impl<T: Send + 'static> Pipeline<T> {
    /// Pipeline with no transform stages.
    pub(crate) fn decoding() -> Self
    where
        T: DeserializeOwned,
    {
        Self {
            run: Arc::new(|record: Value| future::ready(decode::<T>(record)).boxed()),
            stages: 0,
        }
    }

    /// Append `stage`, producing a pipeline for its output.
    pub(crate) fn then<U, E, F, Fut>(&self, stage: F) -> Pipeline<U>
    where
        U: Send + 'static,
        E: Into<BoxError>,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        let upstream = Arc::clone(&self.run);
        let stage = Arc::new(stage);
        let index = self.stages + 1;
        Pipeline {
            run: Arc::new(move |record: Value| {
                let input = upstream(record);
                let stage = Arc::clone(&stage);
                async move {
                    let input = input.await?;
                    tracing::trace!(stage = index, "running transform stage");
                    (*stage)(input).await.into_factory()
                }
                .boxed()
            }),
            stages: index,
        }
    }
}

impl<T: Send + 'static> From<SyncPipeline<T>> for Pipeline<T> {
    fn from(pipeline: SyncPipeline<T>) -> Self {
        let SyncPipeline { run, stages } = pipeline;
        Self {
            run: Arc::new(move |record: Value| future::ready(run(record)).boxed()),
            stages,
        }
    }
}

/// Synchronous pipeline producing `T` from a record tree.
pub(crate) struct SyncPipeline<T> {
    run: Arc<SyncRun<T>>,
    stages: usize,
}

impl<T> Clone for SyncPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            stages: self.stages,
        }
    }
}

impl<T> SyncPipeline<T> {
    /// Number of transform stages after the decode step.
    pub(crate) const fn stages(&self) -> usize {
        self.stages
    }

    pub(crate) fn run(&self, record: Value) -> FactoryResult<T> {
        (self.run)(record)
    }
}

impl<T: 'static> SyncPipeline<T> {
    /// Pipeline with no transform stages.
    pub(crate) fn decoding() -> Self
    where
        T: DeserializeOwned,
    {
        Self {
            run: Arc::new(decode::<T>),
            stages: 0,
        }
    }

    /// Append `stage`, producing a pipeline for its output.
    pub(crate) fn then<U, E, F>(&self, stage: F) -> SyncPipeline<U>
    where
        U: 'static,
        E: Into<BoxError>,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        let upstream = Arc::clone(&self.run);
        let index = self.stages + 1;
        SyncPipeline {
            run: Arc::new(move |record: Value| {
                let input = upstream(record)?;
                tracing::trace!(stage = index, "running transform stage");
                stage(input).into_factory()
            }),
            stages: index,
        }
    }
}
