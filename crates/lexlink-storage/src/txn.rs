//! Transaction coordination across store shapes

use crate::error::{StorageError, StorageResult};
use crate::traits::{Dataset, Graph, Model, StoreHandle, TripleSource};
use std::fmt;

/// Transaction capability detected from a store handle
#[derive(Clone, Copy)]
pub enum TxnCapability<'a> {
    NativeGraph(&'a dyn Graph),
    NativeModel(&'a dyn Model),
    Dataset(&'a dyn Dataset),
    /// No transaction support; reads go straight to the source
    Unsupported(&'a dyn TripleSource),
}

impl<'a> TxnCapability<'a> {
    pub fn detect(handle: StoreHandle<'a>) -> Self {
        match handle {
            StoreHandle::Graph(graph) if graph.transaction_handler().transactions_supported() => {
                Self::NativeGraph(graph)
            }
            StoreHandle::Graph(graph) => Self::Unsupported(graph.as_source()),
            StoreHandle::Model(model) if model.supports_transactions() => Self::NativeModel(model),
            StoreHandle::Model(model) => Self::Unsupported(model.as_source()),
            StoreHandle::Dataset(dataset) => Self::Dataset(dataset),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NativeGraph(_) => "native-graph",
            Self::NativeModel(_) => "native-model",
            Self::Dataset(_) => "dataset",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl fmt::Debug for TxnCapability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `operation` against a consistent read view of the store.
///
/// The operation executes exactly once, with no retries. Its own error is
/// returned unchanged; an error raised by the native primitive is returned
/// only when the operation itself succeeded.
pub fn run_in_transaction<T, F>(handle: StoreHandle<'_>, operation: F) -> StorageResult<T>
where
    F: FnOnce(&dyn TripleSource) -> StorageResult<T>,
{
    let capability = TxnCapability::detect(handle);
    tracing::trace!(capability = capability.name(), "Dispatching read transaction");

    let mut operation = Some(operation);
    let mut outcome: Option<StorageResult<T>> = None;
    let mut body = |source: &dyn TripleSource| -> StorageResult<()> {
        let Some(op) = operation.take() else {
            return Err(StorageError::Transaction(
                "transaction body invoked twice".to_string(),
            ));
        };
        let result = op(source);
        let failed = result.is_err();
        outcome = Some(result);
        if failed {
            // abort the native transaction; the real error is in `outcome`
            Err(StorageError::Transaction("operation failed".to_string()))
        } else {
            Ok(())
        }
    };

    let native = match capability {
        TxnCapability::NativeGraph(graph) => graph.transaction_handler().execute_read(&mut body),
        TxnCapability::NativeModel(model) => model.calculate_in_transaction(&mut body),
        TxnCapability::Dataset(dataset) => dataset.calculate_read(&mut body),
        TxnCapability::Unsupported(source) => body(source),
    };

    match (outcome, native) {
        (Some(Err(e)), _) => Err(e),
        (Some(Ok(_)), Err(e)) => Err(e),
        (Some(Ok(value)), Ok(())) => Ok(value),
        (None, Err(e)) => Err(e),
        (None, Ok(())) => Err(StorageError::Transaction(format!(
            "{} transaction completed without running the operation",
            capability.name()
        ))),
    }
}
