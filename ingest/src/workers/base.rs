use std::future::Future;

use crate::error::IngestResult;

/// A trait for types that can be started as workers.
///
/// The generic parameter `H` represents the handle type that will be returned
/// when the worker starts.
pub trait Worker<H>
where
    H: WorkerHandle,
{
    /// Error type.
    type Error;

    /// Starts the worker and returns a future that resolves to a handle.
    ///
    /// The handle can be used to wait for the worker's completion.
    fn start(self) -> impl Future<Output = Result<H, Self::Error>> + Send;
}

/// A handle to a running worker.
pub trait WorkerHandle {
    /// Returns a future that resolves when the worker completes.
    ///
    /// The future resolves to a [`Result`] indicating whether the worker
    /// completed successfully or encountered an error.
    fn wait(self) -> impl Future<Output = IngestResult<()>> + Send;
}
