use std::future::Future;

use crate::error::IngestResult;
use crate::types::LoginEvent;

/// A sink for normalized login events.
///
/// Implementations must only return success once the event is durably
/// persisted: the ingestion loop acknowledges the source message as soon as
/// this resolves, so a success on a non-durable write would break the
/// at-least-once delivery guarantee.
pub trait Destination {
    /// Persists one login event as one row.
    fn write_login(&self, event: LoginEvent) -> impl Future<Output = IngestResult<()>> + Send;
}
