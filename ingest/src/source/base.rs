use std::future::Future;
use std::time::Duration;

use crate::error::IngestResult;

/// A raw message pulled from the queue.
///
/// The body is an opaque payload; the receipt handle is the opaque token the
/// queue hands out for acknowledging exactly this delivery. A message that is
/// never deleted becomes eligible for redelivery under the queue's own
/// visibility policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Raw message payload.
    pub body: String,
    /// Opaque acknowledgment handle for this delivery.
    pub receipt_handle: String,
}

/// A source of queue messages.
///
/// Implementations own the transport to the queue service. The two operations
/// mirror the collaborator contract of the queue: a bounded-wait batched
/// receive and a per-delivery delete.
pub trait QueueSource {
    /// Receives up to `max_messages` messages, waiting up to `wait_time` if the
    /// queue is momentarily empty. An empty result means the queue reported no
    /// messages within the wait bound.
    fn receive(
        &self,
        max_messages: i32,
        wait_time: Duration,
    ) -> impl Future<Output = IngestResult<Vec<QueueMessage>>> + Send;

    /// Deletes the delivery identified by `receipt_handle` from the queue.
    ///
    /// Callers must only invoke this after the message's row has been durably
    /// committed; deleting earlier would turn a crash into message loss.
    fn delete(&self, receipt_handle: &str) -> impl Future<Output = IngestResult<()>> + Send;
}
