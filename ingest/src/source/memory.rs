use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::IngestResult;
use crate::source::base::{QueueMessage, QueueSource};

#[derive(Debug)]
struct Inner {
    pending: VecDeque<QueueMessage>,
    deleted: Vec<String>,
    polls: usize,
}

/// In-memory implementation of [`QueueSource`] used in tests.
///
/// Seeded messages are handed out in order; receipts passed to
/// [`QueueSource::delete`] are recorded so tests can assert on acknowledgment
/// behavior. Poll counts are tracked to verify the loop's termination policy.
#[derive(Debug, Clone)]
pub struct MemoryQueueSource {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryQueueSource {
    pub fn new() -> Self {
        let inner = Inner {
            pending: VecDeque::new(),
            deleted: Vec::new(),
            polls: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Seeds a message with the given body; the receipt handle is derived from
    /// the insertion order.
    pub async fn push_message(&self, body: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        let receipt_handle = format!("receipt-{}", inner.pending.len() + inner.deleted.len());
        inner.pending.push_back(QueueMessage {
            body: body.into(),
            receipt_handle,
        });
    }

    /// Returns the receipt handles deleted so far, in deletion order.
    pub async fn deleted_receipts(&self) -> Vec<String> {
        self.inner.lock().await.deleted.clone()
    }

    /// Returns the number of receive calls issued against this source.
    pub async fn polls(&self) -> usize {
        self.inner.lock().await.polls
    }

    /// Returns the messages still waiting to be received.
    pub async fn pending_messages(&self) -> Vec<QueueMessage> {
        self.inner.lock().await.pending.iter().cloned().collect()
    }
}

impl Default for MemoryQueueSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueSource for MemoryQueueSource {
    async fn receive(
        &self,
        max_messages: i32,
        _wait_time: Duration,
    ) -> IngestResult<Vec<QueueMessage>> {
        let mut inner = self.inner.lock().await;
        inner.polls += 1;

        let mut batch = Vec::new();
        while batch.len() < max_messages as usize {
            let Some(message) = inner.pending.pop_front() else {
                break;
            };
            batch.push(message);
        }

        Ok(batch)
    }

    async fn delete(&self, receipt_handle: &str) -> IngestResult<()> {
        let mut inner = self.inner.lock().await;
        inner.deleted.push(receipt_handle.to_string());

        Ok(())
    }
}
