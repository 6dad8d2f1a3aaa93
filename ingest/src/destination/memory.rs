use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::destination::base::Destination;
use crate::error::{ErrorKind, IngestError, IngestResult};
use crate::types::LoginEvent;

#[derive(Debug)]
struct Inner {
    events: Vec<LoginEvent>,
    fail_writes: bool,
}

/// In-memory implementation of [`Destination`] used in tests.
///
/// Records every written event. Can be primed to fail writes, which tests use
/// to verify that failed persistence never leads to an acknowledgment.
#[derive(Debug, Clone)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        let inner = Inner {
            events: Vec::new(),
            fail_writes: false,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Makes every subsequent write fail with a destination error.
    pub async fn fail_writes(&self) {
        self.inner.lock().await.fail_writes = true;
    }

    /// Returns the events written so far, in write order.
    pub async fn events(&self) -> Vec<LoginEvent> {
        self.inner.lock().await.events.clone()
    }
}

impl Default for MemoryDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for MemoryDestination {
    async fn write_login(&self, event: LoginEvent) -> IngestResult<()> {
        let mut inner = self.inner.lock().await;

        if inner.fail_writes {
            bail!(
                ErrorKind::DestinationQueryFailed,
                "Memory destination primed to fail"
            );
        }

        info!(user_id = %event.user_id, "writing login event");
        inner.events.push(event);

        Ok(())
    }
}
