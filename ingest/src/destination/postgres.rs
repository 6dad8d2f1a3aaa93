use std::sync::Arc;

use ingest_config::shared::PgConnectionConfig;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use crate::destination::base::Destination;
use crate::error::IngestResult;
use crate::types::LoginEvent;

/// Parameterized single-row insert for one login event.
const INSERT_LOGIN: &str = "\
INSERT INTO user_logins (user_id, device_type, masked_ip, masked_device_id, locale, app_version, create_date) \
VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// Postgres-backed implementation of [`Destination`].
///
/// Owns the single database connection created at process start and reused for
/// every write. The connection task is driven on a separate tokio task, as
/// required by `tokio_postgres`.
#[derive(Debug, Clone)]
pub struct PostgresDestination {
    client: Arc<Mutex<Client>>,
}

impl PostgresDestination {
    /// Connects to the configured Postgres instance.
    pub async fn connect(config: PgConnectionConfig) -> IngestResult<PostgresDestination> {
        let (client, connection) = config.connect_options().connect(NoTls).await?;

        // The connection object performs the actual communication with the
        // database and must be polled for the client to make progress.
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!("postgres connection error: {err}");
            }
        });

        Ok(PostgresDestination {
            client: Arc::new(Mutex::new(client)),
        })
    }
}

impl Destination for PostgresDestination {
    async fn write_login(&self, event: LoginEvent) -> IngestResult<()> {
        let mut client = self.client.lock().await;

        // One insert, one commit. The source message must not be acknowledged
        // until this transaction has committed.
        let transaction = client.transaction().await?;
        transaction
            .execute(
                INSERT_LOGIN,
                &[
                    &event.user_id,
                    &event.device_type,
                    &event.masked_ip.as_str(),
                    &event.masked_device_id.as_str(),
                    &event.locale,
                    &event.app_version,
                    &event.create_date,
                ],
            )
            .await?;
        transaction.commit().await?;

        debug!(user_id = %event.user_id, "persisted login event");

        Ok(())
    }
}
