use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio_postgres::Config as PgConnectOptions;

use crate::SerializableSecretString;

/// Configuration for connecting to a Postgres database.
///
/// This struct holds all necessary connection parameters and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PgConnectionConfig {
    /// Hostname or IP address of the Postgres server.
    pub host: String,
    /// Port number on which the Postgres server is listening.
    pub port: u16,
    /// Name of the Postgres database to connect to.
    pub name: String,
    /// Username for authenticating with the Postgres server.
    pub username: String,
    /// Password for the specified user. This field is sensitive and redacted in debug output.
    pub password: Option<SerializableSecretString>,
}

impl PgConnectionConfig {
    /// Creates connection options for connecting to the configured database.
    ///
    /// Returns a [`tokio_postgres::Config`] populated with the host, port, user,
    /// database name and optional password from this instance.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut config = PgConnectOptions::new();
        config
            .host(self.host.clone())
            .port(self.port)
            .user(self.username.clone())
            .dbname(self.name.clone());

        if let Some(password) = &self.password {
            config.password(password.expose_secret());
        }

        config
    }
}
