//! Connections that can run an assembled UPDATE.
//!
//! [`AsyncConnection`] and [`Connection`] are the seams the executor talks to.
//! [`PgConnection`] and [`BlockingPgConnection`] implement them on top of
//! `tokio-postgres`; tests and other drivers can supply their own.

use crate::error::{PatchError, PatchResult};
use crate::log;
use std::future::Future;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls};

/// An async connection the executor can open and run statements on.
pub trait AsyncConnection: Send {
    /// Name of the database this connection targets. Used as the first part
    /// of the three-part table name.
    fn database(&self) -> &str;

    /// Whether the connection is currently usable.
    fn is_open(&self) -> bool;

    /// Open the connection. Called by the executor only when
    /// [`AsyncConnection::is_open`] is `false`.
    fn open(&mut self) -> impl Future<Output = PatchResult<()>> + Send;

    /// Execute `sql` once and return the affected row count.
    fn execute(
        &mut self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        timeout: Option<Duration>,
    ) -> impl Future<Output = PatchResult<u64>> + Send;
}

/// The blocking counterpart of [`AsyncConnection`].
pub trait Connection {
    fn database(&self) -> &str;

    fn is_open(&self) -> bool;

    fn open(&mut self) -> PatchResult<()>;

    fn execute(
        &mut self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        timeout: Option<Duration>,
    ) -> PatchResult<u64>;
}

fn database_of(config: &Config) -> String {
    config
        .get_dbname()
        .or(config.get_user())
        .unwrap_or("postgres")
        .to_string()
}

/// A lazily opened `tokio-postgres` connection.
///
/// ```ignore
/// let mut conn = PgConnection::connect_url("postgres://app@localhost/shop")?;
/// assert!(!conn.is_open());
/// let mut q = rowpatch::update(Some(&book));
/// q.add_all_columns()?;
/// let rows = q.commit_async(&mut conn).await?;
/// ```
pub struct PgConnection {
    config: Option<Config>,
    database: String,
    client: Option<Client>,
}

impl std::fmt::Debug for PgConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection")
            .field("database", &self.database)
            .field("open", &self.is_open())
            .finish()
    }
}

impl PgConnection {
    /// A closed connection that opens with `config` on first use.
    pub fn from_config(config: Config) -> Self {
        Self {
            database: database_of(&config),
            config: Some(config),
            client: None,
        }
    }

    /// Parse a connection string (URL or key/value form).
    pub fn connect_url(conn: &str) -> PatchResult<Self> {
        let config: Config = conn.parse().map_err(PatchError::Connection)?;
        Ok(Self::from_config(config))
    }

    /// Wrap a client that is already connected.
    ///
    /// Without a config this handle cannot reopen the client once it closes.
    pub fn from_client(client: Client, database: impl Into<String>) -> Self {
        Self {
            config: None,
            database: database.into(),
            client: Some(client),
        }
    }

    /// The underlying client, if connected.
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Drop the client. A config-backed connection opens again on next use.
    pub fn close(&mut self) {
        self.client = None;
    }
}

impl AsyncConnection for PgConnection {
    fn database(&self) -> &str {
        &self.database
    }

    fn is_open(&self) -> bool {
        self.client.as_ref().is_some_and(|c| !c.is_closed())
    }

    async fn open(&mut self) -> PatchResult<()> {
        if self.is_open() {
            return Ok(());
        }
        let Some(config) = &self.config else {
            return Err(PatchError::Closed);
        };

        log::opening(&self.database);
        let (client, connection) = config.connect(NoTls).await.map_err(PatchError::Connection)?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                log::connection_ended(&err);
            }
        });
        self.client = Some(client);
        Ok(())
    }

    async fn execute(
        &mut self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        timeout: Option<Duration>,
    ) -> PatchResult<u64> {
        let client = self.client.as_ref().ok_or(PatchError::Closed)?;
        let future = client.execute(sql, params);
        match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, future).await {
                Ok(result) => Ok(result?),
                Err(_) => {
                    log::timed_out(timeout);
                    // Awaited here so the blocking wrapper's runtime sends it
                    // before `commit` returns.
                    if let Err(err) = client.cancel_token().cancel_query(NoTls).await {
                        log::cancel_failed(&err);
                    }
                    Err(PatchError::Timeout(timeout))
                }
            },
            None => Ok(future.await?),
        }
    }
}

/// A [`PgConnection`] driven by its own current-thread runtime.
///
/// Must not be used from inside another tokio runtime.
#[derive(Debug)]
pub struct BlockingPgConnection {
    inner: PgConnection,
    runtime: tokio::runtime::Runtime,
}

impl BlockingPgConnection {
    pub fn from_config(config: Config) -> PatchResult<Self> {
        Self::from_inner(PgConnection::from_config(config))
    }

    pub fn connect_url(conn: &str) -> PatchResult<Self> {
        Self::from_inner(PgConnection::connect_url(conn)?)
    }

    fn from_inner(inner: PgConnection) -> PatchResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PatchError::Other(format!("failed to start runtime: {e}")))?;
        Ok(Self { inner, runtime })
    }

    pub fn close(&mut self) {
        self.inner.close();
    }
}

impl Connection for BlockingPgConnection {
    fn database(&self) -> &str {
        self.inner.database()
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn open(&mut self) -> PatchResult<()> {
        self.runtime.block_on(self.inner.open())
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        timeout: Option<Duration>,
    ) -> PatchResult<u64> {
        self.runtime
            .block_on(self.inner.execute(sql, params, timeout))
    }
}
