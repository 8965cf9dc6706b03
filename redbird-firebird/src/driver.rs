use crate::{
    ConnectionConfig, NativeClient, RdbConnection, RdbPrepared, RdbSqlWriter, RdbTransaction,
};
use redbird_core::{Driver, Result};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// Firebird backend, shares its native client with every connection it opens.
#[derive(Clone)]
pub struct RdbDriver {
    client: Arc<dyn NativeClient>,
}

impl RdbDriver {
    pub fn new(client: Arc<dyn NativeClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn NativeClient> {
        &self.client
    }

    /// Open a connection from a `firebird://` URL.
    pub async fn connect(&self, url: &str) -> Result<RdbConnection> {
        let config = ConnectionConfig::from_url(url)?;
        RdbConnection::connect_with(self.clone(), config).await
    }
}

impl Debug for RdbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdbDriver").finish_non_exhaustive()
    }
}

impl Driver for RdbDriver {
    type Connection = RdbConnection;
    type SqlWriter = RdbSqlWriter;
    type Prepared = RdbPrepared;
    type Transaction<'c> = RdbTransaction<'c>;

    const NAME: &'static str = "firebird";

    fn sql_writer(&self) -> RdbSqlWriter {
        RdbSqlWriter::default()
    }
}
