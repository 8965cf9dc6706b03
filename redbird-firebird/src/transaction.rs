use crate::{RdbConnection, RdbDriver};
use redbird_core::{Executor, Query, QueryResult, Result, Transaction, stream::Stream};
use std::borrow::Cow;

/// Isolation of a transaction, rendered into the options of `SET TRANSACTION`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
    /// Options passed to the server as written.
    Verbatim(String),
}

impl IsolationLevel {
    pub fn as_sql(&self) -> Cow<'_, str> {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED".into(),
            IsolationLevel::RepeatableRead => "REPEATABLE READ".into(),
            IsolationLevel::Serializable => "SERIALIZABLE".into(),
            IsolationLevel::Verbatim(v) => v.as_str().into(),
        }
    }
}

/// Transaction borrowing its connection, rolled back when dropped without commit.
pub struct RdbTransaction<'c> {
    connection: &'c mut RdbConnection,
    finished: bool,
}

impl<'c> RdbTransaction<'c> {
    pub async fn new(connection: &'c mut RdbConnection, isolation: IsolationLevel) -> Result<Self> {
        connection.begin_db_transaction(isolation)?;
        Ok(Self {
            connection,
            finished: false,
        })
    }

    pub fn connection(&mut self) -> &mut RdbConnection {
        self.connection
    }

    pub async fn create_savepoint(&mut self, name: &str) -> Result<()> {
        self.connection.create_savepoint(name).await
    }

    pub async fn rollback_to_savepoint(&mut self, name: &str) -> Result<()> {
        self.connection.rollback_to_savepoint(name).await
    }

    pub async fn release_savepoint(&mut self, name: &str) -> Result<()> {
        self.connection.release_savepoint(name).await
    }
}

impl<'c> Executor for RdbTransaction<'c> {
    type Driver = RdbDriver;

    fn driver(&self) -> &RdbDriver {
        self.connection.driver()
    }

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<RdbDriver>>> + Send {
        self.connection.prepare(query)
    }

    fn run(&mut self, query: Query<RdbDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.connection.run(query)
    }
}

impl<'c> Transaction<'c> for RdbTransaction<'c> {
    async fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.connection.commit_db_transaction()
    }

    async fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.connection.rollback_db_transaction()
    }
}

impl<'c> Drop for RdbTransaction<'c> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!("Transaction dropped without commit or rollback, rolling it back");
        if let Err(e) = self.connection.rollback_db_transaction() {
            log::error!("{:#}", e);
        }
    }
}
