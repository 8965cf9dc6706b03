use crate::{
    ConnectionConfig, CursorGuard, Execution, IsolationLevel, NativeConnection, NativeError,
    NativeResult, RdbCapabilities, RdbDriver, RdbError, RdbPrepared, RdbSqlWriter,
    RdbTransaction, StatementContext, quoting::dialect_to_canonical,
};
use async_stream::try_stream;
use redbird_core::{
    Connection, Error, ErrorContext, Executor, Query, QueryResult, Result, Row, RowLabeled,
    RowNames, RowsAffected, SqlWriter, Statement, Value, stream::Stream, truncate_long,
    writer::Context,
};
use regex::Regex;
use std::{borrow::Cow, mem, sync::LazyLock};

/// Statements that never modify data.
static READ_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\A(?:[(\s]|/\*.*?\*/|--[^\n]*\n)*(?:begin|commit|explain|select|release|savepoint|rollback|with)\b",
    )
    .expect("the read query pattern is valid")
});

/// Whether `sql` only reads, judged by its leading keyword.
pub fn is_read_query(sql: &str) -> bool {
    READ_QUERY.is_match(sql)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransactionState {
    Idle,
    /// Requested, started on the first statement.
    Pending(String),
    Open {
        written: bool,
    },
}

/// One logical connection to the server.
///
/// Every statement goes through [`RdbConnection::submit`], which starts the pending
/// transaction, tracks whether it wrote anything and classifies the failures.
pub struct RdbConnection {
    pub(crate) driver: RdbDriver,
    pub(crate) config: ConnectionConfig,
    pub(crate) native: Box<dyn NativeConnection>,
    pub(crate) writer: RdbSqlWriter,
    pub(crate) transaction: TransactionState,
}

fn connect_error(config: &ConnectionConfig, error: NativeError) -> Error {
    let error = if error.message.contains("No such file or directory") {
        RdbError::NoDatabase(error.message)
    } else {
        RdbError::Connection(error.message)
    };
    let error = Error::new(error).context(format!(
        "While connecting to `{}`",
        config.connection_string()
    ));
    log::error!("{:#}", error);
    error
}

fn open(driver: &RdbDriver, config: &ConnectionConfig) -> Result<Box<dyn NativeConnection>> {
    match driver.client().connect(config) {
        Ok(native) => Ok(native),
        Err(e) if config.create => {
            log::debug!(
                "Creating the database `{}` after: {}",
                config.connection_string(),
                e
            );
            driver
                .client()
                .create_database(config)
                .map_err(|e| connect_error(config, e))
        }
        Err(e) => Err(connect_error(config, e)),
    }
}

impl RdbConnection {
    pub async fn connect_with(driver: RdbDriver, config: ConnectionConfig) -> Result<Self> {
        let native = open(&driver, &config)?;
        log::debug!("Connected to `{}`", config.connection_string());
        Ok(Self {
            driver,
            writer: RdbSqlWriter::new(config.dialect.clone()),
            config,
            native,
            transaction: TransactionState::Idle,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn writer(&self) -> &RdbSqlWriter {
        &self.writer
    }

    pub fn capabilities(&self) -> RdbCapabilities {
        RdbCapabilities::from_config(&self.config)
    }

    /// Close the connection and open it again, an open transaction is lost.
    pub async fn reconnect(&mut self) -> Result<()> {
        self.disconnect().await?;
        self.native = open(&self.driver, &self.config)?;
        log::debug!("Reconnected to `{}`", self.config.connection_string());
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        if matches!(self.transaction, TransactionState::Open { .. }) {
            log::warn!("Disconnecting with an open transaction, rolling it back");
            if let Err(e) = self.native.rollback() {
                log::warn!("Could not roll back the transaction: {}", e);
            }
        }
        self.transaction = TransactionState::Idle;
        if !self.native.is_open() {
            return Ok(());
        }
        self.native
            .close()
            .map_err(Error::new)
            .with_context(|| format!("While disconnecting from `{}`", self.config.connection_string()))
    }

    pub async fn is_alive(&mut self) -> bool {
        self.native.is_open() && self.native.query("SELECT 1 FROM RDB$DATABASE").is_ok()
    }

    /// Render a statement with bound parameters.
    pub fn query(&self, statement: &Statement) -> Result<Query<RdbDriver>> {
        let mut sql = String::with_capacity(128);
        let binds = self.writer.write_query(&mut sql, statement, true)?;
        Ok(Query::Prepared(RdbPrepared::with_binds(sql, binds)))
    }

    /// The statement as the server would receive it, values inlined.
    pub fn explain(&self, statement: &Statement) -> Result<String> {
        let mut sql = String::with_capacity(128);
        self.writer.write_query(&mut sql, statement, false)?;
        Ok(sql)
    }

    pub(crate) fn render(&self, f: impl FnOnce(&RdbSqlWriter, &mut Context, &mut String)) -> String {
        let mut out = String::with_capacity(128);
        f(&self.writer, &mut Context::default(), &mut out);
        out
    }

    pub(crate) fn try_render(
        &self,
        f: impl FnOnce(&RdbSqlWriter, &mut Context, &mut String) -> Result<()>,
    ) -> Result<String> {
        let mut out = String::with_capacity(128);
        f(&self.writer, &mut Context::default(), &mut out)?;
        Ok(out)
    }

    fn materialize_transaction(&mut self) -> Result<()> {
        if let TransactionState::Pending(options) = &self.transaction {
            log::debug!("Starting the transaction {}", options);
            self.native
                .transaction(options)
                .map_err(Error::new)
                .context("While starting the transaction")?;
            self.transaction = TransactionState::Open { written: false };
        }
        Ok(())
    }

    /// Run a statement without logging its failure, the error is classified already.
    pub(crate) fn execute_sql(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<QueryResult>> {
        self.materialize_transaction()?;
        if !is_read_query(sql) {
            if let TransactionState::Open { written } = &mut self.transaction {
                *written = true;
            }
        }
        log::debug!("{}", truncate_long!(sql));
        let downcase = self.config.downcase_names;
        let result: NativeResult<Vec<QueryResult>> = self
            .native
            .execute(sql, binds)
            .and_then(|execution| match execution {
                Execution::Affected(rows_affected) => {
                    Ok(vec![RowsAffected { rows_affected }.into()])
                }
                Execution::Cursor(cursor) => {
                    let mut cursor = CursorGuard::new(cursor);
                    let labels: RowNames = cursor
                        .fields()
                        .into_iter()
                        .map(|v| label(v, downcase))
                        .collect();
                    Ok(cursor
                        .fetch_all()?
                        .into_iter()
                        .map(|values| RowLabeled::new(labels.clone(), values).into())
                        .collect())
                }
            });
        result.map_err(|e| statement_error(e, sql, binds))
    }

    /// Single entry point of every statement sent to the server.
    pub fn submit(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<QueryResult>> {
        self.execute_sql(sql, binds).inspect_err(|e| {
            log::error!("{:#}", e);
        })
    }

    /// Run a read statement and return its raw rows.
    pub(crate) fn select_rows(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.materialize_transaction()?;
        log::debug!("{}", truncate_long!(sql));
        self.native
            .query(sql)
            .map_err(|e| statement_error(e, sql, &[]))
            .inspect_err(|e| {
                log::error!("{:#}", e);
            })
    }

    pub fn in_transaction(&self) -> bool {
        !matches!(self.transaction, TransactionState::Idle)
    }

    /// Whether the open transaction ran any statement that is not a read.
    pub fn transaction_written(&self) -> bool {
        matches!(self.transaction, TransactionState::Open { written: true })
    }

    /// Request a transaction, it starts with the next statement.
    pub fn begin_db_transaction(&mut self, isolation: IsolationLevel) -> Result<()> {
        if self.in_transaction() {
            let error = Error::msg("A transaction is already active, use a savepoint to nest");
            log::error!("{:#}", error);
            return Err(error);
        }
        let options = isolation.as_sql();
        log::debug!("Begin transaction {}", options);
        self.transaction = TransactionState::Pending(options.into_owned());
        Ok(())
    }

    pub fn commit_db_transaction(&mut self) -> Result<()> {
        match mem::replace(&mut self.transaction, TransactionState::Idle) {
            TransactionState::Idle => {
                log::warn!("Commit without an active transaction");
                Ok(())
            }
            TransactionState::Pending(..) => {
                log::debug!("Commit of a transaction that never started");
                Ok(())
            }
            TransactionState::Open { .. } => {
                log::debug!("Commit transaction");
                self.native
                    .commit()
                    .map_err(Error::new)
                    .context("While committing the transaction")
                    .inspect_err(|e| log::error!("{:#}", e))
            }
        }
    }

    pub fn rollback_db_transaction(&mut self) -> Result<()> {
        match mem::replace(&mut self.transaction, TransactionState::Idle) {
            TransactionState::Idle => {
                log::warn!("Rollback without an active transaction");
                Ok(())
            }
            TransactionState::Pending(..) => {
                log::debug!("Rollback of a transaction that never started");
                Ok(())
            }
            TransactionState::Open { .. } => {
                log::debug!("Rollback transaction");
                self.native
                    .rollback()
                    .map_err(Error::new)
                    .context("While rolling back the transaction")
                    .inspect_err(|e| log::error!("{:#}", e))
            }
        }
    }

    /// Start a transaction with the given isolation level.
    pub async fn begin_isolated(&mut self, isolation: IsolationLevel) -> Result<RdbTransaction<'_>> {
        RdbTransaction::new(self, isolation).await
    }

    pub async fn create_savepoint(&mut self, name: &str) -> Result<()> {
        let mut sql = String::new();
        self.writer.write_savepoint(&mut sql, name);
        self.submit(&sql, &[]).map(|_| ())
    }

    pub async fn rollback_to_savepoint(&mut self, name: &str) -> Result<()> {
        let mut sql = String::new();
        self.writer.write_rollback_to_savepoint(&mut sql, name);
        self.submit(&sql, &[]).map(|_| ())
    }

    pub async fn release_savepoint(&mut self, name: &str) -> Result<()> {
        let mut sql = String::new();
        self.writer.write_release_savepoint(&mut sql, name);
        self.submit(&sql, &[]).map(|_| ())
    }
}

fn label(name: String, downcase: bool) -> String {
    let name = name.trim_end();
    if downcase {
        dialect_to_canonical(name).into_owned()
    } else {
        name.to_string()
    }
}

fn statement_error(error: NativeError, sql: &str, binds: &[Value]) -> Error {
    Error::new(RdbError::from_statement(StatementContext {
        message: error.message,
        sql: sql.to_string(),
        binds: binds.to_vec(),
    }))
    .context("While executing the statement")
}

impl Executor for RdbConnection {
    type Driver = RdbDriver;

    fn driver(&self) -> &RdbDriver {
        &self.driver
    }

    async fn prepare(&mut self, query: String) -> Result<Query<RdbDriver>> {
        Ok(Query::Prepared(RdbPrepared::new(query)))
    }

    fn run(&mut self, query: Query<RdbDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        try_stream! {
            let (sql, binds) = match query {
                Query::Raw(sql) => (sql, Vec::new()),
                Query::Prepared(prepared) => {
                    let binds = prepared.binds()?;
                    (prepared.sql, binds)
                }
            };
            for result in self.submit(&sql, &binds)? {
                yield result;
            }
        }
    }
}

impl Connection for RdbConnection {
    async fn connect(driver: &RdbDriver, url: Cow<'static, str>) -> Result<RdbConnection> {
        driver.connect(&url).await
    }

    async fn begin(&mut self) -> Result<RdbTransaction<'_>> {
        RdbTransaction::new(self, IsolationLevel::default()).await
    }
}
