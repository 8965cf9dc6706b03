//! Seam to the native client library.
//!
//! The adapter never talks to the wire itself: a [`NativeClient`] opens connections, each
//! [`NativeConnection`] runs statements and answers the catalog queries. Calls are
//! synchronous, one statement at a time.

use crate::ConnectionConfig;
use redbird_core::{Row, Value};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
    /// Server error code, when the client reports one.
    pub code: Option<i32>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

pub type NativeResult<T> = std::result::Result<T, NativeError>;

pub trait NativeClient: Send + Sync {
    fn connect(&self, config: &ConnectionConfig) -> NativeResult<Box<dyn NativeConnection>>;
    /// Create the database described by `config` and return a connection to it.
    fn create_database(
        &self,
        config: &ConnectionConfig,
    ) -> NativeResult<Box<dyn NativeConnection>>;
}

/// Outcome of [`NativeConnection::execute`].
pub enum Execution {
    Cursor(Box<dyn NativeCursor>),
    Affected(u64),
}

/// An index as listed by the catalog, names as stored (upper case, blank padded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeIndex {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// A column as listed by the catalog.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct NativeField {
    pub name: String,
    /// Base type name: `varchar`, `integer`, `numeric`, `blob`, ...
    pub sql_type: String,
    pub sql_subtype: Option<i16>,
    pub length: Option<u32>,
    pub precision: Option<u8>,
    /// Stored negative, as the server does.
    pub scale: Option<i16>,
    pub nullable: bool,
    /// Default clause source, e.g. `DEFAULT 'abc'`.
    pub default: Option<String>,
    pub domain: Option<String>,
}

pub trait NativeConnection: Send {
    /// Run a read statement and materialize its rows.
    fn query(&mut self, sql: &str) -> NativeResult<Vec<Row>>;
    fn execute(&mut self, sql: &str, binds: &[Value]) -> NativeResult<Execution>;
    /// Start a transaction with the given options, e.g. `READ COMMITTED`.
    fn transaction(&mut self, options: &str) -> NativeResult<()>;
    fn commit(&mut self) -> NativeResult<()>;
    fn rollback(&mut self) -> NativeResult<()>;
    fn close(&mut self) -> NativeResult<()>;
    fn is_open(&self) -> bool;
    fn encoding(&self) -> String;
    fn table_names(&mut self) -> NativeResult<Vec<String>>;
    fn view_names(&mut self) -> NativeResult<Vec<String>>;
    fn indexes(&mut self) -> NativeResult<Vec<NativeIndex>>;
    fn trigger_names(&mut self) -> NativeResult<Vec<String>>;
    fn generator_names(&mut self) -> NativeResult<Vec<String>>;
    fn columns(&mut self, table: &str) -> NativeResult<Vec<NativeField>>;
}

pub trait NativeCursor: Send {
    fn fields(&self) -> Vec<String>;
    fn fetch_all(&mut self) -> NativeResult<Vec<Row>>;
    fn close(&mut self) -> NativeResult<()>;
}

/// Closes the wrapped cursor when dropped, whatever path the caller took.
pub struct CursorGuard(Box<dyn NativeCursor>);

impl CursorGuard {
    pub fn new(cursor: Box<dyn NativeCursor>) -> Self {
        Self(cursor)
    }

    pub fn fields(&self) -> Vec<String> {
        self.0.fields()
    }

    pub fn fetch_all(&mut self) -> NativeResult<Vec<Row>> {
        self.0.fetch_all()
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.close() {
            log::warn!("Could not close the cursor: {}", e);
        }
    }
}
