use crate::{Connection, Prepared, SqlWriter, Transaction};

/// Entry point of a database backend, ties together its connection, writer and
/// prepared statement types.
pub trait Driver: Send + Sync {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;
    type Transaction<'c>: Transaction<'c>;

    /// Scheme of the connection URLs accepted by this driver.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
