use crate::{ConnectionConfig, quoting::MAX_IDENTIFIER_LENGTH};

/// Longest `IN` list the server accepts in one clause.
pub const DEFAULT_IN_CLAUSE_LENGTH: usize = 1499;
/// Longest statement text, in bytes.
pub const SQL_QUERY_LENGTH: usize = 32767;
pub const INDEXES_PER_TABLE: usize = 65535;

/// What the dialect supports, as reported to the callers of the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdbCapabilities {
    pub multi_row_insert: bool,
    pub ddl_transactions: bool,
    pub datetime_precision: bool,
    pub savepoints: bool,
    pub transaction_isolation: bool,
    pub lazy_transactions: bool,
    pub in_clause_length: Option<usize>,
    pub sql_query_length: usize,
    pub identifier_length: usize,
    pub indexes_per_table: usize,
}

impl Default for RdbCapabilities {
    fn default() -> Self {
        Self {
            multi_row_insert: false,
            ddl_transactions: false,
            datetime_precision: false,
            savepoints: true,
            transaction_isolation: true,
            lazy_transactions: true,
            in_clause_length: Some(DEFAULT_IN_CLAUSE_LENGTH),
            sql_query_length: SQL_QUERY_LENGTH,
            identifier_length: MAX_IDENTIFIER_LENGTH,
            indexes_per_table: INDEXES_PER_TABLE,
        }
    }
}

impl RdbCapabilities {
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            ddl_transactions: config.ddl_transactions,
            in_clause_length: config.dialect.in_clause_length,
            ..Default::default()
        }
    }
}
