use crate::RewriteStep;
use redbird_core::{Value, truncate_long};
use std::fmt::{self, Display};
use thiserror::Error;

/// Kind of a failed statement, derived from the native error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    ForeignKeyViolation,
    UniquenessViolation,
    SystemTableViolation,
    TransientStatementError,
    Unclassified,
}

/// Native message fragments, first match wins.
const CLASSIFICATIONS: &[(&str, ErrorClassification)] = &[
    (
        "violation of FOREIGN KEY constraint",
        ErrorClassification::ForeignKeyViolation,
    ),
    (
        "violation of PRIMARY or UNIQUE KEY constraint",
        ErrorClassification::UniquenessViolation,
    ),
    (
        "attempt to store duplicate value",
        ErrorClassification::UniquenessViolation,
    ),
    (
        "This operation is not defined for system tables",
        ErrorClassification::SystemTableViolation,
    ),
    (
        "Column does not belong to referenced table",
        ErrorClassification::TransientStatementError,
    ),
    (
        "does not preclude successful execution of subsequent statements",
        ErrorClassification::TransientStatementError,
    ),
    (
        "not positioned on a row",
        ErrorClassification::TransientStatementError,
    ),
    (
        "Overflow occurred during data type conversion",
        ErrorClassification::TransientStatementError,
    ),
];

pub fn translate(message: &str) -> ErrorClassification {
    CLASSIFICATIONS
        .iter()
        .find(|(fragment, _)| message.contains(fragment))
        .map(|(_, classification)| *classification)
        .unwrap_or(ErrorClassification::Unclassified)
}

/// The statement that failed, as sent to the server.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct StatementContext {
    pub message: String,
    pub sql: String,
    pub binds: Vec<Value>,
}

impl Display for StatementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nSQL: {}", self.message, truncate_long!(self.sql))?;
        if !self.binds.is_empty() {
            write!(f, "\nBinds: {:?}", self.binds)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RdbError {
    #[error("{0}")]
    Configuration(String),
    #[error("Could not establish the connection: {0}")]
    Connection(String),
    #[error("The database does not exist: {0}")]
    NoDatabase(String),
    #[error("{0}")]
    ForeignKeyViolation(StatementContext),
    #[error("{0}")]
    UniquenessViolation(StatementContext),
    #[error("{0}")]
    SystemTableViolation(StatementContext),
    #[error("{0}")]
    TransientStatement(StatementContext),
    #[error("{0}")]
    UnclassifiedStatement(StatementContext),
    #[error("Duplicate migration {0}. Please renumber your migrations to resolve the conflict.")]
    DuplicateMigrationVersion(i64),
    #[error("{0}")]
    TypeMappingConfiguration(String),
    #[error("{0}")]
    UnsupportedSyntax(String),
    #[error("Changing column `{column}` of `{table}` stopped after {step:?}: {cause}")]
    ColumnRewrite {
        table: String,
        column: String,
        step: RewriteStep,
        cause: String,
    },
}

impl RdbError {
    /// Wrap a failed statement into the variant its message classifies as.
    pub fn from_statement(context: StatementContext) -> Self {
        match translate(&context.message) {
            ErrorClassification::ForeignKeyViolation => RdbError::ForeignKeyViolation(context),
            ErrorClassification::UniquenessViolation => RdbError::UniquenessViolation(context),
            ErrorClassification::SystemTableViolation => RdbError::SystemTableViolation(context),
            ErrorClassification::TransientStatementError => RdbError::TransientStatement(context),
            ErrorClassification::Unclassified => RdbError::UnclassifiedStatement(context),
        }
    }

    pub fn statement(&self) -> Option<&StatementContext> {
        match self {
            RdbError::ForeignKeyViolation(v)
            | RdbError::UniquenessViolation(v)
            | RdbError::SystemTableViolation(v)
            | RdbError::TransientStatement(v)
            | RdbError::UnclassifiedStatement(v) => Some(v),
            _ => None,
        }
    }

    pub fn classification(&self) -> Option<ErrorClassification> {
        self.statement().map(|v| translate(&v.message))
    }
}
