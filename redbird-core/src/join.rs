use crate::{Expression, SelectStatement, SqlLiteral, TableRef};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Default,
    Inner,
    Outer,
    Left,
    Right,
    Cross,
    Natural,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join: JoinType,
    pub lhs: JoinSource,
    pub rhs: JoinSource,
    pub on: Option<Expression>,
}

/// The `FROM` part of a select core.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinSource {
    Table(TableRef),
    Join(Box<Join>),
    Subquery {
        select: Box<SelectStatement>,
        alias: String,
    },
    Literal(SqlLiteral),
}

impl JoinSource {
    pub fn join(self, join: JoinType, rhs: impl Into<JoinSource>, on: Option<Expression>) -> Self {
        JoinSource::Join(
            Join {
                join,
                lhs: self,
                rhs: rhs.into(),
                on,
            }
            .into(),
        )
    }

    /// Columns are qualified with their table whenever more than one table is in scope.
    pub fn qualified_columns(&self) -> bool {
        matches!(self, JoinSource::Join(..))
    }
}

impl From<TableRef> for JoinSource {
    fn from(value: TableRef) -> Self {
        JoinSource::Table(value)
    }
}

impl From<&str> for JoinSource {
    fn from(value: &str) -> Self {
        JoinSource::Table(value.into())
    }
}

impl From<String> for JoinSource {
    fn from(value: String) -> Self {
        JoinSource::Table(value.into())
    }
}

impl From<SqlLiteral> for JoinSource {
    fn from(value: SqlLiteral) -> Self {
        JoinSource::Literal(value)
    }
}
