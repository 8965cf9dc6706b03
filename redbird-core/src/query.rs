use crate::{AsValue, Driver, Error, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    ops::AddAssign,
    sync::Arc,
};

/// Statement handed to [`Executor::run`](crate::Executor::run).
///
/// `Raw` text runs without parameters. `Prepared` carries the positional `?` values, bound
/// either by the writer while rendering or later through [`Query::bind`].
#[derive(Debug)]
pub enum Query<D: Driver> {
    Raw(String),
    Prepared(D::Prepared),
}

impl<D: Driver> Query<D> {
    pub fn is_prepared(&self) -> bool {
        matches!(self, Query::Prepared(..))
    }

    fn parameters(&mut self, action: &str) -> Result<&mut D::Prepared> {
        match self {
            Query::Prepared(prepared) => Ok(prepared),
            Query::Raw(sql) => Err(Error::msg(format!(
                "Cannot {} the raw query `{}`, prepare it first",
                action,
                truncate_long!(sql)
            ))),
        }
    }

    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.parameters("clear the bindings of")?.clear_bindings()?;
        Ok(self)
    }

    /// Bind the next placeholder.
    pub fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        self.parameters("bind")?.bind(value)?;
        Ok(self)
    }

    /// Bind the placeholder at `index`, counting from 0.
    pub fn bind_index(&mut self, value: impl AsValue, index: u64) -> Result<&mut Self> {
        self.parameters("bind")?.bind_index(value, index)?;
        Ok(self)
    }
}

impl<D: Driver> From<&str> for Query<D> {
    fn from(value: &str) -> Self {
        Query::Raw(value.into())
    }
}

impl<D: Driver> From<String> for Query<D> {
    fn from(value: String) -> Self {
        Query::Raw(value)
    }
}

impl<D: Driver> Display for Query<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(sql) => write!(f, "{}", truncate_long!(sql)),
            Query::Prepared(prepared) => prepared.fmt(f),
        }
    }
}

/// Count reported by the server for a data modifying statement.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
}

impl AddAssign for RowsAffected {
    fn add_assign(&mut self, rhs: Self) {
        self.rows_affected += rhs.rows_affected;
    }
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for v in iter {
            *self += v;
        }
    }
}

/// Sums the counts, rows are skipped.
impl FromIterator<QueryResult> for RowsAffected {
    fn from_iter<T: IntoIterator<Item = QueryResult>>(iter: T) -> Self {
        let mut total = RowsAffected::default();
        for v in iter {
            if let QueryResult::Affected(v) = v {
                total += v;
            }
        }
        total
    }
}

/// Column labels shared by every row of a cursor.
pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

/// Row fetched from a cursor.
///
/// Labels come out of the cursor already trimmed of their blank padding, downcased unless
/// the connection keeps the server's case.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of the column `name`, compared ignoring ASCII case so that lookups work with
    /// either label case.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }
}

/// Item of [`Executor::run`](crate::Executor::run): a row of a cursor or the count of a
/// modifying statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
