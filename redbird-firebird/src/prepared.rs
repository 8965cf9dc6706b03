use redbird_core::{AsValue, Error, Prepared, Result, Value, truncate_long};
use std::fmt::{self, Display};

/// Statement text with its positional parameters.
///
/// The native client prepares on execution, so this only collects the values until the
/// statement is run.
#[derive(Debug, Clone, PartialEq)]
pub struct RdbPrepared {
    pub(crate) sql: String,
    pub(crate) params: Vec<Option<Value>>,
    pub(crate) index: u64,
}

impl RdbPrepared {
    pub fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
            index: 0,
        }
    }

    /// Statement already carrying the values rendered by the writer.
    pub fn with_binds(sql: String, binds: Vec<Value>) -> Self {
        let index = binds.len() as u64;
        Self {
            sql,
            params: binds.into_iter().map(Some).collect(),
            index,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound values in placeholder order, every placeholder up to the last bound one
    /// must be set.
    pub fn binds(&self) -> Result<Vec<Value>> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.clone().ok_or_else(|| {
                    Error::msg(format!("The parameter {} was not set", i))
                        .context(format!("While binding the query `{}`", truncate_long!(self.sql)))
                })
            })
            .collect()
    }
}

impl Prepared for RdbPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.clear();
        self.index = 0;
        Ok(self)
    }

    fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self> {
        let index = self.index;
        self.index += 1;
        self.bind_index(value, index)
    }

    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self> {
        let index = usize::try_from(index)
            .map_err(|_| Error::msg(format!("The parameter index {} is out of range", index)))?;
        if self.params.len() <= index {
            self.params.resize(index + 1, None);
        }
        self.params[index] = Some(value.as_value());
        Ok(self)
    }
}

impl Display for RdbPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
