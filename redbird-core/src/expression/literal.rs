use std::fmt::{self, Display, Formatter};

/// SQL text that the writer emits verbatim.
///
/// Identifiers inside a literal are not quoted again. Dialects that need to escape
/// reserved words do it once, when constructing the literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SqlLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SqlLiteral {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for SqlLiteral {
    fn from(value: String) -> Self {
        Self(value)
    }
}
