/// Reference to a table, optionally qualified by schema and aliased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub name: String,
    pub schema: String,
    pub alias: String,
}

impl TableRef {
    /// Accepts `table` or `schema.table`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.split_once('.') {
            Some((schema, table)) => Self {
                name: table.into(),
                schema: schema.into(),
                alias: String::new(),
            },
            None => Self {
                name,
                ..Default::default()
            },
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.alias.is_empty() {
            result.push_str(&self.alias);
        } else {
            if !self.schema.is_empty() {
                result.push_str(&self.schema);
                result.push('.');
            }
            result.push_str(&self.name);
        }
        result
    }
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        TableRef::new(value)
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        TableRef::new(value)
    }
}

/// Reference to a column, qualified when rendered inside joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub name: String,
    pub table: String,
    pub schema: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}
