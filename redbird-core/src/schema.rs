use crate::{SqlLiteral, Value};

/// Abstract column kind, independent of any dialect spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Auto-incrementing primary key.
    PrimaryKey,
    String,
    Text,
    Integer,
    Bigint,
    Float,
    Decimal,
    Datetime,
    Timestamp,
    Time,
    Date,
    Interval,
    Binary,
    Boolean,
}

impl ColumnKind {
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnKind::String | ColumnKind::Text)
    }
}

/// Column type with its size parameters and the dialect extensions (sub-type and
/// domain) that have to survive a round trip through catalog introspection.
///
/// Equality and hashing cover every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnTypeDescriptor {
    pub kind: ColumnKind,
    pub limit: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub sub_type: Option<i16>,
    pub domain: Option<String>,
}

impl ColumnTypeDescriptor {
    pub const fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            limit: None,
            precision: None,
            scale: None,
            sub_type: None,
            domain: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn sub_type(mut self, sub_type: i16) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl From<ColumnKind> for ColumnTypeDescriptor {
    fn from(value: ColumnKind) -> Self {
        ColumnTypeDescriptor::new(value)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

#[derive(Debug, Clone, PartialEq)]
pub struct References {
    pub table: String,
    pub column: String,
    pub on_delete: Option<Action>,
    pub on_update: Option<Action>,
}

impl References {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        }
    }
}

/// Definition of a column, as declared by a migration or read back from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnTypeDescriptor,
    pub nullable: bool,
    pub default: Option<Value>,
    pub primary_key: bool,
    pub unique: bool,
    pub references: Option<References>,
    /// Position among the columns, counted from 0.
    pub position: Option<u32>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnTypeDescriptor>) -> Self {
        let column_type = column_type.into();
        Self {
            name: name.into(),
            primary_key: column_type.kind == ColumnKind::PrimaryKey,
            column_type,
            nullable: true,
            default: None,
            unique: false,
            references: None,
            position: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, references: References) -> Self {
        self.references = Some(references);
        self
    }

    pub fn position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether the column is backed by a generated sequence.
    pub fn auto_increment(&self) -> bool {
        self.column_type.kind == ColumnKind::PrimaryKey
    }
}

/// Definition of a table for `CREATE TABLE`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Composite primary key, single column keys are declared on the column.
    pub primary_key: Vec<String>,
    pub unique: Vec<Vec<String>>,
    pub temporary: bool,
    pub as_select: Option<SqlLiteral>,
    /// Drop the table first if it exists.
    pub force: bool,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Table with the conventional auto-incrementing `id` column.
    pub fn with_id(name: impl Into<String>) -> Self {
        Self::new(name).column(ColumnDef::new("id", ColumnKind::PrimaryKey))
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// The auto-incrementing key column, if any.
    pub fn auto_increment_column(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.auto_increment())
    }
}

/// An index, as requested by a migration or listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDef {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}
