use crate::{Expression, JoinSource, Ordered, SqlLiteral, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Quantifier {
    All,
    Distinct,
    DistinctOn(Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lock {
    Update,
    Share,
    Custom(SqlLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedWindow {
    pub name: String,
    pub partitions: Vec<Expression>,
    pub orders: Vec<Ordered>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonTable {
    pub name: String,
    pub select: SelectStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub recursive: bool,
    pub tables: Vec<CommonTable>,
}

/// One `SELECT ... FROM ... WHERE ...` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectCore {
    pub hints: Vec<String>,
    pub quantifier: Option<Quantifier>,
    pub projections: Vec<Expression>,
    pub source: Option<JoinSource>,
    pub wheres: Vec<Expression>,
    pub groups: Vec<Expression>,
    pub havings: Vec<Expression>,
    pub windows: Vec<NamedWindow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub with: Option<With>,
    pub cores: Vec<SelectCore>,
    pub orders: Vec<Ordered>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub lock: Option<Lock>,
}

impl Default for SelectStatement {
    fn default() -> Self {
        Self {
            with: None,
            cores: vec![SelectCore::default()],
            orders: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
        }
    }
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    fn core(&mut self) -> &mut SelectCore {
        if self.cores.is_empty() {
            self.cores.push(SelectCore::default());
        }
        let last = self.cores.len() - 1;
        &mut self.cores[last]
    }

    pub fn from(mut self, source: impl Into<JoinSource>) -> Self {
        self.core().source = Some(source.into());
        self
    }

    pub fn project<T: Into<Expression>>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.core()
            .projections
            .extend(items.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, condition: impl Into<Expression>) -> Self {
        self.core().wheres.push(condition.into());
        self
    }

    pub fn group_by<T: Into<Expression>>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.core().groups.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn having(mut self, condition: impl Into<Expression>) -> Self {
        self.core().havings.push(condition.into());
        self
    }

    pub fn window(mut self, window: NamedWindow) -> Self {
        self.core().windows.push(window);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.core().hints.push(hint.into());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.core().quantifier = Some(Quantifier::Distinct);
        self
    }

    pub fn quantifier(mut self, quantifier: Quantifier) -> Self {
        self.core().quantifier = Some(quantifier);
        self
    }

    pub fn order_by(mut self, ordered: Ordered) -> Self {
        self.orders.push(ordered);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn with(mut self, with: With) -> Self {
        self.with = Some(with);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<Expression>>),
    Select(Box<SelectStatement>),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub relation: TableRef,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

impl InsertStatement {
    pub fn new(relation: impl Into<TableRef>) -> Self {
        Self {
            relation: relation.into(),
            columns: Vec::new(),
            source: InsertSource::DefaultValues,
        }
    }

    pub fn columns<T: Into<String>>(mut self, columns: impl IntoIterator<Item = T>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one row of values.
    pub fn values<T: Into<Expression>>(mut self, row: impl IntoIterator<Item = T>) -> Self {
        let row = row.into_iter().map(Into::into).collect();
        match &mut self.source {
            InsertSource::Values(rows) => rows.push(row),
            _ => self.source = InsertSource::Values(vec![row]),
        }
        self
    }

    pub fn select(mut self, select: SelectStatement) -> Self {
        self.source = InsertSource::Select(select.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub relation: TableRef,
    pub assignments: Vec<(String, Expression)>,
    pub wheres: Vec<Expression>,
}

impl UpdateStatement {
    pub fn new(relation: impl Into<TableRef>) -> Self {
        Self {
            relation: relation.into(),
            assignments: Vec::new(),
            wheres: Vec::new(),
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expression>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, condition: impl Into<Expression>) -> Self {
        self.wheres.push(condition.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub relation: TableRef,
    pub wheres: Vec<Expression>,
}

impl DeleteStatement {
    pub fn new(relation: impl Into<TableRef>) -> Self {
        Self {
            relation: relation.into(),
            wheres: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: impl Into<Expression>) -> Self {
        self.wheres.push(condition.into());
        self
    }
}

/// Root of the abstract query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Union {
        left: Box<Statement>,
        right: Box<Statement>,
        all: bool,
    },
}

impl Statement {
    pub fn union(left: impl Into<Statement>, right: impl Into<Statement>) -> Self {
        Statement::Union {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            all: false,
        }
    }

    pub fn union_all(left: impl Into<Statement>, right: impl Into<Statement>) -> Self {
        Statement::Union {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            all: true,
        }
    }
}

impl From<SelectStatement> for Statement {
    fn from(value: SelectStatement) -> Self {
        Statement::Select(value)
    }
}

impl From<InsertStatement> for Statement {
    fn from(value: InsertStatement) -> Self {
        Statement::Insert(value)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(value: UpdateStatement) -> Self {
        Statement::Update(value)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(value: DeleteStatement) -> Self {
        Statement::Delete(value)
    }
}
