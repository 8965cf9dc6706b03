use crate::{
    AsValue, BinaryOpType, ColumnRef, ColumnTypeDescriptor, Order, Ordered, SelectStatement,
    SqlLiteral, UnaryOpType, Value,
};

/// A node of the abstract expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Column(ColumnRef),
    /// A value, bound as a parameter or inlined depending on the rendering mode.
    Value(Value),
    /// A value the driver cannot bind, IN lists drop it and elsewhere it renders as NULL.
    Unboundable(Value),
    Literal(SqlLiteral),
    Asterisk,
    Null,
    Unary {
        op: UnaryOpType,
        arg: Box<Expression>,
    },
    Binary {
        op: BinaryOpType,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    In {
        lhs: Box<Expression>,
        rhs: InList,
        negated: bool,
    },
    Function {
        name: String,
        args: Vec<Expression>,
        distinct: bool,
    },
    Cast {
        expression: Box<Expression>,
        column_type: ColumnTypeDescriptor,
    },
    Grouping(Box<Expression>),
    Subquery(Box<SelectStatement>),
    Alias {
        expression: Box<Expression>,
        alias: String,
    },
}

/// Right hand side of `IN` / `NOT IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    Values(Vec<Expression>),
    Subquery(Box<SelectStatement>),
}

impl Expression {
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name))
    }

    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name).with_table(table))
    }

    pub fn value(value: impl AsValue) -> Self {
        Expression::Value(value.as_value())
    }

    pub fn unboundable(value: impl AsValue) -> Self {
        Expression::Unboundable(value.as_value())
    }

    pub fn literal(sql: impl Into<SqlLiteral>) -> Self {
        Expression::Literal(sql.into())
    }

    pub fn function(name: impl Into<String>, args: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args: args.into_iter().collect(),
            distinct: false,
        }
    }

    pub fn count_all() -> Self {
        Expression::function("COUNT", [Expression::Asterisk])
    }

    pub fn subquery(select: SelectStatement) -> Self {
        Expression::Subquery(select.into())
    }

    pub fn binary(self, op: BinaryOpType, rhs: impl Into<Expression>) -> Self {
        Expression::Binary {
            op,
            lhs: self.into(),
            rhs: Box::new(rhs.into()),
        }
    }

    pub fn equal(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::Equal, rhs)
    }

    pub fn not_equal(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::NotEqual, rhs)
    }

    pub fn less(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::Less, rhs)
    }

    pub fn less_equal(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::LessEqual, rhs)
    }

    pub fn greater(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::Greater, rhs)
    }

    pub fn greater_equal(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::GreaterEqual, rhs)
    }

    pub fn like(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::Like, rhs)
    }

    pub fn and(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::And, rhs)
    }

    pub fn or(self, rhs: impl Into<Expression>) -> Self {
        self.binary(BinaryOpType::Or, rhs)
    }

    pub fn is_null(self) -> Self {
        self.binary(BinaryOpType::Is, Expression::Null)
    }

    pub fn is_not_null(self) -> Self {
        self.binary(BinaryOpType::IsNot, Expression::Null)
    }

    pub fn not(self) -> Self {
        Expression::Unary {
            op: UnaryOpType::Not,
            arg: self.into(),
        }
    }

    pub fn in_list<T: Into<Expression>>(self, values: impl IntoIterator<Item = T>) -> Self {
        Expression::In {
            lhs: self.into(),
            rhs: InList::Values(values.into_iter().map(Into::into).collect()),
            negated: false,
        }
    }

    pub fn not_in_list<T: Into<Expression>>(self, values: impl IntoIterator<Item = T>) -> Self {
        Expression::In {
            lhs: self.into(),
            rhs: InList::Values(values.into_iter().map(Into::into).collect()),
            negated: true,
        }
    }

    pub fn in_subquery(self, select: SelectStatement) -> Self {
        Expression::In {
            lhs: self.into(),
            rhs: InList::Subquery(select.into()),
            negated: false,
        }
    }

    pub fn not_in_subquery(self, select: SelectStatement) -> Self {
        Expression::In {
            lhs: self.into(),
            rhs: InList::Subquery(select.into()),
            negated: true,
        }
    }

    pub fn cast(self, column_type: ColumnTypeDescriptor) -> Self {
        Expression::Cast {
            expression: self.into(),
            column_type,
        }
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expression::Alias {
            expression: self.into(),
            alias: alias.into(),
        }
    }

    pub fn grouped(self) -> Self {
        Expression::Grouping(self.into())
    }

    pub fn asc(self) -> Ordered {
        Ordered {
            order: Order::ASC,
            expression: self,
        }
    }

    pub fn desc(self) -> Ordered {
        Ordered {
            order: Order::DESC,
            expression: self,
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Value(value)
    }
}

impl<T: AsValue> From<T> for Expression {
    fn from(value: T) -> Self {
        Expression::Value(value.as_value())
    }
}

impl From<ColumnRef> for Expression {
    fn from(value: ColumnRef) -> Self {
        Expression::Column(value)
    }
}

impl From<SqlLiteral> for Expression {
    fn from(value: SqlLiteral) -> Self {
        Expression::Literal(value)
    }
}

impl From<SelectStatement> for Expression {
    fn from(value: SelectStatement) -> Self {
        Expression::Subquery(value.into())
    }
}
