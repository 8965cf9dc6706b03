use crate::{
    Action, BinaryOpType, ColumnDef, ColumnKind, ColumnRef, ColumnTypeDescriptor,
    DeleteStatement, Error, Expression, Fragment, IndexDef, InList, InsertSource,
    InsertStatement, Join, JoinSource, JoinType, Lock, NamedWindow, Order, Ordered, Quantifier,
    Result, SelectCore, SelectStatement, Statement, TableDef, TableRef, UnaryOpType,
    UpdateStatement, Value, With, possibly_parenthesized, separated_by, try_separated_by,
    writer::Context,
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        } else {
            log::error!("Cannot write the non finite float {}, using NULL", $value);
            $this.write_value_none($context, $out);
        }
    }};
}

/// Precedence of atoms (columns, values, calls), never parenthesized.
pub const ATOM_PRECEDENCE: i32 = 1_000_000;

/// Dialect printer converting the abstract query tree and schema definitions into SQL.
///
/// Every method has a generic implementation, a dialect overrides only what it spells
/// differently. Query methods append to `out` and, in parameterized mode, push the bound
/// values into the context in placeholder order.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Whether the current fragment context allows alias declaration.
    fn alias_declaration(&self, context: &mut Context) -> bool {
        match context.fragment {
            Fragment::SqlSelectFrom | Fragment::SqlJoin => true,
            _ => false,
        }
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render a bare column name.
    fn write_column_name(&self, context: &mut Context, out: &mut String, name: &str) {
        self.write_identifier_quoted(context, out, name);
    }

    /// Render a table reference with optional alias.
    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        if self.alias_declaration(context) || value.alias.is_empty() {
            if !value.schema.is_empty() {
                self.write_identifier_quoted(context, out, &value.schema);
                out.push('.');
            }
            self.write_identifier_quoted(context, out, &value.name);
        }
        if !value.alias.is_empty() {
            if self.alias_declaration(context) {
                out.push(' ');
            }
            out.push_str(&value.alias);
        }
    }

    /// Render a column reference optionally qualifying with schema/table.
    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) {
        if context.qualify_columns && !value.table.is_empty() {
            if !value.schema.is_empty() {
                self.write_identifier_quoted(context, out, &value.schema);
                out.push('.');
            }
            self.write_identifier_quoted(context, out, &value.table);
            out.push('.');
        }
        self.write_column_name(context, out, &value.name);
    }

    /// Render the SQL type of a column.
    fn write_column_type(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &ColumnTypeDescriptor,
    ) -> Result<()> {
        match value.kind {
            ColumnKind::PrimaryKey => out.push_str("BIGINT NOT NULL PRIMARY KEY"),
            ColumnKind::String => {
                let _ = write!(out, "VARCHAR({})", value.limit.unwrap_or(255));
            }
            ColumnKind::Text => out.push_str("TEXT"),
            ColumnKind::Integer => out.push_str("INTEGER"),
            ColumnKind::Bigint => out.push_str("BIGINT"),
            ColumnKind::Float => out.push_str("FLOAT"),
            ColumnKind::Decimal => {
                out.push_str("DECIMAL");
                match (value.precision, value.scale) {
                    (Some(precision), Some(scale)) => {
                        let _ = write!(out, "({},{})", precision, scale);
                    }
                    (Some(precision), None) => {
                        let _ = write!(out, "({})", precision);
                    }
                    (None, Some(..)) => {
                        return Err(Error::msg(
                            "Decimal column precision cannot be empty if scale is specified",
                        ));
                    }
                    (None, None) => {}
                }
            }
            ColumnKind::Datetime | ColumnKind::Timestamp => out.push_str("TIMESTAMP"),
            ColumnKind::Time => out.push_str("TIME"),
            ColumnKind::Date => out.push_str("DATE"),
            ColumnKind::Interval => out.push_str("INTERVAL"),
            ColumnKind::Binary => out.push_str("BLOB"),
            ColumnKind::Boolean => out.push_str("BOOLEAN"),
        };
        Ok(())
    }

    /// Render a concrete value inline (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v), ..) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v),
            Value::Time(Some(v)) => self.write_value_time(context, out, v),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => self.write_value_timestamptz(context, out, v),
            _ => {
                log::error!("Cannot write {:?}", value);
            }
        };
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal in hexadecimal notation.
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    /// Render a DATE literal.
    fn write_value_date(&self, _context: &mut Context, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02}'",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal.
    fn write_value_time(&self, _context: &mut Context, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "'{:02}:{:02}:{:02}.{:04}'",
            value.hour(),
            value.minute(),
            value.second(),
            value.microsecond() / 100
        );
    }

    /// Render a TIMESTAMP literal.
    fn write_value_timestamp(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:04}'",
            value.year(),
            value.month() as u8,
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
            value.microsecond() / 100
        );
    }

    /// Render a TIMESTAMP WITH TIME ZONE value, converted to UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_offset(UtcOffset::UTC);
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    /// Render a value either as a bound placeholder or inline.
    fn write_bind(&self, context: &mut Context, out: &mut String, value: &Value) {
        if context.parameterized {
            context.binds.push(value.clone());
            self.write_expression_placeholder(context, out);
        } else {
            self.write_value(context, out, value);
        }
    }

    /// Render parameter placeholder.
    fn write_expression_placeholder(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    /// Precedence table for unary operators.
    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    /// Precedence table for binary operators.
    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::Containing => 400,
            BinaryOpType::StartingWith => 400,
            BinaryOpType::Subtraction => 800,
            BinaryOpType::Addition => 800,
            BinaryOpType::Concatenation => 800,
            BinaryOpType::Multiplication => 900,
            BinaryOpType::Division => 900,
        }
    }

    /// Precedence of any expression node.
    fn expression_precedence(&self, value: &Expression) -> i32 {
        match value {
            Expression::Unary { op, .. } => self.expression_unary_op_precedence(op),
            Expression::Binary { op, .. } => self.expression_binary_op_precedence(op),
            Expression::In { .. } => 300,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// Render any expression node.
    fn write_expression(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
    ) -> Result<()> {
        match value {
            Expression::Column(v) => self.write_column_ref(context, out, v),
            Expression::Value(v) => self.write_bind(context, out, v),
            Expression::Unboundable(..) | Expression::Null => self.write_value_none(context, out),
            Expression::Literal(v) => out.push_str(v.as_str()),
            Expression::Asterisk => out.push('*'),
            Expression::Unary { op, arg } => {
                return self.write_expression_unary_op(context, out, *op, arg);
            }
            Expression::Binary { op, lhs, rhs } => {
                return self.write_expression_binary_op(context, out, *op, lhs, rhs);
            }
            Expression::In { lhs, rhs, negated } => {
                return self.write_expression_in(context, out, lhs, rhs, *negated);
            }
            Expression::Function {
                name,
                args,
                distinct,
            } => return self.write_expression_function(context, out, name, args, *distinct),
            Expression::Cast {
                expression,
                column_type,
            } => {
                out.push_str("CAST(");
                self.write_expression(context, out, expression)?;
                out.push_str(" AS ");
                self.write_column_type(&mut context.switch_fragment(Fragment::Casting), out, column_type)?;
                out.push(')');
            }
            Expression::Grouping(v) => {
                out.push('(');
                self.write_expression(context, out, v)?;
                out.push(')');
            }
            Expression::Subquery(v) => {
                out.push('(');
                self.write_select(context, out, v)?;
                out.push(')');
            }
            Expression::Alias { expression, alias } => {
                self.write_expression(context, out, expression)?;
                if context.fragment != Fragment::SqlSelectOrderBy {
                    out.push_str(" AS ");
                    self.write_column_name(context, out, alias);
                }
            }
        };
        Ok(())
    }

    /// Render unary operator expression.
    fn write_expression_unary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        op: UnaryOpType,
        arg: &Expression,
    ) -> Result<()> {
        match op {
            UnaryOpType::Negative => out.push('-'),
            UnaryOpType::Not => out.push_str("NOT "),
        };
        possibly_parenthesized!(
            out,
            self.expression_precedence(arg) <= self.expression_unary_op_precedence(&op),
            self.write_expression(context, out, arg)?
        );
        Ok(())
    }

    /// Render binary operator expression handling precedence / parenthesis.
    fn write_expression_binary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        op: BinaryOpType,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<()> {
        let infix = match op {
            BinaryOpType::Multiplication => " * ",
            BinaryOpType::Division => " / ",
            BinaryOpType::Addition => " + ",
            BinaryOpType::Subtraction => " - ",
            BinaryOpType::Concatenation => " || ",
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::Containing => " CONTAINING ",
            BinaryOpType::StartingWith => " STARTING WITH ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " != ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        };
        let precedence = self.expression_binary_op_precedence(&op);
        possibly_parenthesized!(
            out,
            self.expression_precedence(lhs) < precedence,
            self.write_expression(context, out, lhs)?
        );
        out.push_str(infix);
        possibly_parenthesized!(
            out,
            self.expression_precedence(rhs) <= precedence,
            self.write_expression(context, out, rhs)?
        );
        Ok(())
    }

    /// Render `IN` / `NOT IN`, removing unboundable values from literal lists first.
    fn write_expression_in(
        &self,
        context: &mut Context,
        out: &mut String,
        lhs: &Expression,
        rhs: &InList,
        negated: bool,
    ) -> Result<()> {
        match rhs {
            InList::Subquery(select) => {
                self.write_expression(context, out, lhs)?;
                out.push_str(if negated { " NOT IN (" } else { " IN (" });
                self.write_select(context, out, select)?;
                out.push(')');
                Ok(())
            }
            InList::Values(values) => {
                let values = values
                    .iter()
                    .filter(|v| !matches!(v, Expression::Unboundable(..)))
                    .collect::<Vec<_>>();
                if values.is_empty() {
                    out.push_str(if negated { "1=1" } else { "1=0" });
                    return Ok(());
                }
                self.write_in_clauses(context, out, lhs, &values, negated)
            }
        }
    }

    /// Longest value list a single `IN` clause may carry, `None` for unbounded.
    fn in_clause_length(&self) -> Option<usize> {
        None
    }

    /// Render a value list split into clauses of at most `in_clause_length` values.
    ///
    /// `IN` chunks are joined with `OR`, `NOT IN` chunks with `AND`, and the whole group is
    /// parenthesized.
    fn write_in_clauses(
        &self,
        context: &mut Context,
        out: &mut String,
        lhs: &Expression,
        values: &[&Expression],
        negated: bool,
    ) -> Result<()> {
        let max = match self.in_clause_length() {
            Some(max) if max > 0 && values.len() > max => max,
            _ => return self.write_in_clause(context, out, lhs, values, negated),
        };
        out.push('(');
        try_separated_by(
            out,
            values.chunks(max),
            |out, chunk| self.write_in_clause(context, out, lhs, chunk, negated),
            if negated { " AND " } else { " OR " },
        )?;
        out.push(')');
        Ok(())
    }

    /// Render one `lhs [NOT] IN (values)` clause.
    fn write_in_clause(
        &self,
        context: &mut Context,
        out: &mut String,
        lhs: &Expression,
        values: &[&Expression],
        negated: bool,
    ) -> Result<()> {
        self.write_expression(context, out, lhs)?;
        out.push_str(if negated { " NOT IN (" } else { " IN (" });
        try_separated_by(
            out,
            values,
            |out, v| self.write_expression(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render a function call.
    fn write_expression_function(
        &self,
        context: &mut Context,
        out: &mut String,
        name: &str,
        args: &[Expression],
        distinct: bool,
    ) -> Result<()> {
        out.push_str(name);
        out.push('(');
        if distinct {
            out.push_str("DISTINCT ");
        }
        try_separated_by(
            out,
            args,
            |out, v| self.write_expression(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    /// Render ordered expression inside ORDER BY.
    fn write_ordered(&self, context: &mut Context, out: &mut String, value: &Ordered) -> Result<()> {
        self.write_expression(context, out, &value.expression)?;
        out.push_str(match value.order {
            Order::ASC => " ASC",
            Order::DESC => " DESC",
        });
        Ok(())
    }

    /// Render conditions joined by `AND`, parenthesizing weaker operators.
    fn write_conjunction(
        &self,
        context: &mut Context,
        out: &mut String,
        conditions: &[Expression],
    ) -> Result<()> {
        let and = self.expression_binary_op_precedence(&BinaryOpType::And);
        let multiple = conditions.len() > 1;
        try_separated_by(
            out,
            conditions,
            |out, v| {
                possibly_parenthesized!(
                    out,
                    multiple && self.expression_precedence(v) <= and,
                    self.write_expression(context, out, v)?
                );
                Ok::<_, Error>(())
            },
            " AND ",
        )
    }

    /// Render join keyword(s) for the given join type.
    fn write_join_type(&self, _context: &mut Context, out: &mut String, join_type: &JoinType) {
        out.push_str(match &join_type {
            JoinType::Default => "JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Outer => "FULL OUTER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::Natural => "NATURAL JOIN",
        });
    }

    /// Render the source of a select core.
    fn write_join_source(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &JoinSource,
    ) -> Result<()> {
        match value {
            JoinSource::Table(v) => self.write_table_ref(context, out, v),
            JoinSource::Join(v) => return self.write_join(context, out, v),
            JoinSource::Subquery { select, alias } => {
                out.push('(');
                self.write_select(context, out, select)?;
                out.push_str(") ");
                out.push_str(alias);
            }
            JoinSource::Literal(v) => out.push_str(v.as_str()),
        }
        Ok(())
    }

    /// Render a JOIN clause.
    fn write_join(&self, context: &mut Context, out: &mut String, join: &Join) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        context.qualify_columns = true;
        self.write_join_source(&mut context, out, &join.lhs)?;
        out.push(' ');
        self.write_join_type(&mut context, out, &join.join);
        out.push(' ');
        self.write_join_source(&mut context, out, &join.rhs)?;
        if let Some(on) = &join.on {
            out.push_str(" ON ");
            self.write_expression(&mut context, out, on)?;
        }
        Ok(())
    }

    /// Render any statement of the abstract query tree.
    fn write_statement(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Statement,
    ) -> Result<()> {
        match value {
            Statement::Select(v) => self.write_select(context, out, v),
            Statement::Insert(v) => self.write_insert(context, out, v),
            Statement::Update(v) => self.write_update(context, out, v),
            Statement::Delete(v) => self.write_delete(context, out, v),
            Statement::Union { left, right, all } => {
                self.write_union(context, out, left, right, *all)
            }
        }
    }

    /// Render `left UNION [ALL] right`.
    fn write_union(
        &self,
        context: &mut Context,
        out: &mut String,
        left: &Statement,
        right: &Statement,
        all: bool,
    ) -> Result<()> {
        self.write_statement(context, out, left)?;
        out.push_str(if all { " UNION ALL " } else { " UNION " });
        self.write_statement(context, out, right)
    }

    /// Render the `WITH` clause.
    fn write_with(&self, context: &mut Context, out: &mut String, value: &With) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlWith);
        out.push_str("WITH ");
        if value.recursive {
            out.push_str("RECURSIVE ");
        }
        try_separated_by(
            out,
            &value.tables,
            |out, v| {
                self.write_identifier_quoted(&mut context, out, &v.name);
                out.push_str(" AS (");
                self.write_select(&mut context, out, &v.select)?;
                out.push(')');
                Ok::<_, Error>(())
            },
            ", ",
        )
    }

    /// Emit SELECT statement: cores, ORDER BY, pagination and lock.
    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SelectStatement,
    ) -> Result<()> {
        if let Some(with) = &value.with {
            self.write_with(context, out, with)?;
            out.push(' ');
        }
        for (i, core) in value.cores.iter().enumerate() {
            self.write_select_core(context, out, core, value, i == 0)?;
        }
        if !value.orders.is_empty() {
            out.push_str(" ORDER BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            context.qualify_columns = value
                .cores
                .first()
                .and_then(|c| c.source.as_ref())
                .map_or(false, JoinSource::qualified_columns);
            try_separated_by(
                out,
                &value.orders,
                |out, v| self.write_ordered(&mut context, out, v),
                ", ",
            )?;
        }
        self.write_select_pagination(context, out, value)?;
        if let Some(lock) = &value.lock {
            self.write_lock(context, out, lock)?;
        }
        Ok(())
    }

    /// Emit one `SELECT ... FROM ... WHERE ...` block.
    ///
    /// `first` is true for the first core of the statement, which is where dialects that
    /// paginate right after `SELECT` put their clause.
    fn write_select_core(
        &self,
        context: &mut Context,
        out: &mut String,
        core: &SelectCore,
        _statement: &SelectStatement,
        _first: bool,
    ) -> Result<()> {
        out.push_str("SELECT");
        self.write_select_hints(context, out, &core.hints);
        if let Some(quantifier) = &core.quantifier {
            self.write_select_quantifier(context, out, quantifier)?;
        }
        self.write_select_core_body(context, out, core)
    }

    /// Everything after the `SELECT` keyword and its modifiers.
    fn write_select_core_body(
        &self,
        context: &mut Context,
        out: &mut String,
        core: &SelectCore,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        context.qualify_columns = core
            .source
            .as_ref()
            .map_or(false, JoinSource::qualified_columns);
        out.push(' ');
        if core.projections.is_empty() {
            out.push('*');
        } else {
            try_separated_by(
                out,
                &core.projections,
                |out, v| self.write_expression(&mut context, out, v),
                ", ",
            )?;
        }
        if let Some(source) = &core.source {
            out.push_str(" FROM ");
            let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
            self.write_join_source(&mut context, out, source)?;
        }
        if !core.wheres.is_empty() {
            out.push_str(" WHERE ");
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            self.write_conjunction(&mut context, out, &core.wheres)?;
        }
        if !core.groups.is_empty() {
            out.push_str(" GROUP BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectGroupBy);
            try_separated_by(
                out,
                &core.groups,
                |out, v| self.write_expression(&mut context, out, v),
                ", ",
            )?;
        }
        if !core.havings.is_empty() {
            out.push_str(" HAVING ");
            let mut context = context.switch_fragment(Fragment::SqlSelectHaving);
            self.write_conjunction(&mut context, out, &core.havings)?;
        }
        if !core.windows.is_empty() {
            out.push_str(" WINDOW ");
            try_separated_by(
                out,
                &core.windows,
                |out, v| self.write_window(&mut context, out, v),
                ", ",
            )?;
        }
        Ok(())
    }

    /// Render optimizer hints as a comment.
    fn write_select_hints(&self, _context: &mut Context, out: &mut String, hints: &[String]) {
        if hints.is_empty() {
            return;
        }
        out.push_str(" /*+ ");
        separated_by(out, hints, |out, v| out.push_str(v), " ");
        out.push_str(" */");
    }

    /// Render `DISTINCT` and friends.
    fn write_select_quantifier(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Quantifier,
    ) -> Result<()> {
        match value {
            Quantifier::All => out.push_str(" ALL"),
            Quantifier::Distinct => out.push_str(" DISTINCT"),
            Quantifier::DistinctOn(expressions) => {
                out.push_str(" DISTINCT ON (");
                try_separated_by(
                    out,
                    expressions,
                    |out, v| self.write_expression(context, out, v),
                    ", ",
                )?;
                out.push(')');
            }
        }
        Ok(())
    }

    /// Render a named window definition.
    fn write_window(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &NamedWindow,
    ) -> Result<()> {
        self.write_identifier_quoted(context, out, &value.name);
        out.push_str(" AS (");
        let len = out.len();
        if !value.partitions.is_empty() {
            out.push_str("PARTITION BY ");
            try_separated_by(
                out,
                &value.partitions,
                |out, v| self.write_expression(context, out, v),
                ", ",
            )?;
        }
        if !value.orders.is_empty() {
            if out.len() > len {
                out.push(' ');
            }
            out.push_str("ORDER BY ");
            try_separated_by(
                out,
                &value.orders,
                |out, v| self.write_ordered(context, out, v),
                ", ",
            )?;
        }
        out.push(')');
        Ok(())
    }

    /// Render LIMIT / OFFSET.
    fn write_select_pagination(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &SelectStatement,
    ) -> Result<()> {
        if let Some(limit) = value.limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
        if let Some(offset) = value.offset {
            out.push_str(" OFFSET ");
            write_integer!(out, offset);
        }
        Ok(())
    }

    /// Render the row locking clause.
    fn write_lock(&self, _context: &mut Context, out: &mut String, value: &Lock) -> Result<()> {
        match value {
            Lock::Update => out.push_str(" FOR UPDATE"),
            Lock::Share => out.push_str(" FOR SHARE"),
            Lock::Custom(v) => {
                out.push(' ');
                out.push_str(v.as_str());
            }
        }
        Ok(())
    }

    /// Emit INSERT with values, a select or default values.
    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &InsertStatement,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table_ref(&mut context, out, &value.relation);
        if !value.columns.is_empty() {
            out.push_str(" (");
            separated_by(
                out,
                &value.columns,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            );
            out.push(')');
        }
        match &value.source {
            InsertSource::Values(rows) => {
                out.push_str(" VALUES ");
                let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
                try_separated_by(
                    out,
                    rows,
                    |out, row| {
                        out.push('(');
                        try_separated_by(
                            out,
                            row,
                            |out, v| self.write_expression(&mut context, out, v),
                            ", ",
                        )?;
                        out.push(')');
                        Ok::<_, Error>(())
                    },
                    ", ",
                )?;
            }
            InsertSource::Select(select) => {
                out.push(' ');
                self.write_select(&mut context, out, select)?;
            }
            InsertSource::DefaultValues => out.push_str(" DEFAULT VALUES"),
        }
        Ok(())
    }

    /// Emit UPDATE with its assignments and conditions.
    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpdateStatement,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table_ref(&mut context, out, &value.relation);
        out.push_str(" SET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            try_separated_by(
                out,
                &value.assignments,
                |out, (column, v)| {
                    self.write_column_name(&mut context, out, column);
                    out.push_str(" = ");
                    self.write_expression(&mut context, out, v)
                },
                ", ",
            )?;
        }
        if !value.wheres.is_empty() {
            out.push_str(" WHERE ");
            let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
            self.write_conjunction(&mut context, out, &value.wheres)?;
        }
        Ok(())
    }

    /// Emit DELETE statement with WHERE clause.
    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &DeleteStatement,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_table_ref(&mut context, out, &value.relation);
        if !value.wheres.is_empty() {
            out.push_str(" WHERE ");
            let mut context = context.switch_fragment(Fragment::SqlDeleteFromWhere);
            self.write_conjunction(&mut context, out, &value.wheres)?;
        }
        Ok(())
    }

    /// Render a statement, returns the values bound to its placeholders.
    fn write_query(
        &self,
        out: &mut String,
        statement: &Statement,
        parameterized: bool,
    ) -> Result<Vec<Value>> {
        let mut context = if parameterized {
            Context::parameterized(Fragment::None, false)
        } else {
            Context::new(Fragment::None, false)
        };
        self.write_statement(&mut context, out, statement)?;
        Ok(context.binds)
    }

    /// Emit BEGIN statement.
    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN");
    }

    /// Emit COMMIT statement.
    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT");
    }

    /// Emit ROLLBACK statement.
    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK");
    }

    fn write_savepoint(&self, out: &mut String, name: &str) {
        out.push_str("SAVEPOINT ");
        out.push_str(name);
    }

    fn write_rollback_to_savepoint(&self, out: &mut String, name: &str) {
        out.push_str("ROLLBACK TO SAVEPOINT ");
        out.push_str(name);
    }

    fn write_release_savepoint(&self, out: &mut String, name: &str) {
        out.push_str("RELEASE SAVEPOINT ");
        out.push_str(name);
    }

    /// Emit CREATE TABLE with columns and constraints.
    fn write_create_table(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &TableDef,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlCreateTable);
        out.reserve(128 + value.columns.len() * 64);
        out.push_str("CREATE TABLE ");
        self.write_table_ref(&mut context, out, &TableRef::new(value.name.as_str()));
        out.push_str(" (");
        try_separated_by(
            out,
            &value.columns,
            |out, v| self.write_create_table_column_fragment(&mut context, out, v),
            ", ",
        )?;
        if value.primary_key.len() > 1 {
            out.push_str(", PRIMARY KEY (");
            let mut context = context.switch_fragment(Fragment::SqlCreateTablePrimaryKey);
            separated_by(
                out,
                &value.primary_key,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            );
            out.push(')');
        }
        for unique in value.unique.iter().filter(|v| !v.is_empty()) {
            out.push_str(", UNIQUE (");
            let mut context = context.switch_fragment(Fragment::SqlCreateTableUnique);
            separated_by(
                out,
                unique,
                |out, v| self.write_column_name(&mut context, out, v),
                ", ",
            );
            out.push(')');
        }
        out.push(')');
        Ok(())
    }

    /// Emit single column definition fragment.
    ///
    /// Columns taking part in a composite key are listed in `TableDef::primary_key` and
    /// must not set `ColumnDef::primary_key` themselves.
    fn write_create_table_column_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &ColumnDef,
    ) -> Result<()> {
        let implicit_key = column.column_type.kind == ColumnKind::PrimaryKey;
        self.write_column_name(context, out, &column.name);
        out.push(' ');
        self.write_column_type(context, out, &column.column_type)?;
        if let Some(default) = &column.default {
            out.push_str(" DEFAULT ");
            self.write_value(context, out, default);
        }
        if !column.nullable && !column.primary_key {
            out.push_str(" NOT NULL");
        }
        if column.primary_key && !implicit_key {
            out.push_str(" PRIMARY KEY");
        }
        if column.unique && !column.primary_key {
            out.push_str(" UNIQUE");
        }
        if let Some(references) = &column.references {
            out.push_str(" REFERENCES ");
            self.write_table_ref(context, out, &TableRef::new(references.table.as_str()));
            out.push_str(" (");
            self.write_column_name(context, out, &references.column);
            out.push(')');
            if let Some(on_delete) = &references.on_delete {
                out.push_str(" ON DELETE ");
                self.write_create_table_references_action(context, out, on_delete);
            }
            if let Some(on_update) = &references.on_update {
                out.push_str(" ON UPDATE ");
                self.write_create_table_references_action(context, out, on_update);
            }
        }
        Ok(())
    }

    /// Emit referential action keyword.
    fn write_create_table_references_action(
        &self,
        _context: &mut Context,
        out: &mut String,
        action: &Action,
    ) {
        out.push_str(match action {
            Action::NoAction => "NO ACTION",
            Action::Restrict => "RESTRICT",
            Action::Cascade => "CASCADE",
            Action::SetNull => "SET NULL",
            Action::SetDefault => "SET DEFAULT",
        });
    }

    /// Emit DROP TABLE statement.
    fn write_drop_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        if_exists: bool,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_ref(&mut context, out, table);
    }

    /// Emit `ALTER TABLE t ` prefix.
    fn write_alter_table(&self, context: &mut Context, out: &mut String, table: &TableRef) {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        out.push_str("ALTER TABLE ");
        self.write_table_ref(&mut context, out, table);
        out.push(' ');
    }

    fn write_add_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &ColumnDef,
    ) -> Result<()> {
        self.write_alter_table(context, out, table);
        out.push_str("ADD ");
        self.write_create_table_column_fragment(context, out, column)
    }

    fn write_drop_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("DROP COLUMN ");
        self.write_column_name(context, out, column);
    }

    fn write_rename_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        from: &str,
        to: &str,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("RENAME COLUMN ");
        self.write_column_name(context, out, from);
        out.push_str(" TO ");
        self.write_column_name(context, out, to);
    }

    fn write_alter_column_type(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        column_type: &ColumnTypeDescriptor,
    ) -> Result<()> {
        self.write_alter_table(context, out, table);
        out.push_str("ALTER COLUMN ");
        self.write_column_name(context, out, column);
        out.push_str(" TYPE ");
        self.write_column_type(context, out, column_type)
    }

    fn write_alter_column_default(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        default: Option<&Value>,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("ALTER COLUMN ");
        self.write_column_name(context, out, column);
        match default {
            Some(v) => {
                out.push_str(" SET DEFAULT ");
                self.write_value(context, out, v);
            }
            None => out.push_str(" DROP DEFAULT"),
        }
    }

    fn write_alter_column_null(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        nullable: bool,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("ALTER COLUMN ");
        self.write_column_name(context, out, column);
        out.push_str(if nullable {
            " DROP NOT NULL"
        } else {
            " SET NOT NULL"
        });
    }

    fn write_create_index(&self, context: &mut Context, out: &mut String, index: &IndexDef) {
        let mut context = context.switch_fragment(Fragment::SqlCreateIndex);
        out.push_str("CREATE ");
        if index.unique {
            out.push_str("UNIQUE ");
        }
        out.push_str("INDEX ");
        self.write_column_name(&mut context, out, &index.name);
        out.push_str(" ON ");
        self.write_table_ref(&mut context, out, &TableRef::new(index.table.as_str()));
        out.push_str(" (");
        separated_by(
            out,
            &index.columns,
            |out, v| self.write_column_name(&mut context, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_drop_index(&self, context: &mut Context, out: &mut String, name: &str) {
        let mut context = context.switch_fragment(Fragment::SqlDropIndex);
        out.push_str("DROP INDEX ");
        self.write_column_name(&mut context, out, name);
    }

    /// Remove every row of a table.
    fn write_truncate(&self, context: &mut Context, out: &mut String, table: &TableRef) {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("TRUNCATE TABLE ");
        self.write_table_ref(&mut context, out, table);
    }
}

/// Fallback generic SQL writer.
#[derive(Default)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    /// Construct a new generic writer.
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
