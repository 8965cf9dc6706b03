use crate::{
    DialectOptions, OffsetSyntax, RdbError,
    quoting::{
        format_identifier, format_table_name, quoted_date, quoted_local_timestamp, quoted_time,
        quoted_timestamp,
    },
    type_map::descriptor_to_sql,
};
use redbird_core::{
    ColumnRef, ColumnTypeDescriptor, Error, Expression, Fragment, InsertSource, InsertStatement,
    Lock, Quantifier, Result, SelectCore, SelectStatement, SqlWriter, TableRef, Value,
    separated_by, try_separated_by, writer::Context,
};
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Firebird dialect printer.
///
/// Identifiers are upper-cased and, unless configured otherwise, quoted. Quoted names are
/// memoized per writer, each connection owns its writer.
#[derive(Debug, Default)]
pub struct RdbSqlWriter {
    options: DialectOptions,
    table_names: Mutex<HashMap<String, String>>,
    column_names: Mutex<HashMap<String, String>>,
}

impl RdbSqlWriter {
    pub fn new(options: DialectOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &DialectOptions {
        &self.options
    }

    /// `"SCHEMA"."TABLE"`
    pub fn quote_table_name(&self, name: &str) -> String {
        let mut cache = self
            .table_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(quoted) = cache.get(name) {
            return quoted.clone();
        }
        let quoted = format_table_name(name, self.options.always_quote_identifiers);
        cache.insert(name.to_string(), quoted.clone());
        quoted
    }

    /// `"COLUMN"`
    pub fn quote_column_name(&self, name: &str) -> String {
        let mut cache = self
            .column_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(quoted) = cache.get(name) {
            return quoted.clone();
        }
        let quoted = format_identifier(name, self.options.always_quote_identifiers);
        cache.insert(name.to_string(), quoted.clone());
        quoted
    }

    fn write_pagination_value(
        &self,
        context: &mut Context,
        out: &mut String,
        value: u64,
    ) -> Result<()> {
        let value = i64::try_from(value).map_err(|_| {
            Error::new(RdbError::UnsupportedSyntax(format!(
                "The pagination value {} does not fit a BIGINT",
                value
            )))
        })?;
        self.write_bind(context, out, &Value::Int64(Some(value)));
        Ok(())
    }

    pub fn write_create_sequence(&self, out: &mut String, sequence: &str) {
        out.push_str("CREATE SEQUENCE ");
        out.push_str(&self.quote_column_name(sequence));
    }

    pub fn write_drop_sequence(&self, out: &mut String, sequence: &str) {
        out.push_str("DROP SEQUENCE ");
        out.push_str(&self.quote_column_name(sequence));
    }

    pub fn write_reset_sequence(&self, out: &mut String, sequence: &str, value: i64) {
        out.push_str("ALTER SEQUENCE ");
        out.push_str(&self.quote_column_name(sequence));
        out.push_str(" RESTART WITH ");
        out.push_str(itoa::Buffer::new().format(value));
    }

    pub fn write_next_sequence_value(&self, out: &mut String, sequence: &str) {
        out.push_str("SELECT NEXT VALUE FOR ");
        out.push_str(&self.quote_column_name(sequence));
        out.push_str(" FROM RDB$DATABASE");
    }

    /// Before insert trigger feeding `key` from `sequence`.
    ///
    /// A null key takes the next value, an explicit key larger than the current value moves
    /// the sequence forward so later generated keys do not collide with it.
    pub fn write_create_trigger(
        &self,
        out: &mut String,
        trigger: &str,
        table: &str,
        key: &str,
        sequence: &str,
    ) {
        let key = format!("new.{}", self.quote_column_name(key));
        let sequence = self.quote_column_name(sequence);
        out.push_str("CREATE TRIGGER ");
        out.push_str(&self.quote_column_name(trigger));
        out.push_str(" FOR ");
        out.push_str(&self.quote_table_name(table));
        out.push_str(" ACTIVE BEFORE INSERT\nAS\nDECLARE VARIABLE gen_val BIGINT;\nBEGIN\n");
        out.push_str(&format!("  IF ({key} IS NULL) THEN\n"));
        out.push_str(&format!("    {key} = NEXT VALUE FOR {sequence};\n"));
        out.push_str("  ELSE BEGIN\n");
        out.push_str(&format!("    gen_val = GEN_ID({sequence}, 0);\n"));
        out.push_str(&format!("    IF ({key} > gen_val) THEN\n"));
        out.push_str(&format!(
            "      gen_val = GEN_ID({sequence}, {key} - gen_val);\n"
        ));
        out.push_str("  END\nEND");
    }

    pub fn write_drop_trigger(&self, out: &mut String, trigger: &str) {
        out.push_str("DROP TRIGGER ");
        out.push_str(&self.quote_column_name(trigger));
    }

    /// Move a column, `position` is 1-based.
    pub fn write_column_position(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
        position: u32,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("ALTER COLUMN ");
        self.write_column_name(context, out, column);
        out.push_str(" POSITION ");
        out.push_str(itoa::Buffer::new().format(position));
    }

    /// `UPDATE t SET "TO" = "FROM"`
    pub fn write_copy_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        from: &str,
        to: &str,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table_ref(&mut context, out, table);
        out.push_str(" SET ");
        self.write_column_name(&mut context, out, to);
        out.push_str(" = ");
        self.write_column_name(&mut context, out, from);
    }
}

impl SqlWriter for RdbSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push_str(&format_identifier(
            value,
            self.options.always_quote_identifiers,
        ));
    }

    fn write_column_name(&self, _context: &mut Context, out: &mut String, name: &str) {
        out.push_str(&self.quote_column_name(name));
    }

    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        if self.alias_declaration(context) || value.alias.is_empty() {
            if value.schema.is_empty() {
                out.push_str(&self.quote_table_name(&value.name));
            } else {
                out.push_str(&self.quote_table_name(&format!("{}.{}", value.schema, value.name)));
            }
        }
        if !value.alias.is_empty() {
            if self.alias_declaration(context) {
                out.push(' ');
            }
            out.push_str(&value.alias);
        }
    }

    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) {
        if context.qualify_columns && !value.table.is_empty() {
            if value.schema.is_empty() {
                out.push_str(&self.quote_table_name(&value.table));
            } else {
                out.push_str(&self.quote_table_name(&format!("{}.{}", value.schema, value.table)));
            }
            out.push('.');
        }
        self.write_column_name(context, out, &value.name);
    }

    fn write_column_type(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &ColumnTypeDescriptor,
    ) -> Result<()> {
        // Generated `RDB$n` sources are the column's own anonymous domain.
        match value.domain.as_deref().map(str::trim_end) {
            Some(domain)
                if !domain.is_empty() && !domain.to_ascii_lowercase().starts_with("rdb$") =>
            {
                out.push_str(&self.quote_column_name(domain));
            }
            _ => out.push_str(&descriptor_to_sql(value)?),
        }
        Ok(())
    }

    fn write_value_date(&self, _context: &mut Context, out: &mut String, value: &Date) {
        out.push_str(&quoted_date(value));
    }

    fn write_value_time(&self, _context: &mut Context, out: &mut String, value: &Time) {
        out.push_str(&quoted_time(value));
    }

    fn write_value_timestamp(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push_str(&quoted_timestamp(value));
    }

    fn write_value_timestamptz(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        out.push_str(&quoted_local_timestamp(value));
    }

    fn in_clause_length(&self) -> Option<usize> {
        self.options.in_clause_length
    }

    fn write_select_core(
        &self,
        context: &mut Context,
        out: &mut String,
        core: &SelectCore,
        statement: &SelectStatement,
        first: bool,
    ) -> Result<()> {
        out.push_str("SELECT");
        self.write_select_hints(context, out, &core.hints);
        if first
            && self.options.offset_syntax == OffsetSyntax::Skip
            && statement.limit.is_none()
        {
            if let Some(offset) = statement.offset.filter(|v| *v > 0) {
                out.push_str(" SKIP ");
                self.write_pagination_value(context, out, offset)?;
            }
        }
        if let Some(quantifier) = &core.quantifier {
            self.write_select_quantifier(context, out, quantifier)?;
        }
        self.write_select_core_body(context, out, core)
    }

    fn write_select_quantifier(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Quantifier,
    ) -> Result<()> {
        match value {
            Quantifier::All => out.push_str(" ALL"),
            Quantifier::Distinct => out.push_str(" DISTINCT"),
            Quantifier::DistinctOn(..) => {
                return Err(RdbError::UnsupportedSyntax(
                    "Firebird does not support DISTINCT ON".into(),
                )
                .into());
            }
        }
        Ok(())
    }

    /// `ROWS` pagination, an offset of zero counts as absent.
    fn write_select_pagination(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SelectStatement,
    ) -> Result<()> {
        let offset = value.offset.filter(|v| *v > 0);
        match (value.limit, offset) {
            (Some(limit), Some(offset)) => {
                let first = offset.checked_add(1);
                let last = offset.checked_add(limit);
                let (Some(first), Some(last)) = (first, last) else {
                    return Err(RdbError::UnsupportedSyntax(format!(
                        "The pagination limit {} with offset {} overflows",
                        limit, offset
                    ))
                    .into());
                };
                out.push_str(" ROWS ");
                self.write_pagination_value(context, out, first)?;
                out.push_str(" TO ");
                self.write_pagination_value(context, out, last)?;
            }
            (Some(limit), None) => {
                out.push_str(" ROWS ");
                self.write_pagination_value(context, out, limit)?;
            }
            (None, Some(offset)) if self.options.offset_syntax == OffsetSyntax::Rows => {
                out.push_str(" OFFSET ");
                self.write_pagination_value(context, out, offset)?;
                out.push_str(" ROWS");
            }
            _ => {}
        }
        Ok(())
    }

    fn write_lock(&self, _context: &mut Context, out: &mut String, value: &Lock) -> Result<()> {
        match value {
            Lock::Update => out.push_str(" WITH LOCK"),
            Lock::Share => {
                return Err(RdbError::UnsupportedSyntax(
                    "Firebird does not support shared row locks".into(),
                )
                .into());
            }
            Lock::Custom(v) => {
                out.push(' ');
                out.push_str(v.as_str());
            }
        }
        Ok(())
    }

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
                let [row] = rows.as_slice() else {
                    return Err(RdbError::UnsupportedSyntax(format!(
                        "Firebird inserts one row per statement, {} rows were given",
                        rows.len()
                    ))
                    .into());
                };
                out.push_str(" VALUES (");
                let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
                try_separated_by(
                    out,
                    row,
                    |out, v: &Expression| self.write_expression(&mut context, out, v),
                    ", ",
                )?;
                out.push(')');
            }
            InsertSource::Select(select) => {
                out.push(' ');
                self.write_select(&mut context, out, select)?;
            }
            InsertSource::DefaultValues => out.push_str(" DEFAULT VALUES"),
        }
        Ok(())
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("SET TRANSACTION");
    }

    /// Firebird has no `IF EXISTS`, callers check the catalog first.
    fn write_drop_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        _if_exists: bool,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        self.write_table_ref(&mut context, out, table);
    }

    fn write_drop_column(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        column: &str,
    ) {
        self.write_alter_table(context, out, table);
        out.push_str("DROP ");
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
        out.push_str("ALTER ");
        self.write_column_name(context, out, from);
        out.push_str(" TO ");
        self.write_column_name(context, out, to);
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
        out.push_str("ALTER ");
        self.write_column_name(context, out, column);
        match default {
            Some(v) if !v.is_null() => {
                out.push_str(" SET DEFAULT ");
                self.write_value(context, out, v);
            }
            _ => out.push_str(" DROP DEFAULT"),
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
        out.push_str("ALTER ");
        self.write_column_name(context, out, column);
        out.push_str(if nullable {
            " DROP NOT NULL"
        } else {
            " SET NOT NULL"
        });
    }

    fn write_truncate(&self, context: &mut Context, out: &mut String, table: &TableRef) {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_table_ref(&mut context, out, table);
    }
}
