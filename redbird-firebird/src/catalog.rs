//! Catalog introspection and the data helpers built on it.

use crate::{
    NativeResult, RdbConnection,
    quoting::{canonical_to_dialect, dialect_to_canonical, quote_string},
    type_map::column_from_field,
};
use redbird_core::{
    ColumnDef, Error, ErrorContext, Expression, IndexDef, InsertStatement, Result, RowsAffected,
    SqlWriter, TableRef, Value,
};

impl RdbConnection {
    fn canonical(&self, name: &str) -> String {
        let name = name.trim_end();
        if self.config.downcase_names {
            dialect_to_canonical(name).into_owned()
        } else {
            name.to_string()
        }
    }

    fn catalog<T>(&self, result: NativeResult<T>, what: &str) -> Result<T> {
        result
            .map_err(Error::new)
            .with_context(|| format!("While reading the {} from the catalog", what))
            .inspect_err(|e| log::error!("{:#}", e))
    }

    pub async fn tables(&mut self) -> Result<Vec<String>> {
        let names = self.native.table_names();
        let names = self.catalog(names, "tables")?;
        Ok(names.iter().map(|v| self.canonical(v)).collect())
    }

    pub async fn views(&mut self) -> Result<Vec<String>> {
        let names = self.native.view_names();
        let names = self.catalog(names, "views")?;
        Ok(names.iter().map(|v| self.canonical(v)).collect())
    }

    pub async fn table_exists(&mut self, table: &str) -> Result<bool> {
        let table = table.trim();
        Ok(self
            .tables()
            .await?
            .iter()
            .any(|v| v.eq_ignore_ascii_case(table)))
    }

    /// User indexes of a table, the system `rdb$` ones are left out.
    pub async fn indexes(&mut self, table: &str) -> Result<Vec<IndexDef>> {
        let indexes = self.native.indexes();
        let indexes = self.catalog(indexes, "indexes")?;
        Ok(indexes
            .into_iter()
            .filter(|v| v.table.trim_end().eq_ignore_ascii_case(table))
            .filter(|v| !v.name.to_ascii_lowercase().starts_with("rdb$"))
            .map(|v| IndexDef {
                table: self.canonical(&v.table),
                name: self.canonical(&v.name),
                unique: v.unique,
                columns: v.columns.iter().map(|c| self.canonical(c)).collect(),
            })
            .collect())
    }

    pub async fn index_name_exists(&mut self, table: &str, name: &str) -> Result<bool> {
        Ok(self
            .indexes(table)
            .await?
            .iter()
            .any(|v| v.name.eq_ignore_ascii_case(name)))
    }

    /// Whether an index over exactly `columns` exists, `unique` restricts the match.
    pub async fn index_exists<S: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[S],
        unique: Option<bool>,
    ) -> Result<bool> {
        Ok(self.indexes(table).await?.iter().any(|v| {
            v.columns.len() == columns.len()
                && v
                    .columns
                    .iter()
                    .zip(columns)
                    .all(|(l, r)| l.eq_ignore_ascii_case(r.as_ref()))
                && unique.is_none_or(|u| u == v.unique)
        }))
    }

    /// Columns in their declared order, read back through the reverse type mapping.
    pub async fn columns(&mut self, table: &str) -> Result<Vec<ColumnDef>> {
        let fields = self.native.columns(&canonical_to_dialect(table));
        let fields = self.catalog(fields, "columns")?;
        let primary_key = self.primary_key(table).await?;
        Ok(fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let mut column = column_from_field(field, self.config.downcase_names);
                column.primary_key = primary_key
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(&column.name));
                column.position = u32::try_from(i).ok();
                column
            })
            .collect())
    }

    pub async fn column(&mut self, table: &str, column: &str) -> Result<Option<ColumnDef>> {
        Ok(self
            .columns(table)
            .await?
            .into_iter()
            .find(|v| v.name.eq_ignore_ascii_case(column)))
    }

    /// Columns of the primary key constraint, in key order.
    pub async fn primary_key(&mut self, table: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT s.rdb$field_name \
            FROM rdb$indices i \
            JOIN rdb$index_segments s ON i.rdb$index_name = s.rdb$index_name \
            LEFT JOIN rdb$relation_constraints c ON i.rdb$index_name = c.rdb$index_name \
            WHERE i.rdb$relation_name = '{}' AND c.rdb$constraint_type = 'PRIMARY KEY' \
            ORDER BY s.rdb$field_position",
            quote_string(&canonical_to_dialect(table))
        );
        Ok(self
            .select_rows(&sql)?
            .iter()
            .filter_map(|row| row.first().and_then(Value::as_str))
            .map(|v| self.canonical(v))
            .collect())
    }

    pub async fn sequence_exists(&mut self, sequence: &str) -> Result<bool> {
        let names = self.native.generator_names();
        Ok(self
            .catalog(names, "sequences")?
            .iter()
            .any(|v| v.trim_end().eq_ignore_ascii_case(sequence)))
    }

    pub async fn trigger_exists(&mut self, trigger: &str) -> Result<bool> {
        let names = self.native.trigger_names();
        Ok(self
            .catalog(names, "triggers")?
            .iter()
            .any(|v| v.trim_end().eq_ignore_ascii_case(trigger)))
    }

    /// Restart `sequence` from the largest value of `column`, zero for an empty table.
    pub async fn reset_sequence(&mut self, table: &str, column: &str, sequence: &str) -> Result<()> {
        let sql = format!(
            "SELECT max({}) FROM {}",
            self.writer.quote_column_name(column),
            self.writer.quote_table_name(table)
        );
        let max = self
            .select_rows(&sql)?
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let sql = self.render(|w, _, o| w.write_reset_sequence(o, sequence, max));
        self.submit(&sql, &[])
            .with_context(|| format!("While resetting the sequence `{}`", sequence))?;
        Ok(())
    }

    pub async fn next_sequence_value(&mut self, sequence: &str) -> Result<i64> {
        let sql = self.render(|w, _, o| w.write_next_sequence_value(o, sequence));
        self.select_rows(&sql)?
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::msg(format!("The sequence `{}` returned no value", sequence)))
    }

    pub async fn database_version(&mut self) -> Result<String> {
        let rows = self.select_rows(
            "SELECT rdb$get_context('SYSTEM', 'ENGINE_VERSION') FROM RDB$DATABASE",
        )?;
        rows.first()
            .and_then(|row| row.first())
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| Error::msg("The server did not report its version"))
    }

    pub fn encoding(&self) -> String {
        self.native.encoding()
    }

    /// Remove every row of `table`.
    pub async fn truncate(&mut self, table: &str) -> Result<RowsAffected> {
        let sql = self.render(|w, c, o| w.write_truncate(c, o, &TableRef::new(table)));
        Ok(self.submit(&sql, &[])?.into_iter().collect())
    }

    /// Insert fixture rows one statement each.
    ///
    /// A column missing from a row takes its catalog default, or `NULL` without one.
    pub async fn insert_fixtures(
        &mut self,
        table: &str,
        rows: impl IntoIterator<Item = Vec<(String, Value)>>,
    ) -> Result<RowsAffected> {
        let columns = self.columns(table).await?;
        let mut total = RowsAffected::default();
        for row in rows {
            let values = columns
                .iter()
                .map(|column| {
                    row.iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(&column.name))
                        .map(|(_, v)| v.clone())
                        .or_else(|| column.default.clone())
                        .unwrap_or(Value::Null)
                })
                .map(Expression::Value)
                .collect::<Vec<_>>();
            let insert = InsertStatement::new(table)
                .columns(columns.iter().map(|v| v.name.clone()))
                .values(values);
            let mut sql = String::with_capacity(128);
            let binds = self.writer.write_query(&mut sql, &insert.into(), true)?;
            total += self
                .submit(&sql, &binds)?
                .into_iter()
                .collect::<RowsAffected>();
        }
        Ok(total)
    }
}
