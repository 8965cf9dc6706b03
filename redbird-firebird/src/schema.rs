//! Schema statements: tables with their generated sequence and trigger, columns, indexes
//! and the migration bookkeeping.

use crate::{
    RdbConnection, RdbError, connection::TransactionState, quoting::MAX_IDENTIFIER_LENGTH,
};
use redbird_core::{
    ColumnDef, ColumnTypeDescriptor, Error, ErrorContext, Expression, IndexDef, InsertStatement,
    Result, SelectStatement, SqlWriter, TableDef, TableRef, UpdateStatement, Value,
    truncate_at_boundary,
};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};

/// Temporary column used while a column is rewritten.
pub const REWRITE_COLUMN: &str = "c_temp";
pub const SCHEMA_MIGRATIONS_TABLE: &str = "schema_migrations";

/// Sequence feeding the auto-increment key of a table.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum SequenceOption {
    /// `<table>_seq`
    #[default]
    Default,
    Named(String),
    /// The table manages its keys itself.
    Disabled,
}

/// Sequence and trigger generated along with a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBinding {
    pub table: String,
    pub sequence: String,
    pub trigger: String,
}

impl SequenceBinding {
    pub fn for_table(table: &str, option: &SequenceOption) -> Option<Self> {
        let sequence = match option {
            SequenceOption::Default => default_sequence_name(table),
            SequenceOption::Named(name) => name.clone(),
            SequenceOption::Disabled => return None,
        };
        Some(Self {
            table: table.to_string(),
            sequence,
            trigger: trigger_name(table),
        })
    }
}

/// Result of a best-effort statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlOutcome {
    Applied,
    NotFound,
    Failed,
}

/// Progress of a column rewrite, the last step reached is reported on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RewriteStep {
    Start,
    TempColumnAdded,
    DataCopied,
    OriginalColumnRemoved,
    RenamedToOriginal,
}

/// Attributes applied after the type of a column changed, `None` leaves them alone.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ChangeColumnOptions {
    pub nullable: Option<bool>,
    /// `Some(None)` removes the default.
    pub default: Option<Option<Value>>,
}

/// `<table>_seq`, dashes replaced and the table part truncated to 27 bytes.
pub fn default_sequence_name(table: &str) -> String {
    let table = table.replace('-', "_");
    format!("{}_seq", truncate_at_boundary(&table, 27))
}

/// `N$<TABLE>`
pub fn trigger_name(table: &str) -> String {
    let table = table.to_uppercase();
    format!("N${}", truncate_at_boundary(&table, MAX_IDENTIFIER_LENGTH - 2))
}

/// `<table>_on_<c1>_<c2>`, replaced by `IDX_` and a SHA-256 prefix when too long.
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let columns = columns.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    let name = format!("{}_on_{}", table, columns.join("_"));
    if name.len() <= MAX_IDENTIFIER_LENGTH {
        return name;
    }
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    format!("IDX_{}", &digest[..23])
}

/// Index with its generated name.
pub fn generated_index<S: AsRef<str>>(table: &str, columns: &[S], unique: bool) -> IndexDef {
    IndexDef {
        table: table.to_string(),
        name: index_name(table, columns),
        unique,
        columns: columns.iter().map(|v| v.as_ref().to_string()).collect(),
    }
}

fn contains_column(columns: &[String], column: &str) -> bool {
    columns.iter().any(|v| v.eq_ignore_ascii_case(column))
}

impl RdbConnection {
    /// Create a table, plus the sequence and trigger of its auto-increment key.
    ///
    /// Returns the generated binding, if any.
    pub async fn create_table(
        &mut self,
        table: &TableDef,
        sequence: SequenceOption,
    ) -> Result<Option<SequenceBinding>> {
        if table.temporary {
            return Err(RdbError::UnsupportedSyntax(
                "Firebird adapter does not support temporary tables".into(),
            )
            .into());
        }
        if table.as_select.is_some() {
            return Err(RdbError::UnsupportedSyntax(
                "Firebird adapter does not support CREATE TABLE ... AS SELECT".into(),
            )
            .into());
        }
        if table.force && self.table_exists(&table.name).await? {
            self.drop_table(&table.name, sequence.clone()).await?;
        }
        let sql = self.try_render(|w, c, o| w.write_create_table(c, o, table))?;
        self.submit(&sql, &[])
            .with_context(|| format!("While creating the table `{}`", table.name))?;
        let Some(key) = table.auto_increment_column() else {
            return Ok(None);
        };
        let Some(binding) = SequenceBinding::for_table(&table.name, &sequence) else {
            return Ok(None);
        };
        self.create_sequence(&binding.sequence).await;
        let sql = self.render(|w, _, o| {
            w.write_create_trigger(o, &binding.trigger, &table.name, &key.name, &binding.sequence)
        });
        self.submit(&sql, &[])
            .with_context(|| format!("While creating the trigger of `{}`", table.name))?;
        Ok(Some(binding))
    }

    /// Drop a table with its trigger and sequence, a missing table is not an error.
    pub async fn drop_table(&mut self, table: &str, sequence: SequenceOption) -> Result<()> {
        if let Some(binding) = SequenceBinding::for_table(table, &sequence) {
            self.drop_trigger(&binding.trigger).await;
            self.drop_sequence(&binding.sequence).await;
        }
        if !self.table_exists(table).await? {
            log::debug!("Table `{}` does not exist, nothing to drop", table);
            return Ok(());
        }
        let sql = self.render(|w, c, o| w.write_drop_table(c, o, &TableRef::new(table), false));
        self.submit(&sql, &[])
            .with_context(|| format!("While dropping the table `{}`", table))?;
        Ok(())
    }

    /// Run a statement whose failure is logged and swallowed.
    fn best_effort(&mut self, sql: &str) -> DdlOutcome {
        match self.execute_sql(sql, &[]) {
            Ok(..) => DdlOutcome::Applied,
            Err(e) => {
                log::warn!("{:#}", e);
                DdlOutcome::Failed
            }
        }
    }

    pub async fn create_sequence(&mut self, sequence: &str) -> DdlOutcome {
        let sql = self.render(|w, _, o| w.write_create_sequence(o, sequence));
        self.best_effort(&sql)
    }

    pub async fn drop_sequence(&mut self, sequence: &str) -> DdlOutcome {
        match self.sequence_exists(sequence).await {
            Ok(true) => {}
            Ok(false) => return DdlOutcome::NotFound,
            Err(e) => {
                log::warn!("{:#}", e);
                return DdlOutcome::Failed;
            }
        }
        let sql = self.render(|w, _, o| w.write_drop_sequence(o, sequence));
        self.best_effort(&sql)
    }

    pub async fn drop_trigger(&mut self, trigger: &str) -> DdlOutcome {
        match self.trigger_exists(trigger).await {
            Ok(true) => {}
            Ok(false) => return DdlOutcome::NotFound,
            Err(e) => {
                log::warn!("{:#}", e);
                return DdlOutcome::Failed;
            }
        }
        let sql = self.render(|w, _, o| w.write_drop_trigger(o, trigger));
        self.best_effort(&sql)
    }

    /// Add a column, an auto-increment key also gets its sequence.
    pub async fn add_column(
        &mut self,
        table: &str,
        column: &ColumnDef,
        sequence: SequenceOption,
    ) -> Result<()> {
        let table_ref = TableRef::new(table);
        let sql = self.try_render(|w, c, o| w.write_add_column(c, o, &table_ref, column))?;
        self.submit(&sql, &[])
            .with_context(|| format!("While adding the column `{}` to `{}`", column.name, table))?;
        if column.auto_increment() {
            if let Some(binding) = SequenceBinding::for_table(table, &sequence) {
                self.create_sequence(&binding.sequence).await;
            }
        }
        if let Some(position) = column.position {
            let sql = self.render(|w, c, o| {
                w.write_column_position(c, o, &table_ref, &column.name, position + 1)
            });
            self.submit(&sql, &[])?;
        }
        Ok(())
    }

    /// Drop a column after the indexes referencing it.
    pub async fn remove_column(&mut self, table: &str, column: &str) -> Result<()> {
        for index in self.indexes(table).await? {
            if contains_column(&index.columns, column) {
                self.remove_index(&index.name).await?;
            }
        }
        let sql =
            self.render(|w, c, o| w.write_drop_column(c, o, &TableRef::new(table), column));
        self.submit(&sql, &[])
            .with_context(|| format!("While removing the column `{}` of `{}`", column, table))?;
        Ok(())
    }

    /// Change the type of a column, then apply nullability and default.
    ///
    /// Textual columns are rewritten through a temporary column: indexes on the column are
    /// dropped along the way and the new column accepts nulls unless `options` says
    /// otherwise.
    pub async fn change_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: &ColumnTypeDescriptor,
        options: ChangeColumnOptions,
    ) -> Result<()> {
        if column_type.kind.is_textual() {
            self.rewrite_column(table, column, &ColumnDef::new(REWRITE_COLUMN, column_type.clone()))
                .await?;
        } else {
            let sql = self.try_render(|w, c, o| {
                w.write_alter_column_type(c, o, &TableRef::new(table), column, column_type)
            })?;
            self.submit(&sql, &[])?;
        }
        if let Some(default) = options.default {
            self.change_column_default(table, column, default).await?;
        }
        if let Some(nullable) = options.nullable {
            self.change_column_null(table, column, nullable, None).await?;
        }
        Ok(())
    }

    /// Set or remove the default, nothing happens when neither the old nor the new one exist.
    pub async fn change_column_default(
        &mut self,
        table: &str,
        column: &str,
        default: Option<Value>,
    ) -> Result<()> {
        let default = default.filter(|v| !v.is_null());
        if default.is_none() {
            let current = self.column(table, column).await?;
            if current.is_none_or(|v| v.default.is_none()) {
                log::debug!("Column `{}` of `{}` has no default to remove", column, table);
                return Ok(());
            }
        }
        let sql = self.render(|w, c, o| {
            w.write_alter_column_default(c, o, &TableRef::new(table), column, default.as_ref())
        });
        self.submit(&sql, &[])?;
        Ok(())
    }

    /// Change the nullability of a column.
    ///
    /// Making a column not null, or giving it a default, rewrites it through a temporary
    /// column carrying the new (or existing) default. Null rows are set to that default
    /// first.
    pub async fn change_column_null(
        &mut self,
        table: &str,
        column: &str,
        nullable: bool,
        default: Option<Value>,
    ) -> Result<()> {
        let default = default.filter(|v| !v.is_null());
        if nullable && default.is_none() {
            let sql = self.render(|w, c, o| {
                w.write_alter_column_null(c, o, &TableRef::new(table), column, true)
            });
            self.submit(&sql, &[])?;
            return Ok(());
        }
        let Some(current) = self.column(table, column).await? else {
            return Err(Error::msg(format!(
                "The table `{}` has no column `{}`",
                table, column
            )));
        };
        let default = default.or(current.default.clone());
        if let Some(default) = default.as_ref().filter(|_| !nullable) {
            let update = UpdateStatement::new(table)
                .set(column, Expression::Value(default.clone()))
                .filter(Expression::column(column).is_null());
            let sql = self.explain(&update.into())?;
            self.submit(&sql, &[])?;
        }
        let mut temporary = ColumnDef::new(REWRITE_COLUMN, current.column_type.clone())
            .nullable(nullable);
        temporary.default = default;
        self.rewrite_column(table, column, &temporary).await
    }

    /// Add `temporary`, copy the data, drop the original and rename back.
    ///
    /// A failure is reported with the last step completed, nothing is undone.
    async fn rewrite_column(
        &mut self,
        table: &str,
        column: &str,
        temporary: &ColumnDef,
    ) -> Result<()> {
        let mut step = RewriteStep::Start;
        let table_ref = TableRef::new(table);
        let result = async {
            let sql =
                self.try_render(|w, c, o| w.write_add_column(c, o, &table_ref, temporary))?;
            self.submit(&sql, &[])?;
            step = RewriteStep::TempColumnAdded;
            let sql = self.render(|w, c, o| {
                w.write_copy_column(c, o, &table_ref, column, &temporary.name)
            });
            self.submit(&sql, &[])?;
            step = RewriteStep::DataCopied;
            self.remove_column(table, column).await?;
            step = RewriteStep::OriginalColumnRemoved;
            let sql = self.render(|w, c, o| {
                w.write_rename_column(c, o, &table_ref, &temporary.name, column)
            });
            self.submit(&sql, &[])?;
            step = RewriteStep::RenamedToOriginal;
            Ok::<_, Error>(())
        }
        .await;
        result.map_err(|e| {
            let cause = format!("{:#}", e);
            let error = e.context(RdbError::ColumnRewrite {
                table: table.to_string(),
                column: column.to_string(),
                step,
                cause,
            });
            log::error!("{:#}", error);
            error
        })
    }

    /// Rename a column, indexes referencing it are recreated on the new name.
    pub async fn rename_column(&mut self, table: &str, from: &str, to: &str) -> Result<()> {
        let indexes = self
            .indexes(table)
            .await?
            .into_iter()
            .filter(|v| contains_column(&v.columns, from))
            .collect::<Vec<_>>();
        let sql =
            self.render(|w, c, o| w.write_rename_column(c, o, &TableRef::new(table), from, to));
        self.submit(&sql, &[])
            .with_context(|| format!("While renaming the column `{}` of `{}`", from, table))?;
        for index in indexes {
            let columns = index
                .columns
                .iter()
                .map(|v| {
                    if v.eq_ignore_ascii_case(from) {
                        to.to_string()
                    } else {
                        v.clone()
                    }
                })
                .collect::<Vec<_>>();
            let name = if index
                .name
                .eq_ignore_ascii_case(&index_name(table, &index.columns))
            {
                index_name(table, &columns)
            } else {
                index.name.clone()
            };
            self.remove_index(&index.name).await?;
            self.add_index(&IndexDef {
                table: table.to_string(),
                name,
                unique: index.unique,
                columns,
            })
            .await?;
        }
        Ok(())
    }

    pub async fn add_index(&mut self, index: &IndexDef) -> Result<()> {
        let sql = self.render(|w, c, o| w.write_create_index(c, o, index));
        self.submit(&sql, &[])
            .with_context(|| format!("While creating the index `{}`", index.name))?;
        Ok(())
    }

    pub async fn remove_index(&mut self, name: &str) -> Result<()> {
        let sql = self.render(|w, c, o| w.write_drop_index(c, o, name));
        self.submit(&sql, &[])
            .with_context(|| format!("While dropping the index `{}`", name))?;
        Ok(())
    }

    /// Record `version` and every earlier known version as migrated.
    ///
    /// Duplicates among the earlier versions not yet recorded fail before anything is written.
    pub async fn assume_migrated_up_to(&mut self, version: i64, known: &[i64]) -> Result<()> {
        let select = SelectStatement::new()
            .project([Expression::column("version")])
            .from(SCHEMA_MIGRATIONS_TABLE);
        let sql = self.explain(&select.into())?;
        let recorded = self
            .select_rows(&sql)?
            .iter()
            .filter_map(|row| row.first().and_then(Value::as_i64))
            .collect::<HashSet<_>>();
        let mut missing = BTreeSet::new();
        for v in known
            .iter()
            .copied()
            .filter(|v| *v < version && !recorded.contains(v))
        {
            if !missing.insert(v) {
                let error = Error::new(RdbError::DuplicateMigrationVersion(v));
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        if !recorded.contains(&version) {
            missing.insert(version);
        }
        if missing.is_empty() {
            return Ok(());
        }
        let owned = self.transaction == TransactionState::Idle;
        if owned {
            self.begin_db_transaction(Default::default())?;
        }
        let result = missing.into_iter().try_for_each(|v| {
            let insert = InsertStatement::new(SCHEMA_MIGRATIONS_TABLE)
                .columns(["version"])
                .values([Expression::Value(Value::Varchar(Some(v.to_string())))]);
            let sql = self.explain(&insert.into())?;
            self.submit(&sql, &[]).map(|_| ())
        });
        match (owned, result) {
            (true, Ok(())) => self.commit_db_transaction(),
            (true, Err(e)) => {
                if let Err(rollback) = self.rollback_db_transaction() {
                    log::error!("{:#}", rollback);
                }
                Err(e)
            }
            (false, result) => result,
        }
    }
}
