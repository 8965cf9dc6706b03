use redbird_core::{Row, Value};
use redbird_firebird::{
    ConnectionConfig, Execution, NativeClient, NativeConnection, NativeCursor, NativeError,
    NativeField, NativeIndex, NativeResult, RdbDriver,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct State {
    statements: Vec<String>,
    binds: Vec<Vec<Value>>,
    events: Vec<String>,
    failures: Vec<(String, String)>,
    responses: Vec<(String, Vec<String>, Vec<Row>)>,
    tables: Vec<String>,
    views: Vec<String>,
    indexes: Vec<NativeIndex>,
    triggers: Vec<String>,
    generators: Vec<String>,
    columns: Vec<(String, Vec<NativeField>)>,
    connect_error: Option<String>,
    created: bool,
    closed_cursors: usize,
    encoding: String,
}

/// In-memory server.
///
/// Records every statement with its binds and the transaction events, answers with the
/// scripted rows or failures (matched by SQL substring, first match wins) and serves a
/// catalog configured by the test. Clones share the same state.
#[derive(Clone, Default)]
pub struct MockDatabase {
    state: Arc<Mutex<State>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        let result = Self::default();
        result.state().encoding = "NONE".into();
        result
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn driver(&self) -> RdbDriver {
        RdbDriver::new(Arc::new(self.clone()))
    }

    /// Every statement received, reads included, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    pub fn binds(&self) -> Vec<Vec<Value>> {
        self.state().binds.clone()
    }

    /// Connection and transaction events: `CONNECT`, `CREATE DATABASE`, `SET TRANSACTION
    /// <options>`, `COMMIT`, `ROLLBACK` and `CLOSE`.
    pub fn events(&self) -> Vec<String> {
        self.state().events.clone()
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.statements.clear();
        state.binds.clear();
        state.events.clear();
    }

    /// Fail every statement containing `fragment` with `message`.
    pub fn fail_on(&self, fragment: impl Into<String>, message: impl Into<String>) -> &Self {
        self.state()
            .failures
            .push((fragment.into(), message.into()));
        self
    }

    /// Answer every statement containing `fragment` with a cursor over `rows`.
    pub fn respond(
        &self,
        fragment: impl Into<String>,
        fields: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> &Self {
        self.state().responses.push((
            fragment.into(),
            fields.iter().map(|v| v.to_string()).collect(),
            rows.into_iter().map(Vec::into_boxed_slice).collect(),
        ));
        self
    }

    pub fn add_table(&self, name: &str) -> &Self {
        self.state().tables.push(name.to_uppercase());
        self
    }

    pub fn add_view(&self, name: &str) -> &Self {
        self.state().views.push(name.to_uppercase());
        self
    }

    pub fn add_index(&self, table: &str, name: &str, unique: bool, columns: &[&str]) -> &Self {
        self.state().indexes.push(NativeIndex {
            table: table.to_uppercase(),
            name: name.to_uppercase(),
            unique,
            columns: columns.iter().map(|v| v.to_uppercase()).collect(),
        });
        self
    }

    pub fn add_trigger(&self, name: &str) -> &Self {
        self.state().triggers.push(name.to_uppercase());
        self
    }

    pub fn add_generator(&self, name: &str) -> &Self {
        self.state().generators.push(name.to_uppercase());
        self
    }

    pub fn set_columns(&self, table: &str, columns: Vec<NativeField>) -> &Self {
        self.state().columns.push((table.to_uppercase(), columns));
        self
    }

    pub fn fail_connect(&self, message: impl Into<String>) -> &Self {
        self.state().connect_error = Some(message.into());
        self
    }

    pub fn database_created(&self) -> bool {
        self.state().created
    }

    pub fn closed_cursors(&self) -> usize {
        self.state().closed_cursors
    }

    pub fn set_encoding(&self, encoding: impl Into<String>) -> &Self {
        self.state().encoding = encoding.into();
        self
    }

    fn open(&self) -> Box<dyn NativeConnection> {
        Box::new(MockConnection {
            database: self.clone(),
            open: true,
        })
    }
}

impl NativeClient for MockDatabase {
    fn connect(&self, _config: &ConnectionConfig) -> NativeResult<Box<dyn NativeConnection>> {
        let mut state = self.state();
        if let Some(message) = state.connect_error.clone() {
            if !state.created {
                return Err(NativeError::new(message));
            }
        }
        state.events.push("CONNECT".into());
        drop(state);
        Ok(self.open())
    }

    fn create_database(
        &self,
        _config: &ConnectionConfig,
    ) -> NativeResult<Box<dyn NativeConnection>> {
        let mut state = self.state();
        state.created = true;
        state.events.push("CREATE DATABASE".into());
        drop(state);
        Ok(self.open())
    }
}

struct MockConnection {
    database: MockDatabase,
    open: bool,
}

impl MockConnection {
    fn record(&self, sql: &str, binds: &[Value]) -> NativeResult<Option<(Vec<String>, Vec<Row>)>> {
        let mut state = self.database.state();
        state.statements.push(sql.to_string());
        state.binds.push(binds.to_vec());
        if let Some((_, message)) = state.failures.iter().find(|(f, _)| sql.contains(f.as_str())) {
            return Err(NativeError::new(message.clone()));
        }
        Ok(state
            .responses
            .iter()
            .find(|(f, ..)| sql.contains(f.as_str()))
            .map(|(_, fields, rows)| (fields.clone(), rows.clone())))
    }

    fn event(&self, event: impl Into<String>) {
        self.database.state().events.push(event.into());
    }
}

impl NativeConnection for MockConnection {
    fn query(&mut self, sql: &str) -> NativeResult<Vec<Row>> {
        Ok(self
            .record(sql, &[])?
            .map(|(_, rows)| rows)
            .unwrap_or_default())
    }

    fn execute(&mut self, sql: &str, binds: &[Value]) -> NativeResult<Execution> {
        Ok(match self.record(sql, binds)? {
            Some((fields, rows)) => Execution::Cursor(Box::new(MockCursor {
                database: self.database.clone(),
                fields,
                rows,
            })),
            None => Execution::Affected(1),
        })
    }

    fn transaction(&mut self, options: &str) -> NativeResult<()> {
        self.event(format!("SET TRANSACTION {}", options));
        Ok(())
    }

    fn commit(&mut self) -> NativeResult<()> {
        self.event("COMMIT");
        Ok(())
    }

    fn rollback(&mut self) -> NativeResult<()> {
        self.event("ROLLBACK");
        Ok(())
    }

    fn close(&mut self) -> NativeResult<()> {
        self.open = false;
        self.event("CLOSE");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn encoding(&self) -> String {
        self.database.state().encoding.clone()
    }

    fn table_names(&mut self) -> NativeResult<Vec<String>> {
        Ok(self.database.state().tables.clone())
    }

    fn view_names(&mut self) -> NativeResult<Vec<String>> {
        Ok(self.database.state().views.clone())
    }

    fn indexes(&mut self) -> NativeResult<Vec<NativeIndex>> {
        Ok(self.database.state().indexes.clone())
    }

    fn trigger_names(&mut self) -> NativeResult<Vec<String>> {
        Ok(self.database.state().triggers.clone())
    }

    fn generator_names(&mut self) -> NativeResult<Vec<String>> {
        Ok(self.database.state().generators.clone())
    }

    fn columns(&mut self, table: &str) -> NativeResult<Vec<NativeField>> {
        Ok(self
            .database
            .state()
            .columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(table))
            .map(|(_, columns)| columns.clone())
            .unwrap_or_default())
    }
}

struct MockCursor {
    database: MockDatabase,
    fields: Vec<String>,
    rows: Vec<Row>,
}

impl NativeCursor for MockCursor {
    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn fetch_all(&mut self) -> NativeResult<Vec<Row>> {
        Ok(std::mem::take(&mut self.rows))
    }

    fn close(&mut self) -> NativeResult<()> {
        self.database.state().closed_cursors += 1;
        Ok(())
    }
}
