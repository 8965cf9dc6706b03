use crate::Value;
use std::ops::{Deref, DerefMut};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    Casting,
    SqlAlterTable,
    SqlCreateIndex,
    SqlCreateTable,
    SqlCreateTablePrimaryKey,
    SqlCreateTableUnique,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlDropIndex,
    SqlDropTable,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlJoin,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectHaving,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
    SqlWith,
}

/// Rendering state threaded through every writer call.
///
/// In parameterized mode values are emitted as `?` and collected into `binds`, in the
/// order the placeholders appear in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub fragment: Fragment,
    pub qualify_columns: bool,
    pub parameterized: bool,
    pub binds: Vec<Value>,
}

impl Context {
    pub fn new(fragment: Fragment, qualify_columns: bool) -> Self {
        Self {
            fragment,
            qualify_columns,
            parameterized: false,
            binds: Vec::new(),
        }
    }

    pub fn parameterized(fragment: Fragment, qualify_columns: bool) -> Self {
        Self {
            parameterized: true,
            ..Self::new(fragment, qualify_columns)
        }
    }

    /// Enter a fragment, the previous fragment and column qualification are restored
    /// when the returned guard is dropped.
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        let previous = (self.fragment, self.qualify_columns);
        self.fragment = fragment;
        ContextUpdater {
            current: self,
            previous,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Fragment::None, false)
    }
}

pub struct ContextUpdater<'a> {
    current: &'a mut Context,
    previous: (Fragment, bool),
}

impl<'a> Deref for ContextUpdater<'a> {
    type Target = Context;
    fn deref(&self) -> &Context {
        self.current
    }
}

impl<'a> DerefMut for ContextUpdater<'a> {
    fn deref_mut(&mut self) -> &mut Context {
        self.current
    }
}

impl<'a> Drop for ContextUpdater<'a> {
    fn drop(&mut self) {
        self.current.fragment = self.previous.0;
        self.current.qualify_columns = self.previous.1;
    }
}
