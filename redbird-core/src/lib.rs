mod as_value;
mod connection;
mod driver;
mod executor;
mod expression;
mod join;
mod prepared;
mod query;
mod schema;
mod statement;
mod table_ref;
mod transaction;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use connection::*;
pub use driver::*;
pub use executor::*;
pub use expression::*;
pub use join::*;
pub use prepared::*;
pub use query::*;
pub use schema::*;
pub use statement::*;
pub use table_ref::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub use writer::{ATOM_PRECEDENCE, Fragment, GenericSqlWriter, SqlWriter};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
