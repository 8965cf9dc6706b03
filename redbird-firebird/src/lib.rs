mod capabilities;
mod catalog;
mod config;
mod connection;
mod driver;
mod error;
pub mod native;
mod prepared;
pub mod quoting;
mod schema;
mod sql_writer;
mod transaction;
pub mod type_map;

pub use capabilities::*;
pub use config::*;
pub use connection::{RdbConnection, is_read_query};
pub use driver::*;
pub use error::*;
pub use native::{
    CursorGuard, Execution, NativeClient, NativeConnection, NativeCursor, NativeError,
    NativeField, NativeIndex, NativeResult,
};
pub use prepared::*;
pub use schema::*;
pub use sql_writer::*;
pub use transaction::*;
