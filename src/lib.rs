//! RedDatabase/Firebird adapter: the dialect-neutral query tree of `redbird-core` rendered
//! and executed by the `firebird` backend.

pub use redbird_core::*;
pub use redbird_firebird as firebird;
