//! The query operations that can be perfomed on a MongoDB collection.
//!
//! The [`Collection`](crate::Collection) methods cover the common cases, these queriers expose the
//! driver options for when more control is needed. Every querier can be run against an async
//! collection with `query`, or against a blocking collection with `blocking`.
mod delete;
mod find;
mod insert;
mod update;

pub use self::delete::Delete;
pub use self::find::Find;
pub use self::insert::Insert;
pub use self::update::Update;
