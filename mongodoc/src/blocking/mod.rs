//! A blocking Connection API.
//!
//! The blocking `Connection` will block the current thread to execute, instead of returning
//! futures that need to be executed on a runtime.
//!
//! # Optional
//!
//! This requires the optional `blocking` feature to be enabled.
//!
//! # Making requests
//!
//! This connection functions in the same way as the async `Connection` except it blocks, here is
//! an example to fetch users from a collection.
//!
//! ```no_run
//! use mongodoc::selector;
//!
//! # fn doc() -> Result<(), mongodoc::Error> {
//! let connection = mongodoc::blocking::Connection::new("mongodb://127.0.0.1:27017", "app")?;
//! let users = connection.collection("users");
//!
//! for user in users.find(selector!["age", selector!["$gte", 18]])? {
//!     println!("{}", user?.string("name")?);
//! }
//! # Ok(())
//! # }
//! ```

mod bulk;
mod collection;
mod connection;
mod cursor;

pub use self::bulk::BulkOperation;
pub use self::collection::Collection;
pub use self::connection::{ClientBuilder, Connection};
pub(crate) use self::connection::{Request, Response};
pub use self::cursor::Cursor;
