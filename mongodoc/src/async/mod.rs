mod bulk;
mod collection;
mod connection;
mod cursor;

pub use self::bulk::BulkOperation;
pub use self::collection::Collection;
pub use self::connection::{ClientBuilder, Connection};
pub use self::cursor::Cursor;
