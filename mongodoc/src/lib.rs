//! # Mongodoc
//!
//! The `mongodoc` crate aims to provide a convenient, document oriented wrapper on top of the
//! official `bson` & `mongodb` crates.
//!
//! It provides the following:
//!
//! - Async and [blocking][blocking] connections
//! - Collection, cursor and bulk handles that release their resources on drop
//! - A streaming [`Selector`] builder for queries, updates and index keys
//! - A [`Document`] type with typed, path based accessors
//!
//! The [`mongodoc::Connection`][connection] is asynchronous. For applications that need a
//! synchronous solution, the [`mongodoc::blocking`][blocking] API can be used.
//!
//! ## Building selectors
//!
//! Selectors are built by streaming tokens, strings alternate between keys and values.
//!
//! ```
//! use mongodoc::{array, selector, IntoDocument};
//! use mongodoc::bson::doc;
//!
//! let query = selector!["age", selector!["$gte", 18], "tags", selector!["$in", array!["a", "b"]]];
//! assert_eq!(
//!     query.into_document().unwrap(),
//!     doc! { "age": { "$gte": 18 }, "tags": { "$in": ["a", "b"] } }
//! );
//! ```
//!
//! ## Making requests
//!
//! Every operation lives on a [`Collection`], for more control over the driver options see the
//! individual queriers:
//!
//! - [`Delete`](query::Delete): Delete documents from a collection
//! - [`Find`](query::Find): Fetch documents from a collection
//! - [`Insert`](query::Insert): Insert documents into a collection
//! - [`Update`](query::Update): Update or replace documents in a collection
//!
//! ```no_run
//! # async fn doc() -> Result<(), mongodoc::Error> {
//! use mongodoc::{selector, Connection, Selector, Updates};
//!
//! let connection = Connection::new("mongodb://127.0.0.1:27017", "app").await?;
//! let users = connection.collection("users");
//!
//! let id = users.insert(selector!["name", "foo", "age", 42]).await?;
//! println!("inserted {}", id);
//!
//! let updated = users
//!     .update(selector!["name", "foo"], Updates::set(selector!["age", 43]))
//!     .await?;
//! println!("updated {} documents", updated);
//!
//! let mut cursor = users.find(Selector::new()).await?;
//! while let Some(user) = cursor.next().await? {
//!     println!("{} is {}", user.string("name")?, user.integer("age")?);
//! }
//!
//! let removed = users.remove(selector!["name", "foo"]).await?;
//! println!("removed {} documents", removed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! The following are a list of [Cargo Features][cargo-features] that can be enabled or disabled:
//!
//! - **blocking**: Provides the [blocking][] connection API.
//! - **chrono**: Provides [chrono][chrono] support for dates in selectors and documents.
//! - **derive**: Provides the `Selector` derive macro from the [mongodoc-derive][derive] crate.
//!
//! [blocking]: ./blocking/index.html
//! [connection]: ./struct.Connection.html
//! [chrono]: https://docs.rs/chrono
//! [derive]: ../mongodoc_derive/index.html
//! [cargo-features]: https://doc.rust-lang.org/stable/cargo/reference/manifest.html#the-features-section

#![deny(missing_docs)]
#![deny(unused_imports)]

pub extern crate bson;
#[macro_use]
extern crate log;
pub extern crate mongodb as db;

pub use self::document::Document;
pub use self::element::{Element, Iter, ValueType};
pub use self::error::{Error, Kind as ErrorKind};
pub use self::oid::Oid;
pub use self::r#async::{BulkOperation, ClientBuilder, Collection, Connection, Cursor};
pub use self::selector::{Array, IntoDocument, Null, Selector, Token};
pub use self::update::Updates;

pub(crate) use error::Result;

mod r#async;
#[cfg(feature = "blocking")]
pub mod blocking;
mod document;
mod element;
mod error;
mod oid;
pub mod query;
mod selector;
mod update;

#[cfg(feature = "mongodoc-derive")]
#[doc(hidden)]
pub use mongodoc_derive::*;
