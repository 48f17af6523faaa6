//! # Mongodoc Derive
//!
//! This crate provides the `Selector` derive for the [`mongodoc`][mongodoc] crate.
//!
//! ## Examples
//!
//! ```
//! use mongodoc::{IntoDocument, Selector};
//! use mongodoc::bson::doc;
//!
//! #[derive(mongodoc_derive::Selector)]
//! pub struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! let user = User { name: "foo".to_owned(), age: 42 };
//! assert_eq!(
//!     Selector::from(user).into_document().unwrap(),
//!     doc! { "name": "foo", "age": 42 }
//! );
//! ```
//!
//! [mongodoc]: https://docs.rs/mongodoc
#[macro_use]
extern crate quote;
#[macro_use]
extern crate syn;

use proc_macro::TokenStream;
use syn::DeriveInput;

mod ast;
mod selector;

/// Derives `From<T>` for `mongodoc::Selector` and `IntoDocument` for `T`.
///
/// Every field is set under its own name, in declaration order. Field types must convert into a
/// `mongodoc::Token`.
///
/// ## Container Attributes
///
/// - `#[selector(rename_all = "...")]`: renames every field, one of `camelCase`, `snake_case`,
///   `PascalCase`, `kebab-case` or `SCREAMING_SNAKE_CASE`
///
/// ```
/// # use mongodoc::{IntoDocument, Selector};
/// # use mongodoc::bson::doc;
/// #[derive(mongodoc_derive::Selector)]
/// #[selector(rename_all = "camelCase")]
/// struct Event {
///     created_at: i64,
/// }
///
/// let event = Event { created_at: 0 };
/// assert_eq!(event.into_document().unwrap(), doc! { "createdAt": 0_i64 });
/// ```
///
/// ## Field Attributes
///
/// - `#[selector(rename = "...")]`: sets the field under the given key
/// - `#[selector(skip)]`: leaves the field out of the selector
///
/// ```
/// # use mongodoc::{IntoDocument, Selector};
/// # use mongodoc::bson::doc;
/// #[derive(mongodoc_derive::Selector)]
/// struct User {
///     #[selector(rename = "_id")]
///     id: mongodoc::Oid,
///     name: String,
///     #[selector(skip)]
///     cache: Vec<String>,
/// }
///
/// let user = User { id: mongodoc::Oid::default(), name: "foo".to_owned(), cache: vec![] };
/// assert_eq!(
///     user.into_document().unwrap(),
///     doc! { "_id": mongodoc::Oid::default().raw(), "name": "foo" }
/// );
/// ```
#[proc_macro_derive(Selector, attributes(selector))]
pub fn derive_selector(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    selector::expand_derive_selector(&input)
        .unwrap_or_else(to_compile_errors)
        .into()
}

fn to_compile_errors(errors: Vec<syn::Error>) -> proc_macro2::TokenStream {
    let compile_errors = errors.iter().map(syn::Error::to_compile_error);
    quote!(#(#compile_errors)*)
}
