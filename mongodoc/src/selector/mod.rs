//! The operator-based document builder.
//!
//! A [`Selector`] is built by streaming tokens into it with `<<`. String tokens alternate between
//! keys and values: a string pushed while no key is pending becomes the next key, and any value
//! pushed afterwards is stored under it. An [`Array`] has no keys, every token is appended at the
//! next index.
//!
//! ```
//! use mongodoc::{array, selector, IntoDocument, Null, Selector};
//! use mongodoc::bson::doc;
//!
//! let query = Selector::new()
//!     << "name" << "foo"
//!     << "age" << selector!["$gt", 18]
//!     << "tags" << array!["a", "b"]
//!     << "deleted" << Null;
//!
//! assert_eq!(
//!     query.into_document().unwrap(),
//!     doc! {
//!         "name": "foo",
//!         "age": { "$gt": 18 },
//!         "tags": ["a", "b"],
//!         "deleted": null,
//!     }
//! );
//! ```
use std::fmt;
use std::ops::Shl;

use bson::oid::ObjectId;
use bson::Bson;
use serde::Serialize;

use crate::document::Document;
use crate::element::{find_descendant, Element, Iter};
use crate::error::Error;
use crate::oid::Oid;

mod array;

pub use self::array::Array;

/// Builds a [`Selector`] from a list of tokens.
///
/// `selector![a, b, c]` is the same as `Selector::new() << a << b << c`.
#[macro_export]
macro_rules! selector {
    () => {
        $crate::Selector::new()
    };
    ($($token:expr),+ $(,)?) => {
        $crate::Selector::new() $(<< $token)+
    };
}

/// Builds an [`Array`] from a list of tokens.
///
/// `array![a, b, c]` is the same as `Array::new() << a << b << c`.
#[macro_export]
macro_rules! array {
    () => {
        $crate::Array::new()
    };
    ($($token:expr),+ $(,)?) => {
        $crate::Array::new() $(<< $token)+
    };
}

/// Used to convert a type into the BSON [`Document`](bson::Document) sent to the driver.
///
/// Every collection operation accepts `impl IntoDocument`, so selectors, update helpers and plain
/// BSON documents can be used interchangeably.
pub trait IntoDocument {
    /// Converts into a BSON `Document`.
    fn into_document(self) -> crate::Result<bson::Document>;
}

impl IntoDocument for bson::Document {
    fn into_document(self) -> crate::Result<bson::Document> {
        Ok(self)
    }
}

impl IntoDocument for Document {
    fn into_document(self) -> crate::Result<bson::Document> {
        Ok(self.into_inner())
    }
}

/// The BSON null value as a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// A single token that can be streamed into a [`Selector`] or an [`Array`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A string, which is a key or a value depending on the builder state.
    Str(String),
    /// Any other value.
    Value(Bson),
    /// A document, nested under the pending key or merged when there is none.
    Document(bson::Document),
    /// A nested builder that was misused.
    Invalid(String),
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Str(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Str(value)
    }
}

impl From<&String> for Token {
    fn from(value: &String) -> Self {
        Token::Str(value.clone())
    }
}

// NOTE: The scalar conversions are spelled out since a blanket `Into<Bson>` would swallow strings.
macro_rules! token_from_value {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Token {
                fn from(value: $source) -> Self {
                    Token::Value(value.into())
                }
            }
        )*
    };
}
token_from_value!(bool, i32, i64, f32, f64, Oid, ObjectId, bson::DateTime, Bson);

impl From<Null> for Token {
    fn from(_: Null) -> Self {
        Token::Value(Bson::Null)
    }
}

impl<T: Into<Token>> From<Option<T>> for Token {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Token::Value(Bson::Null),
        }
    }
}

impl<T: Into<Bson>> From<Vec<T>> for Token {
    fn from(values: Vec<T>) -> Self {
        Token::Value(Bson::Array(values.into_iter().map(Into::into).collect()))
    }
}

impl From<bson::Document> for Token {
    fn from(document: bson::Document) -> Self {
        Token::Document(document)
    }
}

impl From<Document> for Token {
    fn from(document: Document) -> Self {
        Token::Document(document.into_inner())
    }
}

impl From<Selector> for Token {
    fn from(selector: Selector) -> Self {
        match selector.check() {
            Ok(()) => Token::Document(selector.document),
            Err(e) => Token::Invalid(e),
        }
    }
}

impl From<&Selector> for Token {
    fn from(selector: &Selector) -> Self {
        Token::from(selector.clone())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Token {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Token::Value(Bson::DateTime(bson::DateTime::from_chrono(value)))
    }
}

/// A BSON document builder with an implicit current key.
///
/// See the [module documentation](self) for the token rules. Misuse, such as pushing a value
/// while no key is pending, does not panic: the first error is kept and reported when the
/// selector is converted with [`IntoDocument`].
///
/// # Examples
///
/// Concatenating two selectors.
///
/// ```
/// use mongodoc::{selector, IntoDocument};
/// use mongodoc::bson::doc;
///
/// let by_name = selector!["name", "foo"];
/// let by_age = selector!["age", 42];
///
/// let both = by_name << by_age;
/// assert_eq!(both.into_document().unwrap(), doc! { "name": "foo", "age": 42 });
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    document: bson::Document,
    key: Option<String>,
    error: Option<String>,
}

impl Selector {
    /// Constructs an empty `Selector`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a selector matching a document by its `_id`.
    pub fn by_id<O: Into<Oid>>(oid: O) -> Self {
        Selector::new() << "_id" << oid.into()
    }

    /// Constructs a selector matching a document by the hex representation of its `_id`.
    ///
    /// # Errors
    ///
    /// This method fails if `oid` is not a valid object id.
    pub fn by_id_str(oid: &str) -> crate::Result<Self> {
        Ok(Self::by_id(Oid::parse(oid)?))
    }

    /// Constructs a selector that checks whether `field` exists.
    pub fn exists(field: &str, value: bool) -> Self {
        Selector::new() << field << (Selector::new() << "$exists" << value)
    }

    /// Constructs a selector from any serialisable value.
    ///
    /// # Errors
    ///
    /// This method fails if the value does not serialise into a BSON document.
    pub fn serialize<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Selector::from(bson::to_document(value)?))
    }

    /// Streams a token into the selector.
    pub fn push<T: Into<Token>>(&mut self, token: T) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match (self.key.take(), token.into()) {
            (_, Token::Invalid(e)) => self.error = Some(e),
            (None, Token::Str(key)) => {
                if key.is_empty() {
                    self.error = Some("keys must not be empty".to_owned());
                } else {
                    self.key = Some(key);
                }
            }
            (Some(key), Token::Str(value)) => {
                self.document.insert(key, value);
            }
            (Some(key), Token::Value(value)) => {
                self.document.insert(key, value);
            }
            (Some(key), Token::Document(document)) => {
                self.document.insert(key, document);
            }
            (None, Token::Document(document)) => {
                for (key, value) in document {
                    self.document.insert(key, value);
                }
            }
            (None, Token::Value(value)) => {
                self.error = Some(format!("value `{}` has no key", value));
            }
        }
        self
    }

    /// Sets `key` to `value`, regardless of any pending key.
    ///
    /// Strings are always stored as values.
    pub fn set<K: Into<String>, T: Into<Token>>(&mut self, key: K, value: T) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let key = key.into();
        if key.is_empty() {
            self.error = Some("keys must not be empty".to_owned());
            return self;
        }
        match value.into() {
            Token::Str(value) => {
                self.document.insert(key, value);
            }
            Token::Value(value) => {
                self.document.insert(key, value);
            }
            Token::Document(document) => {
                self.document.insert(key, document);
            }
            Token::Invalid(e) => self.error = Some(e),
        }
        self
    }

    /// Sets `key` to null.
    pub fn set_null<K: Into<String>>(&mut self, key: K) -> &mut Self {
        self.set(key, Null)
    }

    /// Sets `key` to an embedded document.
    pub fn set_document<K: Into<String>>(&mut self, key: K, value: Selector) -> &mut Self {
        self.set(key, value)
    }

    /// Sets `key` to an array.
    pub fn set_array<K: Into<String>>(&mut self, key: K, value: Array) -> &mut Self {
        self.set(key, value)
    }

    /// Returns the number of fields built so far.
    pub fn len(&self) -> usize {
        self.document.len()
    }

    /// Whether no fields have been built yet.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Returns an iterator over the fields built so far.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.document)
    }

    /// Finds the field at the dotted `path`.
    pub fn find(&self, path: &str) -> Option<Element<'_>> {
        find_descendant(&self.document, path)
    }

    /// Returns the fields built so far as relaxed extended JSON.
    pub fn to_json(&self) -> String {
        Bson::Document(self.document.clone())
            .into_relaxed_extjson()
            .to_string()
    }

    fn check(&self) -> Result<(), String> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        if let Some(key) = &self.key {
            return Err(format!("key '{}' has no value", key));
        }
        Ok(())
    }
}

impl From<bson::Document> for Selector {
    fn from(document: bson::Document) -> Self {
        Selector {
            document,
            key: None,
            error: None,
        }
    }
}

impl IntoDocument for Selector {
    fn into_document(self) -> crate::Result<bson::Document> {
        self.check().map_err(Error::invalid_selector)?;
        Ok(self.document)
    }
}

impl IntoDocument for &Selector {
    fn into_document(self) -> crate::Result<bson::Document> {
        self.check().map_err(Error::invalid_selector)?;
        Ok(self.document.clone())
    }
}

impl<T: Into<Token>> Shl<T> for Selector {
    type Output = Selector;

    fn shl(mut self, token: T) -> Selector {
        self.push(token);
        self
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
