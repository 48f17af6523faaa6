use std::ops::Shl;

use bson::Bson;

use super::Token;

/// A BSON array builder.
///
/// Every token pushed into an `Array` is appended at the next index, strings included.
///
/// # Examples
///
/// ```
/// use mongodoc::{array, selector, IntoDocument, Oid};
/// use mongodoc::bson::doc;
///
/// let ids = array![Oid::default(), "second", 3];
/// assert_eq!(ids.len(), 3);
///
/// let query = selector!["_id", selector!["$in", ids]];
/// assert_eq!(
///     query.into_document().unwrap(),
///     doc! { "_id": { "$in": [Oid::default().raw(), "second", 3] } }
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    items: Vec<Bson>,
    error: Option<String>,
}

impl Array {
    /// Constructs an empty `Array`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token at the next index.
    pub fn push<T: Into<Token>>(&mut self, token: T) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match token.into() {
            Token::Str(value) => self.items.push(Bson::String(value)),
            Token::Value(value) => self.items.push(value),
            Token::Document(document) => self.items.push(Bson::Document(document)),
            Token::Invalid(e) => self.error = Some(e),
        }
        self
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(super) fn into_bson(self) -> Result<Bson, String> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Bson::Array(self.items)),
        }
    }
}

impl From<Array> for Token {
    fn from(array: Array) -> Self {
        match array.into_bson() {
            Ok(value) => Token::Value(value),
            Err(e) => Token::Invalid(e),
        }
    }
}

impl<T: Into<Token>> Shl<T> for Array {
    type Output = Array;

    fn shl(mut self, token: T) -> Array {
        self.push(token);
        self
    }
}

impl<T: Into<Token>> Extend<T> for Array {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for token in iter {
            self.push(token);
        }
    }
}
