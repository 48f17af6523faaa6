use std::borrow::Cow;
use std::fmt;

use bson::Bson;

use crate::document::Document;
use crate::error::Error;
use crate::oid::Oid;

/// The BSON type of an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A null value.
    Null,
    /// A boolean.
    Boolean,
    /// A 64-bit floating point number.
    Double,
    /// A 32-bit integer.
    Int32,
    /// A 64-bit integer.
    Int64,
    /// A UTF-8 string.
    String,
    /// An `ObjectId`.
    ObjectId,
    /// An embedded document.
    Object,
    /// An array.
    Array,
    /// A UTC datetime.
    DateTime,
    /// Any other BSON type (binary, regexes, timestamps, ...).
    Other,
}

impl From<&Bson> for ValueType {
    fn from(value: &Bson) -> Self {
        match value {
            Bson::Null | Bson::Undefined => ValueType::Null,
            Bson::Boolean(_) => ValueType::Boolean,
            Bson::Double(_) => ValueType::Double,
            Bson::Int32(_) => ValueType::Int32,
            Bson::Int64(_) => ValueType::Int64,
            Bson::String(_) => ValueType::String,
            Bson::ObjectId(_) => ValueType::ObjectId,
            Bson::Document(_) => ValueType::Object,
            Bson::Array(_) => ValueType::Array,
            Bson::DateTime(_) => ValueType::DateTime,
            _ => ValueType::Other,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Double => "double",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::String => "string",
            ValueType::ObjectId => "objectId",
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::DateTime => "date",
            ValueType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single key/value pair of a BSON document.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    key: Cow<'a, str>,
    value: &'a Bson,
}

impl<'a> Element<'a> {
    pub(crate) fn new<K: Into<Cow<'a, str>>>(key: K, value: &'a Bson) -> Self {
        Element {
            key: key.into(),
            value,
        }
    }

    /// Returns the key of this element.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw value of this element.
    pub fn value(&self) -> &'a Bson {
        self.value
    }

    /// Returns the type of this element's value.
    pub fn value_type(&self) -> ValueType {
        ValueType::from(self.value)
    }

    /// Returns the boolean value.
    pub fn to_bool(&self) -> crate::Result<bool> {
        match self.value {
            Bson::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch(ValueType::Boolean)),
        }
    }

    /// Returns the string value.
    pub fn to_str(&self) -> crate::Result<&'a str> {
        match self.value {
            Bson::String(s) => Ok(s.as_str()),
            _ => Err(self.mismatch(ValueType::String)),
        }
    }

    /// Returns the integer value.
    ///
    /// 64-bit integers are accepted when they fit into 32 bits.
    pub fn to_int(&self) -> crate::Result<i32> {
        match self.value {
            Bson::Int32(i) => Ok(*i),
            Bson::Int64(i) if *i >= i32::MIN as i64 && *i <= i32::MAX as i64 => Ok(*i as i32),
            _ => Err(self.mismatch(ValueType::Int32)),
        }
    }

    /// Returns the double value.
    ///
    /// Integers are widened.
    pub fn to_double(&self) -> crate::Result<f64> {
        match self.value {
            Bson::Double(d) => Ok(*d),
            Bson::Int32(i) => Ok(*i as f64),
            Bson::Int64(i) => Ok(*i as f64),
            _ => Err(self.mismatch(ValueType::Double)),
        }
    }

    /// Returns the `ObjectId` value.
    pub fn to_object_id(&self) -> crate::Result<Oid> {
        match self.value {
            Bson::ObjectId(oid) => Ok(Oid::from(*oid)),
            _ => Err(self.mismatch(ValueType::ObjectId)),
        }
    }

    /// Returns a copy of the embedded document.
    pub fn to_object(&self) -> crate::Result<Document> {
        match self.value {
            Bson::Document(doc) => Ok(Document::from(doc.clone())),
            _ => Err(self.mismatch(ValueType::Object)),
        }
    }

    /// Returns a copy of the array as a document keyed by index.
    pub fn to_array(&self) -> crate::Result<Document> {
        match self.value {
            Bson::Array(items) => Ok(Document::from_array(items)),
            _ => Err(self.mismatch(ValueType::Array)),
        }
    }

    fn mismatch(&self, expected: ValueType) -> Error {
        type_mismatch(&self.key, expected, self.value_type())
    }
}

pub(crate) fn type_mismatch(key: &str, expected: ValueType, found: ValueType) -> Error {
    Error::invalid_document(format!(
        "field '{}' is of type {}, expected {}",
        key, found, expected
    ))
}

/// An iterator over the [`Element`]s of a document.
pub struct Iter<'a> {
    inner: bson::document::Iter<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(document: &'a bson::Document) -> Self {
        Iter {
            inner: document.iter(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| Element::new(k.as_str(), v))
    }
}

/// Finds a descendant of `document` using a dotted path, i.e. `a.b.0`.
///
/// Array elements are addressed by their index.
pub(crate) fn find_descendant<'a>(document: &'a bson::Document, path: &str) -> Option<Element<'a>> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut key = first;
    let mut value = document.get(first)?;
    for segment in segments {
        value = match value {
            Bson::Document(doc) => doc.get(segment)?,
            Bson::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
        key = segment;
    }
    Some(Element::new(key.to_owned(), value))
}
