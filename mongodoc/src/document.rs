use std::collections::BTreeSet;
use std::fmt;

use bson::Bson;
use serde::de::DeserializeOwned;

use crate::element::{find_descendant, type_mismatch, Element, Iter, ValueType};
use crate::oid::Oid;

/// A document returned by the database.
///
/// `Document` owns a BSON [`Document`](bson::Document) and offers typed accessors over it. All
/// accessors take a dotted path (`"address.city"`, `"tags.0"`) that descends into embedded
/// documents and arrays.
///
/// A missing field yields a neutral value (`""`, `0`, the zero [`Oid`], `None` or an empty
/// collection). A field that exists with the wrong type is an error.
///
/// # Examples
///
/// ```
/// use mongodoc::Document;
/// use mongodoc::bson::doc;
///
/// let document = Document::from(doc! {
///     "name": "foo",
///     "scores": [1.5, 2.5],
///     "address": { "city": "Helsinki" },
/// });
///
/// assert_eq!(document.string("name").unwrap(), "foo");
/// assert_eq!(document.string("address.city").unwrap(), "Helsinki");
/// assert_eq!(document.numbers("scores").unwrap(), vec![1.5, 2.5]);
/// assert_eq!(document.integer("missing").unwrap(), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    document: bson::Document,
}

impl Document {
    /// Constructs an empty `Document`.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_array(items: &[Bson]) -> Self {
        let mut document = bson::Document::new();
        for (i, item) in items.iter().enumerate() {
            document.insert(i.to_string(), item.clone());
        }
        Document { document }
    }

    /// Returns the wrapped BSON document.
    pub fn value(&self) -> &bson::Document {
        &self.document
    }

    /// Consumes the `Document` returning the wrapped BSON document.
    pub fn into_inner(self) -> bson::Document {
        self.document
    }

    /// Returns the `_id` of the document.
    pub fn id(&self) -> crate::Result<Oid> {
        self.object_id("_id")
    }

    /// Returns the `ObjectId` at `path`, or the zero `Oid` if it is missing.
    pub fn object_id(&self, path: &str) -> crate::Result<Oid> {
        match self.find(path) {
            Some(e) => e.to_object_id(),
            None => Ok(Oid::default()),
        }
    }

    /// Returns the string at `path`, or `""` if it is missing.
    pub fn string(&self, path: &str) -> crate::Result<&str> {
        match self.find(path) {
            Some(e) => e.to_str(),
            None => Ok(""),
        }
    }

    /// Returns the number at `path`, or `0.0` if it is missing.
    pub fn number(&self, path: &str) -> crate::Result<f64> {
        match self.find(path) {
            Some(e) => e.to_double(),
            None => Ok(0.0),
        }
    }

    /// Returns the integer at `path`, or `0` if it is missing.
    pub fn integer(&self, path: &str) -> crate::Result<i32> {
        match self.find(path) {
            Some(e) => e.to_int(),
            None => Ok(0),
        }
    }

    /// Returns the boolean at `path`, or `false` if it is missing.
    pub fn boolean(&self, path: &str) -> crate::Result<bool> {
        match self.find(path) {
            Some(e) => e.to_bool(),
            None => Ok(false),
        }
    }

    /// Returns the array at `path` as a document keyed by index.
    pub fn array(&self, path: &str) -> crate::Result<Option<Document>> {
        self.find(path).map(|e| e.to_array()).transpose()
    }

    /// Returns the embedded document at `path`.
    pub fn object(&self, path: &str) -> crate::Result<Option<Document>> {
        self.find(path).map(|e| e.to_object()).transpose()
    }

    /// Returns the date at `path`.
    ///
    /// # Optional
    ///
    /// This requires the optional `chrono` feature to be enabled.
    #[cfg(feature = "chrono")]
    pub fn date(&self, path: &str) -> crate::Result<Option<chrono::DateTime<chrono::Utc>>> {
        match self.find(path) {
            Some(e) => match e.value() {
                Bson::DateTime(dt) => Ok(Some(dt.to_chrono())),
                other => Err(type_mismatch(e.key(), ValueType::DateTime, other.into())),
            },
            None => Ok(None),
        }
    }

    /// Returns the top level keys of the document, sorted.
    pub fn keys(&self) -> BTreeSet<String> {
        self.document.keys().cloned().collect()
    }

    /// Returns the integers in the array at `path` as a set.
    pub fn integer_set(&self, path: &str) -> crate::Result<BTreeSet<i32>> {
        self.elements(path)?
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Bson::Int32(n) => Ok(*n),
                other => Err(type_mismatch(&index(path, i), ValueType::Int32, other.into())),
            })
            .collect()
    }

    /// Returns the numbers in the array at `path`, narrowed to `f32`.
    pub fn numbers(&self, path: &str) -> crate::Result<Vec<f32>> {
        self.elements(path)?
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Bson::Double(n) => Ok(*n as f32),
                other => Err(type_mismatch(&index(path, i), ValueType::Double, other.into())),
            })
            .collect()
    }

    /// Returns the strings in the array at `path`.
    pub fn strings(&self, path: &str) -> crate::Result<Vec<String>> {
        self.elements(path)?
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Bson::String(s) => Ok(s.clone()),
                other => Err(type_mismatch(&index(path, i), ValueType::String, other.into())),
            })
            .collect()
    }

    /// Returns an iterator over the top level elements.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.document)
    }

    /// Finds the element at `path`.
    pub fn find(&self, path: &str) -> Option<Element<'_>> {
        find_descendant(&self.document, path)
    }

    /// Deserialises the document into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(bson::from_document(self.document.clone())?)
    }

    /// Returns the document as relaxed extended JSON.
    pub fn to_json(&self) -> String {
        Bson::Document(self.document.clone())
            .into_relaxed_extjson()
            .to_string()
    }

    fn elements(&self, path: &str) -> crate::Result<&[Bson]> {
        match self.find(path) {
            Some(e) => match e.value() {
                Bson::Array(items) => Ok(items.as_slice()),
                other => Err(type_mismatch(e.key(), ValueType::Array, other.into())),
            },
            None => Ok(&[]),
        }
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}.{}", path, i)
}

impl From<bson::Document> for Document {
    fn from(document: bson::Document) -> Self {
        Document { document }
    }
}

impl From<Document> for bson::Document {
    fn from(document: Document) -> Self {
        document.document
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;
    use bson::oid::ObjectId;
    use serde::Deserialize;

    use crate::error::Kind;

    fn sample() -> Document {
        Document::from(doc! {
            "_id": ObjectId::parse_str("5f3ad9e0b3c5a1a6c8e4d2f1").unwrap(),
            "name": "foo",
            "age": 42,
            "score": 7.5,
            "active": true,
            "ids": [3, 1, 2, 3],
            "weights": [0.5, 0.25],
            "tags": ["a", "b"],
            "address": { "city": "Helsinki", "zip": "00100" },
        })
    }

    #[test]
    fn scalar_accessors() {
        let doc = sample();
        assert_eq!(doc.id().unwrap().to_string(), "5f3ad9e0b3c5a1a6c8e4d2f1");
        assert_eq!(doc.string("name").unwrap(), "foo");
        assert_eq!(doc.integer("age").unwrap(), 42);
        assert_eq!(doc.number("score").unwrap(), 7.5);
        assert_eq!(doc.number("age").unwrap(), 42.0);
        assert!(doc.boolean("active").unwrap());
    }

    #[test]
    fn missing_fields_are_neutral() {
        let doc = Document::new();
        assert!(doc.id().unwrap().is_zero());
        assert_eq!(doc.string("name").unwrap(), "");
        assert_eq!(doc.integer("age").unwrap(), 0);
        assert_eq!(doc.number("score").unwrap(), 0.0);
        assert!(doc.array("ids").unwrap().is_none());
        assert!(doc.object("address").unwrap().is_none());
        assert!(doc.integer_set("ids").unwrap().is_empty());
        assert!(doc.strings("tags").unwrap().is_empty());
    }

    #[test]
    fn wrong_types_are_errors() {
        let doc = sample();
        assert_eq!(*doc.integer("name").unwrap_err().kind(), Kind::InvalidDocument);
        assert!(doc.string("age").is_err());
        assert!(doc.object("tags").is_err());
        assert!(doc.numbers("ids").is_err());
        assert!(doc.strings("name").is_err());
    }

    #[test]
    fn collections() {
        let doc = sample();
        let ids: Vec<i32> = doc.integer_set("ids").unwrap().into_iter().collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(doc.numbers("weights").unwrap(), vec![0.5, 0.25]);
        assert_eq!(doc.strings("tags").unwrap(), vec!["a", "b"]);
        let tags = doc.array("tags").unwrap().unwrap();
        assert_eq!(tags.string("1").unwrap(), "b");
        let address = doc.object("address").unwrap().unwrap();
        assert_eq!(address.string("zip").unwrap(), "00100");
    }

    #[test]
    fn keys_are_sorted() {
        let doc = Document::from(doc! { "b": 1, "a": 2, "c": 3 });
        let keys: Vec<String> = doc.keys().into_iter().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn element_errors_name_the_index() {
        let doc = Document::from(doc! { "ids": [1, "two"] });
        let err = doc.integer_set("ids").unwrap_err();
        assert!(err.to_string().contains("ids.1"));
    }

    #[test]
    fn deserialize_into_struct() {
        #[derive(Deserialize)]
        struct Address {
            city: String,
        }
        let address: Address = sample().object("address").unwrap().unwrap().deserialize().unwrap();
        assert_eq!(address.city, "Helsinki");
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn dates() {
        let now = bson::DateTime::from_millis(1_600_000_000_000);
        let doc = Document::from(doc! { "at": now, "name": "foo" });
        assert_eq!(doc.date("at").unwrap(), Some(now.to_chrono()));
        assert_eq!(doc.date("missing").unwrap(), None);
        let err = doc.date("name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid document: field 'name' is of type string, expected date"
        );
    }

    #[test]
    fn json() {
        let doc = Document::from(doc! { "a": 1, "b": "x" });
        assert_eq!(doc.to_json(), r#"{"a":1,"b":"x"}"#);
    }
}
