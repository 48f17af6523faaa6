use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;

use crate::error::Error;

/// A MongoDB `ObjectId`.
///
/// This wraps the [`ObjectId`](bson::oid::ObjectId) so that it can be used as a token in a
/// [`Selector`](crate::Selector) and returned from [`Document`](crate::Document) accessors.
///
/// # Examples
///
/// ```
/// use mongodoc::Oid;
///
/// let oid: Oid = "5f3ad9e0b3c5a1a6c8e4d2f1".parse().unwrap();
/// assert_eq!(oid.to_string(), "5f3ad9e0b3c5a1a6c8e4d2f1");
/// assert_eq!(oid, Oid::parse("5f3ad9e0b3c5a1a6c8e4d2f1").unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(ObjectId);

impl Oid {
    /// Generates a new `Oid`.
    pub fn generate() -> Self {
        Oid(ObjectId::new())
    }

    /// Parses an `Oid` from its 24 character hex representation.
    ///
    /// # Errors
    ///
    /// This method fails if the string is not a valid hex encoded object id.
    pub fn parse<S: AsRef<str>>(value: S) -> crate::Result<Self> {
        ObjectId::parse_str(value.as_ref())
            .map(Oid)
            .map_err(Error::invalid_document)
    }

    /// Returns the raw bytes of this `Oid`.
    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }

    /// Returns the wrapped [`ObjectId`](bson::oid::ObjectId).
    pub fn raw(&self) -> ObjectId {
        self.0
    }

    /// Whether this is the all-zero id, i.e. what accessors return for missing fields.
    pub fn is_zero(&self) -> bool {
        self.0.bytes() == [0; 12]
    }
}

impl Default for Oid {
    fn default() -> Self {
        Oid(ObjectId::from_bytes([0; 12]))
    }
}

impl From<ObjectId> for Oid {
    fn from(oid: ObjectId) -> Self {
        Oid(oid)
    }
}

impl From<Oid> for ObjectId {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl From<Oid> for bson::Bson {
    fn from(oid: Oid) -> Self {
        bson::Bson::ObjectId(oid.0)
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Oid::parse(s)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.0.to_hex())
    }
}
