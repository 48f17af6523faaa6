use bson::Document;

use crate::selector::{IntoDocument, Selector};

/// Used for updates using MongoDB's update operators.
///
/// Each operator takes a [`Selector`] of fields, operators that are left as `None` are omitted.
/// At least one operator must be set.
///
/// # NOTE
///
/// Not all operators are implemented yet...
///
/// # Examples
///
/// Rename a user and bump their login count.
///
/// ```
/// use mongodoc::{selector, IntoDocument, Updates};
/// use mongodoc::bson::doc;
///
/// let updates = Updates {
///     set: Some(selector!["name", "bar"]),
///     inc: Some(selector!["logins", 1]),
///     ..Updates::default()
/// };
///
/// assert_eq!(
///     updates.into_document().unwrap(),
///     doc! { "$set": { "name": "bar" }, "$inc": { "logins": 1 } }
/// );
/// ```
// TODO: Implement the other update operators: https://docs.mongodb.com/manual/reference/operator/update/#id1
#[derive(Clone, Debug, Default)]
pub struct Updates {
    /// Sets the value of a field in a document.
    pub set: Option<Selector>,
    /// Removes the specified field from a document.
    pub unset: Option<Selector>,
    /// Increments the value of the field by the specified amount.
    pub inc: Option<Selector>,
    /// Appends a specified value to an array.
    pub push: Option<Selector>,
}

impl Updates {
    /// Convenience constructor for a `$set` only update.
    pub fn set(fields: Selector) -> Self {
        Updates {
            set: Some(fields),
            ..Updates::default()
        }
    }
}

impl IntoDocument for Updates {
    fn into_document(self) -> crate::Result<Document> {
        let mut document = Document::new();
        for (operator, fields) in [
            ("$set", self.set),
            ("$unset", self.unset),
            ("$inc", self.inc),
            ("$push", self.push),
        ] {
            if let Some(fields) = fields {
                document.insert(operator, fields.into_document()?);
            }
        }
        if document.is_empty() {
            return Err(crate::Error::invalid_document(
                "an update needs at least one operator",
            ));
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;

    use crate::{selector, ErrorKind};

    #[test]
    fn empty_updates_are_rejected() {
        let err = Updates::default().into_document().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidDocument);
    }

    #[test]
    fn operators_in_order() {
        let updates = Updates {
            unset: Some(selector!["email", ""]),
            push: Some(selector!["tags", "new"]),
            ..Updates::set(selector!["name", "foo"])
        };
        assert_eq!(
            updates.into_document().unwrap(),
            doc! {
                "$set": { "name": "foo" },
                "$unset": { "email": "" },
                "$push": { "tags": "new" },
            }
        );
    }

    #[test]
    fn selector_errors_propagate() {
        let updates = Updates::set(selector!["dangling"]);
        assert!(updates.into_document().is_err());
    }
}
