use bson::Document;
use mongodb::options::{Collation, DeleteOptions, Hint};

use crate::r#async::Collection;
use crate::selector::IntoDocument;

/// A querier to delete documents from a MongoDB collection.
///
/// Every matching document is deleted unless `many(false)` is set.
///
/// # Examples
///
/// Delete all inactive users.
///
/// ```no_run
/// # async fn doc() -> Result<(), mongodoc::Error> {
/// use mongodoc::{query, selector, Connection};
///
/// let connection = Connection::new("mongodb://127.0.0.1:27017", "app").await?;
/// let users = connection.collection("users");
///
/// let deleted = query::Delete::new()
///     .filter(selector!["active", false])?
///     .query(&users)
///     .await?;
///
/// println!("delete {} documents", deleted);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Delete {
    filter: Document,
    many: bool,
    options: DeleteOptions,
}

impl Default for Delete {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete {
    /// Constructs a `Delete` querier.
    pub fn new() -> Self {
        Self {
            filter: Document::new(),
            many: true,
            options: DeleteOptions::default(),
        }
    }

    /// The collation to use for the operation.
    ///
    /// Collation allows users to specify language-specific rules for string comparison, such as
    /// rules for lettercase and accent marks.
    pub fn collation(mut self, collation: Collation) -> Self {
        self.options.collation = Some(collation);
        self
    }

    /// The filter to use for the operation.
    ///
    /// # Errors
    ///
    /// This method errors if the filter could not be converted into a BSON `Document`.
    pub fn filter<Q: IntoDocument>(mut self, filter: Q) -> crate::Result<Self> {
        self.filter = filter.into_document()?;
        Ok(self)
    }

    /// The index to use for the operation.
    pub fn hint(mut self, hint: Hint) -> Self {
        self.options.hint = Some(hint);
        self
    }

    /// Delete all matching documents, or only the first one.
    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Query the database with this querier.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub async fn query(self, collection: &Collection) -> crate::Result<u64> {
        debug!("{}: delete {}", collection.name(), self.filter);
        let inner = collection.inner();
        let res = if self.many {
            inner.delete_many(self.filter, self.options).await
        } else {
            inner.delete_one(self.filter, self.options).await
        };
        res.map(|r| r.deleted_count)
            .map_err(collection.failed("delete"))
    }

    /// Query the database with this querier in a blocking context.
    ///
    /// # Optional
    ///
    /// This requires the optional `blocking` feature to be enabled.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    #[cfg(feature = "blocking")]
    pub fn blocking(self, collection: &crate::blocking::Collection) -> crate::Result<u64> {
        let resp = collection.execute(|name| crate::blocking::Request::Delete(name, self))?;
        if let crate::blocking::Response::Delete(deleted) = resp {
            return Ok(deleted);
        }
        Err(crate::error::runtime(
            "incorrect response from blocking client",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_many_by_default() {
        let delete = Delete::new();
        assert!(delete.many);
        assert!(delete.filter.is_empty());
        assert!(!delete.many(false).many);
    }
}
