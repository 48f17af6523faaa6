use std::time::Duration;

use bson::Document;
use mongodb::options::{Collation, FindOptions, Hint};

use crate::r#async::{Collection, Cursor};
use crate::selector::IntoDocument;

/// A querier to find documents in a MongoDB collection.
///
/// # Examples
///
/// Find the ten oldest users.
///
/// ```no_run
/// # async fn doc() -> Result<(), mongodoc::Error> {
/// use mongodoc::{query, selector, Connection};
///
/// let connection = Connection::new("mongodb://127.0.0.1:27017", "app").await?;
/// let users = connection.collection("users");
///
/// let mut cursor = query::Find::new()
///     .filter(selector!["age", selector!["$exists", true]])?
///     .sort(selector!["age", -1])?
///     .limit(10)
///     .query(&users)
///     .await?;
/// while let Some(user) = cursor.next().await? {
///     println!("{}", user);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Find {
    filter: Document,
    options: FindOptions,
}

impl Find {
    /// Constructs a `Find` querier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables partial results.
    ///
    /// If true, partial results will be returned from a mongodb rather than an error being returned
    /// if one or more shards is down.
    pub fn allow_partial_results(mut self, enable: bool) -> Self {
        self.options.allow_partial_results = Some(enable);
        self
    }

    /// The number of documents the server should return per cursor batch.
    ///
    /// # Notes
    ///
    /// This does not have any affect on the documents that are returned by a cursor, only the
    /// number of documents kept in memory at a given time (and by extension, the number of round
    /// trips needed to return the entire set of documents returned by the query.
    pub fn batch_size(mut self, size: u32) -> Self {
        self.options.batch_size = Some(size);
        self
    }

    /// The collation to use for the operation.
    pub fn collation(mut self, value: Collation) -> Self {
        self.options.collation = Some(value);
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

    /// A document or string that specifies the index to use to support the query predicate.
    pub fn hint(mut self, value: Hint) -> Self {
        self.options.hint = Some(value);
        self
    }

    /// The maximum number of documents to query.
    ///
    /// If a negative number is specified, the documents will be returned in a single batch limited
    /// in number by the positive value of the specified limit.
    pub fn limit(mut self, value: i64) -> Self {
        self.options.limit = Some(value);
        self
    }

    /// The maximum amount of time to allow the query to run.
    pub fn max_time(mut self, duration: Duration) -> Self {
        self.options.max_time = Some(duration);
        self
    }

    /// Whether the server should close the cursor after a period of inactivity.
    pub fn no_cursor_timeout(mut self, enable: bool) -> Self {
        self.options.no_cursor_timeout = Some(enable);
        self
    }

    /// Limits the fields of the document being returned.
    ///
    /// # Errors
    ///
    /// This method errors if the projection could not be converted into a BSON `Document`.
    pub fn projection<P: IntoDocument>(mut self, projection: P) -> crate::Result<Self> {
        self.options.projection = Some(projection.into_document()?);
        Ok(self)
    }

    /// The number of documents to skip before returning.
    pub fn skip(mut self, value: u64) -> Self {
        self.options.skip = Some(value);
        self
    }

    /// The order in which to sort the documents of the operation.
    ///
    /// # Errors
    ///
    /// This method errors if the sort could not be converted into a BSON `Document`.
    pub fn sort<S: IntoDocument>(mut self, sort: S) -> crate::Result<Self> {
        self.options.sort = Some(sort.into_document()?);
        Ok(self)
    }

    /// Query the database with this querier.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub async fn query(self, collection: &Collection) -> crate::Result<Cursor> {
        debug!("{}: find {}", collection.name(), self.filter);
        let cursor = collection
            .inner()
            .find(self.filter.clone(), self.options.clone())
            .await
            .map_err(collection.failed("find"))?;
        Ok(Cursor::new(collection.clone(), self, cursor))
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
    pub fn blocking(
        self,
        collection: &crate::blocking::Collection,
    ) -> crate::Result<crate::blocking::Cursor> {
        let resp = collection.execute(|name| crate::blocking::Request::Find(name, self))?;
        if let crate::blocking::Response::Find(cursor) = resp {
            return Ok(crate::blocking::Cursor::new(
                cursor,
                collection.connection().clone(),
            ));
        }
        Err(crate::error::runtime(
            "incorrect response from blocking client",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;

    use crate::selector;

    #[test]
    fn collects_options() {
        let find = Find::new()
            .filter(selector!["name", "foo"])
            .unwrap()
            .sort(selector!["age", -1])
            .unwrap()
            .projection(selector!["_id", 0])
            .unwrap()
            .limit(5)
            .skip(10)
            .batch_size(2);
        assert_eq!(find.filter, doc! { "name": "foo" });
        assert_eq!(find.options.sort, Some(doc! { "age": -1 }));
        assert_eq!(find.options.projection, Some(doc! { "_id": 0 }));
        assert_eq!(find.options.limit, Some(5));
        assert_eq!(find.options.skip, Some(10));
        assert_eq!(find.options.batch_size, Some(2));
    }

    #[test]
    fn invalid_filter_is_rejected() {
        assert!(Find::new().filter(selector!["dangling"]).is_err());
    }
}
