use bson::Bson;

use super::connection::{Connection, Request, Response};
use super::{BulkOperation, Cursor};
use crate::document::Document;
use crate::query;
use crate::selector::{IntoDocument, Selector};

/// A blocking handle to a collection of untyped documents.
///
/// This mirrors the async [`Collection`](crate::Collection), please see it for a description of
/// each operation.
#[derive(Clone)]
pub struct Collection {
    connection: Connection,
    name: String,
}

impl Collection {
    pub(crate) fn new(connection: Connection, name: &str) -> Self {
        Self {
            connection,
            name: name.to_owned(),
        }
    }

    /// Returns the name of the collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.connection
    }

    pub(crate) fn execute<F>(&self, req: F) -> crate::Result<Response>
    where
        F: FnOnce(String) -> Request,
    {
        self.connection.execute(req(self.name.clone()))
    }

    fn unexpected<T>() -> crate::Result<T> {
        Err(crate::error::runtime(
            "incorrect response from blocking client",
        ))
    }

    /// Drops the collection along with its indexes.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn drop(&self) -> crate::Result<()> {
        match self.execute(Request::Drop)? {
            Response::Done => Ok(()),
            _ => Self::unexpected(),
        }
    }

    /// Finds every document matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub fn find<Q: IntoDocument>(&self, query: Q) -> crate::Result<Cursor> {
        query::Find::new().filter(query)?.blocking(self)
    }

    /// Finds the first document matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub fn find_one<Q: IntoDocument>(&self, query: Q) -> crate::Result<Option<Document>> {
        let mut cursor = query::Find::new().filter(query)?.limit(1).blocking(self)?;
        cursor.next().transpose()
    }

    /// Updates the first document matching `query`, returning the number of documents matched.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    pub fn update<Q, U>(&self, query: Q, value: U) -> crate::Result<u64>
    where
        Q: IntoDocument,
        U: IntoDocument,
    {
        let res = query::Update::new().filter(query)?.blocking(self, value)?;
        Ok(res.matched_count)
    }

    /// Updates the first document matching `query`, inserting it if there is none.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    pub fn upsert<Q, U>(&self, query: Q, value: U) -> crate::Result<u64>
    where
        Q: IntoDocument,
        U: IntoDocument,
    {
        let res = query::Update::new()
            .upsert(true)
            .filter(query)?
            .blocking(self, value)?;
        Ok(res.matched_count + res.upserted_id.map_or(0, |_| 1))
    }

    /// Inserts a document, returning its `_id`.
    ///
    /// # Errors
    ///
    /// This method fails if the document could not be built, or the mongodb encountered an error.
    pub fn insert<D: IntoDocument>(&self, value: D) -> crate::Result<Bson> {
        let inserted = query::Insert::new().blocking(self, vec![value])?;
        inserted
            .into_iter()
            .next()
            .map(|(_, id)| id)
            .ok_or_else(|| crate::error::mongodb("failed to insert document into mongo"))
    }

    /// Deletes every document matching `query`, returning how many were deleted.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub fn remove<Q: IntoDocument>(&self, query: Q) -> crate::Result<u64> {
        query::Delete::new().filter(query)?.blocking(self)
    }

    /// Counts the documents matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub fn count<Q: IntoDocument>(&self, query: Q) -> crate::Result<u64> {
        let filter = query.into_document()?;
        match self.execute(|name| Request::Count(name, filter))? {
            Response::Count(count) => Ok(count),
            _ => Self::unexpected(),
        }
    }

    /// Copies every document of `other` into this collection, without their `_id`.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn merge_with(&self, other: &Collection, drop: bool) -> crate::Result<u64> {
        info!("{}: merging from {}", self.name(), other.name());
        let mut bulk = self.create_bulk_operation();
        for document in other.find(Selector::new())? {
            let mut document = document?.into_inner();
            document.remove("_id");
            bulk.insert(document)?;
        }
        let merged = bulk.flush()?;
        if drop {
            other.drop()?;
        }
        Ok(merged)
    }

    /// Creates the index `name` over `keys` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// This method fails if the keys could not be built, or the mongodb encountered an error.
    pub fn ensure_index<K: IntoDocument>(
        &self,
        name: &str,
        keys: K,
        unique: bool,
    ) -> crate::Result<String> {
        let keys = keys.into_document()?;
        let index = name.to_owned();
        match self.execute(|name| Request::CreateIndex(name, index, keys, unique))? {
            Response::CreateIndex(index) => Ok(index),
            _ => Self::unexpected(),
        }
    }

    /// Drops the index `name`.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn drop_index(&self, name: &str) -> crate::Result<()> {
        let index = name.to_owned();
        match self.execute(|name| Request::DropIndex(name, index))? {
            Response::Done => Ok(()),
            _ => Self::unexpected(),
        }
    }

    /// Starts an unordered batch of inserts into this collection.
    pub fn create_bulk_operation(&self) -> BulkOperation {
        BulkOperation::new(self.clone())
    }
}
