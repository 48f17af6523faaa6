use bson::Document;

use super::Collection;
use crate::query;
use crate::selector::IntoDocument;

/// An unordered batch of inserts into a single collection.
///
/// Documents are queued locally and sent in one go by [`BulkOperation::execute`].
///
/// # Examples
///
/// ```no_run
/// # async fn doc() -> Result<(), mongodoc::Error> {
/// use mongodoc::{selector, Connection};
///
/// let connection = Connection::new("mongodb://127.0.0.1:27017", "app").await?;
/// let mut bulk = connection.collection("events").create_bulk_operation();
/// for n in 0..100 {
///     bulk.insert(selector!["n", n])?;
/// }
/// let inserted = bulk.execute().await?;
/// assert_eq!(inserted, 100);
/// # Ok(())
/// # }
/// ```
pub struct BulkOperation {
    collection: Collection,
    documents: Vec<Document>,
}

impl BulkOperation {
    pub(crate) fn new(collection: Collection) -> Self {
        Self {
            collection,
            documents: vec![],
        }
    }

    /// Queues a document for insertion.
    ///
    /// # Errors
    ///
    /// This method fails if the document could not be built, in which case nothing is queued.
    pub fn insert<D: IntoDocument>(&mut self, document: D) -> crate::Result<()> {
        self.documents.push(document.into_document()?);
        Ok(())
    }

    /// Returns the number of queued documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are queued.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sends the queued documents, returning how many were inserted.
    ///
    /// The inserts are unordered, a failing document does not stop the others.
    ///
    /// # Errors
    ///
    /// This method fails if nothing was queued, or the mongodb encountered an error.
    pub async fn execute(self) -> crate::Result<u64> {
        if self.documents.is_empty() {
            return Err(crate::error::mongodb("cannot execute an empty bulk operation"));
        }
        let inserted = query::Insert::new()
            .ordered(false)
            .query(&self.collection, self.documents)
            .await?;
        Ok(inserted.len() as u64)
    }

    // Like `execute`, but an empty bulk is a no-op.
    pub(crate) async fn flush(self) -> crate::Result<u64> {
        if self.documents.is_empty() {
            return Ok(0);
        }
        self.execute().await
    }
}

#[cfg(test)]
mod tests {
    use crate::{selector, Connection, ErrorKind};

    // The client connects lazily, nothing below reaches a server.
    async fn offline() -> Connection {
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1")
            .await
            .unwrap();
        Connection::from_client(client, "db")
    }

    #[tokio::test]
    async fn empty_bulk_is_an_error() {
        let bulk = offline().await.collection("events").create_bulk_operation();
        assert!(bulk.is_empty());
        let err = bulk.execute().await.unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::Mongodb);
    }

    #[tokio::test]
    async fn flushing_an_empty_bulk_inserts_nothing() {
        let bulk = offline().await.collection("events").create_bulk_operation();
        assert_eq!(bulk.flush().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_documents_are_not_queued() {
        let mut bulk = offline().await.collection("events").create_bulk_operation();
        bulk.insert(selector!["n", 1]).unwrap();
        let err = bulk.insert(selector!["dangling"]).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidSelector);
        assert_eq!(bulk.len(), 1);
    }
}
