use bson::Document;

use super::Collection;
use crate::query;
use crate::selector::IntoDocument;

/// A blocking version of the async [`BulkOperation`](crate::BulkOperation).
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
    /// # Errors
    ///
    /// This method fails if nothing was queued, or the mongodb encountered an error.
    pub fn execute(self) -> crate::Result<u64> {
        if self.documents.is_empty() {
            return Err(crate::error::mongodb("cannot execute an empty bulk operation"));
        }
        let inserted = query::Insert::new()
            .ordered(false)
            .blocking(&self.collection, self.documents)?;
        Ok(inserted.len() as u64)
    }

    // Like `execute`, but an empty bulk is a no-op.
    pub(crate) fn flush(self) -> crate::Result<u64> {
        if self.documents.is_empty() {
            return Ok(0);
        }
        self.execute()
    }
}
