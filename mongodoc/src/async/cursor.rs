use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, TryStreamExt};

use super::Collection;
use crate::document::Document;
use crate::query::Find;

/// A cursor over the results of a find.
///
/// Documents can be pulled one at a time with [`Cursor::next`], or the cursor can be consumed as a
/// `Stream`.
pub struct Cursor {
    collection: Collection,
    cursor: mongodb::Cursor<bson::Document>,
    find: Find,
}

impl Cursor {
    pub(crate) fn new(collection: Collection, find: Find, cursor: mongodb::Cursor<bson::Document>) -> Self {
        Self {
            collection,
            cursor,
            find,
        }
    }

    /// Returns the next document, or `None` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error while fetching a batch.
    pub async fn next(&mut self) -> crate::Result<Option<Document>> {
        self.cursor
            .try_next()
            .await
            .map(|doc| doc.map(Document::from))
            .map_err(self.collection.failed("cursor"))
    }

    /// Runs the query that produced this cursor again, returning a new cursor positioned at the
    /// start of the results.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn try_clone(&self) -> impl Future<Output = crate::Result<Cursor>> + Send + 'static {
        // The returned future must not borrow the driver cursor, which is not `Sync`.
        let collection = self.collection.clone();
        let find = self.find.clone();
        async move { find.query(&collection).await }
    }

    /// Allow access to the wrapped `mongodb::Cursor`.
    pub fn into_inner(self) -> mongodb::Cursor<bson::Document> {
        self.cursor
    }
}

impl Stream for Cursor {
    type Item = crate::Result<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let next = Pin::new(&mut self.cursor).poll_next(cx);
        match next {
            Poll::Ready(opt) => Poll::Ready(opt.map(|result| {
                result
                    .map(Document::from)
                    .map_err(self.collection.failed("cursor"))
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Unpin for Cursor {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send + 'static>(_: T) {}

    // Blocking cursors drive their clones from a spawned task.
    #[allow(dead_code)]
    fn clones_can_be_spawned(cursor: &Cursor) {
        assert_send(cursor.try_clone());
    }

    #[test]
    fn cursors_are_send() {
        fn is_send<T: Send>() {}
        is_send::<Cursor>();
        let _ = clones_can_be_spawned;
    }
}
