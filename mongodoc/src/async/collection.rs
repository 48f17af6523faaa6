use bson::{Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

use super::{BulkOperation, Cursor};
use crate::error::Error;
use crate::query;
use crate::selector::{IntoDocument, Selector};

/// A handle to a collection of untyped documents.
///
/// Cloning a `Collection` is cheap, clones refer to the same collection.
///
/// # Examples
///
/// ```no_run
/// # async fn doc() -> Result<(), mongodoc::Error> {
/// use mongodoc::{selector, Connection, Updates};
///
/// let connection = Connection::new("mongodb://127.0.0.1:27017", "app").await?;
/// let users = connection.collection("users");
///
/// users.insert(selector!["name", "foo", "age", 42]).await?;
/// users
///     .update(selector!["name", "foo"], Updates::set(selector!["age", 43]))
///     .await?;
/// if let Some(user) = users.find_one(selector!["name", "foo"]).await? {
///     println!("{} is {}", user.string("name")?, user.integer("age")?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: mongodb::Collection<Document>,
}

impl Collection {
    pub(crate) fn new(inner: mongodb::Collection<Document>) -> Self {
        Self { inner }
    }

    /// Returns the name of the collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Allow access to the wrapped `mongodb::Collection`.
    pub fn inner(&self) -> &mongodb::Collection<Document> {
        &self.inner
    }

    pub(crate) fn failed(
        &self,
        operation: &'static str,
    ) -> impl FnOnce(mongodb::error::Error) -> Error + '_ {
        move |e| {
            error!("{}: {} failed: {}", self.name(), operation, e);
            crate::error::mongodb(e)
        }
    }

    /// Drops the collection along with its indexes.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub async fn drop(&self) -> crate::Result<()> {
        debug!("{}: drop", self.name());
        self.inner.drop(None).await.map_err(self.failed("drop"))
    }

    /// Finds every document matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub async fn find<Q: IntoDocument>(&self, query: Q) -> crate::Result<Cursor> {
        query::Find::new().filter(query)?.query(self).await
    }

    /// Finds the first document matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub async fn find_one<Q: IntoDocument>(
        &self,
        query: Q,
    ) -> crate::Result<Option<crate::Document>> {
        let mut cursor = query::Find::new()
            .filter(query)?
            .limit(1)
            .query(self)
            .await?;
        cursor.next().await
    }

    /// Updates the first document matching `query`.
    ///
    /// `value` is either a set of update operators or a replacement document. Returns the number
    /// of documents matched.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    pub async fn update<Q, U>(&self, query: Q, value: U) -> crate::Result<u64>
    where
        Q: IntoDocument,
        U: IntoDocument,
    {
        let res = query::Update::new()
            .filter(query)?
            .query(self, value)
            .await?;
        Ok(res.matched_count)
    }

    /// Updates the first document matching `query`, inserting it if there is none.
    ///
    /// Returns the number of documents matched or inserted.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    pub async fn upsert<Q, U>(&self, query: Q, value: U) -> crate::Result<u64>
    where
        Q: IntoDocument,
        U: IntoDocument,
    {
        let res = query::Update::new()
            .upsert(true)
            .filter(query)?
            .query(self, value)
            .await?;
        Ok(res.matched_count + res.upserted_id.map_or(0, |_| 1))
    }

    /// Inserts a document, returning its `_id`.
    ///
    /// # Errors
    ///
    /// This method fails if the document could not be built, or the mongodb encountered an error.
    pub async fn insert<D: IntoDocument>(&self, value: D) -> crate::Result<Bson> {
        // NOTE: We don't wanna make another builder so we just eat the cost of allocating a vec...
        let inserted = query::Insert::new().query(self, vec![value]).await?;
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
    pub async fn remove<Q: IntoDocument>(&self, query: Q) -> crate::Result<u64> {
        query::Delete::new().filter(query)?.query(self).await
    }

    /// Counts the documents matching `query`.
    ///
    /// # Errors
    ///
    /// This method fails if the query could not be built, or the mongodb encountered an error.
    pub async fn count<Q: IntoDocument>(&self, query: Q) -> crate::Result<u64> {
        let filter = query.into_document()?;
        debug!("{}: count {}", self.name(), filter);
        self.inner
            .count_documents(filter, None)
            .await
            .map_err(self.failed("count"))
    }

    /// Copies every document of `other` into this collection.
    ///
    /// The `_id` of each document is dropped so the server assigns new ones. When `drop` is set,
    /// `other` is dropped once the copy is done. Returns the number of documents copied.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub async fn merge_with(&self, other: &Collection, drop: bool) -> crate::Result<u64> {
        info!("{}: merging from {}", self.name(), other.name());
        let mut cursor = other.find(Selector::new()).await?;
        let mut bulk = self.create_bulk_operation();
        while let Some(document) = cursor.next().await? {
            let mut document = document.into_inner();
            document.remove("_id");
            bulk.insert(document)?;
        }
        let merged = bulk.flush().await?;
        if drop {
            other.drop().await?;
        }
        Ok(merged)
    }

    /// Creates the index `name` over `keys` if it does not exist yet.
    ///
    /// Returns the name of the index.
    ///
    /// # Errors
    ///
    /// This method fails if the keys could not be built, or the mongodb encountered an error.
    pub async fn ensure_index<K: IntoDocument>(
        &self,
        name: &str,
        keys: K,
        unique: bool,
    ) -> crate::Result<String> {
        let mut options = IndexOptions::default();
        options.name = Some(name.to_owned());
        options.unique = Some(unique);
        let model = IndexModel::builder()
            .keys(keys.into_document()?)
            .options(Some(options))
            .build();
        debug!("{}: ensure index {}", self.name(), name);
        self.inner
            .create_index(model, None)
            .await
            .map(|res| res.index_name)
            .map_err(self.failed("create index"))
    }

    /// Drops the index `name`.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error, such as the index not existing.
    pub async fn drop_index(&self, name: &str) -> crate::Result<()> {
        debug!("{}: drop index {}", self.name(), name);
        self.inner
            .drop_index(name, None)
            .await
            .map_err(self.failed("drop index"))
    }

    /// Starts an unordered batch of inserts into this collection.
    pub fn create_bulk_operation(&self) -> BulkOperation {
        BulkOperation::new(self.clone())
    }
}
