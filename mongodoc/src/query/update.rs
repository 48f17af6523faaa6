use bson::Document;
use mongodb::options::{ReplaceOptions, UpdateOptions};
use mongodb::results::UpdateResult;

use crate::error::Error;
use crate::r#async::Collection;
use crate::selector::IntoDocument;

/// A querier to update documents in a MongoDB collection.
///
/// Updates made of operators (`$set`, `$inc`, ...) are sent as such. Anything else is treated as
/// a replacement of the first matching document.
#[derive(Clone, Debug, Default)]
pub struct Update {
    filter: Document,
    many: bool,
    options: UpdateOptions,
}

impl Update {
    /// Constructs an `Update` querier.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of filters specifying to which array elements an update should apply.
    ///
    /// # Errors
    ///
    /// This method errors if any filter could not be converted into a BSON `Document`.
    pub fn array_filters<F: IntoDocument>(mut self, filters: Vec<F>) -> crate::Result<Self> {
        let filters = filters
            .into_iter()
            .map(IntoDocument::into_document)
            .collect::<crate::Result<Vec<_>>>()?;
        self.options.array_filters = Some(filters);
        Ok(self)
    }

    /// Opt out of document-level validation.
    pub fn bypass_document_validation(mut self, enable: bool) -> Self {
        self.options.bypass_document_validation = Some(enable);
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

    /// Update every matching document instead of only the first one.
    pub fn many(mut self, enable: bool) -> Self {
        self.many = enable;
        self
    }

    /// If true, insert a document if no matching document is found.
    pub fn upsert(mut self, enable: bool) -> Self {
        self.options.upsert = Some(enable);
        self
    }

    fn replacement(&self, update: &Document) -> crate::Result<bool> {
        let replacement = match update.keys().next() {
            Some(key) => !key.starts_with('$'),
            None => true,
        };
        if replacement && self.many {
            return Err(Error::invalid_document(
                "a replacement document can only update a single document",
            ));
        }
        Ok(replacement)
    }

    /// Query the database with this querier.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    pub async fn query<U: IntoDocument>(
        self,
        collection: &Collection,
        update: U,
    ) -> crate::Result<UpdateResult> {
        let update = update.into_document()?;
        debug!(
            "{}: update {} with {}",
            collection.name(),
            self.filter,
            update
        );
        let inner = collection.inner();
        if self.replacement(&update)? {
            let mut options = ReplaceOptions::default();
            options.upsert = self.options.upsert;
            options.bypass_document_validation = self.options.bypass_document_validation;
            return inner
                .replace_one(self.filter, update, options)
                .await
                .map_err(collection.failed("replace"));
        }
        let res = if self.many {
            inner.update_many(self.filter, update, self.options).await
        } else {
            inner.update_one(self.filter, update, self.options).await
        };
        res.map_err(collection.failed("update"))
    }

    /// Query the database with this querier in a blocking context.
    ///
    /// # Optional
    ///
    /// This requires the optional `blocking` feature to be enabled.
    ///
    /// # Errors
    ///
    /// This method fails if the update could not be built, or the mongodb encountered an error.
    #[cfg(feature = "blocking")]
    pub fn blocking<U: IntoDocument>(
        self,
        collection: &crate::blocking::Collection,
        update: U,
    ) -> crate::Result<UpdateResult> {
        let update = update.into_document()?;
        self.replacement(&update)?;
        let resp = collection.execute(|name| crate::blocking::Request::Update(name, self, update))?;
        if let crate::blocking::Response::Update(res) = resp {
            return Ok(res);
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

    use crate::ErrorKind;

    #[test]
    fn operators_are_not_replacements() {
        let update = Update::new().many(true);
        assert!(!update.replacement(&doc! { "$set": { "a": 1 } }).unwrap());
    }

    #[test]
    fn plain_documents_are_replacements() {
        let update = Update::new();
        assert!(update.replacement(&doc! { "a": 1 }).unwrap());
        assert!(update.replacement(&doc! {}).unwrap());
    }

    #[test]
    fn replacing_many_is_rejected() {
        let err = Update::new()
            .many(true)
            .replacement(&doc! { "a": 1 })
            .unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidDocument);
    }
}
