use std::collections::HashMap;

use bson::Bson;
use mongodb::options::InsertManyOptions;

use crate::r#async::Collection;
use crate::selector::IntoDocument;

/// A querier to insert documents into a MongoDB collection.
#[derive(Clone, Debug, Default)]
pub struct Insert {
    options: InsertManyOptions,
}

impl Insert {
    /// Constructs an `Insert` querier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt out of document-level validation.
    pub fn bypass_document_validation(mut self, enable: bool) -> Self {
        self.options.bypass_document_validation = Some(enable);
        self
    }

    /// If true, when an insert fails, return without performing the remaining writes. If false,
    /// when a write fails, continue with the remaining writes, if any.
    ///
    /// Defaults to true.
    pub fn ordered(mut self, enable: bool) -> Self {
        self.options.ordered = Some(enable);
        self
    }

    /// Query the database with this querier.
    ///
    /// The returned map is keyed by the position of each document in `documents`.
    ///
    /// # Errors
    ///
    /// This method fails if a document could not be built, or the mongodb encountered an error.
    pub async fn query<D: IntoDocument>(
        self,
        collection: &Collection,
        documents: Vec<D>,
    ) -> crate::Result<HashMap<usize, Bson>> {
        let documents = into_documents(documents)?;
        debug!("{}: insert {} documents", collection.name(), documents.len());
        let res = collection
            .inner()
            .insert_many(documents, self.options)
            .await
            .map_err(collection.failed("insert"))?;
        Ok(res.inserted_ids)
    }

    /// Query the database with this querier in a blocking context.
    ///
    /// # Optional
    ///
    /// This requires the optional `blocking` feature to be enabled.
    ///
    /// # Errors
    ///
    /// This method fails if a document could not be built, or the mongodb encountered an error.
    #[cfg(feature = "blocking")]
    pub fn blocking<D: IntoDocument>(
        self,
        collection: &crate::blocking::Collection,
        documents: Vec<D>,
    ) -> crate::Result<HashMap<usize, Bson>> {
        let documents = into_documents(documents)?;
        let resp =
            collection.execute(|name| crate::blocking::Request::Insert(name, self, documents))?;
        if let crate::blocking::Response::Insert(ids) = resp {
            return Ok(ids);
        }
        Err(crate::error::runtime(
            "incorrect response from blocking client",
        ))
    }
}

fn into_documents<D: IntoDocument>(documents: Vec<D>) -> crate::Result<Vec<bson::Document>> {
    documents
        .into_iter()
        .map(IntoDocument::into_document)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::selector;

    #[test]
    fn bad_document_fails_the_batch() {
        let documents = vec![selector!["name", "foo"], selector!["name"]];
        assert!(into_documents(documents).is_err());
    }

    #[test]
    fn unordered() {
        let insert = Insert::new().ordered(false);
        assert_eq!(insert.options.ordered, Some(false));
    }
}
