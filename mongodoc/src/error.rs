use std::error::Error as StdError;
use std::fmt;

/// A `Result` alias where `Err` case is `mongodoc::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors that may occur when talking to mongo or building documents.
pub struct Error {
    inner: Box<Inner>,
}

pub(crate) type Source = Box<dyn StdError + Send + Sync>;

struct Inner {
    kind: Kind,
    source: Option<Source>,
}

impl Error {
    pub(crate) fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None }),
        }
    }

    pub(crate) fn with<S: Into<Source>>(mut self, source: S) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Returns the kind of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mongodoc::{ErrorKind, IntoDocument, Selector};
    ///
    /// // A value pushed without a key is a misuse of the builder.
    /// let selector = Selector::new() << 42;
    /// if let Err(e) = selector.into_document() {
    ///     match e.kind() {
    ///         ErrorKind::InvalidSelector => println!("we have a selector error..."),
    ///         _ => {},
    ///     }
    /// }
    /// ```
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Creates a custom `Kind::InvalidDocument` error.
    ///
    /// This is useful when reading documents into custom types.
    pub fn invalid_document<E: Into<Source>>(error: E) -> Error {
        Error::new(Kind::InvalidDocument).with(error)
    }

    /// Creates a custom `Kind::InvalidSelector` error.
    pub fn invalid_selector<E: Into<Source>>(error: E) -> Error {
        Error::new(Kind::InvalidSelector).with(error)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = fmt.debug_struct("mongodoc::Error");
        builder.field("kind", &self.inner.kind);
        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self.inner.kind {
            Kind::Bson => "bson error",
            Kind::Builder => "builder error",
            Kind::InvalidDocument => "invalid document",
            Kind::InvalidSelector => "invalid selector",
            Kind::Mongodb => "mongodb error",
            Kind::Runtime => "runtime error",
        };
        if let Some(ref source) = self.inner.source {
            write!(f, "{}: {}", desc, source)
        } else {
            f.write_str(desc)
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<bson::de::Error> for Error {
    fn from(de: bson::de::Error) -> Self {
        Error::invalid_document(de)
    }
}

impl From<bson::ser::Error> for Error {
    fn from(ser: bson::ser::Error) -> Self {
        bson(ser)
    }
}

/// The `Kind` of `mongodoc::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A value could not be converted to or from BSON.
    Bson,
    /// A connection could not be configured.
    Builder,
    /// A document did not have the expected shape.
    InvalidDocument,
    /// A selector was misused while it was being built.
    InvalidSelector,
    /// The driver reported a failure.
    Mongodb,
    /// The blocking runtime failed.
    Runtime,
}

// Helpers
pub(crate) fn bson<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Bson).with(e)
}

pub(crate) fn builder<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e)
}

pub(crate) fn mongodb<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Mongodb).with(e)
}

#[cfg(feature = "blocking")]
pub(crate) fn runtime<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Runtime).with(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_source() {
        let err = Error::invalid_selector("value has no key");
        assert_eq!(err.to_string(), "invalid selector: value has no key");
        assert_eq!(*err.kind(), Kind::InvalidSelector);
        assert!(err.source().is_some());
    }

    #[test]
    fn display_without_source() {
        let err = Error::new(Kind::Runtime);
        assert_eq!(err.to_string(), "runtime error");
        assert!(err.source().is_none());
    }

    #[test]
    fn debug_names_the_kind() {
        let err = mongodb("connection refused");
        let debug = format!("{:?}", err);
        assert!(debug.contains("Mongodb"));
        assert!(debug.contains("connection refused"));
    }
}
