use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::thread;

use bson::{Bson, Document};
use mongodb::results::UpdateResult;

use super::collection::Collection;
use super::cursor::CursorInt;
use crate::query;
use crate::r#async;

/// A `ClientBuilder` can be used to create a blocking `Connection` with custom configuration.
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    builder: r#async::ClientBuilder,
}

impl ClientBuilder {
    /// Constructs a new `ClientBuilder`.
    ///
    /// This is the same as `Connection::builder()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a `Connection` built from this `ClientBuilder` configuration.
    ///
    /// # Errors
    ///
    /// This method fails if the runtime thread cannot be started, or the `mongodb::Client` cannot
    /// be initialised.
    pub fn build(self) -> crate::Result<Connection> {
        Ok(Connection {
            inner: Arc::new(ConnectionInner::new(self, None)?),
        })
    }

    /// Sets the name reported to the server in its logs and profiling data.
    pub fn app_name<I: Into<String>>(mut self, name: I) -> Self {
        self.builder = self.builder.app_name(name);
        self
    }

    /// Sets the username/password that should be used by this connection.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn doc() -> Result<(), mongodoc::Error> {
    /// let _connection = mongodoc::blocking::Connection::builder()
    ///     .auth("foo", Some("bar"))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn auth<U, P>(mut self, username: U, password: Option<P>) -> Self
    where
        U: Display,
        P: Display,
    {
        self.builder = self.builder.auth(username, password);
        self
    }

    /// Sets the CA file that should be used by this connection for TLS.
    pub fn ca<I: Into<String>>(mut self, path: I) -> Self {
        self.builder = self.builder.ca(path);
        self
    }

    /// Sets the certificate file that should be used by this connection for identification.
    pub fn cert_key<I: Into<String>>(mut self, path: I) -> Self {
        self.builder = self.builder.cert_key(path);
        self
    }

    /// Sets the database that should be used by this connection.
    pub fn database<I: Into<String>>(mut self, database: I) -> Self {
        self.builder = self.builder.database(database);
        self
    }

    /// Sets the uri that this connection should use to connect to a mongo instance.
    pub fn uri<I: Into<String>>(mut self, uri: I) -> Self {
        self.builder = self.builder.uri(uri);
        self
    }
}

/// A synchronous `Connection` to a mongo database.
///
/// Requests are handed to a dedicated runtime thread and the calling thread blocks until the
/// response comes back. Clones share the same thread, which exits once the last clone and every
/// cursor created from it are dropped.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

#[allow(clippy::large_enum_variant)]
pub(crate) enum Request {
    CollectionNames,
    Count(String, Document),
    CreateIndex(String, String, Document, bool),
    Delete(String, query::Delete),
    Drop(String),
    DropIndex(String, String),
    Find(String, query::Find),
    Insert(String, query::Insert, Vec<Document>),
    Update(String, query::Update, Document),
}

pub(crate) enum Response {
    CollectionNames(Vec<String>),
    Count(u64),
    CreateIndex(String),
    Delete(u64),
    Done,
    Find(CursorInt),
    Insert(HashMap<usize, Bson>),
    Update(UpdateResult),
}

type OneshotResponse = std::sync::mpsc::Sender<crate::Result<Response>>;
type ThreadSender = tokio::sync::mpsc::UnboundedSender<(Request, OneshotResponse)>;

struct ConnectionInner {
    _thread: Option<thread::JoinHandle<()>>,
    tx: ThreadSender,
}

impl Connection {
    /// Connects to `uri` and selects `database`.
    ///
    /// # Errors
    ///
    /// This method fails if the runtime thread cannot be started, or the `mongodb::Client` cannot
    /// be initialised.
    pub fn new<U, D>(uri: U, database: D) -> crate::Result<Self>
    where
        U: Into<String>,
        D: Into<String>,
    {
        ClientBuilder::new().uri(uri).database(database).build()
    }

    /// Creates a `ClientBuilder` to configure a `Connection`.
    ///
    /// This is the same as `ClientBuilder::new()`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Constructs a new `Connection` using a `mongodb::Client`.
    ///
    /// # Errors
    ///
    /// This method fails if the runtime thread cannot be started.
    pub fn from_client<I: Into<String>>(
        client: mongodb::Client,
        database: I,
    ) -> crate::Result<Self> {
        Ok(Self {
            inner: Arc::new(ConnectionInner::new(
                ClientBuilder::new(),
                Some(r#async::Connection::from_client(client, database)),
            )?),
        })
    }

    /// Returns a handle to the collection `name`.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(self.clone(), name)
    }

    /// Lists the names of the collections in the database.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn collection_names(&self) -> crate::Result<Vec<String>> {
        match self.execute(Request::CollectionNames)? {
            Response::CollectionNames(names) => Ok(names),
            _ => Err(crate::error::runtime(
                "incorrect response from blocking client",
            )),
        }
    }

    pub(crate) fn execute(&self, req: Request) -> crate::Result<Response> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.inner
            .tx
            .send((req, tx))
            .map_err(|_| crate::error::runtime("failed to send request to blocking thread"))?;
        rx.recv().map_err(crate::error::runtime)?
    }
}

impl Request {
    async fn dispatch(self, connection: &r#async::Connection) -> crate::Result<Response> {
        match self {
            Request::CollectionNames => connection
                .collection_names()
                .await
                .map(Response::CollectionNames),
            Request::Count(name, filter) => connection
                .collection(&name)
                .count(filter)
                .await
                .map(Response::Count),
            Request::CreateIndex(name, index, keys, unique) => connection
                .collection(&name)
                .ensure_index(&index, keys, unique)
                .await
                .map(Response::CreateIndex),
            Request::Delete(name, delete) => delete
                .query(&connection.collection(&name))
                .await
                .map(Response::Delete),
            Request::Drop(name) => connection
                .collection(&name)
                .drop()
                .await
                .map(|_| Response::Done),
            Request::DropIndex(name, index) => connection
                .collection(&name)
                .drop_index(&index)
                .await
                .map(|_| Response::Done),
            Request::Find(name, find) => find
                .query(&connection.collection(&name))
                .await
                .map(|cursor| Response::Find(CursorInt::new(cursor))),
            Request::Insert(name, insert, documents) => insert
                .query(&connection.collection(&name), documents)
                .await
                .map(Response::Insert),
            Request::Update(name, update, document) => update
                .query(&connection.collection(&name), document)
                .await
                .map(Response::Update),
        }
    }
}

impl ConnectionInner {
    fn new(builder: ClientBuilder, connection: Option<r#async::Connection>) -> crate::Result<Self> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<(Request, OneshotResponse)>();
        let (spawn_tx, spawn_rx) = std::sync::mpsc::channel::<crate::Result<()>>();
        let handle = thread::Builder::new()
            .name("mongodoc-runtime".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(crate::error::runtime)
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        if let Err(e) = spawn_tx.send(Err(e)) {
                            error!("failed to communicate runtime builder: {:?}", e);
                        }
                        return;
                    }
                };
                let f = async move {
                    let connection = match connection {
                        Some(connection) => connection,
                        None => match builder.builder.build().await {
                            Ok(connection) => connection,
                            Err(e) => {
                                if let Err(e) = spawn_tx.send(Err(e)) {
                                    error!("failed to create async connection: {:?}", e);
                                }
                                return;
                            }
                        },
                    };
                    if let Err(e) = spawn_tx.send(Ok(())) {
                        error!("failed to communicate successful startup: {:?}", e);
                        return;
                    }
                    while let Some((req, req_tx)) = rx.recv().await {
                        let resp = req.dispatch(&connection).await;
                        let _ = req_tx.send(resp);
                    }
                    debug!("blocking connection closed, stopping runtime");
                };
                rt.block_on(f);
            })
            .map_err(crate::error::runtime)?;

        spawn_rx.recv().map_err(crate::error::runtime)??;

        Ok(Self {
            _thread: Some(handle),
            tx,
        })
    }
}
