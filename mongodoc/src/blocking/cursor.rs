use super::connection::Connection;
use crate::document::Document;
use crate::r#async;

enum Request {
    Clone,
    Next,
}
enum Response {
    Clone(crate::Result<CursorInt>),
    Next(crate::Result<Option<Document>>),
}

type CursorSender = tokio::sync::mpsc::UnboundedSender<(Request, std::sync::mpsc::Sender<Response>)>;

// The half of a cursor that lives on the runtime thread, each one drives its own task.
pub(crate) struct CursorInt {
    tx: CursorSender,
}

impl CursorInt {
    pub fn new(cursor: r#async::Cursor) -> Self {
        let (tx, mut rx) =
            tokio::sync::mpsc::unbounded_channel::<(Request, std::sync::mpsc::Sender<Response>)>();
        let f = async move {
            let mut cursor = cursor;
            while let Some((req, tx)) = rx.recv().await {
                let resp = match req {
                    Request::Clone => Response::Clone(cursor.try_clone().await.map(CursorInt::new)),
                    Request::Next => Response::Next(cursor.next().await),
                };
                let _ = tx.send(resp);
            }
        };
        tokio::spawn(f);
        Self { tx }
    }
}

/// A blocking version of the async [`Cursor`](crate::Cursor).
///
/// Iterating the cursor blocks the current thread until the next document is available.
pub struct Cursor {
    // Keeps the runtime thread alive while the cursor is in use.
    connection: Connection,
    tx: CursorSender,
}

impl Cursor {
    pub(crate) fn new(cursor: CursorInt, connection: Connection) -> Self {
        Self {
            connection,
            tx: cursor.tx,
        }
    }

    fn execute(&self, req: Request) -> crate::Result<Response> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.tx
            .send((req, tx))
            .map_err(|_| crate::error::runtime("failed to send request to cursor task"))?;
        rx.recv().map_err(crate::error::runtime)
    }

    /// Runs the query that produced this cursor again, returning a new cursor positioned at the
    /// start of the results.
    ///
    /// # Errors
    ///
    /// This method fails if the mongodb encountered an error.
    pub fn try_clone(&self) -> crate::Result<Cursor> {
        match self.execute(Request::Clone)? {
            Response::Clone(cursor) => Ok(Cursor::new(cursor?, self.connection.clone())),
            Response::Next(_) => Err(crate::error::runtime(
                "incorrect response from cursor task",
            )),
        }
    }
}

impl Iterator for Cursor {
    type Item = crate::Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.execute(Request::Next) {
            Ok(Response::Next(next)) => next.transpose(),
            Ok(Response::Clone(_)) => Some(Err(crate::error::runtime(
                "incorrect response from cursor task",
            ))),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ErrorKind;

    // Stands in for a cursor task that always gives the same answer.
    fn answering<F>(response: F) -> Cursor
    where
        F: Fn() -> Response + Send + 'static,
    {
        let connection = Connection::new("mongodb://127.0.0.1:1", "db").unwrap();
        let (tx, mut rx) =
            tokio::sync::mpsc::unbounded_channel::<(Request, std::sync::mpsc::Sender<Response>)>();
        std::thread::spawn(move || {
            while let Some((_, tx)) = rx.blocking_recv() {
                let _ = tx.send(response());
            }
        });
        Cursor::new(CursorInt { tx }, connection)
    }

    #[test]
    fn next_rejects_a_clone_response() {
        let mut cursor = answering(|| Response::Clone(Err(crate::error::runtime("unused"))));
        let err = cursor.next().unwrap().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn clone_rejects_a_next_response() {
        let cursor = answering(|| Response::Next(Ok(None)));
        let err = cursor.try_clone().err().unwrap();
        assert_eq!(*err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn exhausted_cursors_end_iteration() {
        let mut cursor = answering(|| Response::Next(Ok(None)));
        assert!(cursor.next().is_none());
    }

    #[test]
    fn a_stopped_task_is_a_runtime_error() {
        let connection = Connection::new("mongodb://127.0.0.1:1", "db").unwrap();
        let (tx, rx) =
            tokio::sync::mpsc::unbounded_channel::<(Request, std::sync::mpsc::Sender<Response>)>();
        drop(rx);
        let mut cursor = Cursor::new(CursorInt { tx }, connection);
        let err = cursor.next().unwrap().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::Runtime);
    }
}
