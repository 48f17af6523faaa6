use mongodoc::Connection;

/// The integration tests only run when this points at a live server.
pub const URI: &str = "MONGODOC_TEST_URI";

#[allow(dead_code)]
pub fn uri() -> Option<String> {
    match std::env::var(URI) {
        Ok(uri) => Some(uri),
        Err(_) => {
            eprintln!("{} is not set, skipping", URI);
            None
        }
    }
}

#[allow(dead_code)]
pub async fn async_setup(database: &str) -> Option<Connection> {
    let connection = Connection::new(uri()?, database).await.unwrap();
    connection.database().drop(None).await.unwrap();
    Some(connection)
}

#[cfg(feature = "blocking")]
#[allow(dead_code)]
pub fn setup(database: &str) -> Option<mongodoc::blocking::Connection> {
    let uri = uri()?;
    // The blocking connection cannot drop a database, so lean on a throwaway runtime for that...
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_setup(database));
    Some(mongodoc::blocking::Connection::new(uri, database).unwrap())
}
