use futures::stream::TryStreamExt;
use mongodoc::bson::{doc, Bson};
use mongodoc::{array, query, selector, ErrorKind, Selector, Updates};

mod common;

#[tokio::test]
async fn crud() {
    let connection = match common::async_setup("mongodoc_async_crud").await {
        Some(connection) => connection,
        None => return,
    };
    let users = connection.collection("users");

    // Insert
    let id = users
        .insert(selector!["name", "foo", "age", 30])
        .await
        .unwrap();
    assert!(matches!(id, Bson::ObjectId(_)));
    users
        .insert(selector!["name", "bar", "age", 40])
        .await
        .unwrap();
    assert_eq!(users.count(Selector::new()).await.unwrap(), 2);

    // Fetch
    let foo = users
        .find_one(selector!["name", "foo"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(foo.integer("age").unwrap(), 30);
    assert_eq!(Bson::ObjectId(foo.id().unwrap().raw()), id);
    assert!(users
        .find_one(selector!["name", "nobody"])
        .await
        .unwrap()
        .is_none());

    // Update
    let updated = users
        .update(selector!["name", "foo"], Updates::set(selector!["age", 31]))
        .await
        .unwrap();
    assert_eq!(updated, 1);
    let updated = users
        .update(selector!["name", "nobody"], Updates::set(selector!["age", 1]))
        .await
        .unwrap();
    assert_eq!(updated, 0);

    // Upsert
    let upserted = users
        .upsert(selector!["name", "baz"], Updates::set(selector!["age", 50]))
        .await
        .unwrap();
    assert_eq!(upserted, 1);
    assert_eq!(users.count(Selector::new()).await.unwrap(), 3);

    // Delete
    let removed = users
        .remove(selector!["age", selector!["$gte", 40]])
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(users.count(Selector::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn replacement_update() {
    let connection = match common::async_setup("mongodoc_async_replace").await {
        Some(connection) => connection,
        None => return,
    };
    let users = connection.collection("users");
    users
        .insert(selector!["name", "foo", "age", 30])
        .await
        .unwrap();

    let updated = users
        .update(selector!["name", "foo"], selector!["name", "foobar"])
        .await
        .unwrap();
    assert_eq!(updated, 1);
    let user = users
        .find_one(selector!["name", "foobar"])
        .await
        .unwrap()
        .unwrap();
    assert!(user.find("age").is_none());

    let err = query::Update::new()
        .many(true)
        .query(&users, selector!["name", "foo"])
        .await
        .err()
        .unwrap();
    assert_eq!(*err.kind(), ErrorKind::InvalidDocument);
}

#[tokio::test]
async fn cursors() {
    let connection = match common::async_setup("mongodoc_async_cursors").await {
        Some(connection) => connection,
        None => return,
    };
    let numbers = connection.collection("numbers");
    for n in 0..5 {
        numbers.insert(selector!["n", n]).await.unwrap();
    }

    let mut cursor = query::Find::new()
        .sort(selector!["n", 1])
        .unwrap()
        .query(&numbers)
        .await
        .unwrap();
    let first = cursor.next().await.unwrap().unwrap();
    assert_eq!(first.integer("n").unwrap(), 0);

    // A clone starts again from the top
    let clone = cursor.try_clone().await.unwrap();
    let all: Vec<_> = clone.try_collect().await.unwrap();
    assert_eq!(all.len(), 5);

    let mut rest = 0;
    while let Some(_) = cursor.next().await.unwrap() {
        rest += 1;
    }
    assert_eq!(rest, 4);
    assert!(cursor.next().await.unwrap().is_none());

    let page: Vec<_> = query::Find::new()
        .filter(selector!["n", selector!["$in", array![1, 2, 3]]])
        .unwrap()
        .sort(selector!["n", -1])
        .unwrap()
        .projection(selector!["_id", 0])
        .unwrap()
        .skip(1)
        .limit(1)
        .query(&numbers)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].value(), &doc! { "n": 2 });
}

#[tokio::test]
async fn bulk_and_merge() {
    let connection = match common::async_setup("mongodoc_async_bulk").await {
        Some(connection) => connection,
        None => return,
    };
    let events = connection.collection("events");
    let archive = connection.collection("archive");

    let err = events
        .create_bulk_operation()
        .execute()
        .await
        .err()
        .unwrap();
    assert_eq!(*err.kind(), ErrorKind::Mongodb);

    let mut bulk = events.create_bulk_operation();
    for n in 0..10 {
        bulk.insert(selector!["n", n]).unwrap();
    }
    assert!(bulk.insert(selector!["dangling"]).is_err());
    assert_eq!(bulk.len(), 10);
    assert_eq!(bulk.execute().await.unwrap(), 10);

    archive.insert(selector!["n", 100]).await.unwrap();
    let merged = archive.merge_with(&events, true).await.unwrap();
    assert_eq!(merged, 10);
    assert_eq!(archive.count(Selector::new()).await.unwrap(), 11);
    assert_eq!(events.count(Selector::new()).await.unwrap(), 0);

    let names = connection.collection_names().await.unwrap();
    assert!(names.contains(&"archive".to_owned()));
    assert!(!names.contains(&"events".to_owned()));
}

#[tokio::test]
async fn indexes() {
    let connection = match common::async_setup("mongodoc_async_indexes").await {
        Some(connection) => connection,
        None => return,
    };
    let users = connection.collection("users");

    let name = users
        .ensure_index("email_unique", selector!["email", 1], true)
        .await
        .unwrap();
    assert_eq!(name, "email_unique");
    // Ensuring an existing index is a no-op
    users
        .ensure_index("email_unique", selector!["email", 1], true)
        .await
        .unwrap();

    users.insert(selector!["email", "foo@example.com"]).await.unwrap();
    let err = users
        .insert(selector!["email", "foo@example.com"])
        .await
        .err()
        .unwrap();
    assert_eq!(*err.kind(), ErrorKind::Mongodb);

    users.drop_index("email_unique").await.unwrap();
    users.insert(selector!["email", "foo@example.com"]).await.unwrap();
    assert!(users.drop_index("email_unique").await.is_err());

    users.drop().await.unwrap();
    assert_eq!(users.count(Selector::new()).await.unwrap(), 0);
}
