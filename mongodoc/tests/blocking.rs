mod common;

#[cfg(feature = "blocking")]
mod wrapper {
    use super::*;

    use mongodoc::bson::Bson;
    use mongodoc::{query, selector, ErrorKind, Selector, Updates};

    #[test]
    fn blocking_crud() {
        let connection = match common::setup("mongodoc_blocking_crud") {
            Some(connection) => connection,
            None => return,
        };
        let users = connection.collection("users");

        // Insert
        let id = users.insert(selector!["name", "foo", "age", 30]).unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));
        users.insert(selector!["name", "bar", "age", 40]).unwrap();
        assert_eq!(users.count(Selector::new()).unwrap(), 2);

        // Fetch
        let foo = users.find_one(selector!["name", "foo"]).unwrap().unwrap();
        assert_eq!(foo.integer("age").unwrap(), 30);
        let mut count = 0;
        for user in users.find(Selector::new()).unwrap() {
            user.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);

        // Update
        let updated = users
            .update(selector!["name", "foo"], Updates::set(selector!["age", 31]))
            .unwrap();
        assert_eq!(updated, 1);
        let upserted = users
            .upsert(selector!["name", "baz"], selector!["name", "baz", "age", 50])
            .unwrap();
        assert_eq!(upserted, 1);

        // Delete
        let removed = query::Delete::new()
            .many(false)
            .filter(selector!["age", selector!["$gte", 40]])
            .unwrap()
            .blocking(&users)
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(users.remove(Selector::new()).unwrap(), 2);
    }

    #[test]
    fn blocking_cursor_clone() {
        let connection = match common::setup("mongodoc_blocking_cursor") {
            Some(connection) => connection,
            None => return,
        };
        let numbers = connection.collection("numbers");
        let mut bulk = numbers.create_bulk_operation();
        for n in 0..3 {
            bulk.insert(selector!["n", n]).unwrap();
        }
        assert_eq!(bulk.execute().unwrap(), 3);

        let mut cursor = query::Find::new()
            .sort(selector!["n", 1])
            .unwrap()
            .blocking(&numbers)
            .unwrap();
        let first = cursor.next().unwrap().unwrap();
        assert_eq!(first.integer("n").unwrap(), 0);

        let clone = cursor.try_clone().unwrap();
        assert_eq!(clone.count(), 3);
        assert_eq!(cursor.count(), 2);
    }

    #[test]
    fn blocking_collections() {
        let connection = match common::setup("mongodoc_blocking_collections") {
            Some(connection) => connection,
            None => return,
        };
        let events = connection.collection("events");
        let archive = connection.collection("archive");

        let err = events.create_bulk_operation().execute().err().unwrap();
        assert_eq!(*err.kind(), ErrorKind::Mongodb);

        events.insert(selector!["n", 1]).unwrap();
        events.insert(selector!["n", 2]).unwrap();
        assert_eq!(archive.merge_with(&events, false).unwrap(), 2);
        assert_eq!(events.count(Selector::new()).unwrap(), 2);

        let name = archive
            .ensure_index("n_unique", selector!["n", 1], true)
            .unwrap();
        assert_eq!(name, "n_unique");
        let err = archive.insert(selector!["n", 1]).err().unwrap();
        assert_eq!(*err.kind(), ErrorKind::Mongodb);
        archive.drop_index("n_unique").unwrap();
        archive.insert(selector!["n", 1]).unwrap();

        let mut names = connection.collection_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["archive".to_owned(), "events".to_owned()]);

        events.drop().unwrap();
        assert_eq!(connection.collection_names().unwrap(), vec!["archive".to_owned()]);
    }
}
