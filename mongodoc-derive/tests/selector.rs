use mongodoc::bson::doc;
use mongodoc::{IntoDocument, Oid, Selector};

#[derive(mongodoc_derive::Selector)]
struct User {
    name: String,
    age: i32,
    email: Option<String>,
}

#[derive(mongodoc_derive::Selector)]
#[selector(rename_all = "camelCase")]
struct Session {
    #[selector(rename = "_id")]
    session_id: Oid,
    user_name: String,
    #[selector(skip)]
    #[allow(dead_code)]
    token: String,
    is_active: bool,
}

#[derive(mongodoc_derive::Selector)]
struct Keyword {
    r#type: String,
}

#[test]
fn fields_in_declaration_order() {
    let user = User {
        name: "foo".to_owned(),
        age: 42,
        email: None,
    };
    let selector = Selector::from(user);
    assert_eq!(
        selector.into_document().unwrap(),
        doc! { "name": "foo", "age": 42, "email": null }
    );
}

#[test]
fn renames_and_skips() {
    let id = Oid::generate();
    let session = Session {
        session_id: id,
        user_name: "foo".to_owned(),
        token: "secret".to_owned(),
        is_active: true,
    };
    assert_eq!(
        session.into_document().unwrap(),
        doc! { "_id": id.raw(), "userName": "foo", "isActive": true }
    );
}

#[test]
fn raw_identifiers_are_unescaped() {
    let keyword = Keyword {
        r#type: "admin".to_owned(),
    };
    assert_eq!(
        keyword.into_document().unwrap(),
        doc! { "type": "admin" }
    );
}

#[test]
fn derived_selectors_nest() {
    let user = User {
        name: "foo".to_owned(),
        age: 42,
        email: Some("foo@example.com".to_owned()),
    };
    let query = mongodoc::selector!["$set", Selector::from(user)];
    assert_eq!(
        query.into_document().unwrap(),
        doc! { "$set": { "name": "foo", "age": 42, "email": "foo@example.com" } }
    );
}
