use bson::doc;
use serde::{Deserialize, Serialize};

use doccrud::{memory::InMemoryStore, prelude::*};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<i32>,
}

impl User {
    fn named(name: &str) -> Self {
        Self { id: None, name: name.to_string(), age: None }
    }
}

/// Application-side accessor bound to the `users` collection.
struct UserRepository {
    users: CollectionAccessor<User, InMemoryStore>,
}

impl UserRepository {
    fn new(store: &DocumentStore<InMemoryStore>) -> Self {
        Self { users: CollectionAccessor::new("users", store) }
    }
}

fn store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(InMemoryStore::new())
}

#[tokio::test]
async fn full_lifecycle_of_a_user() {
    let store = store();
    let repository = UserRepository::new(&store);
    let users = &repository.users;
    assert_eq!(users.path(), "users");

    let created = users.create(&User::named("Ana"), None).await.unwrap();
    let id = created.id.clone().expect("generated id");
    assert_eq!(created, User { id: Some(id.clone()), name: "Ana".into(), age: None });

    let fetched = users.get_by_id(&id).await.unwrap();
    assert_eq!(fetched, created);

    let message = users.update(&id, &doc! { "name": "Ana Maria" }).await;
    assert_eq!(message, "Registro alterado com sucesso!");
    assert_eq!(users.get_by_id(&id).await.unwrap().name, "Ana Maria");

    let message = users.delete(&id).await;
    assert_eq!(message, "Registro excluído com sucesso!");

    let raw = store.accessor::<Fields>("users");
    assert_eq!(raw.get_by_id(&id).await.unwrap(), doc! { "id": id.as_str() });
}

#[tokio::test]
async fn list_all_returns_every_document_once_with_ids() {
    let store = store();
    let users = store.accessor::<User>("users");
    users.create(&User::named("Bia"), Some("b")).await.unwrap();
    users.create(&User::named("Ana"), Some("a")).await.unwrap();
    store
        .collection("users")
        .doc("c")
        .set(doc! { "name": "Caio" })
        .await
        .unwrap();

    let listed = users.list_all().await.unwrap();

    let ids: Vec<_> = listed.iter().map(|user| user.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(listed[2].name, "Caio");
    assert_eq!(store.backend().open_views("users").await, 0);
}

#[tokio::test]
async fn list_all_of_empty_collection_is_empty() {
    let store = store();
    let users = store.accessor::<User>("users");

    assert!(users.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_id_replaces_previous_document() {
    let store = store();
    let users = store.accessor::<User>("users");
    let first = User { id: None, name: "Ana".into(), age: Some(30) };
    users.create(&first, Some("u1")).await.unwrap();

    let echoed = users.create(&User::named("Bia"), Some("u1")).await.unwrap();

    assert_eq!(echoed, User::named("Bia"));
    let raw = store.accessor::<Fields>("users");
    assert_eq!(raw.get_by_id("u1").await.unwrap(), doc! { "name": "Bia", "id": "u1" });
}

#[tokio::test]
async fn update_merges_instead_of_replacing() {
    let store = store();
    let users = store.accessor::<User>("users");
    let ana = User { id: None, name: "Ana".into(), age: Some(30) };
    users.create(&ana, Some("u1")).await.unwrap();

    users.update("u1", &doc! { "age": 31 }).await;

    let fetched = users.get_by_id("u1").await.unwrap();
    assert_eq!(fetched, User { id: Some("u1".into()), name: "Ana".into(), age: Some(31) });
}

#[tokio::test]
async fn update_of_missing_document_is_reported_as_message() {
    let store = store();
    let users = store.accessor::<User>("users");

    let message = users.update("ghost", &doc! { "name": "x" }).await;

    assert_eq!(
        message,
        "Erro ao alterar registro: Document not found ghost in collection users"
    );
}

#[tokio::test]
async fn deleting_twice_reports_success_both_times() {
    let store = store();
    let users = store.accessor::<User>("users");
    users.create(&User::named("Ana"), Some("u1")).await.unwrap();

    assert_eq!(users.delete("u1").await, messages::DELETE_SUCCESS);
    assert_eq!(users.delete("u1").await, messages::DELETE_SUCCESS);
}

#[tokio::test]
async fn missing_typed_document_defaults_everything_but_id() {
    let store = store();
    let users = store.accessor::<User>("users");

    let fetched = users.get_by_id("nobody").await.unwrap();

    assert_eq!(fetched, User { id: Some("nobody".into()), name: String::new(), age: None });
}

#[tokio::test]
async fn concurrent_creates_on_one_accessor() {
    let store = store();
    let users = store.accessor::<User>("users");

    let (first, second, third) = (User::named("A"), User::named("B"), User::named("C"));

    let (a, b, c) = tokio::join!(
        users.create(&first, None),
        users.create(&second, None),
        users.create(&third, None),
    );

    let mut ids = vec![a.unwrap().id, b.unwrap().id, c.unwrap().id];
    ids.sort();
    let mut listed: Vec<_> = users.list_all().await.unwrap().into_iter().map(|u| u.id).collect();
    listed.sort();
    assert_eq!(ids, listed);
}

#[tokio::test]
async fn accessors_on_different_paths_are_independent() {
    let store = store();
    let users = store.accessor::<User>("users");
    let admins = store.accessor::<User>("admins");

    users.create(&User::named("Ana"), Some("x")).await.unwrap();

    assert!(admins.list_all().await.unwrap().is_empty());
    assert_eq!(users.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn configured_store_serves_accessors() {
    let config = StoreConfig::from_json_str(r#"{ "backend": "memory" }"#).unwrap();
    assert_eq!(config, StoreConfig::Memory);

    let store = config.connect().await.unwrap();
    let users = store.accessor::<User>("users");
    let created = users.create(&User::named("Ana"), None).await.unwrap();

    let listed = users.list_all().await.unwrap();
    assert_eq!(listed, vec![created]);

    drop(users);
    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    let result = StoreConfig::from_json_str(r#"{ "backend": "carrier-pigeon" }"#);

    assert!(matches!(result, Err(DocumentStoreError::Serialization(_))));
}
