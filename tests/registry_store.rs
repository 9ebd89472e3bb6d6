//! The UI store talking to a real API server over HTTP.

use std::sync::Arc;

use client_registry::api::router;
use client_registry::db::MemoryRepository;
use client_registry::models::ClientInput;
use client_registry::service::ClientService;
use client_registry::store::{ClientStore, HttpRegistryApi, RegistryApi, StoreError};

async fn spawn_api() -> String {
    let app = router(ClientService::new(Arc::new(MemoryRepository::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn input(email: &str) -> ClientInput {
    ClientInput {
        name: "Oficina do Zé".to_string(),
        email: email.to_string(),
        phone: "(21) 3456-7890".to_string(),
        cep: "20040-002".to_string(),
        street: "Avenida Rio Branco".to_string(),
        neighborhood: "Centro".to_string(),
        city: "Rio de Janeiro".to_string(),
        state: "RJ".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_store_round_trip_over_http() {
    let mut store = ClientStore::new(HttpRegistryApi::new(spawn_api().await));

    store.fetch_clients().await;
    assert!(store.clients().is_empty());
    assert_eq!(store.error(), None);

    store.add_client(&input("ze@oficina.com.br")).await.unwrap();
    assert_eq!(store.clients().len(), 1);
    let id = store.clients()[0].id;

    let mut changed = input("ze@oficina.com.br");
    changed.complement = "Fundos".to_string();
    store.update_client(id, &changed).await.unwrap();
    assert_eq!(store.clients()[0].complement.as_deref(), Some("Fundos"));

    let fetched = store.get_client(id).await.unwrap();
    assert_eq!(fetched.phone.as_deref(), Some("(21) 3456-7890"));

    store.delete_client(id).await.unwrap();
    assert!(store.clients().is_empty());
}

#[tokio::test]
async fn test_server_messages_reach_the_store() {
    let mut store = ClientStore::new(HttpRegistryApi::new(spawn_api().await));
    store.add_client(&input("ze@oficina.com.br")).await.unwrap();

    // The form accepts a CEP without hyphen; the server does not
    let mut loose = input("other@oficina.com.br");
    loose.cep = "20040002".to_string();
    let err = store.add_client(&loose).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected {
            status: 400,
            message: "Invalid CEP. Use the format XXXXX-XXX".to_string()
        }
    );
    assert_eq!(store.error(), Some("Invalid CEP. Use the format XXXXX-XXX"));

    let err = store.add_client(&input("ZE@oficina.com.br")).await.unwrap_err();
    assert_eq!(store.error(), Some("Email already registered"));
    assert!(!err.is_not_found());

    let err = store.delete_client(12345).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unreachable_api_is_a_transport_error() {
    let api = HttpRegistryApi::new("http://127.0.0.1:9/api");
    assert!(matches!(api.list().await, Err(StoreError::Transport(_))));

    let mut store = ClientStore::new(api);
    store.fetch_clients().await;
    assert_eq!(store.error(), Some("Failed to load clients"));
}
