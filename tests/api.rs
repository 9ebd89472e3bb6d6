use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use client_registry::api::router;
use client_registry::db::MemoryRepository;
use client_registry::service::ClientService;

fn app() -> Router {
    router(ClientService::new(Arc::new(MemoryRepository::new())))
}

fn sample(email: &str) -> Value {
    json!({
        "name": "Padaria Pão Quente",
        "email": email,
        "phone": "(11) 98765-4321",
        "cnpj": "12.345.678/0001-95",
        "cep": "01001-000",
        "street": "Praça da Sé",
        "neighborhood": "Sé",
        "city": "São Paulo",
        "state": "SP",
        "complement": ""
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_list_get_round_trip() {
    let app = app();

    let body = sample("contato@padaria.com.br");
    let (status, body) = send(&app, "POST", "/api/clients", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Client created successfully" }));

    let (status, list) = send(&app, "GET", "/api/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    let id = list[0]["id"].as_i64().unwrap();

    let (status, client) = send(&app, "GET", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let fields = [
        "name", "email", "phone", "cnpj", "cep", "street", "neighborhood", "city", "state",
    ];
    for field in fields {
        assert_eq!(client[field], sample("contato@padaria.com.br")[field], "{field}");
    }
    assert_eq!(client["complement"], Value::Null);
    assert!(client["created_at"].is_string());
    assert!(client["updated_at"].is_string());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = app();
    send(&app, "POST", "/api/clients", Some(sample("first@padaria.com.br"))).await;
    send(&app, "POST", "/api/clients", Some(sample("second@padaria.com.br"))).await;

    let (_, list) = send(&app, "GET", "/api/clients", None).await;
    let emails: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["second@padaria.com.br", "first@padaria.com.br"]);
}

#[tokio::test]
async fn test_create_validation_errors_are_400() {
    let app = app();

    let only_name = json!({ "name": "Only a name" });
    let (status, body) = send(&app, "POST", "/api/clients", Some(only_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));

    let mut bad_email = sample("a@b");
    bad_email["cep"] = json!("01001000");
    let (status, body) = send(&app, "POST", "/api/clients", Some(bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid email" }));

    let mut bad_cep = sample("ok@padaria.com.br");
    bad_cep["cep"] = json!("01001000");
    let (status, body) = send(&app, "POST", "/api/clients", Some(bad_cep)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid CEP. Use the format XXXXX-XXX" }));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/clients")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_is_409() {
    let app = app();
    send(&app, "POST", "/api/clients", Some(sample("contato@padaria.com.br"))).await;

    let mut other = sample("Contato@Padaria.com.br");
    other["name"] = json!("Another Bakery");
    let (status, body) = send(&app, "POST", "/api/clients", Some(other)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Email already registered" }));
}

#[tokio::test]
async fn test_update_contract() {
    let app = app();
    send(&app, "POST", "/api/clients", Some(sample("first@padaria.com.br"))).await;
    send(&app, "POST", "/api/clients", Some(sample("second@padaria.com.br"))).await;
    let (_, list) = send(&app, "GET", "/api/clients", None).await;
    let second = list[0]["id"].as_i64().unwrap();
    let first = list[1]["id"].as_i64().unwrap();

    // Own email is not a conflict
    let mut changed = sample("second@padaria.com.br");
    changed["city"] = json!("Campinas");
    let (status, body) = send(&app, "PUT", &format!("/api/clients/{second}"), Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Client updated successfully" }));

    let (_, client) = send(&app, "GET", &format!("/api/clients/{second}"), None).await;
    assert_eq!(client["city"], "Campinas");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/clients/{second}"),
        Some(sample("first@padaria.com.br")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Email already registered for another client" }));

    let body = sample("new@padaria.com.br");
    let (status, _) = send(&app, "PUT", "/api/clients/999", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut invalid = sample("first@padaria.com.br");
    invalid["street"] = json!("   ");
    let (status, _) = send(&app, "PUT", &format!("/api/clients/{first}"), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_contract() {
    let app = app();
    send(&app, "POST", "/api/clients", Some(sample("contato@padaria.com.br"))).await;
    let (_, list) = send(&app, "GET", "/api/clients", None).await;
    let id = list[0]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Client removed successfully" }));

    let (status, body) = send(&app, "GET", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Client not found" }));

    let (status, _) = send(&app, "DELETE", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_404() {
    let (status, body) = send(&app(), "GET", "/api/clients/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Client not found" }));
}

#[tokio::test]
async fn test_null_optionals_and_fetched_body_round_trip() {
    let app = app();

    let mut body = sample("contato@padaria.com.br");
    body["phone"] = Value::Null;
    body["cnpj"] = Value::Null;
    body["complement"] = Value::Null;
    let (status, _) = send(&app, "POST", "/api/clients", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = send(&app, "GET", "/api/clients", None).await;
    let id = list[0]["id"].as_i64().unwrap();
    let uri = format!("/api/clients/{id}");
    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["phone"], Value::Null);

    // The server's own representation is accepted back as an update
    let (status, body) = send(&app, "PUT", &uri, Some(fetched.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Client updated successfully" }));

    let (_, after) = send(&app, "GET", &uri, None).await;
    assert_eq!(after["email"], fetched["email"]);
    assert_eq!(after["cnpj"], Value::Null);
}

#[tokio::test]
async fn test_null_required_field_is_missing() {
    let mut body = sample("contato@padaria.com.br");
    body["name"] = Value::Null;
    let (status, body) = send(&app(), "POST", "/api/clients", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields" }));
}
