mod common;

use common::TestApp;
use common::JWT_SECRET;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_and_login_scenario() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "pw123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "USER");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password_hash").is_none());

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "pw123" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "USER");

    let token = body["data"]["token"].as_str().unwrap();
    let claims = auth::TokenCodec::new(JWT_SECRET).validate(token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.role, auth::Role::User);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::spawn().await;
    app.register("alice", "pw123").await;

    let mut messages = Vec::new();
    for (username, password) in [("alice", "wrong"), ("nobody", "pw123")] {
        let response = app
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        messages.push(body["data"]["message"].clone());
    }

    assert_eq!(messages[0], "Invalid credentials");
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;
    app.register("alice", "pw123").await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "other" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({ "username": "a b", "password": "" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let fields: Vec<&str> = body["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["username", "password"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_single_winner() {
    let app = TestApp::spawn().await;

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let client = app.api_client.clone();
            let url = app.url("/api/auth/register");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "username": "racer", "password": "pw123" }))
                    .send()
                    .await
                    .expect("Failed to execute request")
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        5
    );
}

#[tokio::test]
async fn test_employee_crud_scenario() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let bob = app.create_employee(&token, "Bob", "bob@x.com").await;
    let id = bob["id"].as_str().unwrap().to_string();
    assert_eq!(bob["name"], "Bob");
    assert_eq!(bob["created_at"], bob["updated_at"]);

    let response = app
        .post_authenticated("/api/employees", &token)
        .json(&json!({ "name": "Bobby", "email": "bob@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .get_authenticated(&format!("/api/employees/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], "Bob");

    let response = app
        .delete_authenticated(&format!("/api/employees/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated(&format!("/api/employees/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .delete_authenticated(&format!("/api/employees/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_employee() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let bob = app.create_employee(&token, "Bob", "bob@x.com").await;
    let id = bob["id"].as_str().unwrap();

    let response = app
        .put_authenticated(&format!("/api/employees/{}", id), &token)
        .json(&json!({ "name": "Robert", "email": "robert@x.com", "department": "Sales" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], "Robert");
    assert_eq!(body["data"]["department"], "Sales");
    assert_eq!(body["data"]["created_at"], bob["created_at"]);
    assert_ne!(body["data"]["updated_at"], bob["updated_at"]);

    let response = app
        .put_authenticated(
            "/api/employees/0190c6a1-7c2e-7000-8000-000000000000",
            &token,
        )
        .json(&json!({ "name": "Ghost", "email": "ghost@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_employee_validation() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .post_authenticated("/api/employees", &token)
        .json(&json!({ "name": "", "email": "not-an-email" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_employee_id() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    let response = app
        .get_authenticated("/api/employees/42", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_scenario() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_employee(&admin, "Bob", "bob@x.com").await;
    app.create_employee(&admin, "Carol", "carol@x.com").await;

    let user = app.user_token().await;

    let response = app
        .get_authenticated("/api/employees/search?q=BOB", &user)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["total_elements"], 1);
    assert_eq!(body["data"]["content"][0]["email"], "bob@x.com");

    let response = app
        .get_authenticated("/api/employees/search?q=zzz-no-match", &user)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["total_elements"], 0);
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 0);

    let response = app
        .get_authenticated("/api/employees/search?q=%25", &user)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["total_elements"], 0);
}

#[tokio::test]
async fn test_list_pagination_is_stable() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    for (name, email) in [
        ("Dave", "dave@x.com"),
        ("Bob", "bob@x.com"),
        ("Carol", "carol@x.com"),
        ("Bob", "bob2@x.com"),
        ("Erin", "erin@x.com"),
    ] {
        app.create_employee(&admin, name, email).await;
    }

    let path = "/api/employees?page=0&size=2&sort=name,asc";
    let first: serde_json::Value = app
        .get_authenticated(path, &admin)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let again: serde_json::Value = app
        .get_authenticated(path, &admin)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first, again);
    assert_eq!(first["data"]["total_elements"], 5);
    assert_eq!(first["data"]["total_pages"], 3);
    assert_eq!(first["data"]["content"][0]["name"], "Bob");
    assert_eq!(first["data"]["content"][1]["name"], "Bob");

    let last: serde_json::Value = app
        .get_authenticated("/api/employees?page=2&size=2&sort=name,asc", &admin)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(last["data"]["content"].as_array().unwrap().len(), 1);
    assert_eq!(last["data"]["content"][0]["name"], "Erin");
}

#[tokio::test]
async fn test_invalid_page_parameters() {
    let app = TestApp::spawn().await;
    let token = app.user_token().await;

    for path in [
        "/api/employees?size=0",
        "/api/employees?size=101",
        "/api/employees?page=-1",
        "/api/employees?sort=salary",
    ] {
        let response = app
            .get_authenticated(path, &token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "unexpected status for {}",
            path
        );
    }
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/employees")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get_authenticated("/api/employees", "invalid.token.here")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let expired = auth::TokenCodec::new(JWT_SECRET)
        .issue("admin", auth::Role::Admin, chrono::Duration::seconds(-1))
        .unwrap();
    let response = app
        .get_authenticated("/api/employees", &expired)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = auth::TokenCodec::new(b"some-other-secret-that-is-32-bytes-long")
        .issue("admin", auth::Role::Admin, chrono::Duration::hours(1))
        .unwrap();
    let response = app
        .post_authenticated("/api/employees", &forged)
        .json(&json!({ "name": "Mallory", "email": "mallory@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_role_cannot_modify_employees() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let bob = app.create_employee(&admin, "Bob", "bob@x.com").await;
    let path = format!("/api/employees/{}", bob["id"].as_str().unwrap());

    let user = app.user_token().await;

    let response = app
        .post_authenticated("/api/employees", &user)
        .json(&json!({ "name": "Eve", "email": "eve@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .put_authenticated(&path, &user)
        .json(&json!({ "name": "Eve", "email": "eve@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete_authenticated(&path, &user)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads stay open to any role
    let response = app
        .get_authenticated(&path, &user)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_email_single_winner() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let client = app.api_client.clone();
            let url = app.url("/api/employees");
            let token = token.clone();
            tokio::spawn(async move {
                client
                    .post(url)
                    .bearer_auth(token)
                    .json(&json!({ "name": format!("Bob {}", i), "email": "bob@x.com" }))
                    .send()
                    .await
                    .expect("Failed to execute request")
                    .status()
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }

    assert_eq!(created, 1);
}
