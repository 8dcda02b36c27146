use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use employee_service::domain::account::models::RegisterCommand;
use employee_service::domain::account::ports::AccountServicePort;
use employee_service::domain::account::service::AccountService;
use employee_service::domain::employee::service::EmployeeService;
use employee_service::inbound::http::router::create_router;
use employee_service::outbound::repositories::InMemoryAccountRepository;
use employee_service::outbound::repositories::InMemoryEmployeeRepository;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Test application that spawns a real server over the in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing keeps the suite fast
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET)
                .with_password_hasher(PasswordHasher::with_params(8, 1, 1).unwrap()),
        );

        let account_service = Arc::new(AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::clone(&authenticator),
        ));
        let employee_service = Arc::new(EmployeeService::new(Arc::new(
            InMemoryEmployeeRepository::new(),
        )));

        account_service
            .ensure_admin(
                RegisterCommand::new(ADMIN_USERNAME.to_string(), ADMIN_PASSWORD.to_string())
                    .unwrap(),
            )
            .await
            .expect("Failed to seed admin account");

        let router = create_router(account_service, employee_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register an account, panicking unless it is created
    pub async fn register(&self, username: &str, password: &str) {
        let response = self
            .post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn user_token(&self) -> String {
        self.register("alice", "pw123").await;
        self.login("alice", "pw123").await
    }

    /// Create an employee as admin and return the response body's data
    pub async fn create_employee(&self, token: &str, name: &str, email: &str) -> serde_json::Value {
        let response = self
            .post_authenticated("/api/employees", token)
            .json(&json!({ "name": name, "email": email }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}
