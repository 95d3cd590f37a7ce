use gwiit_adapters::{
    Argon2PasswordHasher, HashMapUserStore, MockEmailClient, RandomPasswordGenerator,
};
use gwiit_core::RelationshipPolicies;
use gwiit_service::{AppState, UserService};
use serde_json::{Value, json};

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policies(RelationshipPolicies::default()).await
    }

    pub async fn with_policies(relationships: RelationshipPolicies) -> Self {
        let email_client = MockEmailClient::new();
        let state = AppState::new(
            HashMapUserStore::new(),
            Argon2PasswordHasher::new(),
            RandomPasswordGenerator::default(),
            email_client.clone(),
            relationships,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let service = UserService::new(state);
        tokio::spawn(async move { service.run_standalone(listener, &[]).await });

        Self {
            address,
            http_client: reqwest::Client::new(),
            email_client,
        }
    }

    pub async fn post_user(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/users", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_user(&self, id: i64) -> reqwest::Response {
        self.http_client
            .get(format!("{}/users/{id}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_user(&self, id: i64, body: &Value) -> reqwest::Response {
        self.http_client
            .patch(format!("{}/users/{id}", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_user(&self, id: i64) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/users/{id}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_superuser(&self, id: i64) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/superusers/{id}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_users(&self, query: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/users?{query}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn authenticate(&self, identifier: &str, password: &str) -> reqwest::Response {
        self.http_client
            .post(format!("{}/users/authenticate", self.address))
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn release(&self, parent: &str, id: i64) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/{parent}/{id}/users", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Creates a user and returns its id.
    pub async fn seed_user(&self, body: Value) -> i64 {
        let response = self.post_user(&body).await;
        assert_eq!(response.status().as_u16(), 201, "seeding {body}");
        let user: Value = response.json().await.unwrap();
        user["id"].as_i64().unwrap()
    }
}

pub fn ids(users: &Value) -> Vec<i64> {
    users
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["id"].as_i64().unwrap())
        .collect()
}
