use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_201_with_normalized_user() {
    let app = TestApp::new().await;

    let response = app
        .post_user(&json!({
            "email": "  USER@Example.COM  ",
            "password": "Strong#Pass1",
            "first_name": " Grace ",
            "last_name": "Hopper",
            "organization_id": 2,
            "site_id": 5
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["email"], "user@example.com");
    assert_eq!(user["full_name"], "Grace Hopper");
    assert_eq!(user["organization_id"], 2);
    assert_eq!(user["is_active"], true);
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn should_return_400_for_invalid_input() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "password": "Strong#Pass1" }),
        json!({ "email": "invalid-email@com", "password": "Strong#Pass1" }),
        json!({ "email": "a@b.com", "password": "weakpassword" }),
        json!({ "username": "root", "is_superuser": true, "password": "weak" }),
    ];

    for body in cases {
        let response = app.post_user(&body).await;
        assert_eq!(response.status().as_u16(), 400, "{body}");
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].is_string());
    }
}

#[tokio::test]
async fn should_return_409_for_duplicate_active_identifier() {
    let app = TestApp::new().await;
    app.seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;

    let response = app
        .post_user(&json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn should_email_generated_password_without_returning_it() {
    let app = TestApp::new().await;

    let response = app.post_user(&json!({ "email": "new@b.com" })).await;
    assert_eq!(response.status().as_u16(), 201);
    let body = response.text().await.unwrap();

    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 1);
    let temporary = sent[0]
        .content
        .lines()
        .find_map(|line| line.trim().strip_prefix("temporary password: "))
        .unwrap();
    assert!(!body.contains(temporary));

    let login = app.authenticate("new@b.com", temporary).await;
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn superuser_creation_forces_flags() {
    let app = TestApp::new().await;

    let response = app
        .post_user(&json!({
            "email": "root@b.com",
            "username": "root",
            "password": "Strong#Pass1",
            "is_superuser": true
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["is_superuser"], true);
    assert_eq!(user["is_staff"], true);
}
