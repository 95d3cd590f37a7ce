use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_deactivate_and_free_identifiers() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;

    let response = app.delete_user(id).await;
    assert_eq!(response.status().as_u16(), 200);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["is_active"], false);

    let still_there = app.get_user(id).await;
    assert_eq!(still_there.status().as_u16(), 200);

    app.seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;
}

#[tokio::test]
async fn should_protect_superusers() {
    let app = TestApp::new().await;
    let root = app
        .seed_user(json!({
            "username": "root",
            "password": "Strong#Pass1",
            "is_superuser": true
        }))
        .await;

    assert_eq!(app.delete_user(root).await.status().as_u16(), 409);
    assert_eq!(app.delete_superuser(root).await.status().as_u16(), 409);

    app.seed_user(json!({
        "username": "backup",
        "password": "Strong#Pass1",
        "is_superuser": true
    }))
    .await;
    assert_eq!(app.delete_superuser(root).await.status().as_u16(), 200);
}

#[tokio::test]
async fn superuser_route_rejects_regular_users() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;

    assert_eq!(app.delete_superuser(id).await.status().as_u16(), 400);
}
