use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_apply_changes_and_keep_untouched_fields() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({
            "email": "a@b.com",
            "username": "jdoe",
            "password": "Strong#Pass1",
            "organization_id": 2
        }))
        .await;

    let response = app
        .patch_user(id, &json!({ "username": "", "site_id": 5, "modified_by_id": 1 }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["username"], Value::Null);
    assert_eq!(user["email"], "a@b.com");
    assert_eq!(user["organization_id"], 2);
    assert_eq!(user["site_id"], 5);
    assert_eq!(user["modified_by_id"], 1);
}

#[tokio::test]
async fn should_reject_removing_the_last_identifier() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1" }))
        .await;

    let response = app.patch_user(id, &json!({ "username": "  " })).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn should_return_404_for_unknown_user() {
    let app = TestApp::new().await;

    let response = app.patch_user(42, &json!({ "first_name": "Ada" })).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn should_return_409_when_taking_an_active_identifier() {
    let app = TestApp::new().await;
    app.seed_user(json!({ "email": "taken@b.com", "password": "Strong#Pass1" }))
        .await;
    let id = app
        .seed_user(json!({ "email": "mine@b.com", "password": "Strong#Pass1" }))
        .await;

    let response = app.patch_user(id, &json!({ "email": "Taken@B.com" })).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn should_keep_superusers_on_staff() {
    let app = TestApp::new().await;
    let root = app
        .seed_user(json!({
            "username": "root",
            "password": "Strong#Pass1",
            "is_superuser": true
        }))
        .await;

    let response = app.patch_user(root, &json!({ "is_staff": false })).await;
    assert_eq!(response.status().as_u16(), 409);

    let user: Value = app.get_user(root).await.json().await.unwrap();
    assert_eq!(user["is_staff"], true);
}

#[tokio::test]
async fn should_answer_malformed_ids_with_a_json_error() {
    let app = TestApp::new().await;

    for path in ["users/abc", "superusers/abc", "sites/five/users"] {
        let response = app
            .http_client
            .request(
                if path.starts_with("users") {
                    reqwest::Method::GET
                } else {
                    reqwest::Method::DELETE
                },
                format!("{}/{path}", app.address),
            )
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status().as_u16(), 400, "{path}");
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string(), "{path}");
    }
}
