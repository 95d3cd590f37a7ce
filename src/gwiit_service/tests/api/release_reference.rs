use gwiit_core::{OnDelete, RelationshipPolicies};
use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn removing_a_site_clears_references_by_default() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1", "site_id": 5 }))
        .await;

    let response = app.release("sites", 5).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["affected"], 1);

    let user: Value = app.get_user(id).await.json().await.unwrap();
    assert_eq!(user["site_id"], Value::Null);
    assert_eq!(user["is_active"], true);
}

#[tokio::test]
async fn restrict_policy_returns_409() {
    let app = TestApp::with_policies(RelationshipPolicies {
        organization: OnDelete::Restrict,
        site: OnDelete::SetNull,
    })
    .await;
    app.seed_user(json!({ "username": "jdoe", "password": "Strong#Pass1", "organization_id": 2 }))
        .await;

    assert_eq!(app.release("organizations", 2).await.status().as_u16(), 409);
    assert_eq!(app.release("organizations", 3).await.status().as_u16(), 200);
}
