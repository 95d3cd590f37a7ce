use serde_json::{Value, json};

use crate::helpers::{TestApp, ids};

async fn seeded() -> TestApp {
    let app = TestApp::new().await;
    let members = [
        json!({ "username": "u1", "organization_id": 2, "site_id": 5 }),
        json!({ "username": "u2", "organization_id": 2, "site_id": 6 }),
        json!({ "username": "u3", "organization_id": 3, "site_id": 5 }),
        json!({ "username": "u4", "organization_id": 2, "site_id": 5, "is_active": false }),
        json!({ "username": "u5", "organization_id": 2, "site_id": 5, "created_by_id": 1 }),
    ];
    for mut member in members {
        member["password"] = json!("Strong#Pass1");
        app.seed_user(member).await;
    }
    app
}

async fn list(app: &TestApp, query: &str) -> Vec<i64> {
    let response = app.list_users(query).await;
    assert_eq!(response.status().as_u16(), 200, "{query}");
    let users: Value = response.json().await.unwrap();
    ids(&users)
}

#[tokio::test]
async fn organization_and_site_scope() {
    let app = seeded().await;

    assert_eq!(list(&app, "organization_id=2&site_id=5&active=true").await, vec![1, 5]);
    assert_eq!(list(&app, "organization_id=2&site_id=5").await, vec![1, 4, 5]);
    assert_eq!(list(&app, "organization_id=3&site_id=6&active=true").await, Vec::<i64>::new());
}

#[tokio::test]
async fn other_filters() {
    let app = seeded().await;

    assert_eq!(list(&app, "").await, vec![1, 2, 3, 4, 5]);
    assert_eq!(list(&app, "active=false").await, vec![4]);
    assert_eq!(list(&app, "created_by=1").await, vec![5]);
    assert_eq!(list(&app, "joined_within_days=30").await.len(), 5);
}

#[tokio::test]
async fn malformed_scope_returns_empty_list() {
    let app = seeded().await;

    assert!(list(&app, "site_id=five").await.is_empty());
    assert!(list(&app, "organization_id=").await.is_empty());
}
