use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_authenticate_with_any_identifier() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({
            "email": "a@b.com",
            "badge_rfid": "RF-9",
            "password": "Strong#Pass1"
        }))
        .await;

    for identifier in ["A@B.com", "rf-9"] {
        let response = app.authenticate(identifier, "Strong#Pass1").await;
        assert_eq!(response.status().as_u16(), 200);
        let user: Value = response.json().await.unwrap();
        assert_eq!(user["id"], id);
    }
}

#[tokio::test]
async fn should_return_401_for_bad_credentials() {
    let app = TestApp::new().await;
    let id = app
        .seed_user(json!({ "email": "a@b.com", "password": "Strong#Pass1" }))
        .await;

    assert_eq!(
        app.authenticate("a@b.com", "Wrong#Pass1").await.status().as_u16(),
        401
    );
    assert_eq!(
        app.authenticate("x@b.com", "Strong#Pass1").await.status().as_u16(),
        401
    );

    app.delete_user(id).await;
    assert_eq!(
        app.authenticate("a@b.com", "Strong#Pass1").await.status().as_u16(),
        401
    );
}
