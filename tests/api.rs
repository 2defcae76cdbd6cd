mod common;

use common::TestServer;
use serde_json::{Value, json};

async fn create_macroprocess(
    client: &reqwest::Client,
    server: &TestServer,
    name: &str,
    category: &str,
) -> i64 {
    let resp: Value = client
        .post(format!("{}/api/macroprocesses", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": name, "category": category}))
        .send()
        .await
        .expect("create macroprocess")
        .json()
        .await
        .expect("parse macroprocess response");
    resp["data"]["id"].as_i64().expect("macroprocess id")
}

async fn create_subprocess(
    client: &reqwest::Client,
    server: &TestServer,
    name: &str,
    macroprocess_id: i64,
) -> i64 {
    let resp: Value = client
        .post(format!("{}/api/subprocesses", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": name, "macroprocess_id": macroprocess_id}))
        .send()
        .await
        .expect("create subprocess")
        .json()
        .await
        .expect("parse subprocess response");
    resp["data"]["id"].as_i64().expect("subprocess id")
}

async fn create_document(
    client: &reqwest::Client,
    server: &TestServer,
    name: &str,
    doc_type: &str,
    subprocess_id: i64,
) -> i64 {
    let resp: Value = client
        .post(format!("{}/api/documents", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({
            "name": name,
            "type": doc_type,
            "url": "https://x/doc.pdf",
            "subprocess_id": subprocess_id
        }))
        .send()
        .await
        .expect("create document")
        .json()
        .await
        .expect("parse document response");
    resp["data"]["id"].as_i64().expect("document id")
}

#[tokio::test]
async fn test_hierarchy_flow_and_cascade() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let mp_id = create_macroprocess(&client, &server, "Finance", "Support").await;
    let sp_id = create_subprocess(&client, &server, "Payroll", mp_id).await;
    let other_sp = create_subprocess(&client, &server, "Billing", mp_id).await;
    let doc_id = create_document(&client, &server, "Payroll SOP", "SOP", sp_id).await;
    create_document(&client, &server, "Payroll Manual", "Manual", sp_id).await;
    create_document(&client, &server, "Billing SOP", "SOP", other_sp).await;

    // Both filters applied together
    let resp: Value = client
        .get(format!(
            "{}/api/documents?subprocess_id={}&type=SOP",
            server.base_url, sp_id
        ))
        .send()
        .await
        .expect("list documents")
        .json()
        .await
        .expect("parse document list");
    let docs = resp["data"].as_array().expect("document array");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["id"].as_i64(), Some(doc_id));
    assert_eq!(docs[0]["subprocess_id"].as_i64(), Some(sp_id));
    assert_eq!(docs[0]["type"].as_str(), Some("SOP"));

    // Full replace update
    let resp = client
        .put(format!("{}/api/macroprocesses/{}", server.base_url, mp_id))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": "Treasury", "category": "Strategic"}))
        .send()
        .await
        .expect("update macroprocess");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("parse update response");
    assert_eq!(body["data"]["name"].as_str(), Some("Treasury"));
    assert_eq!(body["data"]["category"].as_str(), Some("Strategic"));

    // Deleting the macroprocess empties the whole subtree
    let resp = client
        .delete(format!("{}/api/macroprocesses/{}", server.base_url, mp_id))
        .bearer_auth(&server.admin_token)
        .send()
        .await
        .expect("delete macroprocess");
    assert_eq!(resp.status(), 204);

    let resp: Value = client
        .get(format!(
            "{}/api/subprocesses?macroprocess_id={}",
            server.base_url, mp_id
        ))
        .send()
        .await
        .expect("list subprocesses")
        .json()
        .await
        .expect("parse subprocess list");
    assert_eq!(resp["data"].as_array().expect("subprocess array").len(), 0);

    let resp = client
        .get(format!("{}/api/documents/{}", server.base_url, doc_id))
        .send()
        .await
        .expect("get document");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_validation_and_not_found() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // Category outside the closed enum is rejected before any write
    let resp = client
        .post(format!("{}/api/macroprocesses", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": "Finance", "category": "Tactical"}))
        .send()
        .await
        .expect("create with bad category");
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/api/macroprocesses", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": "", "category": "Support"}))
        .send()
        .await
        .expect("create with empty name");
    assert_eq!(resp.status(), 400);

    let resp: Value = client
        .get(format!("{}/api/macroprocesses", server.base_url))
        .send()
        .await
        .expect("list macroprocesses")
        .json()
        .await
        .expect("parse list");
    assert_eq!(resp["data"].as_array().expect("array").len(), 0);

    // Nonexistent parent on create
    let resp = client
        .post(format!("{}/api/documents", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({
            "name": "Orphan",
            "type": "Manual",
            "url": "https://x/doc.pdf",
            "subprocess_id": 9999
        }))
        .send()
        .await
        .expect("create orphan document");
    assert_eq!(resp.status(), 400);

    // Malformed url
    let mp_id = create_macroprocess(&client, &server, "Finance", "Support").await;
    let sp_id = create_subprocess(&client, &server, "Payroll", mp_id).await;
    let resp = client
        .post(format!("{}/api/documents", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({
            "name": "Bad URL",
            "type": "Manual",
            "url": "not-a-url",
            "subprocess_id": sp_id
        }))
        .send()
        .await
        .expect("create document with bad url");
    assert_eq!(resp.status(), 400);

    // Not-found and malformed identifiers
    let resp = client
        .get(format!("{}/api/macroprocesses/9999", server.base_url))
        .send()
        .await
        .expect("get missing macroprocess");
    assert_eq!(resp.status(), 404);

    let resp = client
        .put(format!("{}/api/subprocesses/9999", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"name": "Ghost", "macroprocess_id": mp_id}))
        .send()
        .await
        .expect("update missing subprocess");
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{}/api/documents/9999", server.base_url))
        .bearer_auth(&server.admin_token)
        .send()
        .await
        .expect("delete missing document");
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!("{}/api/documents/abc", server.base_url))
        .send()
        .await
        .expect("get with non-numeric id");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_auth_gating() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // Unauthenticated mutation
    let resp = client
        .post(format!("{}/api/macroprocesses", server.base_url))
        .json(&json!({"name": "Finance", "category": "Support"}))
        .send()
        .await
        .expect("create without token");
    assert_eq!(resp.status(), 401);

    // Session endpoint without credentials
    let resp = client
        .get(format!("{}/api/user", server.base_url))
        .send()
        .await
        .expect("current user without token");
    assert_eq!(resp.status(), 401);

    // Create a non-admin user and log in
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"username": "carla", "password": "hunter2"}))
        .send()
        .await
        .expect("create user");
    assert_eq!(resp.status(), 201);

    let resp: Value = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "carla", "password": "hunter2"}))
        .send()
        .await
        .expect("login")
        .json()
        .await
        .expect("parse login response");
    let user_token = resp["data"]["token"].as_str().expect("token").to_string();
    assert_eq!(resp["data"]["user"]["username"].as_str(), Some("carla"));
    assert!(resp["data"]["user"]["password_hash"].is_null());

    // Authenticated but not admin
    let resp = client
        .post(format!("{}/api/macroprocesses", server.base_url))
        .bearer_auth(&user_token)
        .json(&json!({"name": "Finance", "category": "Support"}))
        .send()
        .await
        .expect("create as non-admin");
    assert_eq!(resp.status(), 403);

    let resp: Value = client
        .get(format!("{}/api/macroprocesses", server.base_url))
        .send()
        .await
        .expect("list macroprocesses")
        .json()
        .await
        .expect("parse list");
    assert_eq!(resp["data"].as_array().expect("array").len(), 0);

    // Reads stay open to the non-admin
    let resp: Value = client
        .get(format!("{}/api/user", server.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("current user")
        .json()
        .await
        .expect("parse current user");
    assert_eq!(resp["data"]["username"].as_str(), Some("carla"));

    // Logout revokes the token
    let resp = client
        .post(format!("{}/api/logout", server.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{}/api/user", server.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("current user after logout");
    assert_eq!(resp.status(), 401);

    // Bad credentials
    let resp = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "carla", "password": "wrong"}))
        .send()
        .await
        .expect("login with bad password");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_config_store() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // No default documented for panel_url
    let resp = client
        .get(format!("{}/api/config/panel_url", server.base_url))
        .send()
        .await
        .expect("get unset panel_url");
    assert_eq!(resp.status(), 404);

    // Documented default substituted for panel_title
    let resp: Value = client
        .get(format!("{}/api/config/panel_title", server.base_url))
        .send()
        .await
        .expect("get unset panel_title")
        .json()
        .await
        .expect("parse config response");
    assert_eq!(resp["data"]["value"].as_str(), Some("User Panel"));

    // Writes are admin-gated
    let resp = client
        .post(format!("{}/api/config", server.base_url))
        .json(&json!({"key": "panel_url", "value": "https://a.example"}))
        .send()
        .await
        .expect("set config without token");
    assert_eq!(resp.status(), 401);

    // Write-then-read consistency
    let resp = client
        .post(format!("{}/api/config", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"key": "panel_url", "value": "https://a.example"}))
        .send()
        .await
        .expect("set config");
    assert_eq!(resp.status(), 201);

    let resp: Value = client
        .get(format!("{}/api/config/panel_url", server.base_url))
        .send()
        .await
        .expect("get panel_url")
        .json()
        .await
        .expect("parse config response");
    assert_eq!(resp["data"]["value"].as_str(), Some("https://a.example"));

    // Upsert overwrites
    client
        .post(format!("{}/api/config", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"key": "panel_url", "value": "https://b.example"}))
        .send()
        .await
        .expect("overwrite config");

    let resp: Value = client
        .get(format!("{}/api/config/panel_url", server.base_url))
        .send()
        .await
        .expect("get panel_url again")
        .json()
        .await
        .expect("parse config response");
    assert_eq!(resp["data"]["value"].as_str(), Some("https://b.example"));
}

#[tokio::test]
async fn test_user_management() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .post(format!("{}/api/users", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"username": "carla", "password": "hunter2"}))
        .send()
        .await
        .expect("create user")
        .json()
        .await
        .expect("parse user response");
    let user_id = resp["data"]["id"].as_i64().expect("user id");
    assert_eq!(resp["data"]["is_admin"].as_bool(), Some(false));

    // Duplicate username
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .bearer_auth(&server.admin_token)
        .json(&json!({"username": "carla", "password": "other"}))
        .send()
        .await
        .expect("create duplicate user");
    assert_eq!(resp.status(), 409);

    // Listing is admin-only
    let resp = client
        .get(format!("{}/api/users", server.base_url))
        .send()
        .await
        .expect("list users without token");
    assert_eq!(resp.status(), 401);

    let resp: Value = client
        .get(format!("{}/api/users", server.base_url))
        .bearer_auth(&server.admin_token)
        .send()
        .await
        .expect("list users")
        .json()
        .await
        .expect("parse user list");
    let users = resp["data"].as_array().expect("user array");
    assert!(users.iter().any(|u| u["username"] == "carla"));

    // Partial update: change password only, then log in with it
    let resp = client
        .put(format!("{}/api/users/{}", server.base_url, user_id))
        .bearer_auth(&server.admin_token)
        .json(&json!({"password": "newpass", "panel_title": "Dashboard"}))
        .send()
        .await
        .expect("update user");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("parse update response");
    assert_eq!(body["data"]["panel_title"].as_str(), Some("Dashboard"));

    let resp = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "carla", "password": "newpass"}))
        .send()
        .await
        .expect("login with new password");
    assert_eq!(resp.status(), 200);

    // Explicit null clears the field; leaving it out would not
    let resp = client
        .put(format!("{}/api/users/{}", server.base_url, user_id))
        .bearer_auth(&server.admin_token)
        .json(&json!({"panel_title": null}))
        .send()
        .await
        .expect("clear panel_title");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("parse clear response");
    assert!(body["data"]["panel_title"].is_null());

    let resp: Value = client
        .get(format!("{}/api/users/{}", server.base_url, user_id))
        .bearer_auth(&server.admin_token)
        .send()
        .await
        .expect("get user after clear")
        .json()
        .await
        .expect("parse user");
    assert!(resp["data"]["panel_title"].is_null());

    // Delete, then the account is gone
    let resp = client
        .delete(format!("{}/api/users/{}", server.base_url, user_id))
        .bearer_auth(&server.admin_token)
        .send()
        .await
        .expect("delete user");
    assert_eq!(resp.status(), 204);

    let resp = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "carla", "password": "newpass"}))
        .send()
        .await
        .expect("login after delete");
    assert_eq!(resp.status(), 401);
}
