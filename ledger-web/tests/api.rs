//! End-to-end tests driving the HTTP API against a real bound socket,
//! the way a client of this service actually sees it.

use serde_json::{json, Value};

use ledger_web::config::Config;
use ledger_web::state::AppState;

async fn spawn_server() -> String {
    let config = Config { address: "127.0.0.1:0".parse().unwrap() };
    let state = AppState::new(config);
    let app = ledger_web::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn hex_id(n: u128) -> String {
    format!("{:032x}", n)
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_account_and_fetch() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let account_id = hex_id(1);
    let resp = client
        .post(format!("{base}/accounts"))
        .json(&json!({
            "id": account_id,
            "ledger": 1,
            "code": 10,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "ok");

    let resp = client.get(format!("{base}/accounts/{account_id}")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], account_id);
    assert_eq!(body["debits_posted"], "0");
}

#[tokio::test]
async fn test_create_account_rejects_zero_id() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/accounts"))
        .json(&json!({"id": hex_id(0), "ledger": 1, "code": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "id_must_not_be_zero");
}

#[tokio::test]
async fn test_get_account_not_found() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/accounts/{}", hex_id(999))).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_simple_transfer_and_query() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let debit_id = hex_id(10);
    let credit_id = hex_id(11);
    for id in [&debit_id, &credit_id] {
        client
            .post(format!("{base}/accounts"))
            .json(&json!({"id": id, "ledger": 1, "code": 10, "history": true}))
            .send()
            .await
            .unwrap();
    }

    let transfer_id = hex_id(20);
    let resp = client
        .post(format!("{base}/transfers"))
        .json(&json!({
            "id": transfer_id,
            "debit_account_id": debit_id,
            "credit_account_id": credit_id,
            "amount": "500",
            "ledger": 1,
            "code": 1,
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "ok");

    let resp = client.get(format!("{base}/accounts/{debit_id}")).send().await.unwrap();
    let account: Value = resp.json().await.unwrap();
    assert_eq!(account["debits_posted"], "500");

    let resp = client.get(format!("{base}/transfers/{transfer_id}")).send().await.unwrap();
    let transfer: Value = resp.json().await.unwrap();
    assert_eq!(transfer["amount"], "500");

    let resp = client.get(format!("{base}/accounts/{debit_id}/transfers")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["transfers"].as_array().unwrap().len(), 1);

    let resp = client.get(format!("{base}/accounts/{debit_id}/balances")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["balances"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_two_phase_transfer_post() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let debit_id = hex_id(30);
    let credit_id = hex_id(31);
    for id in [&debit_id, &credit_id] {
        client
            .post(format!("{base}/accounts"))
            .json(&json!({"id": id, "ledger": 1, "code": 10}))
            .send()
            .await
            .unwrap();
    }

    let pending_id = hex_id(40);
    client
        .post(format!("{base}/transfers"))
        .json(&json!({
            "id": pending_id,
            "debit_account_id": debit_id,
            "credit_account_id": credit_id,
            "amount": "200",
            "ledger": 1,
            "code": 1,
            "pending": true,
        }))
        .send()
        .await
        .unwrap();

    let post_id = hex_id(41);
    let resp = client
        .post(format!("{base}/transfers"))
        .json(&json!({
            "id": post_id,
            "debit_account_id": debit_id,
            "credit_account_id": credit_id,
            "amount": "0",
            "pending_id": pending_id,
            "ledger": 1,
            "code": 1,
            "post_pending_transfer": true,
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "ok");

    let resp = client.get(format!("{base}/accounts/{debit_id}")).send().await.unwrap();
    let account: Value = resp.json().await.unwrap();
    assert_eq!(account["debits_pending"], "0");
    assert_eq!(account["debits_posted"], "200");
}
