use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tally_client::{endpoint_url, GroupAction, HttpTransport, PageSnapshot, Transport, TransportError};

const PAGE: &str = r#"<html><body>
<script id="groupsData" type="application/json">{"Groceries": {"Substrings": null, "FromAccounts": ["A"], "ToAccounts": null}}</script>
<script id="accountsData" type="application/json">{"A": {"IsTransactionAccount": true, "OccurencesInTransactions": 7}}</script>
</body></html>"#;

type RequestLog = Arc<Mutex<Vec<Value>>>;

async fn page() -> &'static str {
    PAGE
}

async fn categorize(State(log): State<RequestLog>, Json(body): Json<Value>) -> (StatusCode, String) {
    let rejected = body["newGroupName"] == "Taken";
    log.lock().unwrap().push(body);
    if rejected {
        (StatusCode::BAD_REQUEST, "Group with this name already exists".to_string())
    } else {
        (StatusCode::OK, "[]".to_string())
    }
}

async fn spawn_server() -> (String, RequestLog) {
    let log = RequestLog::default();
    let app = Router::new()
        .route("/categorization", get(page).post(categorize))
        .with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), log)
}

#[tokio::test]
async fn posts_action_as_json() {
    let (server, log) = spawn_server().await;
    let transport = HttpTransport::new(endpoint_url(&server, "/categorization"));

    transport
        .submit(&GroupAction::create_empty("Food"))
        .await
        .unwrap();

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests, vec![json!({"action": "upsertGroup", "groupName": "Food"})]);
}

#[tokio::test]
async fn server_error_surfaces_body_verbatim() {
    let (server, log) = spawn_server().await;
    let transport = HttpTransport::new(endpoint_url(&server, "categorization"));

    let err = transport
        .submit(&GroupAction::rename("Food", "Taken"))
        .await
        .unwrap_err();

    match err {
        TransportError::Server { status, ref body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Group with this name already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn fetches_and_parses_page() {
    let (server, _log) = spawn_server().await;
    let transport = HttpTransport::new(endpoint_url(&server, "/categorization"));
    assert_eq!(transport.endpoint(), format!("{server}/categorization"));

    let html = transport.fetch_page().await.unwrap();
    let snapshot = PageSnapshot::parse(&html).unwrap();

    assert_eq!(snapshot.groups.get("Groceries").unwrap().from_accounts, vec!["A"]);
    assert_eq!(snapshot.accounts.lookup("A").unwrap().occurences_in_transactions, 7);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(format!("http://{addr}/categorization"));
    let err = transport.submit(&GroupAction::delete("Food")).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}
