use std::sync::Arc;
use std::time::Duration;

use attendance_hub::api::AppendRowRequest;
use attendance_hub::client::SheetsReader;
use attendance_hub::config::Config;
use attendance_hub::db::JsonFileStore;
use attendance_hub::types::requests::CreateFormRequest;
use attendance_hub::{FormsService, TrackingNotifier};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{addr}")
}

fn tracking_config(webhook: &str) -> Config {
    Config {
        sheet_tracking_url: Some(
            "https://docs.google.com/spreadsheets/d/track-sheet-1/edit#gid=0".to_string(),
        ),
        tracking_webhook_url: Some(Url::parse(webhook).unwrap()),
        ..Config::default()
    }
}

fn create_req(name: &str) -> CreateFormRequest {
    CreateFormRequest {
        name: Some(name.to_string()),
        url: Some("https://forms.example/x".to_string()),
        sheet_url: Some("https://docs.google.com/spreadsheets/d/resp/edit".to_string()),
    }
}

#[tokio::test]
async fn created_form_is_forwarded_to_webhook() {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppendRowRequest>();
    let hook = Router::new()
        .route(
            "/append",
            post(
                |State(tx): State<mpsc::UnboundedSender<AppendRowRequest>>,
                 Json(body): Json<AppendRowRequest>| async move {
                    let _ = tx.send(body);
                    StatusCode::OK
                },
            ),
        )
        .with_state(tx);
    let base = serve(hook).await;

    let cfg = tracking_config(&format!("{base}/append"));
    let notifier = TrackingNotifier::new(&cfg, reqwest::Client::new());
    assert!(notifier.is_enabled());

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("db.json"), None));
    let forms = FormsService::new(store, notifier);
    let form = forms.create(create_req("Lecture 7")).await.unwrap();

    let row = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("webhook was not called")
        .expect("channel closed");
    assert_eq!(row.spreadsheet_id, "track-sheet-1");
    assert_eq!(row.values.len(), 1);
    let values = &row.values[0];
    assert_eq!(values.len(), 4);
    assert!(!values[0].is_empty());
    assert_eq!(values[1], form.name);
    assert_eq!(values[2], form.url);
    assert_eq!(values[3], form.sheet_url);
}

#[tokio::test]
async fn failing_webhook_does_not_fail_create() {
    let hook = Router::new().route(
        "/append",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(hook).await;

    let cfg = tracking_config(&format!("{base}/append"));
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("db.json"), None));
    let forms = FormsService::new(store, TrackingNotifier::new(&cfg, reqwest::Client::new()));

    let form = forms.create(create_req("Lecture 8")).await.unwrap();
    assert!(form.is_active);
    assert_eq!(forms.list().await.forms.len(), 1);
}

#[tokio::test]
async fn sheets_reader_tallies_fetched_rows() {
    let values = Router::new().route(
        "/{sheet}/values/{range}",
        get(
            |Path((sheet, range)): Path<(String, String)>,
             Query(q): Query<std::collections::HashMap<String, String>>| async move {
                assert_eq!(sheet, "resp");
                assert_eq!(range, "A:Z");
                if q.get("key").map(String::as_str) != Some("k") {
                    return (StatusCode::FORBIDDEN, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "range": "Sheet1!A1:C3",
                        "values": [
                            ["Timestamp", "Present?"],
                            ["t1", "Yes"],
                            ["t2", "Yes"],
                            ["t3", "No"]
                        ]
                    })),
                )
            },
        ),
    );
    let base = serve(values).await;

    let reader = SheetsReader::new(reqwest::Client::new(), "k").with_base(base.clone());
    let summary = reader
        .summarize_sheet("https://docs.google.com/spreadsheets/d/resp/edit")
        .await
        .unwrap();
    assert_eq!(summary.total_responses, 3);
    assert_eq!(summary.questions[0].title, "Present?");
    assert_eq!(summary.questions[0].responses[0].option, "Yes");
    assert_eq!(summary.questions[0].responses[0].count, 2);

    let denied = SheetsReader::new(reqwest::Client::new(), "wrong").with_base(base);
    assert!(denied.fetch_values("resp", "A:Z").await.is_err());
}
