//! HTTP API tests: routes exercised through the router with a scripted
//! fake remote store.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;
use uuid::Uuid;

use asv_common::config::SyncPolicy;
use asv_common::ReferenceCatalog;
use asv_obs::api::SESSION_HEADER;
use asv_obs::services::{ImageUploadService, RemoteError, RemoteStoreClient, UploadError};
use asv_obs::{build_router, AppState};

/// Fake remote store shared with the router under test
struct ScriptedRemote {
    calls: Mutex<Vec<String>>,
    fail_on: Vec<usize>,
}

impl ScriptedRemote {
    fn new(fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RemoteStoreClient for ScriptedRemote {
    async fn create_record(
        &self,
        fields: &Map<String, Value>,
        _idempotency_key: Uuid,
    ) -> Result<(), RemoteError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(
            fields["Common Name"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        );
        if self.fail_on.contains(&index) {
            Err(RemoteError::Api(500, "boom".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Fake image host: hands back a fixed URL or fails every upload
struct ScriptedUploader {
    result: Result<String, ()>,
}

#[async_trait::async_trait]
impl ImageUploadService for ScriptedUploader {
    async fn upload(&self, _path: &std::path::Path) -> Result<String, UploadError> {
        match &self.result {
            Ok(url) => Ok(url.clone()),
            Err(()) => Err(UploadError::Api(500, "upload refused".to_string())),
        }
    }
}

fn test_state(remote: Arc<ScriptedRemote>) -> AppState {
    AppState::new(
        ReferenceCatalog::builtin(),
        remote,
        None,
        SyncPolicy::BestEffort,
    )
}

fn test_state_with_uploader(uploader: ScriptedUploader) -> AppState {
    AppState::new(
        ReferenceCatalog::builtin(),
        ScriptedRemote::new(vec![]),
        Some(Arc::new(uploader)),
        SyncPolicy::BestEffort,
    )
}

fn submit_body_with_image(specimen: &str, image_path: &str) -> String {
    json!({
        "date_observed": "2024-07-02",
        "location": "Eden Landing",
        "plot": "P1",
        "survey_point": "PTF1",
        "side": "Slough side",
        "specimen": specimen,
        "count": 1,
        "notes": "",
        "surveyors": ["Eric"],
        "image_path": image_path,
    })
    .to_string()
}

fn submit_body(specimen: &str, count: u32, surveyors: &[&str]) -> String {
    json!({
        "date_observed": "2024-07-02",
        "location": "Eden Landing",
        "plot": "P1",
        "survey_point": "PTF1",
        "side": "Slough side",
        "specimen": specimen,
        "count": count,
        "notes": "",
        "surveyors": surveyors,
    })
    .to_string()
}

fn request(method: &str, uri: &str, session: Uuid, body: Option<String>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(SESSION_HEADER, session.to_string())
        .header("content-type", "application/json");
    match body {
        Some(body) => builder.body(Body::from(body)).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_module_and_catalog_size() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["module"], "asv-obs");
    assert!(body["catalog_entries"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn submit_then_list_round_trip() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body("Golden Orb Weaver", 3, &["Eric"])),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["record"]["genus"], "Nephila");
    assert_eq!(body["reset_form"], true);
    assert_eq!(body["image_upload_failed"], false);

    let response = app
        .oneshot(request("GET", "/api/observations", session, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"].as_array().unwrap().len(), 1);
    assert_eq!(body["observations"][0]["species"], "clavipes");
}

#[tokio::test]
async fn submit_without_surveyors_is_rejected_and_not_staged() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body("Golden Orb Weaver", 1, &[])),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let response = app
        .oneshot(request("GET", "/api/observations", session, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn failed_image_upload_still_stages_the_record() {
    let app = build_router(test_state_with_uploader(ScriptedUploader {
        result: Err(()),
    }));
    let session = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body_with_image("Golden Orb Weaver", "/tmp/photo.jpg")),
        ))
        .await
        .unwrap();

    // Upload failure is non-fatal: staged anyway, with an empty URL
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["image_upload_failed"], true);
    assert_eq!(body["record"]["image_url"], "");

    let response = app
        .oneshot(request("GET", "/api/observations", session, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"].as_array().unwrap().len(), 1);
    assert_eq!(body["observations"][0]["image_url"], "");
}

#[tokio::test]
async fn successful_image_upload_lands_on_the_record() {
    let app = build_router(test_state_with_uploader(ScriptedUploader {
        result: Ok("https://i.imgur.com/abc123.jpg".to_string()),
    }));
    let session = Uuid::new_v4();

    let response = app
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body_with_image("Golden Orb Weaver", "/tmp/photo.jpg")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["image_upload_failed"], false);
    assert_eq!(
        body["record"]["image_url"],
        "https://i.imgur.com/abc123.jpg"
    );
}

#[tokio::test]
async fn submit_with_unknown_specimen_is_rejected() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session = Uuid::new_v4();

    let response = app
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body("Jackalope", 1, &["Hop"])),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_session_header_is_bad_request() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/observations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_by_position_shifts_remaining_records() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session = Uuid::new_v4();

    for specimen in ["Wolf Spider", "Harvestman"] {
        app.clone()
            .oneshot(request(
                "POST",
                "/api/observations",
                session,
                Some(submit_body(specimen, 1, &["Cole"])),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/observations/0", session, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["deleted"], true);
    assert_eq!(body["remaining"], 1);

    let response = app
        .oneshot(request("GET", "/api/observations", session, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"][0]["common_name"], "Harvestman");
}

#[tokio::test]
async fn invalid_delete_is_a_silent_no_op() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session = Uuid::new_v4();

    // Nothing staged yet
    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/observations/0", session, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["deleted"], false);

    // Negative position
    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/observations/-1", session, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["deleted"], false);

    // Non-numeric and absurdly large positions with a record staged:
    // still 200, nothing deleted
    app.clone()
        .oneshot(request(
            "POST",
            "/api/observations",
            session,
            Some(submit_body("Wolf Spider", 1, &["Cole"])),
        ))
        .await
        .unwrap();

    for position in ["garbage", "999999999999999999999999"] {
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/observations/{}", position),
                session,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["deleted"], false);
        assert_eq!(body["remaining"], 1);
    }
}

#[tokio::test]
async fn sync_clears_store_and_reports_partial_failure() {
    let remote = ScriptedRemote::new(vec![1]);
    let app = build_router(test_state(remote.clone()));
    let session = Uuid::new_v4();

    for specimen in ["Wolf Spider", "Harvestman"] {
        app.clone()
            .oneshot(request(
                "POST",
                "/api/observations",
                session,
                Some(submit_body(specimen, 1, &["Kaili"])),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request("POST", "/api/sync", session, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["submitted"], 1);
    assert_eq!(body["rejected"], 1);
    assert_eq!(remote.call_count(), 2);

    // Best-effort policy: store is empty even though one record failed
    let response = app
        .oneshot(request("GET", "/api/observations", session, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn sync_with_nothing_staged_makes_no_calls() {
    let remote = ScriptedRemote::new(vec![]);
    let app = build_router(test_state(remote.clone()));
    let session = Uuid::new_v4();

    let response = app
        .oneshot(request("POST", "/api/sync", session, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["submitted"], 0);
    assert_eq!(body["rejected"], 0);
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));
    let session_a = Uuid::new_v4();
    let session_b = Uuid::new_v4();

    app.clone()
        .oneshot(request(
            "POST",
            "/api/observations",
            session_a,
            Some(submit_body("Wolf Spider", 1, &["Eric"])),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(request("GET", "/api/observations", session_b, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["observations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn catalog_names_are_sorted() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog/names")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<String> = body["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&"Golden Orb Weaver".to_string()));
}

#[tokio::test]
async fn unknown_catalog_entry_is_404() {
    let app = build_router(test_state(ScriptedRemote::new(vec![])));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog/Jackalope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
