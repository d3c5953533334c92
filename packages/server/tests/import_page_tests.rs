//! End-to-end tests of the import wizard through the HTTP router.

mod common;

use adapter_client::{AdaptOutcome, AdapterResponse};
use axum::http::StatusCode;
use eln_adapter_ui::domains::import::results::decode_results;
use eln_adapter_ui::kernel::MockAdapterService;
use serde_json::json;

use crate::common::{service_status, TestHarness};

const ELAB_URL: &str = "https://elab.tu-clausthal.de/experiments.php?mode=view&id=1234";

fn response(value: serde_json::Value) -> AdapterResponse {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// Method selection
// =============================================================================

#[tokio::test]
async fn selection_lists_url_and_upload_plugins() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx", "csv"],
        None,
    ))));

    let page = harness.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<title>ELN SMW Adapter</title>"));
    assert!(page.body.contains("Service is running (v2.1.0)"));
    assert!(page.body.contains("<option value=\"url\" selected>"));
    assert!(page.body.contains("<option value=\"docx\">Upload file (docx)</option>"));
    assert!(page.body.contains("<option value=\"csv\">Upload file (csv)</option>"));
    assert_eq!(harness.adapter.status_call_count(), 1);
}

#[tokio::test]
async fn selection_shows_disconnected_service() {
    let harness = TestHarness::new(MockAdapterService::offline());

    let page = harness.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("eln-status-disconnected"));
    assert!(!page.body.contains("<select"));
}

#[tokio::test]
async fn selection_redirects_to_chosen_method() {
    let harness = TestHarness::new(MockAdapterService::new(None));

    let page = harness.get("/?eln-type=docx").await;

    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/?method=docx"));
}

#[tokio::test]
async fn unknown_method_shows_error_box() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(&[], None))));

    let page = harness.get("/?method=pdf").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Unknown method: pdf"));
    assert!(!page.body.contains("<form"));
}

// =============================================================================
// URL import
// =============================================================================

#[tokio::test]
async fn url_form_issues_session_and_token() {
    let harness = TestHarness::new(MockAdapterService::new(None));

    let page = harness.get("/?method=url").await;

    let cookie = page.set_cookie.expect("session cookie");
    assert!(cookie.starts_with("eln_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(page.body.contains("name=\"eln-url\""));
    assert_eq!(harness.sessions.len().await, 1);
}

#[tokio::test]
async fn pages_without_forms_create_no_session() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(&[], None))));
    let data = eln_adapter_ui::domains::import::results::encode_results(&AdapterResponse::default())
        .unwrap();

    for uri in [
        "/".to_string(),
        "/?method=pdf".to_string(),
        format!("/?action=results&data={}", data),
    ] {
        let page = harness.get(&uri).await;
        assert_eq!(page.status, StatusCode::OK, "{uri}");
        assert!(page.set_cookie.is_none(), "{uri} set a cookie");
    }

    assert_eq!(harness.sessions.len().await, 0);
}

#[tokio::test]
async fn revisiting_the_form_keeps_session_and_token() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let session = harness.open_form("/?method=url").await;

    let again = harness.get_with_cookie("/?method=url", &session.cookie).await;

    assert_eq!(common::extract_token(&again.body), Some(session.token));
    assert_eq!(harness.sessions.len().await, 1);
}

#[tokio::test]
async fn forged_token_is_rejected_without_service_call() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[("wpEditToken", "forged"), ("eln-url", ELAB_URL)],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Invalid form submission. Please try again."));
    assert!(page.body.contains("value=\"\""), "URL field should be empty");
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn token_from_another_session_is_rejected() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let first = harness.open_form("/?method=url").await;
    let second = harness.open_form("/?method=url").await;
    assert_ne!(first.token, second.token);

    let page = harness
        .post_form(
            "/?method=url",
            &second.cookie,
            &[("wpEditToken", first.token.as_str()), ("eln-url", ELAB_URL)],
        )
        .await;

    assert!(page.body.contains("Invalid form submission"));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn malformed_url_is_rejected_without_service_call() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("eln-url", "not a url")],
        )
        .await;

    assert!(page.body.contains("Please provide a valid URL."));
    assert!(page.body.contains("value=\"not a url\""));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn missing_id_is_rejected_without_service_call() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[
                ("wpEditToken", session.token.as_str()),
                ("eln-url", "https://elab.tu-clausthal.de/experiments.php?mode=view"),
            ],
        )
        .await;

    assert!(page.body.contains("Missing url parameter: id"));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn unsupported_host_is_rejected() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[
                ("wpEditToken", session.token.as_str()),
                ("eln-url", "https://eln.example.org/exp?id=5"),
            ],
        )
        .await;

    assert!(page.body.contains("No ELN specified for this URL: eln.example.org"));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn successful_import_redirects_to_results() {
    let created = response(json!({
        "smw_pages": {"P1": {"title": "Sample"}, "X1": {}},
        "messages": [{"type": "error", "text": "template missing"}]
    }));
    let harness = TestHarness::new(MockAdapterService::new(None).with_response(created.clone()));
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("eln-url", ELAB_URL)],
        )
        .await;

    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let location = page.location.expect("redirect location");
    let data = location
        .strip_prefix("/?action=results&data=")
        .expect("results location");
    assert_eq!(decode_results(data).unwrap(), created);

    let calls = harness.adapter.adapt_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].eln, "eLabFTW");
    assert_eq!(calls[0].id, "1234");

    // Follow the redirect
    let results = harness.get_with_cookie(&location, &session.cookie).await;
    assert_eq!(results.status, StatusCode::OK);
    assert!(results.body.contains("<title>Import results</title>"));
    assert_eq!(results.body.matches("class=\"eln-protocol-link\"").count(), 1);
    assert!(results.body.contains(">P1</a>"));
    assert!(!results.body.contains(">X1</a>"));
    assert_eq!(results.body.matches("eln-log-message eln-log-error").count(), 1);
    assert!(results.body.contains("template missing"));
}

#[tokio::test]
async fn offline_service_shows_offline_message() {
    let harness = TestHarness::new(MockAdapterService::offline());
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("eln-url", ELAB_URL)],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Service offline. Please contact your administrator."));
    assert!(page.body.contains("Failed to process the request."));
    assert_eq!(harness.adapter.adapt_call_count(), 1);
}

#[tokio::test]
async fn http_error_is_reported_with_code() {
    let harness = TestHarness::new(
        MockAdapterService::new(None).with_outcome(AdaptOutcome::HttpError(502)),
    );
    let session = harness.open_form("/?method=url").await;

    let page = harness
        .post_form(
            "/?method=url",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("eln-url", ELAB_URL)],
        )
        .await;

    assert!(page.body.contains("(HTTP 502)"));
}

// =============================================================================
// Results
// =============================================================================

#[tokio::test]
async fn empty_results_show_both_notices() {
    let harness = TestHarness::new(MockAdapterService::new(None));
    let data = eln_adapter_ui::domains::import::results::encode_results(&AdapterResponse::default())
        .unwrap();

    let page = harness.get(&format!("/?action=results&data={}", data)).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No protocols created"));
    assert!(page.body.contains("No log messages available."));
}

#[tokio::test]
async fn results_without_data() {
    let harness = TestHarness::new(MockAdapterService::new(None));

    let page = harness.get("/?action=results").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No results data found."));
}

// =============================================================================
// File upload
// =============================================================================

#[tokio::test]
async fn upload_form_renders_for_upload_plugin() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx"],
        None,
    ))));

    let page = harness.get("/?method=docx").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("enctype=\"multipart"));
    assert!(page.body.contains("name=\"wpmethod\" value=\"docx\""));
    assert!(page.body.contains("name=\"upload-file\""));
}

#[tokio::test]
async fn upload_is_stored_and_adapted() {
    let uploads = tempfile::tempdir().unwrap();
    let harness = TestHarness::new(
        MockAdapterService::new(Some(service_status(&["docx"], uploads.path().to_str())))
            .with_response(response(json!({"smw_pages": {"P42": {}}}))),
    );
    let session = harness.open_form("/?method=docx").await;

    let page = harness
        .post_multipart(
            "/?method=docx",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("wpmethod", "docx")],
            Some(("protocol.docx", &b"PK\x03\x04 fake docx"[..])),
        )
        .await;

    assert_eq!(page.status, StatusCode::SEE_OTHER, "body: {}", page.body);

    let calls = harness.adapter.adapt_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].eln, "docx");
    assert!(calls[0].id.ends_with(".docx"));
    assert_ne!(calls[0].id, "protocol.docx");

    let stored = uploads.path().join(&calls[0].id);
    assert_eq!(std::fs::read(stored).unwrap(), b"PK\x03\x04 fake docx");
    assert_eq!(std::fs::read_dir(harness.staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_without_upload_dir_moves_nothing() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx"],
        None,
    ))));
    let session = harness.open_form("/?method=docx").await;

    let page = harness
        .post_multipart(
            "/?method=docx",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("wpmethod", "docx")],
            Some(("protocol.docx", &b"data"[..])),
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Upload directory is not configured."));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
    assert_eq!(std::fs::read_dir(harness.staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_with_forged_token_stores_nothing() {
    let uploads = tempfile::tempdir().unwrap();
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx"],
        uploads.path().to_str(),
    ))));
    let session = harness.open_form("/?method=docx").await;

    let page = harness
        .post_multipart(
            "/?method=docx",
            &session.cookie,
            &[("wpEditToken", "forged"), ("wpmethod", "docx")],
            Some(("protocol.docx", &b"data"[..])),
        )
        .await;

    assert!(page.body.contains("Invalid form submission"));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_without_file() {
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx"],
        Some("/tmp"),
    ))));
    let session = harness.open_form("/?method=docx").await;

    let page = harness
        .post_multipart(
            "/?method=docx",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("wpmethod", "docx")],
            None,
        )
        .await;

    assert!(page.body.contains("Please select a file to upload."));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
}

#[tokio::test]
async fn oversized_upload_is_reported_as_unreadable() {
    let uploads = tempfile::tempdir().unwrap();
    let harness = TestHarness::new(MockAdapterService::new(Some(service_status(
        &["docx"],
        uploads.path().to_str(),
    ))));
    let session = harness.open_form("/?method=docx").await;
    let too_large = vec![b'x'; 2 * 1024 * 1024];

    let page = harness
        .post_multipart(
            "/?method=docx",
            &session.cookie,
            &[("wpEditToken", session.token.as_str()), ("wpmethod", "docx")],
            Some(("protocol.docx", too_large.as_slice())),
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page
        .body
        .contains("The upload could not be read. The file may be larger than allowed."));
    assert!(!page.body.contains("Please select a file to upload."));
    assert_eq!(harness.adapter.adapt_call_count(), 0);
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    assert_eq!(std::fs::read_dir(harness.staging.path()).unwrap().count(), 0);
}
