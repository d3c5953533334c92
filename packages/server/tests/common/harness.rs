//! Router-level test harness.
//!
//! Builds the full application around a `MockAdapterService` and drives it
//! with `tower::ServiceExt::oneshot`, no network involved.

use std::sync::Arc;

use adapter_client::{PluginInfo, PluginType, ServiceStatus};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use eln_adapter_ui::kernel::{MockAdapterService, TestDependencies};
use eln_adapter_ui::server::{auth::SessionStore, build_app, AppOptions};
use tempfile::TempDir;
use tower::ServiceExt;

/// Multipart boundary used by `post_multipart`
pub const BOUNDARY: &str = "eln-test-boundary-7MA4YWxkTrZu0gW";

pub struct TestHarness {
    pub app: Router,
    pub adapter: Arc<MockAdapterService>,
    pub sessions: SessionStore,
    pub staging: TempDir,
}

/// A browser session: its cookie and the anti-forgery token of its forms
pub struct BrowserSession {
    pub cookie: String,
    pub token: String,
}

/// Response with the body already collected
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestHarness {
    pub fn new(adapter: MockAdapterService) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let test_deps = TestDependencies::new(adapter);
        let sessions = SessionStore::new();
        let staging = tempfile::tempdir().expect("staging dir");

        let app = build_app(
            test_deps.server_deps(),
            sessions.clone(),
            AppOptions {
                max_upload_bytes: 1024 * 1024,
                staging_dir: staging.path().to_path_buf(),
                secure_cookies: false,
            },
        );

        Self {
            app,
            adapter: test_deps.adapter,
            sessions,
            staging,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = response.status();
        let location = header_value(header::LOCATION);
        let set_cookie = header_value(header::SET_COOKIE);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        TestResponse {
            status,
            location,
            set_cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Open a form page and return the session it was issued for
    pub async fn open_form(&self, uri: &str) -> BrowserSession {
        let response = self.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);

        let cookie = response
            .set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .expect("session cookie")
            .to_string();
        let token = extract_token(&response.body).expect("form token");

        BrowserSession { cookie, token }
    }

    pub async fn post_form(&self, uri: &str, cookie: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        self.send(
            Request::post(uri)
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        cookie: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::COOKIE, cookie)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(fields, file)))
                .unwrap(),
        )
        .await
    }
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"upload-file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Value of the hidden anti-forgery field in a rendered form
pub fn extract_token(html: &str) -> Option<String> {
    let marker = "name=\"wpEditToken\" value=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

/// Status listing one URL plugin and the given upload plugins
pub fn service_status(upload_plugins: &[&str], upload_path: Option<&str>) -> ServiceStatus {
    let mut status = ServiceStatus {
        version: Some("2.1.0".into()),
        smw_connection: Some("connected".into()),
        upload_path: upload_path.map(str::to_string),
        ..Default::default()
    };
    status.plugins.insert(
        "eLabFTW".into(),
        PluginInfo {
            plugin_type: PluginType::Url,
        },
    );
    status.enabled_plugins.push("eLabFTW".into());
    for plugin in upload_plugins {
        status.plugins.insert(
            plugin.to_string(),
            PluginInfo {
                plugin_type: PluginType::Upload,
            },
        );
        status.enabled_plugins.push(plugin.to_string());
    }
    status
}
