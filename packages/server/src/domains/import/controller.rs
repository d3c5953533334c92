//! Import page controller.
//!
//! Turns a resolved [`Step`] plus the request's form data into either a page
//! body or a redirect. Every failure ends up as a [`UserMessage`] or an
//! error panel on the re-rendered form; nothing here produces an HTTP error.

use adapter_client::{AdaptOutcome, AdapterResponse};
use serde::Deserialize;
use std::path::Path;
use tower_sessions::{session, Session};
use tracing::{error, info, warn};

use super::forms::{self, status_panel};
use super::messages::{Notices, UserMessage};
use super::results::{decode_results, encode_results, render_outcome, RenderContext};
use super::upload::{store_upload, UploadError, UploadForm};
use super::validation::{is_valid_url, resolve_url_request};
use super::wizard::{method_url, results_url, Step, WizardQuery};
use crate::kernel::ServerDeps;
use crate::server::auth::FormToken;

/// What a request to the import page produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    Page {
        /// Message key of the page title
        title_key: &'static str,
        body: String,
    },
    Redirect(String),
}

impl PageResponse {
    pub fn page(body: String) -> Self {
        PageResponse::Page {
            title_key: "special-page-title",
            body,
        }
    }
}

/// Body of a URL form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlSubmission {
    #[serde(default, rename = "wpEditToken")]
    pub token: String,
    #[serde(default, rename = "eln-url")]
    pub url: String,
}

/// Why a form is shown again
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rejection {
    pub notices: Notices,
    /// Failed adapter call, rendered as an error panel above the notices
    pub outcome: Option<AdaptOutcome>,
    /// URL field value to keep
    pub value: String,
}

/// Result of processing a submitted form
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Success, continue at this location
    Redirect(String),
    Rejected(Rejection),
}

impl Submission {
    pub fn rejected(notices: impl Into<Notices>, value: impl Into<String>) -> Self {
        Submission::Rejected(Rejection {
            notices: notices.into(),
            outcome: None,
            value: value.into(),
        })
    }
}

/// Render a step for a GET request (or a POST that carries no form for it)
pub async fn show(
    step: Step,
    query: &WizardQuery,
    session: &Session,
    deps: &ServerDeps,
) -> PageResponse {
    match step {
        Step::SelectMethod {
            chosen: Some(method),
        } => PageResponse::Redirect(method_url(&method)),
        Step::SelectMethod { chosen: None } => {
            let status = deps.adapter.check_status().await;
            let mut body = status_panel(status.as_ref(), &deps.messages);
            body.push_str(&forms::selection_form(
                status.as_ref(),
                &deps.messages,
                deps.manual_url.as_deref(),
            ));
            PageResponse::page(body)
        }
        Step::EnterUrl { .. } => url_step(session, &Rejection::default(), deps).await,
        Step::UploadFile { plugin, .. } => {
            let status = deps.adapter.check_status().await;
            if !status.as_ref().is_some_and(|s| s.is_upload_plugin(&plugin)) {
                return PageResponse::page(unknown_method_page(&plugin, deps));
            }
            upload_step(session, &plugin, &Rejection::default(), deps).await
        }
        Step::ShowResults => show_results(&query.data, deps),
    }
}

fn render_context(deps: &ServerDeps) -> RenderContext<'_> {
    RenderContext {
        catalog: &deps.messages,
        wiki_url: &deps.wiki_url,
        filter: &deps.page_filter,
    }
}

fn show_results(data: &str, deps: &ServerDeps) -> PageResponse {
    match decode_results(data) {
        Ok(response) => PageResponse::Page {
            title_key: "results-title",
            body: render_outcome(&AdaptOutcome::Ok(response), &render_context(deps)),
        },
        Err(e) => {
            warn!(error = %e, "Cannot show results");
            let mut body = e.user_message().render(&deps.messages);
            body.push_str(&forms::back_link(&deps.messages));
            PageResponse::page(body)
        }
    }
}

/// Whether `submitted` is the token issued to this session
async fn token_is_valid(session: &Session, submitted: &str) -> bool {
    match FormToken::stored(session).await {
        Ok(Some(token)) => token.matches(submitted),
        Ok(None) => false,
        Err(e) => {
            error!(error = %e, "Failed to load session");
            false
        }
    }
}

/// Handle a POST of the URL form
pub async fn process_url_submission(
    form: &UrlSubmission,
    session: &Session,
    deps: &ServerDeps,
) -> Submission {
    if !token_is_valid(session, &form.token).await {
        warn!(session_id = ?session.id(), "Rejected URL submission with invalid token");
        return Submission::rejected(UserMessage::error("error-invalid-token"), "");
    }

    let url = form.url.trim();
    if !is_valid_url(url) {
        return Submission::rejected(UserMessage::error("error-invalid-url"), url);
    }

    let request = match resolve_url_request(url, &deps.eln_hosts) {
        Ok(request) => request,
        Err(message) => {
            info!(url, key = %message.key, "URL could not be resolved");
            return Submission::rejected(message, url);
        }
    };

    info!(eln = %request.eln, id = %request.id, "Importing from URL");
    let outcome = deps.adapter.adapt(&request.eln, &request.id).await;

    finish(outcome, "error-processing-failed", url)
}

/// Handle a POST of the upload form for `plugin`
pub async fn process_upload_submission(
    form: UploadForm,
    plugin: &str,
    session: &Session,
    deps: &ServerDeps,
) -> Submission {
    if !token_is_valid(session, &form.token).await {
        warn!(session_id = ?session.id(), "Rejected upload with invalid token");
        return Submission::rejected(UserMessage::error("error-invalid-token"), "");
    }

    if form.method.trim() != plugin {
        warn!(submitted = %form.method, plugin, "Upload method does not match page");
        return Submission::rejected(
            UserMessage::error("error-unknown-method").with_param(form.method.trim()),
            "",
        );
    }

    let Some(file) = form.file.as_ref() else {
        return Submission::rejected(UserMessage::error(UploadError::NoFile.message_key()), "");
    };

    let upload_dir_missing = UserMessage::error(UploadError::UploadDirUnavailable.message_key());

    let Some(status) = deps.adapter.check_status().await else {
        return Submission::rejected(
            Notices::from(UserMessage::error("service-offline")).with(upload_dir_missing),
            "",
        );
    };

    if !status.is_upload_plugin(plugin) {
        return Submission::rejected(
            UserMessage::error("error-unknown-method").with_param(plugin),
            "",
        );
    }

    let Some(upload_dir) = status.upload_dir() else {
        warn!("Adapter service reported no upload directory");
        return Submission::rejected(upload_dir_missing, "");
    };

    let stored = match store_upload(file, Path::new(upload_dir)).await {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, upload_dir, "Failed to store upload");
            return Submission::rejected(UserMessage::error(e.message_key()), "");
        }
    };

    if !tokio::fs::try_exists(&stored).await.unwrap_or(false) {
        error!(path = %stored.display(), "Stored upload disappeared");
        return Submission::rejected(UserMessage::error("error-file-not-found"), "");
    }

    let stored_name = stored
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    info!(
        original_name = %file.name,
        path = %stored.display(),
        method = plugin,
        size = file.size,
        "File uploaded"
    );

    let outcome = deps.adapter.adapt(plugin, &stored_name).await;

    finish(outcome, "error-upload-processing-failed", "")
}

/// Redirect to the results on success. Otherwise the form is shown again with
/// the failed outcome and `failure_key`.
fn finish(outcome: AdaptOutcome, failure_key: &str, value: &str) -> Submission {
    let failure = UserMessage::error(failure_key);

    match outcome {
        AdaptOutcome::Ok(response) => match redirect_to_results(&response) {
            Some(location) => Submission::Redirect(location),
            None => Submission::rejected(failure, value),
        },
        failed => Submission::Rejected(Rejection {
            notices: failure.into(),
            outcome: Some(failed),
            value: value.to_string(),
        }),
    }
}

fn redirect_to_results(response: &AdapterResponse) -> Option<String> {
    match encode_results(response) {
        Ok(data) => Some(results_url(&data)),
        Err(e) => {
            error!(error = %e, "Failed to encode results");
            None
        }
    }
}

/// Messages above a re-rendered form
fn rejection_html(rejection: &Rejection, deps: &ServerDeps) -> String {
    let mut html = String::new();
    if let Some(outcome) = &rejection.outcome {
        html.push_str(&render_outcome(outcome, &render_context(deps)));
    }
    html.push_str(&rejection.notices.render(&deps.messages));
    html
}

pub fn url_page(token: &FormToken, rejection: &Rejection, deps: &ServerDeps) -> String {
    let mut body = rejection_html(rejection, deps);
    body.push_str(&forms::url_form(token.as_str(), &rejection.value, &deps.messages));
    body.push_str(&forms::back_link(&deps.messages));
    body
}

pub fn upload_page(
    token: &FormToken,
    plugin: &str,
    rejection: &Rejection,
    deps: &ServerDeps,
) -> String {
    let mut body = rejection_html(rejection, deps);
    body.push_str(&forms::upload_form(token.as_str(), plugin, &deps.messages));
    body.push_str(&forms::back_link(&deps.messages));
    body
}

pub fn unknown_method_page(method: &str, deps: &ServerDeps) -> String {
    let mut body = forms::unknown_method_box(method, &deps.messages);
    body.push_str(&forms::back_link(&deps.messages));
    body
}

/// URL form page. Issues the session's form token.
pub async fn url_step(session: &Session, rejection: &Rejection, deps: &ServerDeps) -> PageResponse {
    match FormToken::issue(session).await {
        Ok(token) => PageResponse::page(url_page(&token, rejection, deps)),
        Err(e) => session_unavailable(e, deps),
    }
}

/// Upload form page. Issues the session's form token.
pub async fn upload_step(
    session: &Session,
    plugin: &str,
    rejection: &Rejection,
    deps: &ServerDeps,
) -> PageResponse {
    match FormToken::issue(session).await {
        Ok(token) => PageResponse::page(upload_page(&token, plugin, rejection, deps)),
        Err(e) => session_unavailable(e, deps),
    }
}

fn session_unavailable(e: session::Error, deps: &ServerDeps) -> PageResponse {
    error!(error = %e, "Failed to issue form token");
    let mut body = UserMessage::error("error-session-unavailable").render(&deps.messages);
    body.push_str(&forms::back_link(&deps.messages));
    PageResponse::page(body)
}

/// Page for a processed URL submission
pub async fn respond_url(
    submission: Submission,
    session: &Session,
    deps: &ServerDeps,
) -> PageResponse {
    match submission {
        Submission::Redirect(location) => PageResponse::Redirect(location),
        Submission::Rejected(rejection) => url_step(session, &rejection, deps).await,
    }
}

/// Page for a processed upload submission
pub async fn respond_upload(
    submission: Submission,
    plugin: &str,
    session: &Session,
    deps: &ServerDeps,
) -> PageResponse {
    match submission {
        Submission::Redirect(location) => PageResponse::Redirect(location),
        Submission::Rejected(rejection) => upload_step(session, plugin, &rejection, deps).await,
    }
}
