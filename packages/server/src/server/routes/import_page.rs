use axum::{
    extract::{Extension, FromRequest, Multipart, Query, Request},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::common::html::escape;
use crate::common::MessageCatalog;
use crate::domains::import::controller::{
    self, process_upload_submission, process_url_submission, respond_upload, respond_url,
};
use crate::domains::import::upload::stage_multipart;
use crate::domains::import::{
    PageResponse, Step, Submission, UploadError, UrlSubmission, UserMessage, WizardQuery,
};
use crate::server::app::AxumAppState;

/// GET on the import page
pub async fn import_page_get(
    Extension(state): Extension<AxumAppState>,
    session: Session,
    Query(query): Query<WizardQuery>,
) -> Response {
    let step = Step::resolve(&query, false);
    debug!(?step, "Import page");

    let page = controller::show(step, &query, &session, &state.server_deps).await;
    into_response(page, &state.server_deps.messages)
}

/// POST on the import page: URL form or upload form submissions
pub async fn import_page_post(
    Extension(state): Extension<AxumAppState>,
    session: Session,
    Query(query): Query<WizardQuery>,
    request: Request,
) -> Response {
    let deps = &state.server_deps;
    let step = Step::resolve(&query, true);
    debug!(?step, "Import form submitted");

    let page = match step {
        Step::EnterUrl { submitted: true } => {
            let form = match Form::<UrlSubmission>::from_request(request, &()).await {
                Ok(Form(form)) => form,
                Err(e) => {
                    warn!(error = %e, "Unreadable URL form body");
                    UrlSubmission::default()
                }
            };

            let submission = process_url_submission(&form, &session, deps).await;
            respond_url(submission, &session, deps).await
        }
        Step::UploadFile {
            plugin,
            submitted: true,
        } => {
            let staged = match Multipart::from_request(request, &()).await {
                Ok(multipart) => stage_multipart(multipart, &state.staging_dir).await,
                Err(e) => Err(UploadError::Multipart(e.body_text())),
            };

            let submission = match staged {
                Ok(form) => process_upload_submission(form, &plugin, &session, deps).await,
                Err(e) => {
                    warn!(error = %e, plugin = %plugin, "Failed to read upload");
                    Submission::rejected(UserMessage::error(e.message_key()), "")
                }
            };
            respond_upload(submission, &plugin, &session, deps).await
        }
        other => controller::show(other, &query, &session, deps).await,
    };

    into_response(page, &deps.messages)
}

fn into_response(page: PageResponse, catalog: &MessageCatalog) -> Response {
    match page {
        PageResponse::Redirect(location) => Redirect::to(&location).into_response(),
        PageResponse::Page { title_key, body } => (
            [(header::CACHE_CONTROL, "no-store")],
            Html(page_shell(&catalog.text::<&str>(title_key, &[]), &body)),
        )
            .into_response(),
    }
}

/// Full HTML document around a page body
pub fn page_shell(title: &str, body: &str) -> String {
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/assets/styles.css\">\n\
         </head>\n\
         <body>\n\
         <main class=\"eln-page\">\n\
         <h1 class=\"eln-page-title\">{title}</h1>\n\
         {body}\n\
         </main>\n\
         </body>\n\
         </html>\n"
    )
}
