//! Results rendering and the results pass-through blob.

use adapter_client::{AdaptOutcome, AdapterResponse, LogMessage};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use thiserror::Error;

use super::messages::UserMessage;
use super::wizard::page_url;
use crate::common::html::{element, escape, raw_element};
use crate::common::MessageCatalog;

/// Which `smw_pages` keys are listed as created protocols
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFilter {
    /// Keys starting with the prefix
    Prefix(String),
    Any,
}

impl PageFilter {
    /// Empty prefix means every page is listed
    pub fn from_prefix(prefix: &str) -> Self {
        if prefix.is_empty() {
            PageFilter::Any
        } else {
            PageFilter::Prefix(prefix.to_string())
        }
    }

    pub fn matches(&self, page_id: &str) -> bool {
        match self {
            PageFilter::Prefix(prefix) => page_id.starts_with(prefix.as_str()),
            PageFilter::Any => true,
        }
    }
}

impl Default for PageFilter {
    fn default() -> Self {
        PageFilter::Prefix("P".to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultsDataError {
    #[error("No results data")]
    Missing,
    #[error("Invalid results data: {0}")]
    Invalid(String),
}

impl ResultsDataError {
    pub fn user_message(&self) -> UserMessage {
        match self {
            ResultsDataError::Missing => UserMessage::error("error-no-results-data"),
            ResultsDataError::Invalid(_) => UserMessage::error("error-invalid-results-data"),
        }
    }
}

/// Encode a response for the `data` query parameter of the results step
pub fn encode_results(response: &AdapterResponse) -> serde_json::Result<String> {
    let json = serde_json::to_vec(response)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_results(data: &str) -> Result<AdapterResponse, ResultsDataError> {
    let data = data.trim();
    if data.is_empty() {
        return Err(ResultsDataError::Missing);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| STANDARD.decode(data))
        .map_err(|e| ResultsDataError::Invalid(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ResultsDataError::Invalid(e.to_string()))
}

/// What the renderer needs besides the response
pub struct RenderContext<'a> {
    pub catalog: &'a MessageCatalog,
    pub wiki_url: &'a str,
    pub filter: &'a PageFilter,
}

/// Created page ids that pass the filter, in response order
pub fn created_pages<'r>(response: &'r AdapterResponse, filter: &PageFilter) -> Vec<&'r str> {
    response
        .smw_pages
        .keys()
        .map(String::as_str)
        .filter(|id| filter.matches(id))
        .collect()
}

pub fn page_link_url(wiki_url: &str, page_id: &str) -> String {
    format!(
        "{}/{}",
        wiki_url.trim_end_matches('/'),
        urlencoding::encode(page_id)
    )
}

/// Results sections for a successful call, a single error panel otherwise
pub fn render_outcome(outcome: &AdaptOutcome, ctx: &RenderContext<'_>) -> String {
    match outcome {
        AdaptOutcome::Ok(response) => render_response(response, ctx),
        AdaptOutcome::ServiceUnavailable
        | AdaptOutcome::HttpError(_)
        | AdaptOutcome::InvalidJson => error_panel(
            ctx.catalog,
            outcome.message_key().unwrap_or_default(),
            &outcome.message_params(),
        ),
    }
}

pub fn error_panel(catalog: &MessageCatalog, key: &str, params: &[String]) -> String {
    element("div", &[("class", "errorbox")], &catalog.text(key, params))
}

pub fn render_response(response: &AdapterResponse, ctx: &RenderContext<'_>) -> String {
    let mut html = String::new();
    html.push_str(&render_protocols(response, ctx));
    html.push_str(&render_log(&response.messages, ctx.catalog));

    let actions = element(
        "a",
        &[("href", page_url(&[]).as_str()), ("class", "eln-button eln-button-primary")],
        &ctx.catalog.text::<&str>("back-button", &[]),
    );
    html.push_str(&raw_element("div", &[("class", "eln-actions")], &actions));

    raw_element("div", &[("class", "eln-results")], &html)
}

fn section(catalog: &MessageCatalog, title_key: &str, body: &str) -> String {
    let title = element(
        "h2",
        &[("class", "eln-section-title")],
        &catalog.text::<&str>(title_key, &[]),
    );
    raw_element("div", &[("class", "eln-section")], &format!("{}{}", title, body))
}

fn render_protocols(response: &AdapterResponse, ctx: &RenderContext<'_>) -> String {
    let pages = created_pages(response, ctx.filter);

    if pages.is_empty() {
        let notice = element(
            "div",
            &[("class", "eln-no-protocols")],
            &ctx.catalog.text::<&str>("warning-no-protocols", &[]),
        );
        return section(ctx.catalog, "results-protocols", &notice);
    }

    let mut list = String::new();
    for page_id in &pages {
        let link = element(
            "a",
            &[
                ("href", page_link_url(ctx.wiki_url, page_id).as_str()),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
                ("class", "eln-protocol-link"),
            ],
            page_id,
        );
        list.push_str(&raw_element("div", &[("class", "eln-protocol-item")], &link));
    }
    list.push_str(&element(
        "div",
        &[("class", "eln-protocols-summary")],
        &ctx.catalog.text("protocols-count", &[pages.len().to_string()]),
    ));

    section(
        ctx.catalog,
        "results-protocols",
        &raw_element("div", &[("class", "eln-protocols-list")], &list),
    )
}

fn render_log(messages: &[LogMessage], catalog: &MessageCatalog) -> String {
    if messages.is_empty() {
        let notice = element(
            "div",
            &[("class", "eln-no-messages")],
            &catalog.text::<&str>("results-no-messages", &[]),
        );
        return section(catalog, "results-log", &notice);
    }

    let mut lines = String::new();
    for message in messages {
        let level = message.level();
        let label = if message.kind.is_empty() {
            level.as_str().to_uppercase()
        } else {
            message.kind.to_uppercase()
        };
        let class = format!("eln-log-message eln-log-{}", level.as_str());
        lines.push_str(&format!(
            "<div class=\"{}\"><span class=\"eln-log-type\">[{}]</span> <span class=\"eln-log-text\">{}</span></div>",
            escape(&class),
            escape(&label),
            escape(&message.text)
        ));
    }

    section(
        catalog,
        "results-log",
        &raw_element("div", &[("class", "eln-log-messages")], &lines),
    )
}
