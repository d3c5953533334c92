//! HTML for the wizard forms and the service status panel.

use adapter_client::ServiceStatus;

use super::upload::FILE_FIELD;
use super::wizard::{method_url, page_url, METHOD_URL, PAGE_PATH};
use crate::common::html::{element, open_element, raw_element};
use crate::common::MessageCatalog;

/// Field names shared by the forms and the controller
pub const TOKEN_FIELD: &str = "wpEditToken";
pub const URL_FIELD: &str = "eln-url";
pub const METHOD_FIELD: &str = "wpmethod";
pub const ELN_TYPE_FIELD: &str = "eln-type";

pub fn status_panel(status: Option<&ServiceStatus>, catalog: &MessageCatalog) -> String {
    let title = element(
        "h3",
        &[("class", "eln-status-title")],
        &catalog.text::<&str>("status-title", &[]),
    );

    let Some(status) = status else {
        let body = element(
            "div",
            &[("class", "eln-status-indicator eln-status-disconnected")],
            &catalog.text::<&str>("status-disconnected", &[]),
        );
        return raw_element(
            "div",
            &[("class", "eln-status eln-status-offline")],
            &format!("{}{}", title, body),
        );
    };

    let version = status.version.as_deref().unwrap_or("unknown");
    let mut body = element(
        "div",
        &[("class", "eln-status-indicator eln-status-connected")],
        &catalog.text("status-connected", &[version]),
    );
    if let Some(connection) = status.smw_connection.as_deref() {
        body.push_str(&element(
            "div",
            &[("class", "eln-status-detail")],
            &catalog.text("status-smw-connection", &[connection]),
        ));
    }
    if !status.enabled_plugins.is_empty() {
        body.push_str(&element(
            "div",
            &[("class", "eln-status-detail")],
            &catalog.text("status-plugins", &[status.enabled_plugins.join(", ")]),
        ));
    }

    raw_element(
        "div",
        &[("class", "eln-status eln-status-online")],
        &format!("{}{}", title, body),
    )
}

/// Step 1. Offers URL import when any URL plugin exists and one entry per
/// upload plugin. With no live status there is nothing to offer.
pub fn selection_form(
    status: Option<&ServiceStatus>,
    catalog: &MessageCatalog,
    manual_url: Option<&str>,
) -> String {
    let mut options = String::new();
    if let Some(status) = status {
        if status.has_url_plugins() {
            options.push_str(&element(
                "option",
                &[("value", METHOD_URL), ("selected", "")],
                &catalog.text::<&str>("form-option-url", &[]),
            ));
        }
        for plugin in status.upload_plugins() {
            options.push_str(&element(
                "option",
                &[("value", plugin)],
                &catalog.text("form-option-upload", &[plugin]),
            ));
        }
    }

    let mut fields = element("legend", &[], &catalog.text::<&str>("form-select-legend", &[]));
    fields.push_str(&element(
        "p",
        &[("class", "eln-help")],
        &catalog.text::<&str>("form-eln-type-help", &[]),
    ));

    if options.is_empty() {
        fields.push_str(&element(
            "div",
            &[("class", "mw-message-box mw-message-box-warning")],
            &catalog.text::<&str>("form-no-methods", &[]),
        ));
    } else {
        fields.push_str(&element(
            "label",
            &[("for", ELN_TYPE_FIELD)],
            &catalog.text::<&str>("form-eln-type-label", &[]),
        ));
        fields.push_str(&raw_element(
            "select",
            &[("id", ELN_TYPE_FIELD), ("name", ELN_TYPE_FIELD)],
            &options,
        ));
        fields.push_str(&element(
            "button",
            &[("type", "submit"), ("class", "eln-button eln-button-primary")],
            &catalog.text::<&str>("form-continue", &[]),
        ));
    }

    if let Some(manual_url) = manual_url {
        let link = element(
            "a",
            &[("href", manual_url), ("target", "_blank"), ("rel", "noopener noreferrer")],
            &catalog.text::<&str>("form-manual", &[]),
        );
        fields.push_str(&raw_element("p", &[("class", "eln-manual")], &link));
    }

    raw_element(
        "form",
        &[("method", "get"), ("action", PAGE_PATH), ("class", "eln-form")],
        &raw_element("fieldset", &[], &fields),
    )
}

/// Step 2 for URL import. `value` is echoed back after a failed submission.
pub fn url_form(token: &str, value: &str, catalog: &MessageCatalog) -> String {
    let mut fields = element("legend", &[], &catalog.text::<&str>("form-legend", &[]));
    fields.push_str(&element(
        "p",
        &[("class", "eln-help")],
        &catalog.text::<&str>("form-url-help", &[]),
    ));
    fields.push_str(&hidden(TOKEN_FIELD, token));
    fields.push_str(&element(
        "label",
        &[("for", URL_FIELD)],
        &catalog.text::<&str>("form-url-label", &[]),
    ));
    fields.push_str(&element(
        "input",
        &[
            ("type", "url"),
            ("id", URL_FIELD),
            ("name", URL_FIELD),
            ("value", value),
            ("class", "eln-input"),
            ("required", ""),
        ],
        "",
    ));
    fields.push_str(&element(
        "button",
        &[("type", "submit"), ("class", "eln-button eln-button-primary")],
        &catalog.text::<&str>("form-submit", &[]),
    ));

    raw_element(
        "form",
        &[
            ("method", "post"),
            ("action", method_url(METHOD_URL).as_str()),
            ("class", "eln-form"),
        ],
        &raw_element("fieldset", &[], &fields),
    )
}

/// Step 2 for file import through `plugin`.
pub fn upload_form(token: &str, plugin: &str, catalog: &MessageCatalog) -> String {
    let mut fields = element("legend", &[], &catalog.text::<&str>("form-upload-legend", &[]));
    fields.push_str(&element(
        "p",
        &[("class", "eln-help")],
        &catalog.text("form-upload-method", &[plugin]),
    ));
    fields.push_str(&element(
        "p",
        &[("class", "eln-help")],
        &catalog.text::<&str>("form-file-help", &[]),
    ));
    fields.push_str(&hidden(TOKEN_FIELD, token));
    fields.push_str(&hidden(METHOD_FIELD, plugin));

    let mut drop_zone = element(
        "input",
        &[
            ("type", "file"),
            ("id", FILE_FIELD),
            ("name", FILE_FIELD),
            ("class", "eln-file-input"),
            ("required", ""),
        ],
        "",
    );
    drop_zone.push_str(&element(
        "span",
        &[("class", "eln-file-drop-text")],
        &catalog.text::<&str>("file-drop-text", &[]),
    ));
    fields.push_str(&element(
        "label",
        &[("for", FILE_FIELD)],
        &catalog.text::<&str>("form-file-label", &[]),
    ));
    fields.push_str(&raw_element(
        "div",
        &[("class", "eln-file-drop"), ("data-drop-zone", "")],
        &drop_zone,
    ));
    fields.push_str(&element(
        "button",
        &[("type", "submit"), ("class", "eln-button eln-button-primary")],
        &catalog.text::<&str>("form-upload", &[]),
    ));

    let mut html = raw_element(
        "form",
        &[
            ("method", "post"),
            ("action", method_url(plugin).as_str()),
            ("enctype", "multipart/form-data"),
            ("class", "eln-form"),
        ],
        &raw_element("fieldset", &[], &fields),
    );
    html.push_str(&element("script", &[("src", "/assets/upload.js"), ("defer", "defer")], ""));
    html
}

pub fn back_link(catalog: &MessageCatalog) -> String {
    let link = element(
        "a",
        &[("href", page_url(&[]).as_str())],
        &catalog.text::<&str>("back-to-selection", &[]),
    );
    raw_element("p", &[("class", "eln-back")], &link)
}

pub fn unknown_method_box(method: &str, catalog: &MessageCatalog) -> String {
    element(
        "div",
        &[("class", "errorbox")],
        &catalog.text("error-unknown-method", &[method]),
    )
}

fn hidden(name: &str, value: &str) -> String {
    open_element("input", &[("type", "hidden"), ("name", name), ("value", value)])
}
