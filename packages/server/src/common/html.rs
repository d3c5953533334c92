//! Small HTML building helpers. Every text and attribute value goes through
//! [`escape`].

use std::fmt::Write;

pub fn escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

/// `<tag a="b">` with escaped attribute values. Boolean attributes use an
/// empty value and are written bare.
pub fn open_element(tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut html = String::new();
    let _ = write!(html, "<{}", tag);
    for (name, value) in attrs {
        if value.is_empty() && is_boolean_attr(name) {
            let _ = write!(html, " {}", name);
        } else {
            let _ = write!(html, " {}=\"{}\"", name, escape(value));
        }
    }
    html.push('>');
    html
}

pub fn close_element(tag: &str) -> String {
    format!("</{}>", tag)
}

/// Element with escaped text content. Void elements get no closing tag.
pub fn element(tag: &str, attrs: &[(&str, &str)], text: &str) -> String {
    let mut html = open_element(tag, attrs);
    if !is_void(tag) {
        html.push_str(&escape(text));
        html.push_str(&close_element(tag));
    }
    html
}

/// Element wrapping already-built HTML.
pub fn raw_element(tag: &str, attrs: &[(&str, &str)], inner_html: &str) -> String {
    format!("{}{}{}", open_element(tag, attrs), inner_html, close_element(tag))
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "link" | "meta")
}

fn is_boolean_attr(name: &str) -> bool {
    matches!(name, "required" | "selected" | "disabled" | "checked")
}
