//! Localized message lookup.
//!
//! Messages are keyed templates with `$1..$n` positional parameters and an
//! optional `{{PLURAL:n|singular|plural}}` switch. English texts are compiled
//! in; a JSON file can override any subset of them.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_EN: &str = include_str!("../../i18n/en.json");

#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Built-in English catalog
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_EN).expect("Built-in message catalog is valid JSON")
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let messages: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { messages })
    }

    /// Built-in catalog, with overrides from `path` if given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::builtin();

        if let Some(path) = path {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read messages from {}", path.display()))?;
            let overrides = Self::from_json(&json)
                .with_context(|| format!("Invalid message file {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                count = overrides.messages.len(),
                "Loaded message overrides"
            );
            catalog.merge(overrides);
        }

        Ok(catalog)
    }

    pub fn merge(&mut self, other: MessageCatalog) {
        self.messages.extend(other.messages);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Plain text for `key`. Unknown keys render as `⧼key⧽`.
    pub fn text<S: AsRef<str>>(&self, key: &str, params: &[S]) -> String {
        let Some(template) = self.messages.get(key) else {
            tracing::warn!(key, "Unknown message key");
            return format!("⧼{}⧽", key);
        };

        // Highest index first so $1 does not eat the prefix of $10
        let mut text = template.clone();
        for (index, param) in params.iter().enumerate().rev() {
            text = text.replace(&format!("${}", index + 1), param.as_ref());
        }

        expand_plural(&text)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve `{{PLURAL:n|one|other}}` after parameters are substituted.
fn expand_plural(text: &str) -> String {
    const OPEN: &str = "{{PLURAL:";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);

        let body = &rest[start + OPEN.len()..start + len];
        let mut parts = body.split('|');
        let count = parts.next().unwrap_or_default().trim();
        let forms: Vec<&str> = parts.collect();
        let chosen = match (count == "1", forms.as_slice()) {
            (_, []) => "",
            (true, [one, ..]) => *one,
            (false, [only]) => *only,
            (false, [_, other, ..]) => *other,
        };
        out.push_str(chosen);

        rest = &rest[start + len + 2..];
    }

    out.push_str(rest);
    out
}
