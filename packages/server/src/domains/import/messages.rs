//! User-facing messages produced while validating and processing a submission.
//!
//! Each step returns the messages it produced; nothing is accumulated on
//! shared state.

use adapter_client::LogLevel;

use crate::common::html;
use crate::common::MessageCatalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub level: LogLevel,
    pub key: String,
    pub params: Vec<String>,
}

impl UserMessage {
    pub fn new(level: LogLevel, key: impl Into<String>) -> Self {
        Self {
            level,
            key: key.into(),
            params: Vec::new(),
        }
    }

    pub fn error(key: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, key)
    }

    pub fn warning(key: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, key)
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn text(&self, catalog: &MessageCatalog) -> String {
        catalog.text(&self.key, &self.params)
    }

    pub fn render(&self, catalog: &MessageCatalog) -> String {
        let class = format!("mw-message-box mw-message-box-{}", self.level.as_str());
        html::element("div", &[("class", class.as_str())], &self.text(catalog))
    }
}

/// Ordered list of messages for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices(Vec<UserMessage>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: UserMessage) {
        self.0.push(message);
    }

    pub fn with(mut self, message: UserMessage) -> Self {
        self.push(message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserMessage> {
        self.0.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|m| m.key.as_str()).collect()
    }

    pub fn render(&self, catalog: &MessageCatalog) -> String {
        self.0.iter().map(|m| m.render(catalog)).collect()
    }
}

impl From<UserMessage> for Notices {
    fn from(message: UserMessage) -> Self {
        Notices(vec![message])
    }
}
