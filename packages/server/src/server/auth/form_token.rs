//! Anti-forgery token kept in the browser session.

use tower_sessions::{session, Session};

use super::session::{generate_token, tokens_match};

/// Session key holding the token
pub const FORM_TOKEN_KEY: &str = "form_token";

/// Token embedded in the import forms and checked on submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormToken(String);

impl FormToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The session's token, generated on first use. Storing it is what makes
    /// the session persistent, so pages without a form never create one.
    pub async fn issue(session: &Session) -> Result<Self, session::Error> {
        if let Some(token) = Self::stored(session).await? {
            return Ok(token);
        }

        let token = Self(generate_token());
        session.insert(FORM_TOKEN_KEY, token.as_str()).await?;
        Ok(token)
    }

    /// Token previously issued to this session
    pub async fn stored(session: &Session) -> Result<Option<Self>, session::Error> {
        Ok(session.get::<String>(FORM_TOKEN_KEY).await?.map(Self))
    }

    /// Constant-time check of a submitted value
    pub fn matches(&self, submitted: &str) -> bool {
        tokens_match(&self.0, submitted.trim())
    }
}
