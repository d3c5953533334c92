//! Adapter service request and response types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Adapt
// =============================================================================

/// Body of `POST /adapt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterRequest {
    /// Notebook plugin name (e.g. "eLabFTW" or an upload plugin)
    pub eln: String,

    /// Experiment id, or the stored file name for upload plugins
    pub id: String,
}

impl AdapterRequest {
    pub fn new(eln: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            eln: eln.into(),
            id: id.into(),
        }
    }
}

/// Body returned by `POST /adapt`.
///
/// Decoding accepts any JSON value: fields of an unexpected shape are read
/// as empty instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct AdapterResponse {
    /// Pages created or updated by the service, keyed by page id.
    /// Order is kept as sent.
    pub smw_pages: IndexMap<String, Value>,

    /// Import log
    pub messages: Vec<LogMessage>,
}

impl From<Value> for AdapterResponse {
    fn from(value: Value) -> Self {
        let Value::Object(mut body) = value else {
            return Self::default();
        };

        let smw_pages = match body.remove("smw_pages") {
            Some(Value::Object(pages)) => pages.into_iter().collect(),
            _ => IndexMap::new(),
        };

        let messages = match body.remove("messages") {
            Some(Value::Array(items)) => items.iter().filter_map(LogMessage::from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            smw_pages,
            messages,
        }
    }
}

/// One line of the import log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub text: String,
}

impl LogMessage {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::classify(&self.kind)
    }

    /// `None` for entries that are not objects. Missing or null fields are empty.
    fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        let field = |name: &str| match entry.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };
        Some(Self::new(field("type"), field("text")))
    }
}

/// Severity used for styling log lines and user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Notice,
}

impl LogLevel {
    /// Unrecognized types fall back to `Notice`.
    pub fn classify(kind: &str) -> Self {
        match kind {
            "error" => LogLevel::Error,
            "warning" => LogLevel::Warning,
            _ => LogLevel::Notice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Notice => "notice",
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Body returned by `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub smw_connection: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled_plugins: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: IndexMap<String, PluginInfo>,

    /// Directory the service reads uploaded files from
    #[serde(default)]
    pub upload_path: Option<String>,
}

impl ServiceStatus {
    /// True when at least one plugin imports by URL.
    pub fn has_url_plugins(&self) -> bool {
        self.plugins
            .values()
            .any(|info| info.plugin_type == PluginType::Url)
    }

    /// Names of the plugins that import uploaded files, in service order.
    pub fn upload_plugins(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, info)| info.plugin_type == PluginType::Upload)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_upload_plugin(&self, name: &str) -> bool {
        self.plugins
            .get(name)
            .is_some_and(|info| info.plugin_type == PluginType::Upload)
    }

    /// Upload directory, ignoring blank values.
    pub fn upload_dir(&self) -> Option<&str> {
        self.upload_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Url,
    Upload,
    #[serde(other)]
    Other,
}
