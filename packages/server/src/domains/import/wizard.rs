//! Import wizard navigation.
//!
//! Step 1 picks an import method, step 2 collects a URL or a file, and a
//! successful submission redirects to the results step. Which step a request
//! lands on depends only on its query parameters and whether it was a POST.

use serde::Deserialize;
use url::form_urlencoded;

/// Path the import page is served under
pub const PAGE_PATH: &str = "/";

/// Method value for URL-based import; anything else names an upload plugin
pub const METHOD_URL: &str = "url";

const ACTION_RESULTS: &str = "results";

/// Query parameters that drive the wizard
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WizardQuery {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub method: String,
    /// Selection form value
    #[serde(default, rename = "eln-type")]
    pub eln_type: String,
    /// Same value under the prefixed field name older forms submit
    #[serde(default, rename = "wpeln-type")]
    pub wp_eln_type: String,
    /// Encoded results blob for the results step
    #[serde(default)]
    pub data: String,
}

impl WizardQuery {
    fn chosen_method(&self) -> Option<String> {
        [&self.wp_eln_type, &self.eln_type]
            .into_iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Method selection; `chosen` is set when the selection form was submitted
    SelectMethod { chosen: Option<String> },
    EnterUrl { submitted: bool },
    UploadFile { plugin: String, submitted: bool },
    ShowResults,
}

impl Step {
    pub fn resolve(query: &WizardQuery, is_post: bool) -> Self {
        if query.action == ACTION_RESULTS {
            return Step::ShowResults;
        }

        match query.method.trim() {
            "" => Step::SelectMethod {
                chosen: query.chosen_method(),
            },
            METHOD_URL => Step::EnterUrl { submitted: is_post },
            plugin => Step::UploadFile {
                plugin: plugin.to_string(),
                submitted: is_post,
            },
        }
    }
}

/// Local URL of the import page with the given query parameters
pub fn page_url(params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return PAGE_PATH.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", PAGE_PATH, query)
}

pub fn method_url(method: &str) -> String {
    page_url(&[("method", method)])
}

pub fn results_url(data: &str) -> String {
    page_url(&[("action", ACTION_RESULTS), ("data", data)])
}
