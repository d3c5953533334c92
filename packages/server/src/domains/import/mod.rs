//! ELN import wizard: method selection, URL and file import, results.

pub mod controller;
pub mod forms;
pub mod messages;
pub mod results;
pub mod upload;
pub mod validation;
pub mod wizard;

pub use controller::{PageResponse, Rejection, Submission, UrlSubmission};
pub use messages::{Notices, UserMessage};
pub use results::{PageFilter, ResultsDataError};
pub use upload::{UploadError, UploadForm, UploadedFile};
pub use validation::{ElnHosts, ElnHostsError};
pub use wizard::{Step, WizardQuery};
