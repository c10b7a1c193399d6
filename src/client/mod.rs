//! Consumers of the forms resource: the dashboard-side form manager and
//! the sheet response tally used by instructor tooling.

pub mod api_client;
pub mod form_manager;
pub mod responses;

pub use api_client::{ClientError, FormsApiClient};
pub use form_manager::{FormManager, LoadMode, default_form};
pub use responses::{ResponseSummary, SheetsReader, summarize};
