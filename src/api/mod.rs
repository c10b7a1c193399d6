pub mod sheets_api;

pub use sheets_api::{AppendRowRequest, SheetsApi, extract_sheet_id};
