pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod shutdown;
pub mod types;

pub use db::{Form, FormId, RecordStore, Settings, SettingsPatch, Snapshot};
pub use error::{AttendanceError, StoreError};
pub use service::{FormsService, TrackingNotifier};
