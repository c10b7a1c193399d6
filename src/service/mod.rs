pub mod forms_service;
pub mod tracking_notifier;

pub use forms_service::FormsService;
pub use tracking_notifier::TrackingNotifier;
