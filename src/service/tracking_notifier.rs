use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{AppendRowRequest, SheetsApi, extract_sheet_id};
use crate::config::Config;
use crate::db::Form;

pub const TRACKING_RANGE: &str = "A:D";

#[derive(Debug, Clone)]
struct TrackingTarget {
    sheet_id: String,
    webhook: Url,
}

/// Best-effort audit trail: one spreadsheet row per created form.
#[derive(Clone)]
pub struct TrackingNotifier {
    client: reqwest::Client,
    target: Option<TrackingTarget>,
}

impl TrackingNotifier {
    pub fn new(cfg: &Config, client: reqwest::Client) -> Self {
        let sheet_id = cfg.sheet_tracking_url.as_deref().and_then(extract_sheet_id);
        let target = match (sheet_id, cfg.tracking_webhook_url.clone()) {
            (Some(sheet_id), Some(webhook)) => {
                info!(sheet_id = %sheet_id, webhook = %webhook, "form tracking enabled");
                Some(TrackingTarget { sheet_id, webhook })
            }
            (None, _) => {
                info!("no tracking sheet id configured; form tracking disabled");
                None
            }
            (_, None) => {
                info!("no tracking webhook configured; form tracking disabled");
                None
            }
        };
        Self { client, target }
    }

    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            target: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Queue the audit row and return immediately. The spawned task owns its
    /// own error boundary; nothing it does reaches the caller.
    pub fn form_created(&self, form: &Form) {
        let Some(target) = self.target.clone() else {
            debug!(form_id = form.id, "form tracking disabled; skipping");
            return;
        };
        let request = AppendRowRequest {
            spreadsheet_id: target.sheet_id,
            range: TRACKING_RANGE.to_string(),
            values: vec![tracking_row(form, Local::now())],
        };
        let client = self.client.clone();
        let form_id = form.id;

        tokio::spawn(async move {
            match SheetsApi::append_row(&client, &target.webhook, &request).await {
                Ok(()) => debug!(form_id, "form tracking row appended"),
                Err(e) => warn!(form_id, error = %e, "failed to append form tracking row"),
            }
        });
    }
}

/// `[localized timestamp, name, url, sheet url or ""]`
pub fn tracking_row(form: &Form, at: DateTime<Local>) -> Vec<String> {
    vec![
        at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        form.name.clone(),
        form.url.clone(),
        form.sheet_url.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn row_layout() {
        let form = Form {
            id: 1,
            name: "Lecture 3".into(),
            url: "https://forms.example/3".into(),
            sheet_url: String::new(),
            created_at: Utc::now(),
            updated_at: None,
            is_active: true,
        };
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let row = tracking_row(&form, at);
        assert_eq!(row[0], "3/5/2024, 2:07:09 PM");
        assert_eq!(&row[1..], ["Lecture 3", "https://forms.example/3", ""]);
    }

    #[test]
    fn missing_pieces_disable_tracking() {
        let client = reqwest::Client::new();
        let mut cfg = Config {
            sheet_tracking_url: Some("https://docs.google.com/spreadsheets/d/abc/edit".into()),
            ..Config::default()
        };
        assert!(!TrackingNotifier::new(&cfg, client.clone()).is_enabled());

        cfg.tracking_webhook_url = Some(Url::parse("https://hooks.example/append").unwrap());
        assert!(TrackingNotifier::new(&cfg, client.clone()).is_enabled());

        cfg.sheet_tracking_url = Some("https://docs.google.com/spreadsheets/abc".into());
        assert!(!TrackingNotifier::new(&cfg, client).is_enabled());
    }
}
