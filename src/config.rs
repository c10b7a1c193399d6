use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "CSE 210 Attendance System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment keys read by [`Config::load`]; names match the struct fields, upper-cased.
const ENV_KEYS: &[&str] = &[
    "listen_addr",
    "loglevel",
    "data_path",
    "seed_path",
    "database_url",
    "google_sheets_api_key",
    "sheet_tracking_url",
    "tracking_webhook_url",
    "proxy",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub loglevel: String,
    /// JSON file used when no document database is configured.
    pub data_path: PathBuf,
    /// Copied into `data_path` the first time the live file is unreadable.
    pub seed_path: Option<PathBuf>,
    /// e.g. `sqlite:attendance_tracker.db`; selects the document store.
    pub database_url: Option<String>,
    /// Handed to instructor clients for sheet reads; without it `/config` reports an error.
    pub google_sheets_api_key: Option<String>,
    /// Spreadsheet that receives one audit row per created form.
    pub sheet_tracking_url: Option<String>,
    pub tracking_webhook_url: Option<Url>,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            loglevel: "info".to_string(),
            data_path: PathBuf::from("data/db.json"),
            seed_path: None,
            database_url: None,
            google_sheets_api_key: None,
            sheet_tracking_url: None,
            tracking_webhook_url: None,
            proxy: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(ENV_KEYS))
    }

    /// Outbound HTTP client shared by the tracking notifier and the sheets reader.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("attendance-hub/{APP_VERSION}"))
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(15));
        if let Some(proxy_url) = self.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        builder.build()
    }
}
