use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

use super::RecordStore;
use super::models::{Form, FormRow, Settings, SettingsPatch, SettingsRow, Snapshot};
use super::schema::{SETTINGS_DOC_ID, SQLITE_INIT};
use crate::error::StoreError;

pub type SqlitePool = Pool<Sqlite>;

/// Document-collection store over SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and initialize the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let connect_opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            // One writer at a time keeps "database is locked" out of the request path.
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL, then the default settings document.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        let mut conn = self.pool.acquire().await?;
        ensure_settings(&mut conn).await
    }

    async fn try_load(&self) -> Result<Snapshot, StoreError> {
        let forms: Vec<FormRow> = sqlx::query_as(
            r#"SELECT id, name, url, sheet_url, created_at, updated_at, is_active
               FROM forms ORDER BY created_at, id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let settings: Option<SettingsRow> = sqlx::query_as(
            r#"SELECT current_form_index, qr_refresh_interval, auto_refresh_enabled
               FROM settings WHERE doc_id = ?"#,
        )
        .bind(SETTINGS_DOC_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Snapshot {
            forms: forms.into_iter().map(Form::from).collect(),
            settings: settings.map(Settings::from).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn load_all(&self) -> Snapshot {
        self.try_load().await.unwrap_or_else(|e| {
            warn!(error = %e, "document store read failed; using defaults");
            Snapshot::default()
        })
    }

    async fn replace_all(&self, forms: &[Form], settings: &Settings) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM forms").execute(&mut *tx).await?;
        for form in forms {
            sqlx::query(
                r#"INSERT INTO forms (
                    id, name, url, sheet_url, created_at, updated_at, is_active
                ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(form.id)
            .bind(&form.name)
            .bind(&form.url)
            .bind(&form.sheet_url)
            .bind(form.created_at)
            .bind(form.updated_at)
            .bind(form.is_active)
            .execute(&mut *tx)
            .await?;
        }

        ensure_settings(&mut tx).await?;
        sqlx::query(
            r#"UPDATE settings SET
                current_form_index = ?,
                qr_refresh_interval = ?,
                auto_refresh_enabled = ?,
                updated_at = ?
              WHERE doc_id = ?"#,
        )
        .bind(stored_int(settings.current_form_index, "currentFormIndex")?)
        .bind(stored_int(settings.qr_refresh_interval, "qrRefreshInterval")?)
        .bind(settings.auto_refresh_enabled)
        .bind(Utc::now())
        .bind(SETTINGS_DOC_ID)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn upsert_settings(&self, patch: &SettingsPatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        ensure_settings(&mut tx).await?;
        sqlx::query(
            r#"UPDATE settings SET
                qr_refresh_interval = COALESCE(?, qr_refresh_interval),
                auto_refresh_enabled = COALESCE(?, auto_refresh_enabled),
                updated_at = ?
              WHERE doc_id = ?"#,
        )
        .bind(
            patch
                .qr_refresh_interval
                .map(|v| stored_int(v, "qrRefreshInterval"))
                .transpose()?,
        )
        .bind(patch.auto_refresh_enabled)
        .bind(Utc::now())
        .bind(SETTINGS_DOC_ID)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("document store connection closed");
    }
}

/// Insert the default settings document unless one exists.
async fn ensure_settings(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let defaults = Settings::default();
    let now = Utc::now();
    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO settings (
            doc_id, current_form_index, qr_refresh_interval,
            auto_refresh_enabled, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(SETTINGS_DOC_ID)
    .bind(stored_int(defaults.current_form_index, "currentFormIndex")?)
    .bind(stored_int(defaults.qr_refresh_interval, "qrRefreshInterval")?)
    .bind(defaults.auto_refresh_enabled)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    if inserted.rows_affected() > 0 {
        info!("default settings document initialized");
    }
    Ok(())
}

fn stored_int<T: TryInto<i64>>(value: T, field: &'static str) -> Result<i64, StoreError> {
    value
        .try_into()
        .map_err(|_| StoreError::OutOfRange { field })
}
