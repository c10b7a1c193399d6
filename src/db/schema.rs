//! SQL DDL for the document store: one table per collection.

pub const SETTINGS_DOC_ID: &str = "app_settings";

/// SQLite schema with:
/// - `forms`: one row per form document, `id` supplied by the application
/// - `settings`: singleton document keyed by `app_settings`
/// - index on `forms(created_at)` for the ordered list read
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS forms (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    sheet_url TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NULL,
    is_active INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_forms_created_at ON forms(created_at);

CREATE TABLE IF NOT EXISTS settings (
    doc_id TEXT PRIMARY KEY,
    current_form_index INTEGER NOT NULL DEFAULT 0,
    qr_refresh_interval INTEGER NOT NULL DEFAULT 5000,
    auto_refresh_enabled INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
