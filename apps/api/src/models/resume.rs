use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for an uploaded résumé plus its extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Storage key. Never changes after upload.
    pub filename: String,
    /// Display name; the user may rename it.
    pub original_name: String,
    pub upload_date: DateTime<Utc>,
    pub parsed_text: Option<String>,
}

impl ResumeRow {
    pub fn new(
        user_id: Uuid,
        filename: String,
        original_name: String,
        parsed_text: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            filename,
            original_name,
            upload_date: Utc::now(),
            parsed_text,
        }
    }

    /// Extracted text, if any non-blank text was recovered.
    pub fn text(&self) -> Option<&str> {
        self.parsed_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Résumé fields shown alongside an interview listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub upload_date: DateTime<Utc>,
}

impl From<&ResumeRow> for ResumeSummary {
    fn from(row: &ResumeRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename.clone(),
            original_name: row.original_name.clone(),
            upload_date: row.upload_date,
        }
    }
}
