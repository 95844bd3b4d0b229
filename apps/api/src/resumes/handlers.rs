use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::extract::extract_text;
use crate::resumes::files::{extension_of, stored_filename};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";

struct UploadedFile {
    original_name: String,
    data: Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "resume".to_string());
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok(UploadedFile {
            original_name,
            data,
        });
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

/// POST /api/resumes/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let upload = read_upload(&mut multipart).await?;
    let filename = stored_filename(&upload.original_name);

    state.files.put(&filename, upload.data.clone()).await?;

    let extension = extension_of(&upload.original_name);
    let data = upload.data;
    let text = tokio::task::spawn_blocking(move || extract_text(&data, &extension))
        .await
        .unwrap_or_else(|e| {
            warn!("Resume text extraction task failed: {e}");
            String::new()
        });
    let parsed_text = Some(text).filter(|t| !t.is_empty());

    let row = ResumeRow::new(user.user_id, filename, upload.original_name, parsed_text);
    if let Err(e) = state.resumes.insert(&row).await {
        if let Err(cleanup) = state.files.remove(&row.filename).await {
            warn!("Could not remove orphaned upload {}: {cleanup}", row.filename);
        }
        return Err(e.into());
    }

    info!(
        "Stored resume {} for user {} (text extracted: {})",
        row.id,
        user.user_id,
        row.parsed_text.is_some()
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.resumes.list(user.user_id).await?))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let row = state
        .resumes
        .delete(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    match state.files.remove(&row.filename).await {
        Ok(true) => {}
        Ok(false) => warn!("Resume {id} had no stored file at {}", row.filename),
        Err(e) => warn!("Resume {id} record deleted but file removal failed: {e}"),
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/resumes/download/:id
pub async fn handle_download(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = state
        .resumes
        .get_owned(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let data = state
        .files
        .get(&row.filename)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&row.original_name).to_string()),
        (header::CONTENT_DISPOSITION, attachment_header(&row.original_name)),
    ];
    Ok((headers, data).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    #[serde(default)]
    pub new_name: String,
}

/// PATCH /api/resumes/rename/:id
pub async fn handle_rename(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let new_name = req.new_name.trim();
    if new_name.is_empty() {
        return Err(AppError::Validation("New name required".to_string()));
    }

    let row = state
        .resumes
        .rename(user.user_id, id, new_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}

/// GET /api/resumes/test
pub async fn handle_test() -> Json<Value> {
    Json(json!({ "ok": true }))
}

fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn attachment_header(name: &str) -> String {
    let escaped: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();
    format!("attachment; filename=\"{escaped}\"")
}
