//! # 서명 요청 패널 전용 라우트
//!
//! - `GET /dialogs/{id}/download` → `download` 동작으로 받은 파일을 그대로 내려줍니다.
//!
//! 다이얼로그 스냅샷(JSON)에는 파일 크기와 형식만 담기므로,
//! 실제 바이트는 이 엔드포인트로 받습니다.

use super::AppState;
use crate::{
    error::AppError,
    models::RemoteResponse,
    services::{controllers::SignatureRequestController, dialogs::DialogRegistry},
};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/dialogs/{id}/download", get(download))
}

/// `GET /dialogs/{id}/download`
///
/// 다운로드가 끝나지 않았거나 다른 동작의 다이얼로그면 409입니다.
pub async fn download(
    State(registry): State<DialogRegistry<SignatureRequestController>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(RemoteResponse::File(file)) = registry.result(id).await? else {
        return Err(AppError::Conflict(
            "Dialog has no downloaded file".to_string(),
        ));
    };

    let extension = if file.content_type.contains("zip") { "zip" } else { "pdf" };
    let disposition = format!("attachment; filename=\"signature-request.{extension}\"");

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
