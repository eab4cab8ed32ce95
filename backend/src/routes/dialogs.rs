//! # 다이얼로그 라우트 핸들러
//!
//! 네 패널이 같은 핸들러를 씁니다. 핸들러는 컨트롤러 타입 `C`에 대해 제네릭이고,
//! `router::<C>()`가 패널별로 한 번씩 구체화(monomorphize)합니다.
//!
//! ## 엔드포인트 (패널 경로 기준)
//! - `POST   /dialogs`              → 다이얼로그 열기 `{ "action": "send" }`
//! - `GET    /dialogs/{id}`         → 현재 상태 조회
//! - `PUT    /dialogs/{id}`         → 폼 값 저장 (Editing에서만)
//! - `DELETE /dialogs/{id}`         → 닫기 (진행 중인 호출은 취소)
//! - `PUT    /dialogs/{id}/file`    → 파일 선택 (multipart `file`)
//! - `POST   /dialogs/{id}/submit`  → 제출
//!
//! `State<DialogRegistry<C>>`는 `AppState`의 `#[derive(FromRef)]`가 만들어 줍니다.

use super::AppState;
use crate::{
    error::AppError,
    models::{OpenDialogRequest, SelectedFile},
    services::{
        controllers::{Controller, PrepareContext},
        dialogs::{DialogRegistry, ViewOf},
        dropbox_sign::SignatureGateway,
    },
};
use axum::{
    extract::{DefaultBodyLimit, FromRef, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// 업로드 파일 크기 상한 (40MB)
pub const MAX_UPLOAD_BYTES: usize = 40 * 1024 * 1024;

/// multipart에서 파일을 담는 필드 이름
const FILE_FIELD: &str = "file";

/// 패널 하나의 다이얼로그 라우트
pub fn router<C: Controller>() -> Router<AppState>
where
    DialogRegistry<C>: FromRef<AppState>,
{
    Router::new()
        .route("/dialogs", post(open::<C>))
        .route(
            "/dialogs/{id}",
            get(view::<C>).put(update_form::<C>).delete(close::<C>),
        )
        .route(
            "/dialogs/{id}/file",
            put(select_file::<C>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/dialogs/{id}/submit", post(submit::<C>))
}

/// `POST /dialogs` — 빈 폼으로 다이얼로그를 엽니다.
///
/// 성공 시 201 Created와 다이얼로그 스냅샷을 반환합니다.
pub async fn open<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    Json(req): Json<OpenDialogRequest<C::Action>>,
) -> (StatusCode, Json<ViewOf<C>>) {
    let view = registry.open(req.action).await;
    (StatusCode::CREATED, Json(view))
}

/// `GET /dialogs/{id}`
pub async fn view<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewOf<C>>, AppError> {
    Ok(Json(registry.view(id).await?))
}

/// `PUT /dialogs/{id}` — 폼 값을 통째로 저장합니다.
///
/// 빠진 항목은 기본값(빈 문자열, false)이 됩니다.
pub async fn update_form<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    Path(id): Path<Uuid>,
    Json(form): Json<C::Form>,
) -> Result<Json<ViewOf<C>>, AppError> {
    Ok(Json(registry.update_form(id, form).await?))
}

/// `PUT /dialogs/{id}/file` — 문서 파일을 선택합니다.
///
/// `Multipart`는 요청 본문을 소비하므로 반드시 마지막 추출기여야 합니다.
pub async fn select_file<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ViewOf<C>>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("document").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("could not read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("uploaded file is empty".to_string()));
        }

        let file = SelectedFile::read(name, content_type, bytes).await?;
        return Ok(Json(registry.select_file(id, file).await?));
    }

    Err(AppError::BadRequest(format!(
        "multipart field \"{FILE_FIELD}\" is missing"
    )))
}

/// `POST /dialogs/{id}/submit` — 원격 호출을 한 번 수행합니다.
///
/// 호출이 끝날 때까지 응답을 보류합니다.
/// 그사이 다이얼로그가 닫히면 410 Gone을 받습니다.
pub async fn submit<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    State(gateway): State<Arc<dyn SignatureGateway>>,
    State(ctx): State<Arc<PrepareContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewOf<C>>, AppError> {
    Ok(Json(registry.submit(id, gateway, &ctx).await?))
}

/// `DELETE /dialogs/{id}` — 다이얼로그를 닫습니다. 성공 시 204 No Content
pub async fn close<C: Controller>(
    State(registry): State<DialogRegistry<C>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    registry.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        models::file::test_support::blank_pdf,
        routes::test_support::*,
        services::test_gateway::RecordingGateway,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    const ACCOUNTS: &str = "/panes/account-requests/dialogs";
    const REQUESTS: &str = "/panes/signature-request/dialogs";

    #[tokio::test]
    async fn account_dialog_round_trip() {
        let gateway = Arc::new(RecordingGateway::new());
        let app = app(gateway.clone());

        let (status, opened) = send(&app, "POST", ACCOUNTS, Some(json!({ "action": "verify" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(opened["phase"], "editing");
        let id = opened["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("{ACCOUNTS}/{id}"),
            Some(json!({ "email_address": "ana@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, done) = send(&app, "POST", &format!("{ACCOUNTS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["phase"], "closed");
        assert_eq!(done["result"]["kind"], "account");
        assert_eq!(gateway.calls(), ["verify_account"]);
    }

    #[tokio::test]
    async fn invalid_email_is_400_without_a_call() {
        let gateway = Arc::new(RecordingGateway::new());
        let app = app(gateway.clone());

        let (_, opened) = send(&app, "POST", ACCOUNTS, Some(json!({ "action": "get" }))).await;
        let id = opened["id"].as_str().unwrap();
        send(&app, "PUT", &format!("{ACCOUNTS}/{id}"), Some(json!({ "email_address": "nope" }))).await;

        let (status, body) = send(&app, "POST", &format!("{ACCOUNTS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_failed");
        assert_eq!(body["error"]["fields"][0]["field"], "email_address");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn gateway_failure_is_502_and_dialog_stays_open() {
        let gateway = Arc::new(RecordingGateway::failing(401));
        let app = app(gateway.clone());

        let (_, opened) = send(&app, "POST", ACCOUNTS, Some(json!({ "action": "create" }))).await;
        let id = opened["id"].as_str().unwrap();
        send(&app, "PUT", &format!("{ACCOUNTS}/{id}"), Some(json!({ "email_address": "ana@example.com" }))).await;

        let (status, body) = send(&app, "POST", &format!("{ACCOUNTS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "gateway_error");

        let (_, view) = send(&app, "GET", &format!("{ACCOUNTS}/{id}"), None).await;
        assert_eq!(view["phase"], "editing");
        assert!(view["last_error"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn send_without_file_is_422_and_recorded() {
        let gateway = Arc::new(RecordingGateway::new());
        let app = app(gateway.clone());

        let (_, opened) = send(&app, "POST", REQUESTS, Some(json!({ "action": "send" }))).await;
        let id = opened["id"].as_str().unwrap();
        send(
            &app,
            "PUT",
            &format!("{REQUESTS}/{id}"),
            Some(json!({
                "title": "NDA",
                "subject": "Please sign",
                "message": "Thanks",
                "signer_email": "ana@example.com"
            })),
        )
        .await;

        let (status, body) = send(&app, "POST", &format!("{REQUESTS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "precondition_failed");
        let (_, view) = send(&app, "GET", &format!("{REQUESTS}/{id}"), None).await;
        assert_eq!(view["last_error"], "No file selected");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn uploaded_file_goes_out_as_files_0() {
        let gateway = Arc::new(RecordingGateway::new());
        let app = app(gateway.clone());

        let (_, opened) = send(&app, "POST", REQUESTS, Some(json!({ "action": "send_with_text_tags" }))).await;
        let id = opened["id"].as_str().unwrap();
        send(
            &app,
            "PUT",
            &format!("{REQUESTS}/{id}"),
            Some(json!({
                "title": "NDA",
                "subject": "Please sign",
                "message": "Thanks",
                "signer_email": "ana@example.com",
                "use_text_tags": true
            })),
        )
        .await;

        let (status, view) = upload(&app, &format!("{REQUESTS}/{id}/file"), "nda.pdf", "application/pdf", &blank_pdf(2)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["file"]["name"], "nda.pdf");
        assert_eq!(view["file"]["page_count"], 2);

        let (status, _) = send(&app, "POST", &format!("{REQUESTS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);

        let payload = gateway.last_payload().unwrap();
        assert_eq!(payload.get_file("files[0]").unwrap().name, "nda.pdf");
        assert_eq!(payload.get("use_text_tags"), Some("1"));
        assert_eq!(payload.get("test_mode"), Some("1"));
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (_, opened) = send(&app, "POST", REQUESTS, Some(json!({ "action": "send" }))).await;
        let id = opened["id"].as_str().unwrap();

        let (status, _) = upload(&app, &format!("{REQUESTS}/{id}/file"), "empty.pdf", "application/pdf", b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn closed_dialog_is_gone() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (_, opened) = send(&app, "POST", ACCOUNTS, Some(json!({ "action": "get" }))).await;
        let id = opened["id"].as_str().unwrap();

        let (status, _) = send(&app, "DELETE", &format!("{ACCOUNTS}/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, "GET", &format!("{ACCOUNTS}/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn panes_do_not_share_dialogs() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (_, opened) = send(&app, "POST", ACCOUNTS, Some(json!({ "action": "get" }))).await;
        let id = opened["id"].as_str().unwrap();

        let (status, _) = send(&app, "GET", &format!("{REQUESTS}/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
