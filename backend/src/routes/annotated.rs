//! # PDF 도구(Signature Simulator) 전용 라우트
//!
//! ## 엔드포인트 (패널 경로 기준)
//! - `POST /dialogs/{id}/clicks` → 클릭 위치 기록 `{ "x": 120.4, "y": 88 }`
//! - `PUT  /dialogs/{id}/page`   → 현재 페이지 변경 `{ "page": 2 }`
//! - `POST /dialogs/{id}/fields` → 폼의 `field` 값으로 필드 하나 추가
//! - `GET  /field-types`         → 필드 종류 선택 목록
//!
//! 다이얼로그 경로는 모두 Editing 단계에서만 허용되고, 갱신된 다이얼로그 스냅샷을 돌려줍니다.

use super::AppState;
use crate::{
    error::AppError,
    models::FieldType,
    services::{
        controllers::AnnotatedRequestController,
        dialogs::{DialogRegistry, ViewOf},
    },
};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

type Registry = DialogRegistry<AnnotatedRequestController>;
type View = ViewOf<AnnotatedRequestController>;

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: u32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dialogs/{id}/clicks", post(record_click))
        .route("/dialogs/{id}/page", put(set_page))
        .route("/dialogs/{id}/fields", post(add_field))
        .route("/field-types", get(field_types))
}

/// `GET /field-types` — 원격 API 이름 그대로, 화면 표시 순서대로 돌려줍니다.
pub async fn field_types() -> Json<[FieldType; 8]> {
    Json(FieldType::ALL)
}

/// `POST /dialogs/{id}/clicks` — 마지막 클릭 위치를 덮어씁니다.
pub async fn record_click(
    State(registry): State<Registry>,
    Path(id): Path<Uuid>,
    Json(click): Json<ClickRequest>,
) -> Result<Json<View>, AppError> {
    let view = registry
        .edit_workspace(id, |workspace| {
            workspace.record_click(click.x, click.y);
            Ok(())
        })
        .await?;
    Ok(Json(view))
}

/// `PUT /dialogs/{id}/page`
///
/// 0페이지, 또는 문서 페이지 수를 넘는 번호는 400입니다.
pub async fn set_page(
    State(registry): State<Registry>,
    Path(id): Path<Uuid>,
    Json(req): Json<PageRequest>,
) -> Result<Json<View>, AppError> {
    let view = registry
        .edit_workspace(id, |workspace| workspace.set_page(req.page))
        .await?;
    Ok(Json(view))
}

/// `POST /dialogs/{id}/fields`
///
/// 폼에 저장된 필드 종류/크기/이름을 읽어 현재 클릭 위치와 페이지에 필드를 만듭니다.
/// 폭이나 높이가 양수가 아니면 400이고, 필드 번호도 소비하지 않습니다.
pub async fn add_field(
    State(registry): State<Registry>,
    Path(id): Path<Uuid>,
) -> Result<Json<View>, AppError> {
    let view = registry
        .edit_draft(id, |draft| draft.workspace.add_field(&draft.form.field).map(|_| ()))
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use crate::{
        models::file::test_support::blank_pdf,
        routes::test_support::*,
        services::test_gateway::RecordingGateway,
    };
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const DIALOGS: &str = "/panes/signature-simulator/dialogs";

    #[tokio::test]
    async fn click_then_add_fields_then_send() {
        let gateway = Arc::new(RecordingGateway::new());
        let app = app(gateway.clone());

        let (_, opened) = send(&app, "POST", DIALOGS, Some(json!({ "action": "send" }))).await;
        let id = opened["id"].as_str().unwrap();
        let (status, _) = upload(&app, &format!("{DIALOGS}/{id}/file"), "lease.pdf", "application/pdf", &blank_pdf(3)).await;
        assert_eq!(status, StatusCode::OK);

        send(
            &app,
            "PUT",
            &format!("{DIALOGS}/{id}"),
            Some(json!({
                "signer_name": "Ana",
                "signer_email": "ana@example.com",
                "title": "Lease",
                "field": { "field_type": "signature", "width": "120", "height": "30" }
            })),
        )
        .await;

        let (status, view) = send(&app, "POST", &format!("{DIALOGS}/{id}/clicks"), Some(json!({ "x": 120.4, "y": 340.6 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["workspace"]["position"], json!({ "x": 120, "y": 341 }));

        let (status, _) = send(&app, "PUT", &format!("{DIALOGS}/{id}/page"), Some(json!({ "page": 3 }))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, view) = send(&app, "POST", &format!("{DIALOGS}/{id}/fields"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["workspace"]["fields"][0]["api_id"], "field1");
        assert_eq!(view["workspace"]["fields"][0]["page"], 3);
        assert_eq!(view["workspace"]["fields"][0]["x"], 120);

        let (status, _) = send(&app, "POST", &format!("{DIALOGS}/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);

        let payload = gateway.last_payload().unwrap();
        let fields: Value = serde_json::from_str(payload.get("form_fields_per_document").unwrap()).unwrap();
        assert_eq!(fields[0][0]["type"], "signature");
        assert_eq!(fields[0][0]["width"], "120");
        assert_eq!(fields[0][0]["required"], true);
    }

    #[tokio::test]
    async fn field_type_list_uses_wire_names() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (status, types) = send(&app, "GET", "/panes/signature-simulator/field-types", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(types.as_array().unwrap().len(), 8);
        assert_eq!(types[0], "text");
        assert_eq!(types[6], "text-merge");
    }

    #[tokio::test]
    async fn page_beyond_document_is_rejected() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (_, opened) = send(&app, "POST", DIALOGS, Some(json!({ "action": "send" }))).await;
        let id = opened["id"].as_str().unwrap();
        upload(&app, &format!("{DIALOGS}/{id}/file"), "one.pdf", "application/pdf", &blank_pdf(1)).await;

        let (status, _) = send(&app, "PUT", &format!("{DIALOGS}/{id}/page"), Some(json!({ "page": 2 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, "PUT", &format!("{DIALOGS}/{id}/page"), Some(json!({ "page": 0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_field_size_keeps_the_counter() {
        let app = app(Arc::new(RecordingGateway::new()));
        let (_, opened) = send(&app, "POST", DIALOGS, Some(json!({ "action": "send" }))).await;
        let id = opened["id"].as_str().unwrap();

        send(&app, "PUT", &format!("{DIALOGS}/{id}"), Some(json!({ "field": { "width": "wide" } }))).await;
        let (status, _) = send(&app, "POST", &format!("{DIALOGS}/{id}/fields"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&app, "PUT", &format!("{DIALOGS}/{id}"), Some(json!({ "field": { "width": "80" } }))).await;
        let (_, view) = send(&app, "POST", &format!("{DIALOGS}/{id}/fields"), None).await;
        assert_eq!(view["workspace"]["fields"][0]["api_id"], "field1");
        // 클릭하지 않았으면 원점에 놓입니다.
        assert_eq!(view["workspace"]["fields"][0]["x"], 0);
        assert_eq!(view["workspace"]["fields"][0]["y"], 0);
    }
}
