//! # 라우트 핸들러 모듈
//!
//! 브라우저 콘솔이 호출하는 HTTP 핸들러들을 모아둔 모듈입니다.
//! 모든 경로는 `main.rs`에서 `/api/v1` 아래에 중첩됩니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `panes`: 탭(패널) 목록. 기본 탭은 `account-requests`
//! - `dialogs`: 네 패널이 공유하는 제네릭 다이얼로그 핸들러
//! - `annotated`: PDF 도구 전용 (클릭 위치, 페이지, 필드 추가)
//! - `signature_request`: 다운로드한 파일 내려받기
//!
//! ## 패널별 엔드포인트
//! `/panes/{pane}` 아래에 다음이 붙습니다:
//! - `POST   /dialogs`
//! - `GET    /dialogs/{id}` / `PUT` (폼 저장) / `DELETE` (닫기)
//! - `PUT    /dialogs/{id}/file` (multipart `file`)
//! - `POST   /dialogs/{id}/submit`

pub mod annotated;
pub mod dialogs;
pub mod health;
pub mod panes;
pub mod signature_request;

pub use health::*;
pub use panes::*;

use crate::services::{
    controllers::{
        AccountController, AnnotatedRequestController, Controller, EmbeddedRequestController,
        PrepareContext, SignatureRequestController,
    },
    dialogs::DialogRegistry,
    dropbox_sign::SignatureGateway,
};
use axum::{extract::FromRef, routing::get, Router};
use std::{sync::Arc, time::Duration};

/// 애플리케이션 공유 상태
///
/// `#[derive(FromRef)]` 덕분에 핸들러는 필요한 필드만 골라서 추출합니다.
/// 예: `State(registry): State<DialogRegistry<AccountController>>`
///
/// 모든 필드가 내부적으로 Arc라서 clone해도 같은 데이터를 가리킵니다.
#[derive(Clone, FromRef)]
pub struct AppState {
    /// 원격 전자서명 API 게이트웨이
    pub gateway: Arc<dyn SignatureGateway>,
    /// 페이로드 조립에 필요한 설정 (client_id)
    pub ctx: Arc<PrepareContext>,
    pub accounts: DialogRegistry<AccountController>,
    pub signature_requests: DialogRegistry<SignatureRequestController>,
    pub embedded: DialogRegistry<EmbeddedRequestController>,
    pub annotated: DialogRegistry<AnnotatedRequestController>,
}

impl AppState {
    /// 패널마다 빈 레지스트리를 만듭니다. 패널끼리는 아무것도 공유하지 않습니다.
    pub fn new(gateway: Arc<dyn SignatureGateway>, ctx: PrepareContext) -> Self {
        Self {
            gateway,
            ctx: Arc::new(ctx),
            accounts: DialogRegistry::new(),
            signature_requests: DialogRegistry::new(),
            embedded: DialogRegistry::new(),
            annotated: DialogRegistry::new(),
        }
    }

    /// 패널마다 만료 청소 태스크를 띄웁니다. 서버가 살아 있는 동안 계속 돕니다.
    pub fn spawn_sweepers(&self, ttl: Duration) {
        self.accounts.spawn_sweeper(ttl);
        self.signature_requests.spawn_sweeper(ttl);
        self.embedded.spawn_sweeper(ttl);
        self.annotated.spawn_sweeper(ttl);
    }
}

/// `/api/v1` 아래에 들어갈 라우터 전체
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(health_check))
        // 탭 목록
        .route("/panes", get(list_panes))
        .nest(&pane_path::<AccountController>(), dialogs::router::<AccountController>())
        .nest(
            &pane_path::<SignatureRequestController>(),
            dialogs::router::<SignatureRequestController>().merge(signature_request::router()),
        )
        .nest(
            &pane_path::<EmbeddedRequestController>(),
            dialogs::router::<EmbeddedRequestController>(),
        )
        .nest(
            &pane_path::<AnnotatedRequestController>(),
            dialogs::router::<AnnotatedRequestController>().merge(annotated::router()),
        )
        .with_state(state)
}

fn pane_path<C: Controller>() -> String {
    format!("/panes/{}", C::PANE)
}
