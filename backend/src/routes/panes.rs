//! # 탭(패널) 목록
//!
//! 콘솔 상단의 탭 네 개와 기본 탭을 알려줍니다.
//! 탭을 바꿔도 각 패널의 다이얼로그는 서로 영향을 주지 않습니다.

use crate::services::controllers::{
    AccountController, AnnotatedRequestController, Controller, EmbeddedRequestController,
    SignatureRequestController,
};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Pane {
    pub id: &'static str,
    pub title: &'static str,
    /// 이 패널의 API 경로 (`/api/v1` 기준)
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct PaneList {
    /// 첫 화면에 보여줄 패널
    pub default: &'static str,
    pub panes: Vec<Pane>,
}

fn pane<C: Controller>() -> Pane {
    Pane {
        id: C::PANE,
        title: C::TITLE,
        path: format!("/panes/{}", C::PANE),
    }
}

/// `GET /panes` — 탭 목록
pub async fn list_panes() -> Json<PaneList> {
    Json(PaneList {
        default: AccountController::PANE,
        panes: vec![
            pane::<AccountController>(),
            pane::<SignatureRequestController>(),
            pane::<EmbeddedRequestController>(),
            pane::<AnnotatedRequestController>(),
        ],
    })
}
