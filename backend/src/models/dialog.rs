//! # 다이얼로그 모델
//!
//! 콘솔의 각 다이얼로그(폼 창)는 아래 상태 기계를 따릅니다.
//!
//! ```text
//! Editing ──submit(검증 통과)──▶ Submitting ──성공──▶ Closed(결과)
//!    ▲                              │
//!    └────────────실패(last_error)──┘
//! ```
//!
//! - 검증에 실패하면 Editing에 머무르고 원격 호출은 일어나지 않습니다.
//! - Submitting 중에 다시 제출하면 거절됩니다 (원격 호출은 한 번뿐).
//! - 닫힌(Closed) 다이얼로그는 결과를 보여주기만 하고 더 이상 제출할 수 없습니다.

use super::{FileSummary, RemoteResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 다이얼로그의 현재 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogPhase {
    Editing,
    Submitting,
    Closed,
}

/// 다이얼로그를 화면에 보여주기 위한 스냅샷
///
/// 제네릭 매개변수:
/// - `A`: 다이얼로그를 연 동작(action)
/// - `F`: 폼 값
/// - `W`: 작업 공간 (PDF 도구의 필드 목록 등, 없으면 `()`)
#[derive(Debug, Clone, Serialize)]
pub struct DialogView<A, F, W> {
    pub id: Uuid,
    pub action: A,
    pub form: F,
    pub file: Option<FileSummary>,
    pub workspace: W,
    pub phase: DialogPhase,
    pub result: Option<RemoteResponse>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `POST /dialogs` 요청 본문
#[derive(Debug, serde::Deserialize)]
pub struct OpenDialogRequest<A> {
    pub action: A,
}
