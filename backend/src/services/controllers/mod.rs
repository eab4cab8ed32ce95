//! # 폼/다이얼로그 컨트롤러
//!
//! 콘솔의 네 가지 다이얼로그가 각자 하나의 컨트롤러를 가집니다:
//! - `account`: 계정 조회/생성/검증/수정
//! - `signature_request`: 일반 서명 요청과 조회/다운로드 동작
//! - `embedded`: 임베디드 서명 요청과 임베디드 URL
//! - `annotated`: PDF 위에 필드를 직접 배치해서 보내는 서명 요청
//!
//! 컨트롤러는 I/O를 하지 않습니다. 폼 값을 검증하고 페이로드를 조립해서
//! `GatewayCall` 하나를 돌려줄 뿐이고, 실제 호출과 상태 전이는 `dialogs` 모듈이 맡습니다.

pub mod account;
pub mod annotated;
pub mod embedded;
pub mod signature_request;

pub use account::AccountController;
pub use annotated::AnnotatedRequestController;
pub use embedded::EmbeddedRequestController;
pub use signature_request::SignatureRequestController;

use crate::{
    error::AppError,
    models::SelectedFile,
    services::dropbox_sign::GatewayCall,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// 모든 전송 요청에 붙는 테스트 모드 값
pub const TEST_MODE: &str = "1";

/// 컨트롤러가 페이로드를 만들 때 참고하는 설정 값
#[derive(Debug, Clone)]
pub struct PrepareContext {
    /// 임베디드 요청에 넣는 클라이언트 ID
    pub client_id: String,
}

/// 다이얼로그 하나의 편집 중인 내용
///
/// - `form`: 사용자가 입력한 폼 값
/// - `file`: 선택한 문서 (없을 수 있음)
/// - `workspace`: 컨트롤러 전용 작업 공간 (PDF 도구의 필드 배치 등)
pub struct Draft<C: Controller> {
    pub form: C::Form,
    pub file: Option<SelectedFile>,
    pub workspace: C::Workspace,
}

impl<C: Controller> Default for Draft<C> {
    fn default() -> Self {
        Self {
            form: C::Form::default(),
            file: None,
            workspace: C::Workspace::default(),
        }
    }
}

/// 다이얼로그 종류별 동작 정의
///
/// 연관 타입(associated type)으로 동작/폼/작업 공간의 타입을 정합니다.
/// 덕분에 다이얼로그 레지스트리와 라우트 핸들러를 한 번만 작성하고
/// 네 컨트롤러에 제네릭으로 재사용할 수 있습니다.
pub trait Controller: Sized + Send + Sync + 'static {
    /// 로그와 URL에 쓰는 패널 ID
    const PANE: &'static str;
    /// 화면 탭 제목
    const TITLE: &'static str;

    /// 다이얼로그를 연 목적 (예: send, list, update)
    type Action: Copy + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static;
    /// 폼 값
    type Form: Clone + Default + Debug + Send + Sync + Serialize + DeserializeOwned + 'static;
    /// 작업 공간. 필요 없으면 `()`
    type Workspace: Clone + Default + Debug + Send + Sync + Serialize + 'static;

    /// 검증 후 원격 호출 하나를 만듭니다.
    ///
    /// - 검증 실패 → `AppError::Validation`
    /// - 파일 미선택 등 사전 조건 실패 → `AppError::Precondition`
    fn prepare(
        action: Self::Action,
        draft: &Draft<Self>,
        ctx: &PrepareContext,
    ) -> Result<GatewayCall, AppError>;

    /// 새 파일이 선택되었을 때 작업 공간을 갱신합니다.
    fn on_file_selected(_workspace: &mut Self::Workspace, _file: &SelectedFile) {}
}

/// 파일이 선택되어 있어야 하는 동작에서 사용합니다.
pub(crate) fn require_file(file: Option<&SelectedFile>) -> Result<&SelectedFile, AppError> {
    file.ok_or_else(|| AppError::Precondition("No file selected".to_string()))
}
