//! # 다이얼로그 레지스트리
//!
//! 패널(pane)마다 하나씩 있으며, 열린 다이얼로그를 ID로 보관합니다.
//! 패널끼리는 아무것도 공유하지 않습니다.
//!
//! ## 제출 흐름
//! 1. 잠금을 잡고 단계가 Editing인지 확인, 컨트롤러로 호출을 준비
//! 2. 원격 호출을 별도 태스크로 띄우고 `AbortHandle`을 Submitting 단계에 보관
//! 3. 잠금을 풀고 태스크 완료를 기다림
//! 4. 태스크가 직접 결과를 기록 (Closed 또는 Editing + last_error)
//!
//! 결과 기록을 태스크가 하므로 HTTP 요청이 끊겨도 다이얼로그가 Submitting에 갇히지 않습니다.
//! 잠금은 `.await`를 넘어서 들고 있지 않습니다.
//!
//! ## 만료
//! 콘솔 탭을 닫아 버리면 DELETE가 오지 않으므로, `spawn_sweeper`가 주기적으로
//! 마지막 사용 후 TTL이 지난 다이얼로그를 지웁니다. 제출 중인 다이얼로그는 건드리지 않습니다.

use crate::{
    error::AppError,
    models::{DialogPhase, DialogView, RemoteResponse, SelectedFile},
    services::{
        controllers::{Controller, Draft, PrepareContext},
        dropbox_sign::{GatewayError, SignatureGateway},
    },
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::{AbortHandle, JoinHandle},
    time::{Instant, MissedTickBehavior},
};
use uuid::Uuid;

/// 컨트롤러 `C`의 다이얼로그 화면 스냅샷 타입
pub type ViewOf<C> =
    DialogView<<C as Controller>::Action, <C as Controller>::Form, <C as Controller>::Workspace>;

/// 내부 단계. 화면에 보이는 `DialogPhase`보다 정보가 많습니다.
enum Phase {
    Editing,
    /// 진행 중인 호출을 취소할 수 있는 핸들
    Submitting(AbortHandle),
    Closed(RemoteResponse),
}

struct Dialog<C: Controller> {
    id: Uuid,
    action: C::Action,
    draft: Draft<C>,
    phase: Phase,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    /// 마지막으로 조회/수정된 시각 (만료 기준)
    touched_at: Instant,
}

impl<C: Controller> Dialog<C> {
    fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        !matches!(self.phase, Phase::Submitting(_)) && self.touched_at.elapsed() >= ttl
    }

    fn view(&self) -> ViewOf<C> {
        let (phase, result) = match &self.phase {
            Phase::Editing => (DialogPhase::Editing, None),
            Phase::Submitting(_) => (DialogPhase::Submitting, None),
            Phase::Closed(response) => (DialogPhase::Closed, Some(response.clone())),
        };

        DialogView {
            id: self.id,
            action: self.action,
            form: self.draft.form.clone(),
            file: self.draft.file.as_ref().map(SelectedFile::summary),
            workspace: self.draft.workspace.clone(),
            phase,
            result,
            last_error: self.last_error.clone(),
            created_at: self.created_at,
        }
    }

    /// 편집 가능한 단계인지 확인합니다.
    fn ensure_editing(&self) -> Result<(), AppError> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Submitting(_) => Err(AppError::Conflict("Dialog is submitting".to_string())),
            Phase::Closed(_) => Err(AppError::Conflict("Dialog is already closed".to_string())),
        }
    }
}

/// 패널 하나의 다이얼로그 저장소
///
/// 내부가 `Arc`라 clone해도 같은 저장소를 가리킵니다.
pub struct DialogRegistry<C: Controller> {
    dialogs: Arc<Mutex<HashMap<Uuid, Dialog<C>>>>,
}

// derive(Clone)은 C: Clone을 요구하므로 직접 구현합니다.
impl<C: Controller> Clone for DialogRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            dialogs: Arc::clone(&self.dialogs),
        }
    }
}

impl<C: Controller> Default for DialogRegistry<C> {
    fn default() -> Self {
        Self {
            dialogs: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<C: Controller> DialogRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 다이얼로그를 빈 폼으로 엽니다.
    pub async fn open(&self, action: C::Action) -> ViewOf<C> {
        let dialog = Dialog::<C> {
            id: Uuid::now_v7(),
            action,
            draft: Draft::default(),
            phase: Phase::Editing,
            last_error: None,
            created_at: Utc::now(),
            touched_at: Instant::now(),
        };
        let view = dialog.view();
        tracing::debug!(pane = C::PANE, id = %view.id, action = ?action, "Dialog opened");

        self.dialogs.lock().await.insert(dialog.id, dialog);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<ViewOf<C>, AppError> {
        let mut dialogs = self.dialogs.lock().await;
        let dialog = dialogs.get_mut(&id).ok_or(AppError::NotFound)?;
        dialog.touch();
        Ok(dialog.view())
    }

    /// 폼 값을 통째로 바꿉니다.
    pub async fn update_form(&self, id: Uuid, form: C::Form) -> Result<ViewOf<C>, AppError> {
        self.edit_draft(id, |draft| {
            draft.form = form;
            Ok(())
        })
        .await
    }

    /// 파일을 선택합니다. 이전 선택은 덮어씁니다.
    pub async fn select_file(&self, id: Uuid, file: SelectedFile) -> Result<ViewOf<C>, AppError> {
        tracing::debug!(
            pane = C::PANE,
            %id,
            name = %file.name,
            size = file.bytes.len(),
            pages = ?file.page_count,
            "File selected"
        );
        self.edit_draft(id, |draft| {
            C::on_file_selected(&mut draft.workspace, &file);
            draft.file = Some(file);
            Ok(())
        })
        .await
    }

    /// 작업 공간을 수정합니다. 클로저가 실패하면 다이얼로그는 그대로입니다.
    pub async fn edit_workspace<F>(&self, id: Uuid, f: F) -> Result<ViewOf<C>, AppError>
    where
        F: FnOnce(&mut C::Workspace) -> Result<(), AppError>,
    {
        self.edit_draft(id, |draft| f(&mut draft.workspace)).await
    }

    /// 편집 중인 초안 전체를 수정합니다. Editing 단계에서만 허용됩니다.
    pub async fn edit_draft<F>(&self, id: Uuid, f: F) -> Result<ViewOf<C>, AppError>
    where
        F: FnOnce(&mut Draft<C>) -> Result<(), AppError>,
    {
        let mut dialogs = self.dialogs.lock().await;
        let dialog = dialogs.get_mut(&id).ok_or(AppError::NotFound)?;
        dialog.ensure_editing()?;
        dialog.touch();
        f(&mut dialog.draft)?;
        Ok(dialog.view())
    }

    /// 완료된 다이얼로그의 결과
    pub async fn result(&self, id: Uuid) -> Result<Option<RemoteResponse>, AppError> {
        let mut dialogs = self.dialogs.lock().await;
        let dialog = dialogs.get_mut(&id).ok_or(AppError::NotFound)?;
        dialog.touch();
        Ok(match &dialog.phase {
            Phase::Closed(response) => Some(response.clone()),
            _ => None,
        })
    }

    /// 다이얼로그를 제출합니다.
    ///
    /// - Editing이 아니면 409, 원격 호출 없음
    /// - 검증 실패면 Editing 유지, 원격 호출 없음
    /// - 파일 미선택이면 Editing 유지 + `last_error`
    /// - 원격 호출은 정확히 한 번
    pub async fn submit(
        &self,
        id: Uuid,
        gateway: Arc<dyn SignatureGateway>,
        ctx: &PrepareContext,
    ) -> Result<ViewOf<C>, AppError> {
        let task = {
            let mut dialogs = self.dialogs.lock().await;
            let dialog = dialogs.get_mut(&id).ok_or(AppError::NotFound)?;
            dialog.ensure_editing()?;

            let call = match C::prepare(dialog.action, &dialog.draft, ctx) {
                Ok(call) => call,
                Err(err) => {
                    if let AppError::Precondition(ref msg) = err {
                        dialog.last_error = Some(msg.clone());
                    }
                    tracing::debug!(pane = C::PANE, %id, "Submit rejected: {}", err);
                    return Err(err);
                }
            };

            tracing::info!(
                pane = C::PANE,
                %id,
                call = call.name(),
                keys = ?call.payload().map(|p| p.summary().keys),
                "Submitting"
            );

            let registry = self.clone();
            let task = tokio::spawn(async move {
                let outcome = call.dispatch(gateway.as_ref()).await;
                registry.finish(id, outcome).await
            });
            dialog.phase = Phase::Submitting(task.abort_handle());
            task
        };

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(AppError::Cancelled),
            Err(e) => {
                // 태스크가 패닉한 경우. 다시 제출할 수 있게 되돌립니다.
                self.finish_failed(id, format!("submission task failed: {e}")).await;
                Err(AppError::Internal(e.to_string()))
            }
        }
    }

    /// 원격 호출 결과를 기록합니다. 그사이 다이얼로그가 닫혔으면 결과를 버립니다.
    async fn finish(
        &self,
        id: Uuid,
        outcome: Result<RemoteResponse, GatewayError>,
    ) -> Result<ViewOf<C>, AppError> {
        let mut dialogs = self.dialogs.lock().await;
        let Some(dialog) = dialogs.get_mut(&id) else {
            tracing::debug!(pane = C::PANE, %id, "Dialog closed during submission, result discarded");
            return Err(AppError::Cancelled);
        };
        dialog.touch();

        match outcome {
            Ok(response) => {
                tracing::info!(pane = C::PANE, %id, "Submission succeeded");
                dialog.phase = Phase::Closed(response);
                dialog.last_error = None;
                Ok(dialog.view())
            }
            Err(e) => {
                tracing::warn!(pane = C::PANE, %id, "Submission failed: {}", e);
                dialog.phase = Phase::Editing;
                dialog.last_error = Some(e.to_string());
                Err(AppError::Gateway(e))
            }
        }
    }

    async fn finish_failed(&self, id: Uuid, message: String) {
        if let Some(dialog) = self.dialogs.lock().await.get_mut(&id) {
            dialog.phase = Phase::Editing;
            dialog.last_error = Some(message);
        }
    }

    /// 다이얼로그를 닫습니다. 진행 중인 호출이 있으면 취소합니다.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let dialog = self
            .dialogs
            .lock()
            .await
            .remove(&id)
            .ok_or(AppError::NotFound)?;

        if let Phase::Submitting(handle) = dialog.phase {
            tracing::info!(pane = C::PANE, %id, "Dialog closed while submitting, call aborted");
            handle.abort();
        } else {
            tracing::debug!(pane = C::PANE, %id, "Dialog closed");
        }
        Ok(())
    }

    /// 마지막 사용 후 `ttl`이 지난 다이얼로그를 지우고, 지운 개수를 돌려줍니다.
    ///
    /// Submitting 단계는 호출이 끝나 결과가 기록될 때까지 남겨 둡니다.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let mut dialogs = self.dialogs.lock().await;
        let before = dialogs.len();
        dialogs.retain(|_, dialog| !dialog.is_expired(ttl));
        let removed = before - dialogs.len();

        if removed > 0 {
            tracing::info!(pane = C::PANE, removed, remaining = dialogs.len(), "Expired idle dialogs");
        }
        removed
    }

    /// `ttl`의 절반(최소 1초)마다 `sweep`을 돌리는 백그라운드 태스크를 띄웁니다.
    pub fn spawn_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = (ttl / 2).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.sweep(ttl).await;
            }
        })
    }
}
