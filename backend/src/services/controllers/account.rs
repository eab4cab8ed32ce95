//! # 계정(Account) 컨트롤러
//!
//! | 동작 | 원격 호출 | 필수 항목 |
//! |------|-----------|-----------|
//! | `get` | `GET /account?email_address=` | 이메일 |
//! | `create` | `POST /account/create` (URL 인코딩) | 이메일 |
//! | `verify` | `POST /account/verify` (URL 인코딩) | 이메일 |
//! | `update` | `PUT /account` (multipart) | 콜백 URL, 로캘 |

use super::{Controller, Draft, PrepareContext};
use crate::{error::AppError, services::dropbox_sign::GatewayCall, services::validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    Get,
    Create,
    Verify,
    Update,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    pub email_address: String,
    pub callback_url: String,
    /// 예: "en-US"
    pub locale: String,
}

pub struct AccountController;

impl Controller for AccountController {
    const PANE: &'static str = "account-requests";
    const TITLE: &'static str = "Account Requests";

    type Action = AccountAction;
    type Form = AccountForm;
    type Workspace = ();

    fn prepare(
        action: AccountAction,
        draft: &Draft<Self>,
        _ctx: &PrepareContext,
    ) -> Result<GatewayCall, AppError> {
        let form = &draft.form;
        let mut errors = Vec::new();

        // 이메일로 동작하는 세 가지는 호출 종류만 다릅니다.
        let email_call: fn(String) -> GatewayCall = match action {
            AccountAction::Get => |email| GatewayCall::GetAccount { email },
            AccountAction::Create => |email| GatewayCall::CreateAccount { email },
            AccountAction::Verify => |email| GatewayCall::VerifyAccount { email },
            AccountAction::Update => {
                validation::require_http_url(&mut errors, "callback_url", &form.callback_url);
                validation::require(&mut errors, "locale", &form.locale);
                AppError::check(errors)?;
                return Ok(GatewayCall::UpdateAccount {
                    callback_url: form.callback_url.trim().to_string(),
                    locale: form.locale.trim().to_string(),
                });
            }
        };

        validation::require_email(&mut errors, "email_address", &form.email_address);
        AppError::check(errors)?;
        Ok(email_call(form.email_address.trim().to_string()))
    }
}
