//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 콘솔 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DROPBOX_SIGN_API_KEY`: 원격 전자서명 API 키 (필수)
//! - `DROPBOX_SIGN_CLIENT_ID`: 임베디드 서명용 클라이언트 ID (필수)
//! - `DROPBOX_SIGN_API_URL`: 원격 API 기본 URL
//! - `REQUEST_TIMEOUT_SECS`: 원격 호출 타임아웃(초)
//! - `DIALOG_TTL_SECS`: 사용하지 않는 다이얼로그를 지우기까지의 시간(초)
//! - `CONSOLE_DIST`: 빌드된 콘솔 프론트엔드 디렉토리
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호

use std::env;

/// 원격 API 기본 URL (v3)
pub const DEFAULT_API_URL: &str = "https://api.hellosign.com/v3";

/// 원격 호출 기본 타임아웃(초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 다이얼로그 만료 기본값(초). 1시간
pub const DEFAULT_DIALOG_TTL_SECS: u64 = 60 * 60;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 게이트웨이와 컨트롤러가 공유합니다.
#[derive(Clone)]
pub struct Config {
    /// 원격 API 기본 URL (예: "https://api.hellosign.com/v3")
    pub api_url: String,
    /// API 키. Basic 인증 헤더의 사용자 이름 자리에 들어갑니다.
    pub api_key: String,
    /// 임베디드 서명 요청에 함께 보내는 클라이언트 ID
    pub client_id: String,
    /// 원격 호출 하나당 최대 대기 시간(초)
    pub request_timeout_secs: u64,
    /// 마지막 사용 후 이 시간이 지난 다이얼로그는 메모리에서 지웁니다.
    pub dialog_ttl_secs: u64,
    /// 콘솔 프론트엔드 빌드 디렉토리
    pub console_dist: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
}

// API 키가 로그에 찍히지 않도록 Debug를 직접 구현합니다.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("dialog_ttl_secs", &self.dialog_ttl_secs)
            .field("console_dist", &self.console_dist)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DROPBOX_SIGN_API_KEY`와 `DROPBOX_SIGN_CLIENT_ID`는 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// 임의의 조회 함수로 설정을 만듭니다.
    ///
    /// 테스트에서 프로세스 환경변수를 건드리지 않고 설정을 구성할 때 사용합니다.
    /// `F: Fn(&str) -> Result<String, VarError>`: 키를 받아 값을 돌려주는 클로저
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        Ok(Self {
            api_key: lookup("DROPBOX_SIGN_API_KEY")?,     // 필수: 없으면 에러
            client_id: lookup("DROPBOX_SIGN_CLIENT_ID")?, // 필수: 없으면 에러

            api_url: lookup("DROPBOX_SIGN_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            dialog_ttl_secs: lookup("DIALOG_TTL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_DIALOG_TTL_SECS),
            console_dist: lookup("CONSOLE_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            host: lookup("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // 포트 번호는 문자열 → u16 변환. 파싱 실패 시 기본값 3000
            port: lookup("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
