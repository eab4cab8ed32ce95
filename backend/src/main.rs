//! # signdesk 콘솔 서버 진입점
//!
//! 원격 전자서명 API(Dropbox Sign v3)를 시험해 보는 콘솔의 백엔드입니다.
//! 브라우저 콘솔은 이 서버의 `/api/v1`을 호출하고, 이 서버가 원격 API를 대신 호출합니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 읽기
//! 4. 원격 API 게이트웨이 생성
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod error;
mod models;
mod routes;
mod services;

use anyhow::{Context, Result};
use axum::Router;
use config::Config;
use routes::AppState;
use services::{controllers::PrepareContext, dropbox_sign::DropboxSignClient};
use std::{path::Path, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 signdesk, tower_http, axum을 debug 레벨로 봅니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signdesk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()
        .context("DROPBOX_SIGN_API_KEY and DROPBOX_SIGN_CLIENT_ID must be set")?;
    // Debug 구현이 API 키를 가려 줍니다.
    tracing::debug!("Loaded configuration: {:?}", config);
    tracing::info!("Starting signdesk on {}:{}", config.host, config.port);

    // ── 4단계: 게이트웨이 생성 ──
    // 인증 헤더와 타임아웃이 들어간 reqwest 클라이언트를 한 번 만들어 모든 패널이 공유합니다.
    let gateway = DropboxSignClient::new(&config)?;
    tracing::info!("Remote API: {}", config.api_url);

    let state = AppState::new(
        Arc::new(gateway),
        PrepareContext {
            client_id: config.client_id.clone(),
        },
    );
    // 탭을 닫아 버려진 다이얼로그가 메모리에 쌓이지 않도록 주기적으로 지웁니다.
    state.spawn_sweepers(Duration::from_secs(config.dialog_ttl_secs));

    // ── 5단계: 라우터 설정 ──
    let api_routes = routes::api_router(state);

    // 개발 환경에서는 콘솔을 다른 포트에서 띄우므로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 빌드된 콘솔 파일이 있으면 같은 서버에서 서빙합니다.
    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    let console_dist = Path::new(&config.console_dist);
    let app = if console_dist.exists() {
        tracing::info!("Serving console static files from {}", config.console_dist);

        let serve_dir = ServeDir::new(console_dist)
            .not_found_service(ServeFile::new(console_dist.join("index.html")));

        Router::new()
            .nest("/api/v1", api_routes)
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Console dist directory not found, serving API only");

        Router::new()
            .nest("/api/v1", api_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
