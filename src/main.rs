use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use loyalty_server::domains::auth::models::*;
use loyalty_server::domains::loyalty::ledger::{LedgerStore, PgLedgerStore};
use loyalty_server::domains::loyalty::models::*;
use loyalty_server::domains::loyalty::queue::QueueManager;
use loyalty_server::domains::loyalty::services::LoyaltyState;
use loyalty_server::routes::create_router;
use loyalty_server::shared::clients::{AccrualClient, AccrualFetcher};
use loyalty_server::shared::config::Config;
use loyalty_server::shared::database::Database;
use loyalty_server::shared::services::AppState;

/// 종료 시 워커가 남은 작업을 비우도록 기다리는 시간
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        loyalty_server::domains::auth::handlers::auth_handler::register,
        loyalty_server::domains::auth::handlers::auth_handler::login,
        loyalty_server::domains::loyalty::handlers::order_handler::submit_order,
        loyalty_server::domains::loyalty::handlers::order_handler::list_orders,
        loyalty_server::domains::loyalty::handlers::balance_handler::get_balance,
        loyalty_server::domains::loyalty::handlers::balance_handler::withdraw,
        loyalty_server::domains::loyalty::handlers::balance_handler::list_withdrawals
    ),
    components(schemas(
        CredentialsRequest,
        AuthResponse,
        UserResponse,
        Order,
        OrderStatus,
        Balance,
        Withdrawal,
        WithdrawRequest
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order upload and accrual status"),
        (name = "Balance", description = "Points balance and withdrawals")
    ),
    info(
        title = "Loyalty Points Server",
        description = "Order accrual and points balance API",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env가 있으면 먼저 읽음 (없어도 무시)
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    // 로그 설정: RUST_LOG가 있으면 우선, 없으면 --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "loyalty_server={level},tower_http={level}",
            level = config.log_level
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate().context("Invalid configuration")?;

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database_uri).await?;
    db.initialize().await?;

    // 원장 + 적립 클라이언트 + 큐
    let ledger: Arc<dyn LedgerStore> = Arc::new(PgLedgerStore::new(db.clone()));
    let accrual_url = config.accrual_base_url()?;
    let fetcher: Arc<dyn AccrualFetcher> = Arc::new(AccrualClient::new(accrual_url.clone())?);
    let queue = QueueManager::start(config.queue_config(), ledger.clone(), fetcher);

    // AppState 생성 (모든 Service 초기화)
    let loyalty_state = LoyaltyState::new(ledger, queue.clone());
    let app_state = AppState::new(db.clone(), &config.jwt_secret, loyalty_state);

    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(RequestDecompressionLayer::new())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = TcpListener::bind(&config.run_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.run_address))?;

    tracing::info!(
        address = %config.run_address,
        accrual = %accrual_url,
        "Server running, Swagger UI at /swagger-ui"
    );

    // 서버 실행 (Ctrl+C로 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // 진행 중인 적립 작업 정리 후 DB 연결 종료
    queue.shutdown(SHUTDOWN_GRACE).await;
    db.close().await;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
