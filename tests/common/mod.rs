// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 적립 클라이언트/큐/유스케이스 테스트에서 공통으로 사용하는 도구
//
// - MockAccrualServer: 127.0.0.1 임의 포트에서 뜨는 가짜 적립 서비스 (응답 스크립트)
// - RecordingSleeper: 실제로 잠들지 않고 대기 시간만 기록
// - ScriptedFetcher: 주문 번호별로 정해진 결과를 돌려주는 AccrualFetcher
// - wait_until: 조건이 참이 될 때까지 폴링
// =====================================================
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

use loyalty_server::domains::loyalty::models::{AccrualDecision, FetchOutcome, OrderStatus};
use loyalty_server::shared::clients::{AccrualFetcher, Sleeper};
use loyalty_server::shared::errors::AccrualError;

// 테스트용 주문 번호 (Luhn 통과)
pub const ORDER_A: &str = "79927398713";
pub const ORDER_B: &str = "12345678903";
pub const ORDER_C: &str = "2377225624";

pub const USER_A: u64 = 1;
pub const USER_B: u64 = 2;

// =====================================================
// 가짜 적립 서비스
// =====================================================

/// 가짜 적립 서비스의 응답 하나
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<String>,
    pub retry_after: Option<String>,
}

impl MockResponse {
    pub fn decision(number: &str, status: &str, accrual: Option<f64>) -> Self {
        let body = match accrual {
            Some(accrual) => serde_json::json!({ "order": number, "status": status, "accrual": accrual }),
            None => serde_json::json!({ "order": number, "status": status }),
        };
        Self {
            status: 200,
            body: Some(body.to_string()),
            retry_after: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: None,
            retry_after: None,
        }
    }

    pub fn too_many_requests(retry_after: &str) -> Self {
        Self {
            status: 429,
            body: None,
            retry_after: Some(retry_after.to_string()),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
            retry_after: None,
        }
    }
}

#[derive(Clone, Default)]
struct MockState {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

/// 127.0.0.1 임의 포트의 가짜 적립 서비스
/// 스크립트가 비면 204를 돌려줍니다.
pub struct MockAccrualServer {
    state: MockState,
    base_url: Url,
}

impl MockAccrualServer {
    pub async fn start(script: Vec<MockResponse>) -> Self {
        let state = MockState {
            script: Arc::new(Mutex::new(script.into())),
            ..MockState::default()
        };

        let app = Router::new()
            .route("/api/orders/:number", get(mock_order_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{}", addr)).unwrap(),
        }
    }

    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn requested_numbers(&self) -> Vec<String> {
        self.state.paths.lock().clone()
    }
}

async fn mock_order_handler(State(state): State<MockState>, Path(number): Path<String>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    state.paths.lock().push(number);

    let next = state.script.lock().pop_front();
    let Some(next) = next else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let status = StatusCode::from_u16(next.status).unwrap();
    let mut headers = HeaderMap::new();
    if let Some(retry_after) = next.retry_after {
        headers.insert(header::RETRY_AFTER, HeaderValue::from_str(&retry_after).unwrap());
    }
    match next.body {
        Some(body) => {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            (status, headers, body).into_response()
        }
        None => (status, headers).into_response(),
    }
}

/// 아무도 듣지 않는 주소 (연결 실패용)
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

// =====================================================
// 대기 기록
// =====================================================

/// 대기 시간만 기록하고 바로 반환하는 Sleeper
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

/// 영원히 끝나지 않는 Sleeper (취소 테스트용)
pub struct StuckSleeper;

#[async_trait]
impl Sleeper for StuckSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}

// =====================================================
// 스크립트 조회기
// =====================================================

/// 주문 번호별 조회 결과
#[derive(Debug, Clone)]
pub enum Scripted {
    Processed(Decimal),
    Processing,
    Invalid,
    NotRegistered,
    ServerFault,
    /// 취소될 때까지 응답하지 않음
    Hang,
}

/// 주문 번호별로 정해진 결과를 돌려주는 AccrualFetcher
/// 스크립트에 없는 번호는 NotRegistered
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, number: &str, result: Scripted) {
        self.script.lock().insert(number.to_string(), result);
    }

    /// 매 조회 전에 대기 (InProgress 상태를 관찰하기 위해)
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls_for(&self, number: &str) -> usize {
        self.calls.lock().get(number).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccrualFetcher for ScriptedFetcher {
    async fn fetch(&self, number: &str, cancel: &CancellationToken) -> Result<FetchOutcome, AccrualError> {
        *self.calls.lock().entry(number.to_string()).or_default() += 1;
        self.total.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(AccrualError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let scripted = self.script.lock().get(number).cloned();
        match scripted.unwrap_or(Scripted::NotRegistered) {
            Scripted::Processed(accrual) => Ok(FetchOutcome::Decision(AccrualDecision {
                status: OrderStatus::Processed,
                accrual,
            })),
            Scripted::Processing => Ok(FetchOutcome::Decision(AccrualDecision {
                status: OrderStatus::Processing,
                accrual: Decimal::ZERO,
            })),
            Scripted::Invalid => Ok(FetchOutcome::Decision(AccrualDecision {
                status: OrderStatus::Invalid,
                accrual: Decimal::ZERO,
            })),
            Scripted::NotRegistered => Ok(FetchOutcome::NotRegistered),
            Scripted::ServerFault => Err(AccrualError::ServerFault { status: 500 }),
            Scripted::Hang => {
                cancel.cancelled().await;
                Err(AccrualError::Cancelled)
            }
        }
    }
}

// =====================================================
// 폴링
// =====================================================

/// 조건이 참이 될 때까지 폴링 (timeout 초과 시 false)
pub async fn wait_until<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
