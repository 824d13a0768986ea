use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::retry::{RetryState, Sleeper, TokioSleeper};
use crate::domains::loyalty::models::{AccrualResponse, FetchOutcome};
use crate::shared::errors::AccrualError;

// =====================================================
// 적립 서비스 클라이언트
// =====================================================
// GET <base>/api/orders/{number}
//
// 응답 처리:
// - 200: 본문 파싱 후 결정 반환
// - 204: 등록되지 않은 주문
// - 429 + Retry-After: 지정 시간(최소 1s) 대기 후 재요청 (백오프 초기화)
// - 5xx: 즉시 실패 (재시도 없음, 다음 sweep에서 다시 시도)
// - 연결 실패: 1s부터 두 배씩 백오프, 최대 5번 요청
//
// 모든 대기는 CancellationToken으로 중단할 수 있습니다.
// =====================================================

/// 요청 한 번의 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 적립 결정 조회 인터페이스 (큐 워커가 사용)
/// Accrual lookup seam used by queue workers
#[async_trait]
pub trait AccrualFetcher: Send + Sync {
    async fn fetch(&self, number: &str, cancel: &CancellationToken) -> Result<FetchOutcome, AccrualError>;
}

// 적립 서비스 API 클라이언트
// Accrual service API client
pub struct AccrualClient {
    http_client: reqwest::Client,
    base_url: Url,
    sleeper: Arc<dyn Sleeper>,
}

impl AccrualClient {
    // 클라이언트 생성
    // Create new accrual client instance
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_sleeper(base_url, Arc::new(TokioSleeper))
    }

    // 대기 구현을 지정해서 생성 (테스트용)
    pub fn with_sleeper(base_url: Url, sleeper: Arc<dyn Sleeper>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
            sleeper,
        })
    }

    // 주문 조회 URL 생성
    // Build <base>/api/orders/{number}
    fn order_url(&self, number: &str) -> Result<Url, AccrualError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AccrualError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "orders", number]);
        Ok(url)
    }

    // 대기 (취소되면 Cancelled)
    async fn pause(&self, wait: Duration, cancel: &CancellationToken) -> Result<(), AccrualError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(AccrualError::Cancelled),
            _ = self.sleeper.sleep(wait) => Ok(()),
        }
    }

    // 연결 실패 처리: 남은 시도가 있으면 대기, 없으면 MaxRetriesReached
    async fn back_off(
        &self,
        retry: &mut RetryState,
        number: &str,
        error: String,
        cancel: &CancellationToken,
    ) -> Result<(), AccrualError> {
        match retry.on_failure() {
            Some(wait) => {
                tracing::warn!(
                    "Accrual request for order {} failed (attempt {}): {}, retrying in {:?}",
                    number,
                    retry.attempts(),
                    error,
                    wait
                );
                self.pause(wait, cancel).await
            }
            None => Err(AccrualError::MaxRetriesReached {
                attempts: retry.attempts(),
                last_error: error,
            }),
        }
    }
}

#[async_trait]
impl AccrualFetcher for AccrualClient {
    async fn fetch(&self, number: &str, cancel: &CancellationToken) -> Result<FetchOutcome, AccrualError> {
        let url = self.order_url(number)?;
        let mut retry = RetryState::default();

        loop {
            let sent = tokio::select! {
                _ = cancel.cancelled() => return Err(AccrualError::Cancelled),
                sent = self.http_client.get(url.clone()).send() => sent,
            };

            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    self.back_off(&mut retry, number, e.to_string(), cancel).await?;
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {
                    let body = tokio::select! {
                        _ = cancel.cancelled() => return Err(AccrualError::Cancelled),
                        body = response.bytes() => body,
                    };
                    let body = match body {
                        Ok(body) => body,
                        Err(e) => {
                            self.back_off(&mut retry, number, e.to_string(), cancel).await?;
                            continue;
                        }
                    };

                    let payload: AccrualResponse = serde_json::from_slice(&body)
                        .map_err(|e| AccrualError::MalformedPayload(e.to_string()))?;
                    if payload.order != number {
                        tracing::warn!(
                            "Accrual service answered for order {} when asked about {}",
                            payload.order,
                            number
                        );
                    }
                    let decision = payload.into_decision().map_err(AccrualError::MalformedPayload)?;
                    return Ok(FetchOutcome::Decision(decision));
                }
                StatusCode::NO_CONTENT => return Ok(FetchOutcome::NotRegistered),
                StatusCode::TOO_MANY_REQUESTS => match retry_after(&response) {
                    Some(requested) => {
                        let wait = retry.server_wait(requested);
                        tracing::info!(
                            "Accrual service rate limited order {}, waiting {:?}",
                            number,
                            wait
                        );
                        self.pause(wait, cancel).await?;
                    }
                    None => {
                        self.back_off(
                            &mut retry,
                            number,
                            "rate limited without Retry-After".to_string(),
                            cancel,
                        )
                        .await?;
                    }
                },
                status if status.is_server_error() => {
                    return Err(AccrualError::ServerFault { status: status.as_u16() });
                }
                status => {
                    return Err(AccrualError::UnexpectedStatus { status: status.as_u16() });
                }
            }
        }
    }
}

// Retry-After 헤더 (초 단위 정수만 지원)
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
