use std::time::Duration;
use async_trait::async_trait;

// =====================================================
// 재시도/백오프 상태
// =====================================================
// 연결 실패 시 1초부터 시작해서 두 배씩 늘리고, 최대 5번까지 요청합니다.
// 요청 사이 대기: 1s, 2s, 4s, 8s
//
// 429 + Retry-After는 시도 횟수와 별개로 서버가 지정한 시간만큼 대기하고
// 백오프를 처음 값으로 되돌립니다.
// =====================================================

/// 첫 백오프
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// 최대 요청 횟수
pub const MAX_ATTEMPTS: u32 = 5;

/// 한 번의 조회에 대한 재시도 상태
/// Per-call retry state
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    backoff: Duration,
    initial: Duration,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(initial: Duration, max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            backoff: initial,
            initial,
            max_attempts,
        }
    }

    /// 실패 한 번을 기록하고 다음 요청 전 대기 시간을 반환
    /// None이면 시도 횟수를 모두 사용한 것
    pub fn on_failure(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }
        let wait = self.backoff;
        self.backoff = self.backoff.saturating_mul(2);
        Some(wait)
    }

    /// 백오프를 처음 값으로 되돌림 (서버가 대기 시간을 지정한 경우)
    pub fn reset_backoff(&mut self) {
        self.backoff = self.initial;
    }

    /// 서버가 지정한 대기 시간 (429 Retry-After)
    /// 백오프를 초기화하고, 초기 백오프보다 짧은 값은 초기 백오프로 올림
    pub fn server_wait(&mut self, requested: Duration) -> Duration {
        self.reset_backoff();
        requested.max(self.initial)
    }

    /// 지금까지 실패한 횟수
    pub fn attempts(&self) -> u32 {
        self.attempt
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_ATTEMPTS)
    }
}

/// 대기 추상화 (테스트에서 실제로 잠들지 않도록)
/// Sleep abstraction so tests can record waits instead of sleeping
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// tokio 타이머 기반 Sleeper
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
