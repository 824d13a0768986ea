use thiserror::Error;

/// 적립 서비스 조회 에러
/// Errors returned by the accrual service client
///
/// `MaxRetriesReached`만 일시적 장애(연결 실패)에서 비롯되고,
/// 나머지는 재시도해도 결과가 바뀌지 않는 종료 에러입니다.
#[derive(Error, Debug)]
pub enum AccrualError {
    /// 연결 실패가 최대 시도 횟수만큼 반복됨
    /// Transport failures exhausted the retry budget
    #[error("max retries reached after {attempts} attempts: {last_error}")]
    MaxRetriesReached { attempts: u32, last_error: String },

    /// 적립 서비스 내부 오류 (5xx)
    /// Accrual service returned a server error
    #[error("accrual service internal error: status {status}")]
    ServerFault { status: u16 },

    /// 예상하지 못한 응답 코드
    /// Unexpected response status
    #[error("unexpected accrual service response: status {status}")]
    UnexpectedStatus { status: u16 },

    /// 응답 본문 파싱 실패 또는 값 이상
    /// Decision payload could not be decoded or is out of range
    #[error("malformed accrual payload: {0}")]
    MalformedPayload(String),

    /// 요청 URL 생성 실패
    /// Order number could not be placed into the endpoint URL
    #[error("invalid accrual endpoint: {0}")]
    InvalidEndpoint(String),

    /// 호출자가 작업을 취소함
    /// Cancelled by the caller
    #[error("accrual request cancelled")]
    Cancelled,
}

impl AccrualError {
    /// 다음 sweep에서 다시 시도할 가치가 있는 에러인지
    /// Whether the next sweep may succeed where this attempt failed
    pub fn is_transient(&self) -> bool {
        matches!(self, AccrualError::MaxRetriesReached { .. } | AccrualError::Cancelled)
    }
}
