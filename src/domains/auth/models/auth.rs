use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입/로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = CredentialsRequest)]
pub struct CredentialsRequest {
    /// Login
    /// 로그인
    #[schema(example = "alice")]
    pub login: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "password123")]
    pub password: String,
}

// 회원가입/로그인 응답 모델
// 토큰은 Authorization 헤더로도 함께 내려갑니다.
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = AuthResponse)]
pub struct AuthResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// JWT Access Token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// Success message
    /// 성공 메시지
    pub message: String,
}
