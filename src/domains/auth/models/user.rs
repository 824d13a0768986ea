use serde::Serialize;
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

// 사용자 (DB 레코드)
// User record, password hash never leaves the server
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 사용자 응답 모델 (비밀번호 제외)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = UserResponse)]
pub struct UserResponse {
    /// User ID
    /// 사용자 ID
    #[schema(example = 1)]
    pub id: u64,

    /// Login
    /// 로그인
    #[schema(example = "alice")]
    pub login: String,

    /// Registration timestamp
    /// 가입 시간
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            created_at: user.created_at,
        }
    }
}
