use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};

/// JWT Claims (Access Token 내용)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user_id: u64,
    pub login: String,
    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: u64, login: String, expires_in_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            login,
            exp: (now + Duration::hours(expires_in_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}
