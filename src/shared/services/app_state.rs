use crate::shared::database::Database;
use crate::domains::auth::services::{AuthState, JwtService};
use crate::domains::loyalty::services::LoyaltyState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 원장과 적립 큐는 main에서 만들어 LoyaltyState로 주입합니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub loyalty_state: LoyaltyState,
}

impl AppState {
    /// Create AppState
    /// 모든 도메인 State를 조합
    pub fn new(db: Database, jwt_secret: &str, loyalty_state: LoyaltyState) -> Self {
        let jwt_service = JwtService::new(jwt_secret);
        let auth_state = AuthState::new(db.clone(), jwt_service);

        Self {
            db,
            auth_state,
            loyalty_state,
        }
    }
}
