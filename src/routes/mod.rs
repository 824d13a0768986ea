// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::Router;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::loyalty::routes::create_loyalty_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
///
/// 인증과 포인트 API는 같은 /api/user 아래에 있으므로 merge 후 nest
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/user", create_auth_router().merge(create_loyalty_router()))
}
