use crate::domains::auth::models::{AuthResponse, CredentialsRequest, User};
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde_json::json;

// 요청 본문 파싱 실패는 모두 400
fn parse_credentials(
    request: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, (StatusCode, Json<serde_json::Value>)> {
    request.map(|Json(request)| request).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid request body: {}", e.body_text()) })),
        )
    })
}

// 토큰 발급 + Authorization 헤더 구성
fn issue_token(
    app_state: &AppState,
    user: User,
    message: &str,
) -> Result<(HeaderMap, Json<AuthResponse>), (StatusCode, Json<serde_json::Value>)> {
    let access_token = app_state
        .auth_state
        .jwt_service
        .generate_access_token(user.id, user.login.clone())
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    let bearer = HeaderValue::from_str(&format!("Bearer {}", access_token)).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to build authorization header: {}", e) })),
        )
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer);

    Ok((
        headers,
        Json(AuthResponse {
            user: user.into(),
            access_token,
            message: message.to_string(),
        }),
    ))
}

// 회원가입 핸들러 (가입 후 바로 로그인 상태)
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered and authenticated", body = AuthResponse),
        (status = 400, description = "Malformed request body"),
        (status = 409, description = "Login already taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    request: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<AuthResponse>), (StatusCode, Json<serde_json::Value>)> {
    let request = parse_credentials(request)?;

    let user = app_state
        .auth_state
        .auth_service
        .register(request)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    tracing::info!(user_id = user.id, login = %user.login, "User registered");
    issue_token(&app_state, user, "User registered successfully")
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid login or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    request: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<AuthResponse>), (StatusCode, Json<serde_json::Value>)> {
    let request = parse_credentials(request)?;

    let user = app_state
        .auth_state
        .auth_service
        .login(request)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    issue_token(&app_state, user, "Login successful")
}
