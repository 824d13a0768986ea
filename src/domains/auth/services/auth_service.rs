use crate::shared::database::{Database, UserRepository};
use crate::domains::auth::models::{User, CredentialsRequest};
use crate::shared::errors::AuthError;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};

// 인증 서비스
// AuthService: handles registration and login
#[derive(Clone)]
pub struct AuthService {
    db: Database,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // 회원가입
    // 사용자와 잔고 레코드를 함께 생성
    pub async fn register(&self, request: CredentialsRequest) -> Result<User, AuthError> {
        Self::validate(&request)?;

        let user_repo = UserRepository::new(self.db.pool().clone());

        // 1. 비밀번호 해싱
        let password_hash = Self::hash_password(&request.password)?;

        // 2. 사용자 생성 (로그인 중복은 INSERT 충돌로 판단)
        let user = user_repo
            .create_user(&request.login, &password_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to create user: {:#}", e)))?;

        user.ok_or(AuthError::LoginAlreadyExists { login: request.login })
    }

    // 로그인
    pub async fn login(&self, request: CredentialsRequest) -> Result<User, AuthError> {
        Self::validate(&request)?;

        let user_repo = UserRepository::new(self.db.pool().clone());

        let user = user_repo
            .get_user_by_login(&request.login)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?
            .ok_or(AuthError::InvalidCredentials)?;

        Self::verify_password(&request.password, &user.password_hash)?;

        Ok(user)
    }

    fn validate(request: &CredentialsRequest) -> Result<(), AuthError> {
        if request.login.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::InvalidRequest("login and password are required".to_string()));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(())
    }
}
