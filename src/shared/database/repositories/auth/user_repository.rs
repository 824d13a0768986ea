use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::auth::models::user::User;

// 사용자 저장소
// 사용자 생성 시 잔고 레코드(0, 0)를 같은 트랜잭션에서 함께 만듭니다.
pub struct UserRepository {
    pool: PgPool
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 사용자 생성 (로그인 중복이면 None)
    // Create user together with an empty balance row; None when login is taken
    pub async fn create_user(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (login, password_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (login) DO NOTHING
            RETURNING id, login, password_hash, created_at
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to create user")?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        let user = User {
            id: row.get::<i64, _>("id") as u64,
            login: row.get("login"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        };

        sqlx::query(
            r#"
            INSERT INTO user_balances (user_id, current, withdrawn, updated_at)
            VALUES ($1, 0, 0, $2)
            "#,
        )
        .bind(user.id as i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .context("Failed to create user balance")?;

        tx.commit().await.context("Failed to commit user creation")?;

        Ok(Some(user))
    }

    // 로그인으로 사용자 조회
    // Get user by login
    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by login")?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        Ok(Some(User {
            id: row.get::<i64, _>("id") as u64,
            login: row.get("login"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }
}
