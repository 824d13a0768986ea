use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use crate::domains::loyalty::models::Withdrawal;

// 차감 내역 저장소 (조회 전용, 기록은 BalanceRepository::withdraw 트랜잭션 안에서)
pub struct WithdrawalRepository {
    pool: PgPool,
}

impl WithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 사용자 차감 내역 (최신순)
    // Withdrawals of a user, newest first
    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Withdrawal>> {
        let rows = sqlx::query(
            r#"
            SELECT order_number, sum, processed_at
            FROM withdrawals
            WHERE user_id = $1
            ORDER BY processed_at DESC
            "#,
        )
        .bind(user_id as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user withdrawals")?;

        Ok(rows
            .iter()
            .map(|row| Withdrawal {
                order: row.get("order_number"),
                sum: row.get("sum"),
                processed_at: row.get("processed_at"),
            })
            .collect())
    }
}
