use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use crate::domains::loyalty::models::{Balance, Withdrawal};

// =====================================================
// 잔고 저장소
// =====================================================
// user_balances 테이블 (user_id PK)
// - current >= 0, withdrawn >= 0 (CHECK 제약)
// - 차감은 SERIALIZABLE 트랜잭션 + SELECT ... FOR UPDATE
// =====================================================

/// 직렬화 실패(40001) 시 차감 트랜잭션 재시도 횟수
const SERIALIZATION_RETRIES: u32 = 3;

/// PostgreSQL serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";

pub struct BalanceRepository {
    pool: PgPool,
}

impl BalanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 사용자 잔고 조회 (레코드 없으면 0)
    // Get user balance; a missing row reads as zero
    pub async fn get_by_user(&self, user_id: u64) -> Result<Balance> {
        let row = sqlx::query(
            r#"
            SELECT current, withdrawn
            FROM user_balances
            WHERE user_id = $1
            "#,
        )
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user balance")?;

        Ok(match row {
            Some(row) => Balance {
                current: row.get("current"),
                withdrawn: row.get("withdrawn"),
            },
            None => Balance::default(),
        })
    }

    // 포인트 차감 (잔고 부족이면 None)
    // Withdraw points; None when the balance cannot cover the sum
    //
    // 동시 차감이 직렬화 충돌로 실패하면 처음부터 다시 시도합니다.
    // 재시도에서는 먼저 커밋된 차감이 반영된 잔고를 다시 읽습니다.
    pub async fn withdraw(
        &self,
        user_id: u64,
        order_number: &str,
        sum: Decimal,
    ) -> Result<Option<Withdrawal>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_withdraw(user_id, order_number, sum).await {
                Ok(result) => return Ok(result),
                Err(e) if is_serialization_failure(&e) && attempt < SERIALIZATION_RETRIES => {
                    tracing::debug!(
                        "Withdrawal serialization conflict for user {} (attempt {}), retrying",
                        user_id,
                        attempt
                    );
                }
                Err(e) => return Err(e).context("Failed to withdraw points"),
            }
        }
    }

    async fn try_withdraw(
        &self,
        user_id: u64,
        order_number: &str,
        sum: Decimal,
    ) -> std::result::Result<Option<Withdrawal>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"
            SELECT current
            FROM user_balances
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id as i64)
        .fetch_optional(&mut *tx)
        .await?;

        let current: Decimal = match row {
            Some(row) => row.get("current"),
            None => Decimal::ZERO,
        };

        if current < sum {
            tx.rollback().await?;
            return Ok(None);
        }

        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO withdrawals (user_id, order_number, sum, processed_at)
            VALUES ($1, $2, $3, $4)
            RETURNING order_number, sum, processed_at
            "#,
        )
        .bind(user_id as i64)
        .bind(order_number)
        .bind(sum)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE user_balances
            SET current = current - $2, withdrawn = withdrawn + $2, updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id as i64)
        .bind(sum)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Withdrawal {
            order: row.get("order_number"),
            sum: row.get("sum"),
            processed_at: row.get("processed_at"),
        }))
    }
}

fn is_serialization_failure(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(SERIALIZATION_FAILURE),
        _ => false,
    }
}
