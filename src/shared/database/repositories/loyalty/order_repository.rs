use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::loyalty::models::{Order, OrderStatus};

// =====================================================
// 주문 저장소
// =====================================================
// orders 테이블 (number PK, 전체 사용자에 걸쳐 유일)
// 적립 반영은 주문 갱신과 잔고 적립을 하나의 문장(CTE)으로 처리합니다.
// =====================================================

/// 적립 반영 쿼리 결과 (갱신된 주문 수, 적립된 잔고 수)
#[derive(Debug, Clone, Copy)]
pub struct AccrualApplyCounts {
    pub updated: i64,
    pub credited: i64,
}

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 주문 등록 (이미 있으면 아무것도 하지 않음)
    // Insert order if the number is free; returns true when a row was inserted
    pub async fn insert_if_absent(&self, user_id: u64, number: &str) -> Result<bool> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO orders (number, user_id, status, accrual, uploaded_at, updated_at)
            VALUES ($1, $2, 'NEW', 0, $3, $4)
            ON CONFLICT (number) DO NOTHING
            RETURNING number
            "#,
        )
        .bind(number)
        .bind(user_id as i64)
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to insert order")?;

        Ok(row.is_some())
    }

    // 주문 소유자 조회
    // Get order owner
    pub async fn get_owner(&self, number: &str) -> Result<Option<u64>> {
        let row = sqlx::query(
            r#"
            SELECT user_id
            FROM orders
            WHERE number = $1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch order owner")?;

        Ok(row.map(|r| r.get::<i64, _>("user_id") as u64))
    }

    // 적립 결정 반영 + 잔고 적립 (단일 문장)
    // Apply accrual decision and credit balance in one statement
    //
    // 비종료 상태(NEW, PROCESSING)의 주문만 갱신하므로
    // 같은 결정을 여러 번 반영해도 잔고는 한 번만 증가합니다.
    pub async fn apply_accrual_result(
        &self,
        number: &str,
        status: OrderStatus,
        accrual: Decimal,
    ) -> Result<AccrualApplyCounts> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE orders
                SET status = $2, accrual = $3, updated_at = $4
                WHERE number = $1 AND status IN ('NEW', 'PROCESSING')
                RETURNING user_id, status, accrual
            ),
            credited AS (
                INSERT INTO user_balances (user_id, current, withdrawn, updated_at)
                SELECT user_id, accrual, 0, $4
                FROM updated
                WHERE status = 'PROCESSED' AND accrual > 0
                ON CONFLICT (user_id) DO UPDATE
                SET current = user_balances.current + EXCLUDED.current,
                    updated_at = EXCLUDED.updated_at
                RETURNING user_id
            )
            SELECT
                (SELECT COUNT(*) FROM updated) AS updated,
                (SELECT COUNT(*) FROM credited) AS credited
            "#,
        )
        .bind(number)
        .bind(status.as_str())
        .bind(accrual)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to apply accrual result")?;

        Ok(AccrualApplyCounts {
            updated: row.get("updated"),
            credited: row.get("credited"),
        })
    }

    // 비종료 상태 주문 번호 목록
    // Numbers of orders without a terminal status
    pub async fn list_pending_numbers(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT number
            FROM orders
            WHERE status IN ('NEW', 'PROCESSING')
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch pending orders")?;

        Ok(rows.iter().map(|r| r.get("number")).collect())
    }

    // 사용자 주문 목록 (최신순)
    // Orders of a user, newest first
    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT number, user_id, status, accrual, uploaded_at
            FROM orders
            WHERE user_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(user_id as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user orders")?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let status: String = row.get("status");
            let status = status
                .parse::<OrderStatus>()
                .map_err(anyhow::Error::msg)
                .context("Corrupted order status")?;
            let uploaded_at: DateTime<Utc> = row.get("uploaded_at");

            orders.push(Order::from_parts(
                row.get("number"),
                row.get::<i64, _>("user_id") as u64,
                status,
                row.get("accrual"),
                uploaded_at,
            ));
        }

        Ok(orders)
    }
}
