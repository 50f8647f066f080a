//! Subscription plan storage
//!
//! `details` is a JSON string array persisted in a TEXT column, decoded at the
//! boundary so callers only ever see `Vec<String>`.

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::BoxError;
use crate::util::now_millis;

/// A subscription plan as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub details: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: String,
    name: String,
    price: f64,
    currency: String,
    details: String,
    created_at: i64,
    updated_at: i64,
}

impl PlanRow {
    fn into_plan(self) -> Result<SubscriptionPlan, BoxError> {
        let details: Vec<String> = serde_json::from_str(&self.details)?;
        Ok(SubscriptionPlan {
            id: self.id,
            name: self.name,
            price: self.price,
            currency: self.currency,
            details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields for a new plan
#[derive(Debug)]
pub struct NewPlan {
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub details: Vec<String>,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub details: Option<Vec<String>>,
}

/// List all plans in insertion order.
pub async fn list(pool: &SqlitePool) -> Result<Vec<SubscriptionPlan>, BoxError> {
    let rows: Vec<PlanRow> = sqlx::query_as(
        "SELECT id, name, price, currency, details, created_at, updated_at
         FROM subscription_plans
         ORDER BY created_at ASC, rowid ASC",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(PlanRow::into_plan).collect()
}

pub async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SubscriptionPlan>, BoxError> {
    let row: Option<PlanRow> = sqlx::query_as(
        "SELECT id, name, price, currency, details, created_at, updated_at
         FROM subscription_plans
         WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(PlanRow::into_plan).transpose()
}

pub async fn create(pool: &SqlitePool, new: NewPlan) -> Result<SubscriptionPlan, BoxError> {
    let id = Uuid::new_v4().to_string();
    let now = now_millis();
    let details_json = serde_json::to_string(&new.details)?;
    sqlx::query(
        "INSERT INTO subscription_plans (id, name, price, currency, details, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(&id)
    .bind(&new.name)
    .bind(new.price)
    .bind(&new.currency)
    .bind(&details_json)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(SubscriptionPlan {
        id,
        name: new.name,
        price: new.price,
        currency: new.currency,
        details: new.details,
        created_at: now,
        updated_at: now,
    })
}

/// Apply a partial update. Returns the updated plan, or `None` if the id does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    changes: PlanChanges,
) -> Result<Option<SubscriptionPlan>, BoxError> {
    let details_json = match &changes.details {
        Some(d) => Some(serde_json::to_string(d)?),
        None => None,
    };

    let result = sqlx::query(
        "UPDATE subscription_plans
         SET name = COALESCE(?2, name),
             price = COALESCE(?3, price),
             currency = COALESCE(?4, currency),
             details = COALESCE(?5, details),
             updated_at = ?6
         WHERE id = ?1",
    )
    .bind(id)
    .bind(&changes.name)
    .bind(changes.price)
    .bind(&changes.currency)
    .bind(&details_json)
    .bind(now_millis())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Delete a plan. Returns the deleted plan, or `None` if the id does not exist.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<Option<SubscriptionPlan>, BoxError> {
    let Some(plan) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    sqlx::query("DELETE FROM subscription_plans WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(Some(plan))
}
