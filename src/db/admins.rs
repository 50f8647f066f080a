//! Admin account storage

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::BoxError;
use crate::util::now_millis;

/// An admin account row. The password hash never leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: i64,
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<AdminUser>, BoxError> {
    let admin = sqlx::query_as::<_, AdminUser>(
        "SELECT id, email, name, password_hash, created_at FROM admin_users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<AdminUser, BoxError> {
    let admin = AdminUser {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: name.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now_millis(),
    };
    sqlx::query(
        "INSERT INTO admin_users (id, email, name, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&admin.id)
    .bind(&admin.email)
    .bind(&admin.name)
    .bind(&admin.password_hash)
    .bind(admin.created_at)
    .execute(pool)
    .await?;
    Ok(admin)
}
