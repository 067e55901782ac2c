use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::users::models::{NewUser, User, UserProfile};

/// Persistence for staff profiles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Page through profiles ordered by creation time (page is 1-based)
    async fn list(&self, page: i64, limit: i64) -> Result<Vec<User>>;

    /// Every profile, ordered by creation time
    async fn list_all(&self) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn insert(&self, user: &NewUser) -> Result<User>;

    /// Returns `None` when no row has that id
    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>>;

    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, phone, email, role, created_at, updated_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, page: i64, limit: i64) -> Result<Vec<User>> {
        let limit = limit.clamp(1, 100);
        let offset = (page.max(1) - 1) * limit;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: &NewUser) -> Result<User> {
        let p = &user.profile;
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, phone, email, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.phone)
        .bind(&p.email)
        .bind(p.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, phone = $4, email = $5, role = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
