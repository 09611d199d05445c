//! User profiles and recently-viewed lists

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::aggregate::{RecentlyViewed, ViewedEntry, RECENTLY_VIEWED_CAPACITY};
use crate::domain::{NewUser, ProfileChanges, Role, UserProfile};
use crate::repository::{RepositoryError, UserRepository};

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, address, city, state, \
     zip_code, country, role, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    country: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            role: Role::from_db(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
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
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn insert(&self, user: NewUser) -> Result<UserProfile, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                zip_code = COALESCE($9, zip_code),
                country = COALESCE($10, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.city.as_deref())
        .bind(changes.state.as_deref())
        .bind(changes.zip_code.as_deref())
        .bind(changes.country.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn load_recently_viewed(&self, id: Uuid) -> Result<RecentlyViewed, RepositoryError> {
        let rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT product_id, viewed_at
            FROM recently_viewed
            WHERE user_id = $1
            ORDER BY viewed_at DESC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(RECENTLY_VIEWED_CAPACITY as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(RecentlyViewed::from_entries(
            rows.into_iter()
                .map(|(product_id, viewed_at)| ViewedEntry {
                    product_id,
                    viewed_at,
                })
                .collect(),
        ))
    }

    async fn save_recently_viewed(
        &self,
        id: Uuid,
        list: &RecentlyViewed,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recently_viewed WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if !list.is_empty() {
            let product_ids: Vec<Uuid> = list.product_ids();
            let viewed_at: Vec<DateTime<Utc>> =
                list.entries().iter().map(|e| e.viewed_at).collect();

            sqlx::query(
                r#"
                INSERT INTO recently_viewed (user_id, product_id, viewed_at)
                SELECT $1, t.product_id, t.viewed_at
                FROM UNNEST($2::uuid[], $3::timestamptz[]) AS t(product_id, viewed_at)
                "#,
            )
            .bind(id)
            .bind(product_ids)
            .bind(viewed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
