use crate::{
    DbError, Result as DbErrorResult, UserDocument, UserFilter, UserPatch, UserStore,
};

use idm_core::Role;

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, username, email, full_name, role, is_active, \
                              password_hash, created_at, updated_at FROM users";

/// `UserStore` backed by a SQLite table with `UNIQUE(username)` and `UNIQUE(email)`.
///
/// Timestamps are stored as Unix milliseconds.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append ` WHERE <column> = ?` for the filter (nothing for `All`).
    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
        let (column, value) = match filter {
            UserFilter::All => return,
            UserFilter::Id(id) => ("id", id.to_string()),
            UserFilter::Username(username) => ("username", username.clone()),
            UserFilter::Email(email) => ("email", email.clone()),
            UserFilter::Role(role) => ("role", role.as_str().to_string()),
        };

        builder.push(format!(" WHERE {column} = "));
        builder.push_bind(value);
    }

    /// Restrict a write to the first matching row, like a single-document update.
    fn push_single_target(builder: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
        builder.push(" WHERE id IN (SELECT id FROM users");
        Self::push_filter(builder, filter);
        builder.push(" ORDER BY created_at, id LIMIT 1)");
    }

    fn row_to_document(row: &SqliteRow) -> DbErrorResult<UserDocument> {
        let id: String = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        let created_at: i64 = row.try_get("created_at")?;
        let updated_at: i64 = row.try_get("updated_at")?;

        Ok(UserDocument {
            id: Uuid::parse_str(&id)
                .map_err(|e| DbError::corrupt(format!("Invalid UUID in users.id: {}", e)))?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            role: Role::from_str(&role)
                .map_err(|e| DbError::corrupt(format!("Invalid role in users.role: {}", e)))?,
            is_active: row.try_get("is_active")?,
            password_hash: row.try_get("password_hash")?,
            created_at: Self::from_millis(created_at, "created_at")?,
            updated_at: Self::from_millis(updated_at, "updated_at")?,
        })
    }

    #[track_caller]
    fn from_millis(millis: i64, column: &str) -> DbErrorResult<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| DbError::corrupt(format!("Invalid timestamp in users.{}", column)))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_one(&self, filter: &UserFilter) -> DbErrorResult<Option<UserDocument>> {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at, id LIMIT 1");

        let row = builder.build().fetch_optional(&self.pool).await?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn find(
        &self,
        filter: &UserFilter,
        skip: u32,
        limit: u32,
    ) -> DbErrorResult<Vec<UserDocument>> {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at, id LIMIT ");
        builder.push_bind(i64::from(limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(skip));

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn insert_one(&self, doc: &UserDocument) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO users (
                                   id, username, email, full_name, role, is_active,
                                   password_hash, created_at, updated_at
                                   ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(doc.id.to_string())
        .bind(&doc.username)
        .bind(&doc.email)
        .bind(&doc.full_name)
        .bind(doc.role.as_str())
        .bind(doc.is_active)
        .bind(&doc.password_hash)
        .bind(doc.created_at.timestamp_millis())
        .bind(doc.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!("Inserted user {}", doc.id);

        Ok(())
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> DbErrorResult<u64> {
        let mut builder = QueryBuilder::new("UPDATE users SET updated_at = ");
        builder.push_bind(patch.updated_at.timestamp_millis());

        if let Some(username) = &patch.username {
            builder.push(", username = ");
            builder.push_bind(username.clone());
        }
        if let Some(email) = &patch.email {
            builder.push(", email = ");
            builder.push_bind(email.clone());
        }
        if let Some(full_name) = &patch.full_name {
            builder.push(", full_name = ");
            builder.push_bind(full_name.clone());
        }
        if let Some(role) = patch.role {
            builder.push(", role = ");
            builder.push_bind(role.as_str());
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ");
            builder.push_bind(is_active);
        }
        if let Some(password_hash) = &patch.password_hash {
            builder.push(", password_hash = ");
            builder.push_bind(password_hash.clone());
        }

        Self::push_single_target(&mut builder, filter);

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, filter: &UserFilter) -> DbErrorResult<u64> {
        let mut builder = QueryBuilder::new("DELETE FROM users");
        Self::push_single_target(&mut builder, filter);

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}
