//! SQLite User Repository
//!
//! 用户、令牌、关注与评价数据由账户系统写入，这里只负责读取

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, UserRepositoryPort};
use crate::domain::user::{AuthType, Review, User, UserId};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 写入用户（账户系统同步、测试数据装配）
    pub async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, nickname, profile_img, auth_type, introduction, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.profile_img)
        .bind(user.auth_type.as_str())
        .bind(&user.introduction)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(format!("user {}", user.id))
            }
            other => db_error(other),
        })?;
        Ok(())
    }

    /// 登记访问令牌
    pub async fn issue_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR REPLACE INTO auth_tokens (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at.map(|t| t.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    nickname: String,
    profile_img: Option<String>,
    auth_type: String,
    introduction: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let auth_type = AuthType::from_str(&row.auth_type).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown auth type: {}", row.auth_type))
        })?;

        Ok(User {
            id: row.id,
            email: row.email,
            nickname: row.nickname,
            profile_img: row.profile_img,
            auth_type,
            introduction: row.introduction,
        })
    }
}

#[derive(FromRow)]
struct ReviewRow {
    id: i64,
    tour_id: i64,
    tour_title: String,
    content: String,
    grade: f64,
    created_at: String,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Review {
            id: row.id,
            tour_id: row.tour_id,
            tour_title: row.tour_title,
            content: row.content,
            grade: row.grade as f32,
            created_at,
        })
    }
}

const USER_COLUMNS: &str = "u.id, u.email, u.nickname, u.profile_img, u.auth_type, u.introduction";

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users u WHERE u.id = ?", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = ? AND (t.expires_at IS NULL OR t.expires_at > ?)
            "#,
            USER_COLUMNS
        ))
        .bind(token)
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_categories(&self, id: UserId) -> Result<Vec<String>, RepositoryError> {
        sqlx::query_scalar("SELECT category FROM user_categories WHERE user_id = ? ORDER BY category")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn count_following(&self, id: UserId) -> Result<u32, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u32)
    }

    async fn find_reviews(&self, id: UserId) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.tour_id, COALESCE(t.title, '') AS tour_title,
                   r.content, r.grade, r.created_at
            FROM reviews r
            LEFT JOIN tours t ON t.id = r.tour_id
            WHERE r.user_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Review::try_from).collect()
    }
}
