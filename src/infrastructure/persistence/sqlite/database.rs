//! SQLite Database - 数据库连接和迁移

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 等待写锁的最长时间
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库连接 URL
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/tourbook.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    // 每个连接都启用 WAL，遇到锁时等待而不是立即失败
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(
        busy_timeout_ms = BUSY_TIMEOUT.as_millis() as u64,
        "SQLite pool created with WAL mode"
    );

    Ok(pool)
}

/// 建表语句，按依赖顺序执行
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        nickname TEXT NOT NULL,
        profile_img TEXT,
        auth_type TEXT NOT NULL DEFAULT 'LOCAL',
        introduction TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_categories (
        user_id INTEGER NOT NULL,
        category TEXT NOT NULL,
        PRIMARY KEY (user_id, category),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS follows (
        follower_id INTEGER NOT NULL,
        followee_id INTEGER NOT NULL,
        PRIMARY KEY (follower_id, followee_id),
        FOREIGN KEY (follower_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (followee_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_tokens (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL,
        expires_at TEXT,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tours (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        region TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        min_member INTEGER NOT NULL,
        max_member INTEGER NOT NULL,
        price INTEGER NOT NULL DEFAULT 0,
        link TEXT,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_categories (
        tour_id INTEGER NOT NULL,
        sequence INTEGER NOT NULL,
        category TEXT NOT NULL,
        PRIMARY KEY (tour_id, sequence),
        UNIQUE (tour_id, category),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_courses (
        tour_id INTEGER NOT NULL,
        sequence INTEGER NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        image_url TEXT,
        PRIMARY KEY (tour_id, sequence),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_images (
        tour_id INTEGER NOT NULL,
        sequence INTEGER NOT NULL,
        url TEXT NOT NULL,
        PRIMARY KEY (tour_id, sequence),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_reservations (
        tour_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        PRIMARY KEY (tour_id, user_id),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_wishes (
        tour_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        PRIMARY KEY (tour_id, user_id),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        tour_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        grade REAL NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_tours_created_at
    ON tours(created_at)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_tours_region
    ON tours(region)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_reviews_user_id
    ON reviews(user_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_auth_tokens_user_id
    ON auth_tokens(user_id)
    "#,
];

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(statements = MIGRATIONS.len(), "Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();
    }

    #[test]
    fn test_database_url_from_path() {
        let config = DatabaseConfig::new("data/test.db");
        assert_eq!(config.database_url, "sqlite:data/test.db?mode=rwc");
    }
}
