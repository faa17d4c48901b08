//! tourbook - 旅游行程预约后端
//!
//! - Domain: tour/, user/
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, memory, adapters

use std::sync::Arc;

use tourbook::config::{load_config, print_config, LogConfig};
use tourbook::infrastructure::adapters::FileImageStorage;
use tourbook::infrastructure::http::{AppState, HttpServer, PagingDefaults, ServerConfig};
use tourbook::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteTourRepository, SqliteUserRepository,
};
use tracing_subscriber::EnvFilter;

/// 初始化日志，`RUST_LOG` 优先于配置文件
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},tourbook={},tower_http=debug", log.level, log.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("tourbook {}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let tour_repo = Arc::new(SqliteTourRepository::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepository::new(pool));

    // 图片存储
    let max_upload_size = usize::try_from(config.storage.max_upload_size)?;
    let image_storage = Arc::new(
        FileImageStorage::new(
            &config.storage.image_dir,
            config.storage.image_url_prefix.clone(),
            max_upload_size,
        )
        .await?,
    );

    let paging = PagingDefaults {
        list_size: config.paging.list_default_size,
        search_size: config.paging.search_default_size,
        max_size: config.paging.max_size,
    };
    let state = AppState::new(tour_repo, user_repo, image_storage, paging);

    // 一次请求可携带多张图片，请求体上限放宽到单图上限的 8 倍
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        image_dir: config.storage.image_dir.clone(),
        image_url_prefix: config.storage.image_url_prefix.clone(),
        body_limit: max_upload_size.saturating_mul(8),
    };
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
