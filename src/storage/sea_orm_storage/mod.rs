//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignment_teachers;
mod assignments;
mod registros;
mod teacher_stats;
mod users;

use crate::config::AppConfig;
use crate::errors::{AsignaTrackError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AsignaTrackError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AsignaTrackError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AsignaTrackError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AsignaTrackError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, Attachment, TeacherStatusRecord},
        filters::FilterState,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        status::{AssignmentStatus, SubmissionStatus},
    },
    common::pagination::PaginatedResponse,
    registros::entities::Registro,
    stats::entities::{StatusCounts, TeacherStatsSnapshot},
    users::{
        entities::User,
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_active_teachers(&self) -> Result<Vec<User>> {
        self.list_active_teachers_impl().await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 工时登记模块
    async fn list_registros_for_user(&self, user_id: i64) -> Result<Vec<Registro>> {
        self.list_registros_for_user_impl(user_id).await
    }

    // 任务模块
    async fn create_assignment(
        &self,
        request: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(request, created_by).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn set_assignment_status(&self, id: i64, status: AssignmentStatus) -> Result<bool> {
        self.set_assignment_status_impl(id, status).await
    }

    async fn list_assignments_admin(
        &self,
        filter: FilterState,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_admin_impl(filter).await
    }

    async fn list_teacher_assignments(
        &self,
        teacher_id: i64,
        filter: &FilterState,
    ) -> Result<Vec<Assignment>> {
        self.list_teacher_assignments_impl(teacher_id, filter).await
    }

    async fn count_assignments_by_status(&self) -> Result<StatusCounts> {
        self.count_assignments_by_status_impl().await
    }

    async fn add_attachment(
        &self,
        assignment_id: i64,
        file_name: &str,
        file_url: &str,
        mime_type: &str,
        file_size: i64,
    ) -> Result<Attachment> {
        self.add_attachment_impl(assignment_id, file_name, file_url, mime_type, file_size)
            .await
    }

    // 教师状态模块
    async fn list_statuses_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<TeacherStatusRecord>> {
        self.list_statuses_for_assignment_impl(assignment_id).await
    }

    async fn list_statuses_for_teacher(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherStatusRecord>> {
        self.list_statuses_for_teacher_impl(teacher_id).await
    }

    async fn upsert_teacher_status(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        status: AssignmentStatus,
        admin_updated: bool,
        submission_status: Option<SubmissionStatus>,
    ) -> Result<TeacherStatusRecord> {
        self.upsert_teacher_status_impl(
            assignment_id,
            teacher_id,
            status,
            admin_updated,
            submission_status,
        )
        .await
    }

    // 统计快照模块
    async fn get_teacher_stats(&self, teacher_id: i64) -> Result<Option<TeacherStatsSnapshot>> {
        self.get_teacher_stats_impl(teacher_id).await
    }

    async fn put_teacher_stats(&self, snapshot: &TeacherStatsSnapshot) -> Result<()> {
        self.put_teacher_stats_impl(snapshot).await
    }
}
