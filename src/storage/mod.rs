use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 分页列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 列出所有活跃教师（嵌入名册用，不分页）
    async fn list_active_teachers(&self) -> Result<Vec<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 工时登记方法
    // 列出某用户的登记
    async fn list_registros_for_user(&self, user_id: i64) -> Result<Vec<Registro>>;

    /// 任务管理方法
    // 创建任务；定向任务同时物化 assignment_teachers 行
    async fn create_assignment(
        &self,
        request: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment>;
    // 通过ID获取任务（含附件与目标教师）
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 更新任务字段
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 设置任务级状态
    async fn set_assignment_status(&self, id: i64, status: AssignmentStatus) -> Result<bool>;
    // 管理端分页任务列表
    async fn list_assignments_admin(
        &self,
        filter: FilterState,
    ) -> Result<PaginatedResponse<Assignment>>;
    // 某教师可见的全部任务（general + 定向），不分页，排序与搜索在库内完成
    async fn list_teacher_assignments(
        &self,
        teacher_id: i64,
        filter: &FilterState,
    ) -> Result<Vec<Assignment>>;
    // 按任务级状态统计全局计数
    async fn count_assignments_by_status(&self) -> Result<StatusCounts>;
    // 追加附件记录
    async fn add_attachment(
        &self,
        assignment_id: i64,
        file_name: &str,
        file_url: &str,
        mime_type: &str,
        file_size: i64,
    ) -> Result<Attachment>;

    /// 教师状态方法
    // 单任务的已落库教师状态行
    async fn list_statuses_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<TeacherStatusRecord>>;
    // 单教师的已落库状态行
    async fn list_statuses_for_teacher(&self, teacher_id: i64)
    -> Result<Vec<TeacherStatusRecord>>;
    // 幂等写入教师状态，(assignment_id, teacher_id) 唯一
    async fn upsert_teacher_status(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        status: AssignmentStatus,
        admin_updated: bool,
        submission_status: Option<SubmissionStatus>,
    ) -> Result<TeacherStatusRecord>;

    /// 统计快照方法
    // 读取缓存快照
    async fn get_teacher_stats(&self, teacher_id: i64) -> Result<Option<TeacherStatsSnapshot>>;
    // 写入（覆盖）快照
    async fn put_teacher_stats(&self, snapshot: &TeacherStatsSnapshot) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
