use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignment_teachers::{
    Column as StatusColumn, Entity as AssignmentTeachers,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::attachments::{
    ActiveModel as AttachmentActiveModel, Column as AttachmentColumn, Entity as Attachments,
};
use crate::errors::{AsignaTrackError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, Attachment},
        filters::{FilterState, SortField, parse_sort},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        status::AssignmentStatus,
    },
    common::pagination::PaginatedResponse,
    stats::entities::StatusCounts,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建任务。定向任务在同一事务语义下物化 assignment_teachers 行，
    /// 保证创建后立刻查询 teachers-status 能拿到全部目标教师。
    pub async fn create_assignment_impl(
        &self,
        request: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(request.title),
            description: Set(request.description),
            due_date: Set(request.due_date),
            close_date: Set(request.close_date),
            is_general: Set(request.is_general),
            status: Set(AssignmentStatus::Pending.to_string()),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("创建任务失败: {e}")))?;

        // 定向任务：为每位目标教师落一行 pending
        if !request.is_general && !request.assigned_to.is_empty() {
            let rows: Vec<crate::entity::assignment_teachers::ActiveModel> = request
                .assigned_to
                .iter()
                .map(|teacher_id| crate::entity::assignment_teachers::ActiveModel {
                    assignment_id: Set(inserted.id),
                    teacher_id: Set(*teacher_id),
                    is_assigned: Set(true),
                    status: Set(AssignmentStatus::Pending.to_string()),
                    admin_updated: Set(false),
                    submission_status: Set(None),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .collect();

            AssignmentTeachers::insert_many(rows)
                .exec(&self.db)
                .await
                .map_err(|e| {
                    AsignaTrackError::database_operation(format!("物化目标教师失败: {e}"))
                })?;
        }

        self.hydrate_assignment(inserted).await
    }

    /// 通过 ID 获取任务（含附件与目标教师）
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(self.hydrate_assignment(model).await?)),
            None => Ok(None),
        }
    }

    /// 更新任务字段
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let existing = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date));
        }
        if let Some(close_date) = update.close_date {
            model.close_date = Set(Some(close_date));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("更新任务失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 设置任务级状态
    pub async fn set_assignment_status_impl(
        &self,
        id: i64,
        status: AssignmentStatus,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(status.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("更新任务状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 管理端分页任务列表
    pub async fn list_assignments_admin_impl(
        &self,
        filter: FilterState,
    ) -> Result<PaginatedResponse<Assignment>> {
        let page = filter.page.max(1) as u64;
        let limit = filter.limit.clamp(1, 100) as u64;

        let mut select = Assignments::find();

        // 状态筛选委托给任务级状态列；total/all 不加条件
        if let Some(status) = filter.status.as_status() {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = filter.search {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        // 教师筛选：general 任务 + 指派给该教师的定向任务
        if let Some(teacher_id) = filter.teacher_id {
            let assigned_ids = self.assigned_assignment_ids(teacher_id).await?;
            select = select.filter(
                Condition::any()
                    .add(Column::IsGeneral.eq(true))
                    .add(Column::Id.is_in(assigned_ids)),
            );
        }

        select = apply_sort(select, &filter.sort);

        let paginator = select.paginate(&self.db, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务列表失败: {e}")))?;

        let items = self.hydrate_assignments(models).await?;

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                limit: limit as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 某教师可见的全部任务（general + 定向），库内完成搜索与排序。
    /// 状态筛选按教师本人的归一状态进行，留给服务层处理。
    pub async fn list_teacher_assignments_impl(
        &self,
        teacher_id: i64,
        filter: &FilterState,
    ) -> Result<Vec<Assignment>> {
        let assigned_ids = self.assigned_assignment_ids(teacher_id).await?;

        let mut select = Assignments::find().filter(
            Condition::any()
                .add(Column::IsGeneral.eq(true))
                .add(Column::Id.is_in(assigned_ids)),
        );

        if let Some(ref search) = filter.search {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        select = apply_sort(select, &filter.sort);

        let models = select
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询任务列表失败: {e}")))?;

        self.hydrate_assignments(models).await
    }

    /// 按任务级状态统计全局计数
    pub async fn count_assignments_by_status_impl(&self) -> Result<StatusCounts> {
        let rows: Vec<(String, i64)> = Assignments::find()
            .select_only()
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("统计任务状态失败: {e}")))?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            counts.total += count;
            match status.parse::<AssignmentStatus>() {
                Ok(AssignmentStatus::Completed) => counts.entregadas += count,
                Ok(AssignmentStatus::CompletedLate) => counts.retraso += count,
                Ok(AssignmentStatus::Pending) => counts.pendientes += count,
                Ok(AssignmentStatus::NotDelivered) => counts.no_entregadas += count,
                Err(_) => {
                    tracing::warn!("Unknown assignment status in database: {}", status);
                    counts.total -= count;
                }
            }
        }
        Ok(counts)
    }

    /// 追加附件记录
    pub async fn add_attachment_impl(
        &self,
        assignment_id: i64,
        file_name: &str,
        file_url: &str,
        mime_type: &str,
        file_size: i64,
    ) -> Result<Attachment> {
        let model = AttachmentActiveModel {
            assignment_id: Set(assignment_id),
            file_name: Set(file_name.to_string()),
            file_url: Set(file_url.to_string()),
            mime_type: Set(mime_type.to_string()),
            file_size: Set(file_size),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("保存附件失败: {e}")))?;

        Ok(inserted.into_attachment())
    }

    /// 指派给某教师的任务 ID 集合
    async fn assigned_assignment_ids(&self, teacher_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = AssignmentTeachers::find()
            .select_only()
            .column(StatusColumn::AssignmentId)
            .filter(StatusColumn::TeacherId.eq(teacher_id))
            .filter(StatusColumn::IsAssigned.eq(true))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询指派关系失败: {e}")))?;
        Ok(ids)
    }

    /// 批量装配附件与目标教师
    async fn hydrate_assignments(&self, models: Vec<Model>) -> Result<Vec<Assignment>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let attachment_rows = Attachments::find()
            .filter(AttachmentColumn::AssignmentId.is_in(ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询附件失败: {e}")))?;

        let mut attachments_by_id: HashMap<i64, Vec<Attachment>> = HashMap::new();
        for row in attachment_rows {
            attachments_by_id
                .entry(row.assignment_id)
                .or_default()
                .push(row.into_attachment());
        }

        let assigned_rows = AssignmentTeachers::find()
            .filter(StatusColumn::AssignmentId.is_in(ids))
            .filter(StatusColumn::IsAssigned.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询指派关系失败: {e}")))?;

        let mut assigned_by_id: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in assigned_rows {
            assigned_by_id
                .entry(row.assignment_id)
                .or_default()
                .push(row.teacher_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let mut assignment = model.into_assignment();
                assignment.attachments = attachments_by_id
                    .remove(&assignment.id)
                    .unwrap_or_default();
                assignment.assigned_to =
                    assigned_by_id.remove(&assignment.id).unwrap_or_default();
                assignment
            })
            .collect())
    }

    async fn hydrate_assignment(&self, model: Model) -> Result<Assignment> {
        let mut hydrated = self.hydrate_assignments(vec![model]).await?;
        hydrated
            .pop()
            .ok_or_else(|| AsignaTrackError::data_integrity("任务装配结果为空"))
    }
}

fn apply_sort(
    select: sea_orm::Select<Assignments>,
    sort: &str,
) -> sea_orm::Select<Assignments> {
    let (field, desc) = parse_sort(sort);
    let column = match field {
        SortField::CreatedAt => Column::CreatedAt,
        SortField::DueDate => Column::DueDate,
        SortField::CloseDate => Column::CloseDate,
        SortField::Title => Column::Title,
    };
    if desc {
        select.order_by_desc(column)
    } else {
        select.order_by_asc(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn storage_in_memory() -> SeaOrmStorage {
        // 内存库只能走单连接，连接池换连接会丢库
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options)
            .await
            .expect("conexión SQLite en memoria");
        Migrator::up(&db, None).await.expect("migraciones");
        SeaOrmStorage { db }
    }

    async fn seed_user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                email: email.into(),
                password: "$argon2id$stub".into(),
                role,
                nombre: "Docente".into(),
                apellido_paterno: None,
                apellido_materno: None,
                numero_control: None,
            })
            .await
            .expect("crear usuario")
    }

    #[tokio::test]
    async fn test_specific_assignment_round_trips_pending_rows() {
        let storage = storage_in_memory().await;
        let admin = seed_user(&storage, "admin@escuela.mx", UserRole::Admin).await;
        let t1 = seed_user(&storage, "ana@escuela.mx", UserRole::Teacher).await;
        let t2 = seed_user(&storage, "luis@escuela.mx", UserRole::Teacher).await;

        let created = storage
            .create_assignment_impl(
                CreateAssignmentRequest {
                    title: "Informe mensual".into(),
                    is_general: false,
                    assigned_to: vec![t1.id, t2.id],
                    ..Default::default()
                },
                admin.id,
            )
            .await
            .expect("crear tarea");

        // 创建即物化：装配后的任务带回完整名册
        let mut roster = created.assigned_to.clone();
        roster.sort();
        assert_eq!(roster, vec![t1.id.min(t2.id), t1.id.max(t2.id)]);

        // 状态行恰好是 {t1, t2}，全部默认 pending
        let mut rows = storage
            .list_statuses_for_assignment_impl(created.id)
            .await
            .expect("listar estados");
        rows.sort_by_key(|r| r.teacher_id);

        let ids: Vec<i64> = rows.iter().map(|r| r.teacher_id).collect();
        assert_eq!(ids, roster);
        for row in &rows {
            assert_eq!(row.status, AssignmentStatus::Pending);
            assert!(row.is_assigned);
            assert!(!row.admin_updated);
            assert!(row.submission_status.is_none());
        }
    }

    #[tokio::test]
    async fn test_general_assignment_creates_no_status_rows() {
        let storage = storage_in_memory().await;
        let admin = seed_user(&storage, "admin@escuela.mx", UserRole::Admin).await;
        seed_user(&storage, "ana@escuela.mx", UserRole::Teacher).await;

        let created = storage
            .create_assignment_impl(
                CreateAssignmentRequest {
                    title: "Circular general".into(),
                    is_general: true,
                    ..Default::default()
                },
                admin.id,
            )
            .await
            .expect("crear tarea");

        // general 任务按需物化，创建时不落状态行
        let rows = storage
            .list_statuses_for_assignment_impl(created.id)
            .await
            .expect("listar estados");
        assert!(rows.is_empty());
        assert!(created.assigned_to.is_empty());
    }

    #[tokio::test]
    async fn test_partial_date_update_persists_merged_fields() {
        let storage = storage_in_memory().await;
        let admin = seed_user(&storage, "admin@escuela.mx", UserRole::Admin).await;

        let created = storage
            .create_assignment_impl(
                CreateAssignmentRequest {
                    title: "Informe mensual".into(),
                    due_date: Some(2_000),
                    close_date: Some(3_000),
                    is_general: true,
                    ..Default::default()
                },
                admin.id,
            )
            .await
            .expect("crear tarea");

        let updated = storage
            .update_assignment_impl(
                created.id,
                UpdateAssignmentRequest {
                    close_date: Some(5_000),
                    ..Default::default()
                },
            )
            .await
            .expect("actualizar tarea")
            .expect("tarea existente");

        assert_eq!(updated.due_date, Some(2_000));
        assert_eq!(updated.close_date, Some(5_000));
        assert_eq!(updated.title, "Informe mensual");
    }
}
