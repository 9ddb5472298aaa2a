use super::SeaOrmStorage;
use crate::entity::assignment_teachers::{ActiveModel, Column, Entity as AssignmentTeachers};
use crate::errors::{AsignaTrackError, Result};
use crate::models::assignments::{
    entities::TeacherStatusRecord,
    status::{AssignmentStatus, SubmissionStatus},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};

impl SeaOrmStorage {
    /// 单任务的已落库教师状态行
    pub async fn list_statuses_for_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<TeacherStatusRecord>> {
        let rows = AssignmentTeachers::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询教师状态失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_teacher_status()).collect())
    }

    /// 单教师的已落库状态行
    pub async fn list_statuses_for_teacher_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherStatusRecord>> {
        let rows = AssignmentTeachers::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询教师状态失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_teacher_status()).collect())
    }

    /// 幂等写入教师状态。(assignment_id, teacher_id) 全表唯一，
    /// 已有行走更新，没有则插入；general 任务的行在这里首次物化。
    pub async fn upsert_teacher_status_impl(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        status: AssignmentStatus,
        admin_updated: bool,
        submission_status: Option<SubmissionStatus>,
    ) -> Result<TeacherStatusRecord> {
        let now = chrono::Utc::now().timestamp();

        let existing = AssignmentTeachers::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询教师状态失败: {e}")))?;

        let saved = match existing {
            Some(row) => {
                let mut model = row.into_active_model();
                model.status = Set(status.to_string());
                model.admin_updated = Set(admin_updated);
                model.submission_status = Set(submission_status.map(|s| s.to_string()));
                model.updated_at = Set(now);
                model.update(&self.db).await.map_err(|e| {
                    AsignaTrackError::database_operation(format!("更新教师状态失败: {e}"))
                })?
            }
            None => {
                let model = ActiveModel {
                    assignment_id: Set(assignment_id),
                    teacher_id: Set(teacher_id),
                    is_assigned: Set(false),
                    status: Set(status.to_string()),
                    admin_updated: Set(admin_updated),
                    submission_status: Set(submission_status.map(|s| s.to_string())),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    AsignaTrackError::database_operation(format!("写入教师状态失败: {e}"))
                })?
            }
        };

        Ok(saved.into_teacher_status())
    }
}
