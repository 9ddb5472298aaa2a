//! 任务-教师状态实体
//!
//! 每行记录一位教师在一个任务上的交付状态。
//! (assignment_id, teacher_id) 全表唯一。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub teacher_id: i64,
    /// true 表示定向任务显式指派的教师
    pub is_assigned: bool,
    pub status: String,
    pub admin_updated: bool,
    pub submission_status: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_teacher_status(self) -> crate::models::assignments::entities::TeacherStatusRecord {
        use crate::models::assignments::entities::TeacherStatusRecord;
        use crate::models::assignments::status::{AssignmentStatus, SubmissionStatus};
        use chrono::{DateTime, Utc};

        TeacherStatusRecord {
            assignment_id: self.assignment_id,
            teacher_id: self.teacher_id,
            is_assigned: self.is_assigned,
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Pending),
            admin_updated: self.admin_updated,
            submission_status: self
                .submission_status
                .and_then(|s| s.parse::<SubmissionStatus>().ok()),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
