//! 教师统计快照实体
//!
//! 每位教师一行，由聚合服务刷新。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub teacher_id: i64,
    pub total: i64,
    pub entregadas: i64,
    pub retraso: i64,
    pub pendientes: i64,
    pub no_entregadas: i64,
    pub score_percent: i64,
    pub refreshed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_snapshot(self) -> crate::models::stats::entities::TeacherStatsSnapshot {
        use crate::models::stats::entities::{StatusCounts, TeacherStatsSnapshot};
        use chrono::{DateTime, Utc};

        TeacherStatsSnapshot {
            teacher_id: self.teacher_id,
            counts: StatusCounts {
                total: self.total,
                entregadas: self.entregadas,
                retraso: self.retraso,
                pendientes: self.pendientes,
                no_entregadas: self.no_entregadas,
            },
            score_percent: self.score_percent,
            refreshed_at: DateTime::<Utc>::from_timestamp(self.refreshed_at, 0).unwrap_or_default(),
        }
    }
}
