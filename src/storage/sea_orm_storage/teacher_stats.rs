use super::SeaOrmStorage;
use crate::entity::teacher_stats::{ActiveModel, Entity as TeacherStatsCache};
use crate::errors::{AsignaTrackError, Result};
use crate::models::stats::entities::TeacherStatsSnapshot;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

impl SeaOrmStorage {
    /// 读取教师统计快照
    pub async fn get_teacher_stats_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Option<TeacherStatsSnapshot>> {
        let result = TeacherStatsCache::find_by_id(teacher_id)
            .one(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询统计快照失败: {e}")))?;

        Ok(result.map(|m| m.into_snapshot()))
    }

    /// 写入（覆盖）教师统计快照
    pub async fn put_teacher_stats_impl(&self, snapshot: &TeacherStatsSnapshot) -> Result<()> {
        let existing = TeacherStatsCache::find_by_id(snapshot.teacher_id)
            .one(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询统计快照失败: {e}")))?;

        let refreshed_at = snapshot.refreshed_at.timestamp();

        match existing {
            Some(row) => {
                let mut model = row.into_active_model();
                model.total = Set(snapshot.counts.total);
                model.entregadas = Set(snapshot.counts.entregadas);
                model.retraso = Set(snapshot.counts.retraso);
                model.pendientes = Set(snapshot.counts.pendientes);
                model.no_entregadas = Set(snapshot.counts.no_entregadas);
                model.score_percent = Set(snapshot.score_percent);
                model.refreshed_at = Set(refreshed_at);
                model.update(&self.db).await.map_err(|e| {
                    AsignaTrackError::database_operation(format!("更新统计快照失败: {e}"))
                })?;
            }
            None => {
                let model = ActiveModel {
                    teacher_id: Set(snapshot.teacher_id),
                    total: Set(snapshot.counts.total),
                    entregadas: Set(snapshot.counts.entregadas),
                    retraso: Set(snapshot.counts.retraso),
                    pendientes: Set(snapshot.counts.pendientes),
                    no_entregadas: Set(snapshot.counts.no_entregadas),
                    score_percent: Set(snapshot.score_percent),
                    refreshed_at: Set(refreshed_at),
                };
                model.insert(&self.db).await.map_err(|e| {
                    AsignaTrackError::database_operation(format!("写入统计快照失败: {e}"))
                })?;
            }
        }

        Ok(())
    }
}
