use super::SeaOrmStorage;
use crate::entity::registros::{Column, Entity as Registros};
use crate::errors::{AsignaTrackError, Result};
use crate::models::registros::entities::Registro;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 列出某用户的工时登记，按日期倒序
    pub async fn list_registros_for_user_impl(&self, user_id: i64) -> Result<Vec<Registro>> {
        let result = Registros::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::Fecha)
            .all(&self.db)
            .await
            .map_err(|e| AsignaTrackError::database_operation(format!("查询登记失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_registro()).collect())
    }
}
