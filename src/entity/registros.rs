//! 工时登记实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "registros")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// 登记日期，YYYY-MM-DD
    pub fecha: String,
    pub horas: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_registro(self) -> crate::models::registros::entities::Registro {
        use crate::models::registros::entities::Registro;
        use chrono::{DateTime, Utc};

        Registro {
            id: self.id,
            user_id: self.user_id,
            fecha: self.fecha,
            horas: self.horas,
            descripcion: self.descripcion,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
