use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{User, UserRole, UserStatus};
use crate::models::common::pagination::PaginatedResponse;

pub type UserListResponse = PaginatedResponse<UserSummary>;

// 用户摘要，用于名册与嵌入式教师列表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserSummary {
    pub id: i64,
    pub nombre: String,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub email: String,
    pub numero_control: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.nombre,
            apellido_paterno: user.apellido_paterno,
            apellido_materno: user.apellido_materno,
            email: user.email,
            numero_control: user.numero_control,
            role: user.role,
            status: user.status,
        }
    }
}
