use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 工时登记条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/registro.ts")]
pub struct Registro {
    pub id: i64,
    pub user_id: i64,
    /// YYYY-MM-DD
    pub fecha: String,
    pub horas: f64,
    pub descripcion: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
