use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::TeacherStatsSnapshot;
use crate::models::users::responses::UserSummary;

// 单教师统计响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct TeacherStatsResponse {
    pub teacher: UserSummary,
    #[serde(flatten)]
    pub stats: TeacherStatsSnapshot,
}

// 全员统计响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct FleetStatsResponse {
    pub teachers: Vec<TeacherStatsResponse>,
    pub refreshed_at: chrono::DateTime<chrono::Utc>,
}
