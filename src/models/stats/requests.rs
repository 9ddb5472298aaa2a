use serde::Deserialize;
use ts_rs::TS;

use crate::models::assignments::filters::StatusFilter;

/// 全员统计查询参数。status 按桶计数筛选教师名册。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct TeacherStatsQuery {
    #[serde(default)]
    pub status: StatusFilter,
}
