use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Assignment, TeacherStatusRecord};
use super::status::{StatusAudience, StatusDisplay, display_status, format_fecha};
use crate::models::common::pagination::PaginatedResponse;
use crate::models::stats::entities::StatusCounts;
use crate::models::users::responses::UserSummary;

// 管理端任务列表：分页任务 + 嵌入的教师名册
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AdminAssignmentListResponse {
    #[serde(flatten)]
    pub assignments: PaginatedResponse<Assignment>,
    pub teachers: Vec<UserSummary>,
}

// 全局状态计数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AdminStatsResponse {
    #[serde(flatten)]
    pub counts: StatusCounts,
}

// 更新任务响应。对 general 任务做单教师编辑时派生新任务，
// type 标记为 specific_assignment_created。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentResponse {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub assignment: Assignment,
}

impl UpdateAssignmentResponse {
    pub const SPECIFIC_CREATED: &'static str = "specific_assignment_created";

    pub fn updated(assignment: Assignment) -> Self {
        Self {
            kind: None,
            assignment,
        }
    }

    pub fn forked(assignment: Assignment) -> Self {
        Self {
            kind: Some(Self::SPECIFIC_CREATED.to_string()),
            assignment,
        }
    }
}

// 单任务的教师状态列表项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct TeacherStatusItem {
    #[serde(flatten)]
    pub record: TeacherStatusRecord,
    pub display: StatusDisplay,
}

impl TeacherStatusItem {
    pub fn new(record: TeacherStatusRecord, assignment: &Assignment, now_ms: i64) -> Self {
        let display = display_status(
            record.resolved_status(),
            assignment.due_date,
            assignment.close_date,
            now_ms,
            StatusAudience::Admin,
        );
        Self { record, display }
    }
}

// 教师端任务列表项：任务 + 本人的状态行 + 本人视角的展示状态
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct TeacherAssignmentItem {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub teacher_status: TeacherStatusRecord,
    pub display: StatusDisplay,
    pub due_date_display: String,
    pub close_date_display: String,
}

impl TeacherAssignmentItem {
    pub fn new(assignment: Assignment, record: &TeacherStatusRecord, now_ms: i64) -> Self {
        let display = display_status(
            record.resolved_status(),
            assignment.due_date,
            assignment.close_date,
            now_ms,
            StatusAudience::Teacher,
        );
        let due_date_display = format_fecha(assignment.due_date);
        let close_date_display = format_fecha(assignment.close_date);
        Self {
            assignment,
            teacher_status: record.clone(),
            display,
            due_date_display,
            close_date_display,
        }
    }
}
