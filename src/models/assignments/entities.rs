use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::status::{AssignmentStatus, StatusSource, SubmissionStatus};

// 任务实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 截止时间，epoch 毫秒
    pub due_date: Option<i64>,
    /// 关闭时间，epoch 毫秒，不早于 due_date
    pub close_date: Option<i64>,
    /// true 表示面向全体教师
    pub is_general: bool,
    pub status: AssignmentStatus,
    pub created_by: i64,
    pub attachments: Vec<Attachment>,
    /// 定向任务的目标教师；general 任务为空
    pub assigned_to: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 附件描述
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Attachment {
    pub id: i64,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub assignment_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub file_size: i64,
}

// 每位教师在一个任务上的交付记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct TeacherStatusRecord {
    pub assignment_id: i64,
    pub teacher_id: i64,
    pub is_assigned: bool,
    pub status: AssignmentStatus,
    /// true 表示管理员显式覆盖过，此时规范状态只看 submission_status
    pub admin_updated: bool,
    pub submission_status: Option<SubmissionStatus>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TeacherStatusRecord {
    /// 未落库教师的默认记录：pending，无覆盖
    pub fn default_pending(assignment_id: i64, teacher_id: i64, is_assigned: bool) -> Self {
        Self {
            assignment_id,
            teacher_id,
            is_assigned,
            status: AssignmentStatus::Pending,
            admin_updated: false,
            submission_status: None,
            updated_at: chrono::Utc::now(),
        }
    }

    /// 归一入口：覆盖记录优先，否则取存储的规范状态
    pub fn source(&self) -> StatusSource {
        if self.admin_updated {
            StatusSource::Override {
                submission_status: self.submission_status,
            }
        } else {
            StatusSource::Canonical(self.status)
        }
    }

    pub fn resolved_status(&self) -> AssignmentStatus {
        self.source().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_source_prefers_override() {
        let mut record = TeacherStatusRecord::default_pending(1, 7, true);
        record.status = AssignmentStatus::NotDelivered;
        record.admin_updated = true;
        record.submission_status = Some(SubmissionStatus::OnTime);
        // 覆盖生效时存储的 status 字段不参与归一
        assert_eq!(record.resolved_status(), AssignmentStatus::Completed);
    }

    #[test]
    fn test_record_source_falls_back_to_canonical() {
        let mut record = TeacherStatusRecord::default_pending(1, 7, false);
        record.status = AssignmentStatus::CompletedLate;
        assert_eq!(record.resolved_status(), AssignmentStatus::CompletedLate);
    }

    #[test]
    fn test_default_pending_record() {
        let record = TeacherStatusRecord::default_pending(3, 9, true);
        assert_eq!(record.assignment_id, 3);
        assert_eq!(record.teacher_id, 9);
        assert!(record.is_assigned);
        assert_eq!(record.resolved_status(), AssignmentStatus::Pending);
    }
}
