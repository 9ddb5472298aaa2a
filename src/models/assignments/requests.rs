use serde::Deserialize;
use ts_rs::TS;

use super::status::AssignmentStatus;
use crate::errors::{AsignaTrackError, Result};

/// 创建任务请求（multipart 表单字段，附件另行处理）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    /// epoch 毫秒
    pub due_date: Option<i64>,
    /// epoch 毫秒，不早于 due_date
    pub close_date: Option<i64>,
    #[serde(default)]
    pub is_general: bool,
    /// 定向任务的目标教师；is_general 为 false 时必填且非空
    #[serde(default)]
    pub assigned_to: Vec<i64>,
}

impl CreateAssignmentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AsignaTrackError::validation("El título es obligatorio"));
        }
        if let (Some(due), Some(close)) = (self.due_date, self.close_date) {
            if close < due {
                return Err(AsignaTrackError::validation(
                    "closeDate anterior a dueDate",
                ));
            }
        }
        if !self.is_general && self.assigned_to.is_empty() {
            return Err(AsignaTrackError::validation(
                "Una tarea específica requiere al menos un maestro asignado",
            ));
        }
        Ok(())
    }
}

/// 更新任务请求。携带 teacher_id 编辑 general 任务时，
/// 不改动原任务，而是为该教师派生一条定向任务。
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub close_date: Option<i64>,
    /// 只对这一位教师生效的编辑
    pub teacher_id: Option<i64>,
}

impl UpdateAssignmentRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(AsignaTrackError::validation("El título es obligatorio"));
            }
        }
        if let (Some(due), Some(close)) = (self.due_date, self.close_date) {
            if close < due {
                return Err(AsignaTrackError::validation(
                    "closeDate anterior a dueDate",
                ));
            }
        }
        Ok(())
    }

    /// 与已存任务的日期合并后再校验。只带一个日期的部分更新
    /// 同样不能让 closeDate 早于 dueDate。
    pub fn validate_against(
        &self,
        current_due: Option<i64>,
        current_close: Option<i64>,
    ) -> Result<()> {
        let due = self.due_date.or(current_due);
        let close = self.close_date.or(current_close);
        if let (Some(due), Some(close)) = (due, close)
            && close < due
        {
            return Err(AsignaTrackError::validation(
                "closeDate anterior a dueDate",
            ));
        }
        Ok(())
    }
}

/// 设置单个教师状态请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateTeacherStatusRequest {
    pub teacher_id: i64,
    pub status: AssignmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title() {
        let request = CreateAssignmentRequest {
            title: "   ".into(),
            is_general: true,
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_rejects_close_before_due() {
        let request = CreateAssignmentRequest {
            title: "Informe mensual".into(),
            due_date: Some(2_000),
            close_date: Some(1_000),
            is_general: true,
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("closeDate"));
    }

    #[test]
    fn test_create_specific_requires_teachers() {
        let request = CreateAssignmentRequest {
            title: "Informe mensual".into(),
            is_general: false,
            assigned_to: vec![],
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = CreateAssignmentRequest {
            title: "Informe mensual".into(),
            is_general: false,
            assigned_to: vec![1, 2],
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_partial_fields_ok() {
        let request = UpdateAssignmentRequest {
            description: Some("Nueva descripción".into()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
        assert!(request.validate_against(Some(2_000), Some(3_000)).is_ok());
    }

    #[test]
    fn test_update_close_only_checked_against_stored_due() {
        let request = UpdateAssignmentRequest {
            close_date: Some(1_000),
            ..Default::default()
        };
        // 请求内部看不出矛盾，必须与已存的 dueDate 合并后才能发现
        assert!(request.validate().is_ok());
        assert!(request.validate_against(Some(2_000), Some(3_000)).is_err());
        assert!(request.validate_against(Some(500), Some(800)).is_ok());
    }

    #[test]
    fn test_update_due_only_checked_against_stored_close() {
        let request = UpdateAssignmentRequest {
            due_date: Some(3_000),
            ..Default::default()
        };
        assert!(request.validate_against(Some(1_000), Some(2_000)).is_err());
        assert!(request.validate_against(Some(1_000), Some(4_000)).is_ok());
    }

    #[test]
    fn test_update_dates_without_stored_counterpart_ok() {
        let request = UpdateAssignmentRequest {
            close_date: Some(1_000),
            ..Default::default()
        };
        assert!(request.validate_against(None, None).is_ok());
    }
}
