//! 业务模型定义
//!
//! 按领域拆分：用户、认证、任务、统计、工时登记。
//! common 模块提供统一响应与分页结构。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod registros;
pub mod stats;
pub mod users;

pub use common::*;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码
///
/// 0 表示成功；1000 段为通用错误；2000 段为用户/认证；
/// 3000 段为任务；4000 段为文件；5000 段为统计。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    RateLimitExceeded = 1004,
    InternalServerError = 1999,

    // 用户 / 认证
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserEmailAlreadyExists = 2002,
    UserInactive = 2003,

    // 任务
    AssignmentNotFound = 3000,
    AssignmentCreationFailed = 3001,
    AssignmentUpdateFailed = 3002,
    AssignmentDatesInvalid = 3003,
    TeacherNotTargeted = 3004,

    // 文件
    FileUploadFailed = 4000,
    FileTypeNotAllowed = 4001,
    FileSizeExceeded = 4002,

    // 统计
    StatsRefreshFailed = 5000,
}

/// 应用启动时间，用于健康检查与运行时长统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}
