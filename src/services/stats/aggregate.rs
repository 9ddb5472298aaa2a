//! 教师统计的扇出聚合
//!
//! 对教师可见的每个任务并发查询状态行，失败的子查询跳过，
//! 其余照常折叠成桶计数。

use std::sync::Arc;

use futures_util::future::join_all;

use crate::models::assignments::{entities::TeacherStatusRecord, filters::FilterState};
use crate::models::stats::entities::{StatusCounts, fold_teacher_counts};
use crate::storage::Storage;

/// 聚合一位教师的桶计数。
///
/// 任务列表本身取不到时返回全零（调用方按兜底快照处理），
/// 单个状态子查询失败只丢掉该任务。
pub(crate) async fn aggregate_counts_for_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> StatusCounts {
    let filter = FilterState::default();
    let assignments = match storage.list_teacher_assignments(teacher_id, &filter).await {
        Ok(assignments) => assignments,
        Err(e) => {
            tracing::warn!(
                "Failed to list assignments for teacher {}: {}",
                teacher_id,
                e
            );
            return StatusCounts::default();
        }
    };

    let futures = assignments
        .iter()
        .map(|a| storage.list_statuses_for_assignment(a.id));
    let mut batches = join_all(futures).await;

    // 没有落库行的任务对该教师仍算 pending
    for (assignment, batch) in assignments.iter().zip(batches.iter_mut()) {
        if let Ok(records) = batch
            && !records.iter().any(|r| r.teacher_id == teacher_id)
        {
            records.push(TeacherStatusRecord::default_pending(
                assignment.id,
                teacher_id,
                !assignment.is_general,
            ));
        }
    }

    let failed = batches.iter().filter(|b| b.is_err()).count();
    if failed > 0 {
        tracing::warn!(
            "Skipped {} failed status lookups while aggregating teacher {}",
            failed,
            teacher_id
        );
    }

    fold_teacher_counts(teacher_id, &batches)
}
