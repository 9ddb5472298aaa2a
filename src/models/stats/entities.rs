//! 教师统计聚合
//!
//! 扫描任务集得到每位教师的桶计数与加权完成率。
//! 迟交按半分计权，这是固定业务规则，不可配置。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assignments::entities::TeacherStatusRecord;
use crate::models::assignments::status::AssignmentStatus;

// 各状态桶计数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StatusCounts {
    pub total: i64,
    pub entregadas: i64,
    pub retraso: i64,
    pub pendientes: i64,
    pub no_entregadas: i64,
}

impl StatusCounts {
    pub fn tally(&mut self, status: AssignmentStatus) {
        self.total += 1;
        match status {
            AssignmentStatus::Completed => self.entregadas += 1,
            AssignmentStatus::CompletedLate => self.retraso += 1,
            AssignmentStatus::Pending => self.pendientes += 1,
            AssignmentStatus::NotDelivered => self.no_entregadas += 1,
        }
    }

    /// 加权完成率：round(((entregadas + retraso * 0.5) / total) * 100)。
    /// total 为 0 时返回 0。entregadas + retraso 超过 total 属于数据
    /// 完整性问题，记录告警并截断到 100，不回绕。
    pub fn score_percent(&self) -> i64 {
        if self.total <= 0 {
            return 0;
        }
        if self.entregadas + self.retraso > self.total {
            tracing::warn!(
                total = self.total,
                entregadas = self.entregadas,
                retraso = self.retraso,
                "Status counts exceed total, clamping score"
            );
        }
        let raw = ((self.entregadas as f64 + self.retraso as f64 * 0.5) / self.total as f64
            * 100.0)
            .round() as i64;
        raw.clamp(0, 100)
    }
}

// 每位教师的统计快照
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct TeacherStatsSnapshot {
    pub teacher_id: i64,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub score_percent: i64,
    pub refreshed_at: chrono::DateTime<chrono::Utc>,
}

impl TeacherStatsSnapshot {
    pub fn from_counts(teacher_id: i64, counts: StatusCounts) -> Self {
        Self {
            teacher_id,
            counts,
            score_percent: counts.score_percent(),
            refreshed_at: chrono::Utc::now(),
        }
    }

    /// 聚合完全失败时的兜底快照：全零，不向调用方抛错
    pub fn zeroed(teacher_id: i64) -> Self {
        Self::from_counts(teacher_id, StatusCounts::default())
    }
}

/// 把每任务的状态查询结果折叠成目标教师的桶计数。
///
/// 失败的子查询整条跳过（不计入 total），保留其余任务的部分聚合，
/// 而不是让单个子请求失败拖垮整个统计。
pub fn fold_teacher_counts<E>(
    teacher_id: i64,
    batches: &[Result<Vec<TeacherStatusRecord>, E>],
) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for batch in batches {
        let Ok(records) = batch else {
            continue;
        };
        if let Some(record) = records.iter().find(|r| r.teacher_id == teacher_id) {
            counts.tally(record.resolved_status());
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::status::SubmissionStatus;

    fn record(assignment_id: i64, teacher_id: i64, status: AssignmentStatus) -> TeacherStatusRecord {
        let mut record = TeacherStatusRecord::default_pending(assignment_id, teacher_id, true);
        record.status = status;
        record
    }

    #[test]
    fn test_score_percent_weighted() {
        // 3 entregadas + 2 retraso de 5 → round(((3 + 1) / 5) * 100) = 80
        let counts = StatusCounts {
            total: 5,
            entregadas: 3,
            retraso: 2,
            pendientes: 0,
            no_entregadas: 0,
        };
        assert_eq!(counts.score_percent(), 80);
    }

    #[test]
    fn test_score_percent_zero_total() {
        assert_eq!(StatusCounts::default().score_percent(), 0);
    }

    #[test]
    fn test_score_percent_rounds() {
        // round((1.5 / 3) * 100) = round(50) = 50
        let counts = StatusCounts {
            total: 3,
            entregadas: 1,
            retraso: 1,
            pendientes: 1,
            no_entregadas: 0,
        };
        assert_eq!(counts.score_percent(), 50);

        // round((1 / 3) * 100) = 33
        let counts = StatusCounts {
            total: 3,
            entregadas: 1,
            retraso: 0,
            pendientes: 2,
            no_entregadas: 0,
        };
        assert_eq!(counts.score_percent(), 33);
    }

    #[test]
    fn test_score_percent_clamps_on_bad_counts() {
        let counts = StatusCounts {
            total: 2,
            entregadas: 3,
            retraso: 2,
            pendientes: 0,
            no_entregadas: 0,
        };
        assert_eq!(counts.score_percent(), 100);
    }

    #[test]
    fn test_fold_skips_failed_batches() {
        let batches: Vec<Result<Vec<TeacherStatusRecord>, String>> = vec![
            Ok(vec![record(1, 7, AssignmentStatus::Completed)]),
            Err("timeout".into()),
            Ok(vec![record(3, 7, AssignmentStatus::CompletedLate)]),
            Ok(vec![record(4, 7, AssignmentStatus::Pending)]),
        ];
        let counts = fold_teacher_counts(7, &batches);
        // 失败批次不计入 total
        assert_eq!(counts.total, 3);
        assert_eq!(counts.entregadas, 1);
        assert_eq!(counts.retraso, 1);
        assert_eq!(counts.pendientes, 1);
    }

    #[test]
    fn test_fold_ignores_other_teachers() {
        let batches: Vec<Result<Vec<TeacherStatusRecord>, String>> = vec![Ok(vec![
            record(1, 5, AssignmentStatus::Completed),
            record(1, 7, AssignmentStatus::NotDelivered),
        ])];
        let counts = fold_teacher_counts(7, &batches);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.no_entregadas, 1);
    }

    #[test]
    fn test_fold_resolves_overrides() {
        let mut overridden = record(1, 7, AssignmentStatus::Pending);
        overridden.admin_updated = true;
        overridden.submission_status = Some(SubmissionStatus::Late);

        let batches: Vec<Result<Vec<TeacherStatusRecord>, String>> = vec![Ok(vec![overridden])];
        let counts = fold_teacher_counts(7, &batches);
        assert_eq!(counts.retraso, 1);
    }

    #[test]
    fn test_fold_all_failed_yields_zeroes() {
        let batches: Vec<Result<Vec<TeacherStatusRecord>, String>> =
            vec![Err("down".into()), Err("down".into())];
        let counts = fold_teacher_counts(7, &batches);
        assert_eq!(counts, StatusCounts::default());
        assert_eq!(TeacherStatsSnapshot::zeroed(7).score_percent, 0);
    }
}
