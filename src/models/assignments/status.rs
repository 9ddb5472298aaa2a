//! 任务状态模型
//!
//! 四个持久化状态（pending / completed / completed-late / not-delivered）
//! 与管理员覆盖记录（admin_updated + submission_status）在这里统一归一。
//! 展示层的子状态（倒计时、已过期、已关闭）只影响文案和颜色，
//! 不改变持久化的规范状态。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 一天的毫秒数，倒计时按此取整
const DAY_MS: i64 = 86_400_000;

// 规范任务状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    Pending,      // 待处理
    Completed,    // 按时交付
    CompletedLate,
    NotDelivered,
}

impl AssignmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const COMPLETED: &'static str = "completed";
    pub const COMPLETED_LATE: &'static str = "completed-late";
    pub const NOT_DELIVERED: &'static str = "not-delivered";

    /// 面向用户的西语标签
    pub fn etiqueta(&self) -> &'static str {
        match self {
            AssignmentStatus::Completed => "Entregado",
            AssignmentStatus::CompletedLate => "Entregado con Retraso",
            AssignmentStatus::NotDelivered => "No Entregado",
            AssignmentStatus::Pending => "Pendiente",
        }
    }

    /// 规范颜色映射。pending 在两个视图里刻意不同：
    /// 管理端用 info，教师端用 warning。
    pub fn color(&self, audience: StatusAudience) -> StatusColor {
        match self {
            AssignmentStatus::Completed => StatusColor::Success,
            AssignmentStatus::CompletedLate => StatusColor::Warning,
            AssignmentStatus::NotDelivered => StatusColor::Error,
            AssignmentStatus::Pending => match audience {
                StatusAudience::Admin => StatusColor::Info,
                StatusAudience::Teacher => StatusColor::Warning,
            },
        }
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            AssignmentStatus::PENDING => Ok(AssignmentStatus::Pending),
            AssignmentStatus::COMPLETED => Ok(AssignmentStatus::Completed),
            AssignmentStatus::COMPLETED_LATE => Ok(AssignmentStatus::CompletedLate),
            AssignmentStatus::NOT_DELIVERED => Ok(AssignmentStatus::NotDelivered),
            _ => Err(serde::de::Error::custom(format!(
                "Estado inválido: '{s}'. Estados soportados: pending, completed, completed-late, not-delivered"
            ))),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Pending => write!(f, "{}", AssignmentStatus::PENDING),
            AssignmentStatus::Completed => write!(f, "{}", AssignmentStatus::COMPLETED),
            AssignmentStatus::CompletedLate => write!(f, "{}", AssignmentStatus::COMPLETED_LATE),
            AssignmentStatus::NotDelivered => write!(f, "{}", AssignmentStatus::NOT_DELIVERED),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AssignmentStatus::Pending),
            "completed" => Ok(AssignmentStatus::Completed),
            "completed-late" => Ok(AssignmentStatus::CompletedLate),
            "not-delivered" => Ok(AssignmentStatus::NotDelivered),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

// 提交时间状态，仅出现在管理员覆盖记录中
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum SubmissionStatus {
    OnTime,
    Late,
    Closed,
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::OnTime => write!(f, "on-time"),
            SubmissionStatus::Late => write!(f, "late"),
            SubmissionStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-time" => Ok(SubmissionStatus::OnTime),
            "late" => Ok(SubmissionStatus::Late),
            "closed" => Ok(SubmissionStatus::Closed),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 展示颜色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum StatusColor {
    Success,
    Warning,
    Error,
    Info,
    Grey,
}

/// 渲染视图：管理端与教师端对 pending 的配色约定不同
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAudience {
    Admin,
    Teacher,
}

/// 状态来源的判别联合。
///
/// 覆盖记录与任务级状态两种表示并存，归一只走这一个入口，
/// 避免调用方各自决定"哪个字段优先"。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    /// 管理员覆盖：规范状态只由 submission_status 决定，与日期无关。
    /// 未知或缺失的 submission_status 归为 pending。
    Override {
        submission_status: Option<SubmissionStatus>,
    },
    /// 后端已算好的任务级状态，直接采用
    Canonical(AssignmentStatus),
}

impl StatusSource {
    pub fn resolve(&self) -> AssignmentStatus {
        match self {
            StatusSource::Override { submission_status } => match submission_status {
                Some(SubmissionStatus::OnTime) => AssignmentStatus::Completed,
                Some(SubmissionStatus::Late) => AssignmentStatus::CompletedLate,
                Some(SubmissionStatus::Closed) => AssignmentStatus::NotDelivered,
                None => AssignmentStatus::Pending,
            },
            StatusSource::Canonical(status) => *status,
        }
    }
}

/// 状态展示：标签 + 颜色
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StatusDisplay {
    pub label: String,
    pub color: StatusColor,
}

/// 计算规范状态的展示形态。
///
/// 非 pending 状态直接用规范标签与颜色。pending 按当前时间
/// 相对 due/close 推导展示子状态：已关闭、已过期可补交、倒计时。
/// 日期缺失时回退到固定文案，不会 panic。
pub fn display_status(
    status: AssignmentStatus,
    due_date: Option<i64>,
    close_date: Option<i64>,
    now_ms: i64,
    audience: StatusAudience,
) -> StatusDisplay {
    if status != AssignmentStatus::Pending {
        return StatusDisplay {
            label: status.etiqueta().to_string(),
            color: status.color(audience),
        };
    }

    let Some(due) = due_date else {
        return StatusDisplay {
            label: "Fecha inválida".to_string(),
            color: StatusColor::Grey,
        };
    };

    if let Some(close) = close_date {
        if now_ms > close {
            return StatusDisplay {
                label: "Cerrado - No entregado".to_string(),
                color: StatusColor::Error,
            };
        }
    }

    if now_ms > due {
        return StatusDisplay {
            label: "Vencido - Puede entregarse".to_string(),
            color: StatusColor::Warning,
        };
    }

    let days_until_due = div_ceil(due - now_ms, DAY_MS);
    let label = match days_until_due {
        d if d <= 0 => "Vence hoy".to_string(),
        1 => "Vence mañana".to_string(),
        d => format!("{d} días restantes"),
    };
    StatusDisplay {
        label,
        color: StatusColor::Warning,
    }
}

/// 面向展示的日期格式化，缺失回退 "N/A"，非法回退 "Fecha inválida"
pub fn format_fecha(ts_ms: Option<i64>) -> String {
    match ts_ms {
        None => "N/A".to_string(),
        Some(ms) => match chrono::DateTime::from_timestamp_millis(ms) {
            Some(dt) => dt.format("%d/%m/%Y").to_string(),
            None => "Fecha inválida".to_string(),
        },
    }
}

fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    if numerator <= 0 {
        // 负数与零向零取整即可，调用方只区分 <= 0
        numerator / denominator
    } else {
        (numerator + denominator - 1) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    #[test]
    fn test_override_depends_only_on_submission_status() {
        // 覆盖记录的归一与日期无关
        let cases = [
            (Some(SubmissionStatus::OnTime), AssignmentStatus::Completed),
            (Some(SubmissionStatus::Late), AssignmentStatus::CompletedLate),
            (Some(SubmissionStatus::Closed), AssignmentStatus::NotDelivered),
            (None, AssignmentStatus::Pending),
        ];
        for (submission_status, expected) in cases {
            let source = StatusSource::Override { submission_status };
            assert_eq!(source.resolve(), expected);
        }
    }

    #[test]
    fn test_canonical_passthrough() {
        for status in [
            AssignmentStatus::Pending,
            AssignmentStatus::Completed,
            AssignmentStatus::CompletedLate,
            AssignmentStatus::NotDelivered,
        ] {
            assert_eq!(StatusSource::Canonical(status).resolve(), status);
        }
    }

    #[test]
    fn test_canonical_colors_per_audience() {
        assert_eq!(
            AssignmentStatus::Completed.color(StatusAudience::Admin),
            StatusColor::Success
        );
        assert_eq!(
            AssignmentStatus::CompletedLate.color(StatusAudience::Teacher),
            StatusColor::Warning
        );
        assert_eq!(
            AssignmentStatus::NotDelivered.color(StatusAudience::Admin),
            StatusColor::Error
        );
        // pending 两端配色刻意不同
        assert_eq!(
            AssignmentStatus::Pending.color(StatusAudience::Admin),
            StatusColor::Info
        );
        assert_eq!(
            AssignmentStatus::Pending.color(StatusAudience::Teacher),
            StatusColor::Warning
        );
    }

    #[test]
    fn test_pending_past_close_date() {
        let now = 10 * DAY;
        let display = display_status(
            AssignmentStatus::Pending,
            Some(5 * DAY),
            Some(8 * DAY),
            now,
            StatusAudience::Teacher,
        );
        assert_eq!(display.label, "Cerrado - No entregado");
        assert_eq!(display.color, StatusColor::Error);
    }

    #[test]
    fn test_pending_between_due_and_close() {
        let now = 6 * DAY;
        let display = display_status(
            AssignmentStatus::Pending,
            Some(5 * DAY),
            Some(8 * DAY),
            now,
            StatusAudience::Teacher,
        );
        assert_eq!(display.label, "Vencido - Puede entregarse");
        assert_eq!(display.color, StatusColor::Warning);
    }

    #[test]
    fn test_pending_countdown_labels() {
        let due = 10 * DAY;
        // 同一天内到期
        let hoy = display_status(
            AssignmentStatus::Pending,
            Some(due),
            None,
            due,
            StatusAudience::Teacher,
        );
        assert_eq!(hoy.label, "Vence hoy");

        // 不足一天按一天计
        let manana = display_status(
            AssignmentStatus::Pending,
            Some(due),
            None,
            due - DAY / 2,
            StatusAudience::Teacher,
        );
        assert_eq!(manana.label, "Vence mañana");

        let tres = display_status(
            AssignmentStatus::Pending,
            Some(due),
            None,
            due - 3 * DAY,
            StatusAudience::Teacher,
        );
        assert_eq!(tres.label, "3 días restantes");
        assert_eq!(tres.color, StatusColor::Warning);
    }

    #[test]
    fn test_pending_missing_due_date_falls_back() {
        let display = display_status(
            AssignmentStatus::Pending,
            None,
            Some(8 * DAY),
            0,
            StatusAudience::Admin,
        );
        assert_eq!(display.label, "Fecha inválida");
        assert_eq!(display.color, StatusColor::Grey);
    }

    #[test]
    fn test_non_pending_ignores_dates() {
        let display = display_status(
            AssignmentStatus::Completed,
            None,
            None,
            0,
            StatusAudience::Admin,
        );
        assert_eq!(display.label, "Entregado");
        assert_eq!(display.color, StatusColor::Success);
    }

    #[test]
    fn test_format_fecha_fallbacks() {
        assert_eq!(format_fecha(None), "N/A");
        assert_eq!(format_fecha(Some(i64::MAX)), "Fecha inválida");
        assert_eq!(format_fecha(Some(0)), "01/01/1970");
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            "completed-late".parse::<AssignmentStatus>().unwrap(),
            AssignmentStatus::CompletedLate
        );
        assert_eq!(AssignmentStatus::NotDelivered.to_string(), "not-delivered");
        assert!("finished".parse::<AssignmentStatus>().is_err());
        assert_eq!(
            "on-time".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::OnTime
        );
    }
}
