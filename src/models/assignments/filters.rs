//! 列表筛选模型
//!
//! 状态关键字同时接受西语桶名与规范状态串两套写法。
//! 任何筛选维度变化都把分页重置到第 1 页。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::status::AssignmentStatus;
use crate::models::common::pagination::{
    default_limit, default_page, deserialize_string_to_i64,
};
use crate::models::stats::entities::StatusCounts;

// 状态筛选关键字
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum StatusFilter {
    #[default]
    Total,
    Pendientes,
    Entregadas,
    Retraso,
    NoEntregadas,
}

impl StatusFilter {
    /// 对应的规范状态；Total 不限定状态
    pub fn as_status(&self) -> Option<AssignmentStatus> {
        match self {
            StatusFilter::Total => None,
            StatusFilter::Pendientes => Some(AssignmentStatus::Pending),
            StatusFilter::Entregadas => Some(AssignmentStatus::Completed),
            StatusFilter::Retraso => Some(AssignmentStatus::CompletedLate),
            StatusFilter::NoEntregadas => Some(AssignmentStatus::NotDelivered),
        }
    }

    /// 教师名册筛选：对应桶计数 > 0 即通过
    pub fn matches_counts(&self, counts: &StatusCounts) -> bool {
        match self {
            StatusFilter::Total => true,
            StatusFilter::Pendientes => counts.pendientes > 0,
            StatusFilter::Entregadas => counts.entregadas > 0,
            StatusFilter::Retraso => counts.retraso > 0,
            StatusFilter::NoEntregadas => counts.no_entregadas > 0,
        }
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" | "all" => Ok(StatusFilter::Total),
            "pendientes" | "pending" => Ok(StatusFilter::Pendientes),
            "entregadas" | "completed" => Ok(StatusFilter::Entregadas),
            "retraso" | "completed-late" => Ok(StatusFilter::Retraso),
            "noentregadas" | "not-delivered" => Ok(StatusFilter::NoEntregadas),
            _ => Err(format!(
                "Filtro de estado inválido: '{s}'. Filtros soportados: total, pendientes, entregadas, retraso, noentregadas"
            )),
        }
    }
}

// 排序字段，默认按创建时间倒序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    DueDate,
    CloseDate,
    Title,
}

/// 解析排序键，前导 '-' 表示倒序。未知键按默认 "-createdAt" 处理。
pub fn parse_sort(sort: &str) -> (SortField, bool) {
    let (key, desc) = match sort.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (sort, false),
    };
    let field = match key {
        "createdAt" => SortField::CreatedAt,
        "dueDate" => SortField::DueDate,
        "closeDate" => SortField::CloseDate,
        "title" => SortField::Title,
        _ => return (SortField::CreatedAt, true),
    };
    (field, desc)
}

// 任务列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListQuery {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_limit",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub limit: i64,
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

fn default_sort() -> String {
    "-createdAt".to_string()
}

impl Default for AssignmentListQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::Total,
            search: None,
            sort: default_sort(),
            page: 1,
            limit: 10,
            teacher_id: None,
        }
    }
}

/// 列表筛选状态。任何维度变化都把 page 重置为 1。
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub sort: String,
    pub teacher_id: Option<i64>,
    pub page: i64,
    pub limit: i64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            status: StatusFilter::Total,
            search: None,
            sort: default_sort(),
            teacher_id: None,
            page: 1,
            limit: 10,
        }
    }
}

impl FilterState {
    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: String) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_teacher(&mut self, teacher_id: Option<i64>) {
        self.teacher_id = teacher_id;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }
}

impl From<AssignmentListQuery> for FilterState {
    fn from(query: AssignmentListQuery) -> Self {
        Self {
            status: query.status,
            search: query.search.filter(|s| !s.trim().is_empty()),
            sort: query.sort,
            teacher_id: query.teacher_id,
            page: query.page.max(1),
            limit: query.limit.clamp(1, 100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pendientes: i64, entregadas: i64, retraso: i64, no_entregadas: i64) -> StatusCounts {
        StatusCounts {
            total: pendientes + entregadas + retraso + no_entregadas,
            entregadas,
            retraso,
            pendientes,
            no_entregadas,
        }
    }

    #[test]
    fn test_filter_keyword_aliases() {
        assert_eq!("total".parse::<StatusFilter>().unwrap(), StatusFilter::Total);
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::Total);
        assert_eq!(
            "pendientes".parse::<StatusFilter>().unwrap(),
            StatusFilter::Pendientes
        );
        assert_eq!(
            "pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::Pendientes
        );
        assert_eq!(
            "retraso".parse::<StatusFilter>().unwrap(),
            StatusFilter::Retraso
        );
        assert_eq!(
            "completed-late".parse::<StatusFilter>().unwrap(),
            StatusFilter::Retraso
        );
        assert_eq!(
            "noentregadas".parse::<StatusFilter>().unwrap(),
            StatusFilter::NoEntregadas
        );
        assert!("todo".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_total_matches_everything() {
        assert!(StatusFilter::Total.matches_counts(&counts(0, 0, 0, 0)));
        assert!(StatusFilter::Total.matches_counts(&counts(1, 2, 3, 4)));
    }

    #[test]
    fn test_bucket_filters_require_positive_count() {
        let con_pendientes = counts(2, 0, 0, 0);
        let sin_pendientes = counts(0, 3, 1, 0);
        assert!(StatusFilter::Pendientes.matches_counts(&con_pendientes));
        assert!(!StatusFilter::Pendientes.matches_counts(&sin_pendientes));
        assert!(StatusFilter::Entregadas.matches_counts(&sin_pendientes));
        assert!(!StatusFilter::NoEntregadas.matches_counts(&sin_pendientes));
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut state = FilterState::default();
        state.set_page(5);
        assert_eq!(state.page, 5);

        state.set_status(StatusFilter::Entregadas);
        assert_eq!(state.page, 1);

        state.set_page(3);
        state.set_search(Some("informe".into()));
        assert_eq!(state.page, 1);

        state.set_page(7);
        state.set_sort("dueDate".into());
        assert_eq!(state.page, 1);

        state.set_page(2);
        state.set_teacher(Some(42));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_parse_sort_keys() {
        assert_eq!(parse_sort("-createdAt"), (SortField::CreatedAt, true));
        assert_eq!(parse_sort("dueDate"), (SortField::DueDate, false));
        assert_eq!(parse_sort("-title"), (SortField::Title, true));
        // 未知键回退默认排序
        assert_eq!(parse_sort("score"), (SortField::CreatedAt, true));
    }

    #[test]
    fn test_query_normalization() {
        let state = FilterState::from(AssignmentListQuery {
            search: Some("   ".into()),
            page: 0,
            limit: 1000,
            ..AssignmentListQuery::default()
        });
        assert_eq!(state.search, None);
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, 100);
    }
}
