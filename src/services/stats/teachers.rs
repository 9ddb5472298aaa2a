use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::join_all;
use std::sync::Arc;

use super::{StatsService, aggregate::aggregate_counts_for_teacher};
use crate::models::stats::{
    entities::TeacherStatsSnapshot,
    requests::TeacherStatsQuery,
    responses::{FleetStatsResponse, TeacherStatsResponse},
};
use crate::models::users::{entities::User, responses::UserSummary};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 取快照；没有快照时现算并回填
async fn snapshot_or_compute(storage: &Arc<dyn Storage>, teacher_id: i64) -> TeacherStatsSnapshot {
    match storage.get_teacher_stats(teacher_id).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            let counts = aggregate_counts_for_teacher(storage, teacher_id).await;
            let snapshot = TeacherStatsSnapshot::from_counts(teacher_id, counts);
            if let Err(e) = storage.put_teacher_stats(&snapshot).await {
                tracing::warn!("Failed to persist stats snapshot for {}: {}", teacher_id, e);
            }
            snapshot
        }
        Err(e) => {
            tracing::warn!("Failed to read stats snapshot for {}: {}", teacher_id, e);
            TeacherStatsSnapshot::zeroed(teacher_id)
        }
    }
}

async fn load_roster(
    storage: &Arc<dyn Storage>,
) -> Result<Vec<User>, HttpResponse> {
    storage.list_active_teachers().await.map_err(|e| {
        tracing::error!("Failed to list teachers: {}", e);
        HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
            ErrorCode::InternalServerError,
            "No se pudo obtener el padrón de maestros",
        ))
    })
}

pub async fn handle_list_teacher_stats(
    service: &StatsService,
    query: TeacherStatsQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let teachers = match load_roster(&storage).await {
        Ok(teachers) => teachers,
        Err(response) => return Ok(response),
    };

    let snapshots = join_all(
        teachers
            .iter()
            .map(|t| snapshot_or_compute(&storage, t.id)),
    )
    .await;

    // 桶筛选：对应计数 > 0 的教师才进入名册
    let response = FleetStatsResponse {
        teachers: teachers
            .into_iter()
            .zip(snapshots)
            .filter(|(_, stats)| query.status.matches_counts(&stats.counts))
            .map(|(teacher, stats)| TeacherStatsResponse {
                teacher: UserSummary::from(teacher),
                stats,
            })
            .collect(),
        refreshed_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Estadísticas obtenidas")))
}

pub async fn handle_get_teacher_stats(
    service: &StatsService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let teacher = match storage.get_user_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Maestro no encontrado",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to fetch teacher {}: {}", teacher_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo consultar al maestro",
                )),
            );
        }
    };

    let stats = snapshot_or_compute(&storage, teacher_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherStatsResponse {
            teacher: UserSummary::from(teacher),
            stats,
        },
        "Estadísticas obtenidas",
    )))
}

pub async fn handle_refresh_one_teacher(
    service: &StatsService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let teacher = match storage.get_user_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Maestro no encontrado",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to fetch teacher {}: {}", teacher_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo consultar al maestro",
                )),
            );
        }
    };

    let counts = aggregate_counts_for_teacher(&storage, teacher_id).await;
    let snapshot = TeacherStatsSnapshot::from_counts(teacher_id, counts);

    if let Err(e) = storage.put_teacher_stats(&snapshot).await {
        tracing::error!("Failed to persist stats snapshot for {}: {}", teacher_id, e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StatsRefreshFailed,
                "No se pudo guardar la estadística recalculada",
            )),
        );
    }

    tracing::info!("Teacher {} stats snapshot refreshed", teacher_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherStatsResponse {
            teacher: UserSummary::from(teacher),
            stats: snapshot,
        },
        "Estadísticas recalculadas",
    )))
}

pub async fn handle_refresh_teacher_stats(
    service: &StatsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let teachers = match load_roster(&storage).await {
        Ok(teachers) => teachers,
        Err(response) => return Ok(response),
    };

    let snapshots = join_all(teachers.iter().map(|t| async {
        let counts = aggregate_counts_for_teacher(&storage, t.id).await;
        TeacherStatsSnapshot::from_counts(t.id, counts)
    }))
    .await;

    let mut persisted = 0usize;
    for snapshot in &snapshots {
        match storage.put_teacher_stats(snapshot).await {
            Ok(()) => persisted += 1,
            Err(e) => {
                tracing::warn!(
                    "Failed to persist stats snapshot for {}: {}",
                    snapshot.teacher_id,
                    e
                );
            }
        }
    }

    tracing::info!(
        "Teacher stats refreshed: {}/{} snapshots persisted",
        persisted,
        snapshots.len()
    );

    let response = FleetStatsResponse {
        teachers: teachers
            .into_iter()
            .zip(snapshots)
            .map(|(teacher, stats)| TeacherStatsResponse {
                teacher: UserSummary::from(teacher),
                stats,
            })
            .collect(),
        refreshed_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Estadísticas recalculadas")))
}
