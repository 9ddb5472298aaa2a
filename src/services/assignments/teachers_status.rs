use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, targeted_teacher_ids};
use crate::models::assignments::{entities::TeacherStatusRecord, responses::TeacherStatusItem};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_teachers_status(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Tarea no encontrada",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to fetch assignment {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo consultar la tarea",
                )),
            );
        }
    };

    let targeted = match targeted_teacher_ids(&storage, &assignment).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to resolve targeted teachers for {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo resolver el padrón de maestros",
                )),
            );
        }
    };

    let stored = match storage.list_statuses_for_assignment(id).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list statuses for assignment {}: {}", id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudieron obtener los estados",
                )),
            );
        }
    };

    let mut by_teacher: HashMap<i64, TeacherStatusRecord> =
        stored.into_iter().map(|r| (r.teacher_id, r)).collect();

    // 未落库的目标教师物化为默认 pending 记录
    let now_ms = chrono::Utc::now().timestamp_millis();
    let items: Vec<TeacherStatusItem> = targeted
        .iter()
        .map(|&teacher_id| {
            let record = by_teacher.remove(&teacher_id).unwrap_or_else(|| {
                TeacherStatusRecord::default_pending(id, teacher_id, !assignment.is_general)
            });
            TeacherStatusItem::new(record, &assignment, now_ms)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Estados de maestros obtenidos")))
}
