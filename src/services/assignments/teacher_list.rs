use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::assignments::{
    entities::TeacherStatusRecord,
    filters::{AssignmentListQuery, FilterState},
    responses::TeacherAssignmentItem,
};
use crate::models::common::pagination::{PaginatedResponse, PaginationInfo};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_teacher_list(
    service: &AssignmentService,
    query: AssignmentListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Autenticación requerida",
        )));
    };

    let filter = FilterState::from(query);

    let assignments = match storage.list_teacher_assignments(teacher_id, &filter).await {
        Ok(assignments) => assignments,
        Err(e) => {
            tracing::error!("Failed to list assignments for teacher {}: {}", teacher_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo obtener la lista de tareas",
                )),
            );
        }
    };

    let mut own_records: HashMap<i64, TeacherStatusRecord> =
        match storage.list_statuses_for_teacher(teacher_id).await {
            Ok(rows) => rows.into_iter().map(|r| (r.assignment_id, r)).collect(),
            Err(e) => {
                tracing::error!("Failed to list statuses for teacher {}: {}", teacher_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "No se pudieron obtener los estados",
                    )),
                );
            }
        };

    // 状态筛选按本人的归一状态进行，库内查询拿不到覆盖语义，
    // 在这里解析后再分页
    let now_ms = chrono::Utc::now().timestamp_millis();
    let wanted = filter.status.as_status();

    let resolved: Vec<(crate::models::assignments::entities::Assignment, TeacherStatusRecord)> =
        assignments
            .into_iter()
            .filter_map(|assignment| {
                let record = own_records.remove(&assignment.id).unwrap_or_else(|| {
                    TeacherStatusRecord::default_pending(
                        assignment.id,
                        teacher_id,
                        !assignment.is_general,
                    )
                });
                match wanted {
                    Some(status) if record.resolved_status() != status => None,
                    _ => Some((assignment, record)),
                }
            })
            .collect();

    let total = resolved.len() as i64;
    let offset = ((filter.page - 1) * filter.limit) as usize;
    let items: Vec<TeacherAssignmentItem> = resolved
        .into_iter()
        .skip(offset)
        .take(filter.limit as usize)
        .map(|(assignment, record)| TeacherAssignmentItem::new(assignment, &record, now_ms))
        .collect();

    let response = PaginatedResponse {
        items,
        pagination: PaginationInfo::new(filter.page, filter.limit, total),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Lista de tareas obtenida")))
}
