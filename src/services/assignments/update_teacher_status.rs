use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, teacher_is_targeted};
use crate::models::assignments::{
    requests::UpdateTeacherStatusRequest,
    responses::TeacherStatusItem,
    status::{AssignmentStatus, SubmissionStatus},
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_update_teacher_status(
    service: &AssignmentService,
    id: i64,
    update_request: UpdateTeacherStatusRequest,
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

    if !teacher_is_targeted(&assignment, update_request.teacher_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotTargeted,
            "El maestro no es destinatario de esta tarea",
        )));
    }

    // 管理员写入按覆盖记录落库：submission_status 携带原始判定，
    // 归一时优先生效
    let submission_status = match update_request.status {
        AssignmentStatus::Completed => Some(SubmissionStatus::OnTime),
        AssignmentStatus::CompletedLate => Some(SubmissionStatus::Late),
        AssignmentStatus::NotDelivered => Some(SubmissionStatus::Closed),
        AssignmentStatus::Pending => None,
    };

    match storage
        .upsert_teacher_status(
            id,
            update_request.teacher_id,
            update_request.status,
            true,
            submission_status,
        )
        .await
    {
        Ok(record) => {
            tracing::info!(
                "Teacher {} status on assignment {} set to {}",
                update_request.teacher_id,
                id,
                update_request.status
            );
            let now_ms = chrono::Utc::now().timestamp_millis();
            let item = TeacherStatusItem::new(record, &assignment, now_ms);
            Ok(HttpResponse::Ok().json(ApiResponse::success(item, "Estado actualizado")))
        }
        Err(e) => {
            tracing::error!(
                "Failed to upsert status for teacher {} on assignment {}: {}",
                update_request.teacher_id,
                id,
                e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    "No se pudo actualizar el estado",
                )),
            )
        }
    }
}
