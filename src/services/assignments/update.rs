use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::{
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::UpdateAssignmentResponse,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_update(
    service: &AssignmentService,
    id: i64,
    update_request: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(e) = update_request.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentDatesInvalid,
            e.message(),
        )));
    }

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

    // 对 general 任务做单教师编辑：不改动原任务，
    // 为该教师派生一条继承原字段的定向任务。
    if let Some(teacher_id) = update_request.teacher_id
        && assignment.is_general
    {
        match storage.get_user_by_id(teacher_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "El maestro indicado no existe",
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
        }

        let fork = CreateAssignmentRequest {
            title: update_request.title.unwrap_or(assignment.title),
            description: update_request.description.or(assignment.description),
            due_date: update_request.due_date.or(assignment.due_date),
            close_date: update_request.close_date.or(assignment.close_date),
            is_general: false,
            assigned_to: vec![teacher_id],
        };

        if let Err(e) = fork.validate() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::AssignmentDatesInvalid,
                e.message(),
            )));
        }

        return match storage.create_assignment(fork, assignment.created_by).await {
            Ok(created) => {
                tracing::info!(
                    "Assignment {} forked into specific assignment {} for teacher {}",
                    id,
                    created.id,
                    teacher_id
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    UpdateAssignmentResponse::forked(created),
                    "Tarea específica creada",
                )))
            }
            Err(e) => {
                tracing::error!("Failed to fork assignment {}: {}", id, e);
                Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::AssignmentCreationFailed,
                        "No se pudo crear la tarea específica",
                    )),
                )
            }
        };
    }

    // 部分更新与已存日期合并后复查，单独改一个日期也不能
    // 让 closeDate 早于 dueDate
    if let Err(e) = update_request.validate_against(assignment.due_date, assignment.close_date) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentDatesInvalid,
            e.message(),
        )));
    }

    match storage.update_assignment(id, update_request).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UpdateAssignmentResponse::updated(updated),
            "Tarea actualizada",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Tarea no encontrada",
        ))),
        Err(e) => {
            tracing::error!("Failed to update assignment {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    "No se pudo actualizar la tarea",
                )),
            )
        }
    }
}
