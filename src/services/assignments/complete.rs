use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::status::AssignmentStatus;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_complete(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .set_assignment_status(id, AssignmentStatus::Completed)
        .await
    {
        Ok(true) => {
            tracing::info!("Assignment {} marked as completed", id);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Tarea marcada como entregada")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Tarea no encontrada",
        ))),
        Err(e) => {
            tracing::error!("Failed to complete assignment {}: {}", id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    "No se pudo actualizar la tarea",
                )),
            )
        }
    }
}
