use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::responses::AdminStatsResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_admin_stats(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_assignments_by_status().await {
        Ok(counts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminStatsResponse { counts },
            "Estadísticas obtenidas",
        ))),
        Err(e) => {
            tracing::error!("Failed to count assignments: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudieron obtener las estadísticas",
                )),
            )
        }
    }
}
