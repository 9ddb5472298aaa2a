use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::{
    filters::{AssignmentListQuery, FilterState},
    responses::AdminAssignmentListResponse,
};
use crate::models::users::responses::UserSummary;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_list_admin(
    service: &AssignmentService,
    query: AssignmentListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let filter = FilterState::from(query);

    let assignments = match storage.list_assignments_admin(filter).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to list assignments: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo obtener la lista de tareas",
                )),
            );
        }
    };

    // 名册与任务列表同包返回，前端用它渲染教师筛选
    let teachers = match storage.list_active_teachers().await {
        Ok(teachers) => teachers.into_iter().map(UserSummary::from).collect(),
        Err(e) => {
            tracing::warn!("Failed to embed teacher roster: {}", e);
            Vec::new()
        }
    };

    let response = AdminAssignmentListResponse {
        assignments,
        teachers,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Lista de tareas obtenida")))
}
