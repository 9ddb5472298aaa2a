use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::stats::entities::TeacherStatsSnapshot;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::stats::aggregate::aggregate_counts_for_teacher;

/// 教师本人的统计。每次现算，不走快照，
/// 保证教师看到的是自己最新的状态。
pub async fn handle_teacher_stats(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Autenticación requerida",
        )));
    };

    let counts = aggregate_counts_for_teacher(&storage, teacher_id).await;
    let snapshot = TeacherStatsSnapshot::from_counts(teacher_id, counts);

    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot, "Estadísticas obtenidas")))
}
