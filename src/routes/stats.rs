use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::stats::requests::TeacherStatsQuery;
use crate::models::users::entities::UserRole;
use crate::services::StatsService;
use crate::utils::SafeIDI64;

// 懒加载的全局 StatsService 实例
static STATS_SERVICE: Lazy<StatsService> = Lazy::new(StatsService::new_lazy);

// 全员统计快照
pub async fn list_teacher_stats(
    req: HttpRequest,
    query: web::Query<TeacherStatsQuery>,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE
        .list_teacher_stats(query.into_inner(), &req)
        .await
}

// 重建全员统计快照
pub async fn refresh_teacher_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.refresh_teacher_stats(&req).await
}

// 单教师统计快照
pub async fn get_teacher_stats(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STATS_SERVICE.get_teacher_stats(path.0, &req).await
}

// 重算并缓存单教师快照
pub async fn refresh_one_teacher(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STATS_SERVICE.refresh_one_teacher(path.0, &req).await
}

// 配置路由
pub fn configure_stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/stats")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/teachers")
                    .route(web::get().to(list_teacher_stats))
                    .route(
                        web::post()
                            .to(refresh_teacher_stats)
                            .wrap(RateLimit::stats_refresh()),
                    ),
            )
            .service(
                web::resource("/teachers/{id}")
                    .route(web::get().to(get_teacher_stats))
                    .route(
                        web::post()
                            .to(refresh_one_teacher)
                            .wrap(RateLimit::stats_refresh()),
                    ),
            ),
    );
}
