use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::assignments::filters::AssignmentListQuery;
use crate::models::assignments::requests::{UpdateAssignmentRequest, UpdateTeacherStatusRequest};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 创建任务（multipart）
pub async fn create_assignment(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create(payload, &req).await
}

// 管理端任务列表
pub async fn list_admin(
    req: HttpRequest,
    query: web::Query<AssignmentListQuery>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_admin(query.into_inner(), &req).await
}

// 任务级全局计数
pub async fn admin_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.admin_stats(&req).await
}

// 更新任务（general 任务携带 teacherId 时派生定向任务）
pub async fn update_assignment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update(path.0, body.into_inner(), &req)
        .await
}

// 任务级标记为 completed
pub async fn complete_assignment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.complete(path.0, &req).await
}

// 单任务的教师状态列表
pub async fn teachers_status(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.teachers_status(path.0, &req).await
}

// 设置单个教师的状态
pub async fn update_teacher_status(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateTeacherStatusRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_teacher_status(path.0, body.into_inner(), &req)
        .await
}

// 教师端任务列表
pub async fn teacher_list(
    req: HttpRequest,
    query: web::Query<AssignmentListQuery>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .teacher_list(query.into_inner(), &req)
        .await
}

// 教师端本人统计
pub async fn teacher_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.teacher_stats(&req).await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_assignment)
                        .wrap(RateLimit::file_upload())
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            // 管理端，只有管理员可见
            .service(
                web::scope("/admin")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/all", web::get().to(list_admin))
                    .route("/stats", web::get().to(admin_stats))
                    .route("/{id}", web::put().to(update_assignment))
                    .route("/{id}/complete", web::patch().to(complete_assignment)),
            )
            // 教师端，本人视角
            .service(
                web::scope("/teacher")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/assignments", web::get().to(teacher_list))
                    .route("/stats", web::get().to(teacher_stats)),
            )
            .service(
                web::resource("/{id}/teachers-status")
                    .route(web::get().to(teachers_status))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/teacher-status")
                    .route(web::patch().to(update_teacher_status))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
