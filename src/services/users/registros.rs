use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode};

use super::UserService;

pub async fn handle_list_registros(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 先确认用户存在，避免对不存在的 ID 返回空列表
    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Usuario no encontrado",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo consultar el usuario",
                )),
            );
        }
    }

    match storage.list_registros_for_user(user_id).await {
        Ok(registros) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            registros,
            "Registros obtenidos",
        ))),
        Err(e) => {
            tracing::error!("Failed to list registros for user {}: {}", user_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudieron obtener los registros",
                )),
            )
        }
    }
}
