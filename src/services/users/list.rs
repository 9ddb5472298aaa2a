use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::UserListQuery;
use crate::models::{ApiResponse, ErrorCode};

use super::UserService;

pub async fn handle_list_users(
    service: &UserService,
    query: UserListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Lista de usuarios obtenida",
        ))),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "No se pudo obtener la lista de usuarios",
                )),
            )
        }
    }
}
