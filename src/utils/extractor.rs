//! 路径参数安全提取器
//!
//! 把 {id} 段解析为正整数，解析失败直接回 400 统一响应，
//! 不让畸形 ID 进入服务层。

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 正整数 ID 提取器，取路径中的 {id} 段
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        let result = match parsed {
            Some(id) => Ok(SafeIDI64(id)),
            None => {
                let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "ID inválido en la ruta",
                ));
                Err(InternalError::from_response("invalid path id", response).into())
            }
        };
        ready(result)
    }
}
