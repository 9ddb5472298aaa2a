pub mod aggregate;
pub mod teachers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct StatsService {
    storage: Option<Arc<dyn Storage>>,
}

impl StatsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 全员统计快照（可按桶筛选名册）
    pub async fn list_teacher_stats(
        &self,
        query: crate::models::stats::requests::TeacherStatsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::handle_list_teacher_stats(self, query, request).await
    }

    // 单教师统计快照
    pub async fn get_teacher_stats(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::handle_get_teacher_stats(self, teacher_id, request).await
    }

    // 重建全员统计快照
    pub async fn refresh_teacher_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teachers::handle_refresh_teacher_stats(self, request).await
    }

    // 重算并缓存单教师快照
    pub async fn refresh_one_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::handle_refresh_one_teacher(self, teacher_id, request).await
    }
}
