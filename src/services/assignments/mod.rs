pub mod admin_stats;
pub mod complete;
pub mod create;
pub mod list_admin;
pub mod teacher_list;
pub mod teacher_stats;
pub mod teachers_status;
pub mod update;
pub mod update_teacher_status;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::{
    entities::Assignment,
    filters::AssignmentListQuery,
    requests::{UpdateAssignmentRequest, UpdateTeacherStatusRequest},
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    pub(crate) fn get_config(&self) -> &crate::config::AppConfig {
        crate::config::AppConfig::get()
    }

    // 创建任务（multipart 表单 + 附件）
    pub async fn create(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create(self, payload, request).await
    }

    // 管理端任务列表（含教师名册）
    pub async fn list_admin(
        &self,
        query: AssignmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_admin::handle_list_admin(self, query, request).await
    }

    // 任务级全局状态计数
    pub async fn admin_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        admin_stats::handle_admin_stats(self, request).await
    }

    // 更新任务；对 general 任务携带 teacherId 时派生定向任务
    pub async fn update(
        &self,
        id: i64,
        update_request: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update(self, id, update_request, request).await
    }

    // 标记任务级状态为 completed
    pub async fn complete(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        complete::handle_complete(self, id, request).await
    }

    // 单任务的教师状态列表（缺行物化为 pending）
    pub async fn teachers_status(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers_status::handle_teachers_status(self, id, request).await
    }

    // 设置单个教师的状态（管理员覆盖）
    pub async fn update_teacher_status(
        &self,
        id: i64,
        update_request: UpdateTeacherStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update_teacher_status::handle_update_teacher_status(self, id, update_request, request)
            .await
    }

    // 教师端：本人可见任务列表
    pub async fn teacher_list(
        &self,
        query: AssignmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teacher_list::handle_teacher_list(self, query, request).await
    }

    // 教师端：本人统计
    pub async fn teacher_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher_stats::handle_teacher_stats(self, request).await
    }
}

/// 任务面向的教师集合：general 任务覆盖全体活跃教师，
/// 定向任务只覆盖 assigned_to。
pub(crate) async fn targeted_teacher_ids(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
) -> Result<Vec<i64>> {
    if assignment.is_general {
        let teachers = storage.list_active_teachers().await?;
        Ok(teachers.into_iter().map(|t| t.id).collect())
    } else {
        Ok(assignment.assigned_to.clone())
    }
}

/// 某教师是否是任务的目标
pub(crate) fn teacher_is_targeted(assignment: &Assignment, teacher_id: i64) -> bool {
    assignment.is_general || assignment.assigned_to.contains(&teacher_id)
}
