use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::{fs::File, path::Path};
use uuid::Uuid;

use super::AssignmentService;
use crate::errors::AsignaTrackError;
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate_magic_bytes;

// 已写盘等待入库的附件
struct PendingAttachment {
    original_name: String,
    stored_name: String,
    mime_type: String,
    file_size: i64,
}

// 任一环节失败时删掉已写盘的附件，上传目录不留孤儿文件
fn discard_stored(upload_dir: &str, pending: &[PendingAttachment]) {
    for att in pending {
        let _ = fs::remove_file(format!("{upload_dir}/{}", att.stored_name));
    }
}

pub async fn handle_create(
    service: &AssignmentService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;
    let allowed_types = &config.upload.allowed_types;

    let Some(created_by) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Autenticación requerida",
        )));
    };

    // 确保上传目录存在
    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", AsignaTrackError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::FileUploadFailed,
                "No se pudo crear el directorio de carga",
            )),
        );
    }

    let mut form = CreateAssignmentRequest::default();
    let mut pending: Vec<PendingAttachment> = Vec::new();

    // 清理半上传的文件
    let discard_pending = |pending: &[PendingAttachment]| discard_stored(upload_dir, pending);

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == "attachments" {
            let original_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            let extension = Path::new(&original_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default();

            if !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
                discard_pending(&pending);
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    "Tipo de archivo no permitido",
                )));
            }

            let mime_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .unwrap_or_default();

            let stored_name =
                format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
            let file_path = format!("{upload_dir}/{stored_name}");
            let mut f = match File::create(&file_path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::error!("{}", AsignaTrackError::file_operation(format!("{e}")));
                    discard_pending(&pending);
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::<()>::error_empty(
                            ErrorCode::FileUploadFailed,
                            "No se pudo crear el archivo",
                        ),
                    ));
                }
            };

            let mut total_size: usize = 0;
            let mut first_chunk = true;
            while let Some(chunk) = field.next().await {
                let data = match chunk {
                    Ok(data) => data,
                    Err(e) => {
                        // 流中断也要清掉写了一半的文件
                        tracing::error!("Multipart stream error while uploading: {}", e);
                        let _ = fs::remove_file(&file_path);
                        discard_pending(&pending);
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::FileUploadFailed,
                                "Error al recibir el archivo",
                            ),
                        ));
                    }
                };

                // 第一个 chunk 校验魔术字节
                if first_chunk {
                    first_chunk = false;
                    if !validate_magic_bytes(&data, &extension) {
                        let _ = fs::remove_file(&file_path);
                        discard_pending(&pending);
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::FileTypeNotAllowed,
                            "El contenido del archivo no coincide con la extensión",
                        )));
                    }
                }

                total_size += data.len();
                if total_size > max_size {
                    let _ = fs::remove_file(&file_path);
                    discard_pending(&pending);
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileSizeExceeded,
                        "El archivo excede el tamaño máximo permitido",
                    )));
                }

                if let Err(e) = f.write_all(&data) {
                    tracing::error!("{}", AsignaTrackError::file_operation(format!("{e}")));
                    let _ = fs::remove_file(&file_path);
                    discard_pending(&pending);
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::<()>::error_empty(
                            ErrorCode::FileUploadFailed,
                            "Error al escribir el archivo",
                        ),
                    ));
                }
            }

            pending.push(PendingAttachment {
                original_name,
                stored_name,
                mime_type,
                file_size: total_size as i64,
            });
        } else {
            // 文本字段
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                value.extend_from_slice(&chunk?);
            }
            let value = String::from_utf8_lossy(&value).to_string();

            match name.as_str() {
                "title" => form.title = value,
                "description" => {
                    if !value.trim().is_empty() {
                        form.description = Some(value);
                    }
                }
                "dueDate" => form.due_date = value.trim().parse::<i64>().ok(),
                "closeDate" => form.close_date = value.trim().parse::<i64>().ok(),
                "isGeneral" => {
                    form.is_general = matches!(value.trim(), "true" | "1");
                }
                "assignedTo" => {
                    // JSON 数组，例如 "[3, 7]"
                    form.assigned_to = serde_json::from_str(&value).unwrap_or_default();
                }
                _ => {
                    tracing::debug!("Ignoring unknown multipart field: {}", name);
                }
            }
        }
    }

    if let Err(e) = form.validate() {
        discard_pending(&pending);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentDatesInvalid,
            e.message(),
        )));
    }

    let assignment = match storage.create_assignment(form, created_by).await {
        Ok(assignment) => assignment,
        Err(e) => {
            tracing::error!("Failed to create assignment: {}", e);
            discard_pending(&pending);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentCreationFailed,
                    "No se pudo crear la tarea",
                )),
            );
        }
    };

    // 附件入库。单条失败只告警，不回滚任务本身。
    let base_url = config.upload.base_url.trim_end_matches('/');
    let mut attachments = Vec::with_capacity(pending.len());
    for att in pending {
        let file_url = format!("{base_url}/{}", att.stored_name);
        match storage
            .add_attachment(
                assignment.id,
                &att.original_name,
                &file_url,
                &att.mime_type,
                att.file_size,
            )
            .await
        {
            Ok(saved) => attachments.push(saved),
            Err(e) => {
                tracing::warn!(
                    "Failed to register attachment {} for assignment {}: {}",
                    att.original_name,
                    assignment.id,
                    e
                );
            }
        }
    }

    let mut assignment = assignment;
    assignment.attachments = attachments;

    tracing::info!("Assignment {} created by user {}", assignment.id, created_by);

    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "Tarea creada")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(stored_name: &str) -> PendingAttachment {
        PendingAttachment {
            original_name: "informe.pdf".into(),
            stored_name: stored_name.into(),
            mime_type: "application/pdf".into(),
            file_size: 4,
        }
    }

    #[test]
    fn test_discard_stored_removes_written_files() {
        let dir = std::env::temp_dir().join(format!("asignatrack-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dir_str = dir.to_str().unwrap();

        let kept = dir.join("kept.bin");
        let discarded = dir.join("discarded.bin");
        fs::write(&kept, b"data").unwrap();
        fs::write(&discarded, b"data").unwrap();

        discard_stored(dir_str, &[pending("discarded.bin")]);

        assert!(kept.exists());
        assert!(!discarded.exists());

        // 目标文件已不存在时静默跳过
        discard_stored(dir_str, &[pending("discarded.bin")]);

        let _ = fs::remove_dir_all(&dir);
    }
}
