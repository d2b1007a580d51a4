// src/handlers.rs
use crate::{AppState, catalog, errors::QrStudioError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;
use serde::Deserialize;

const MAX_LOGO_BYTES: usize = 10 * 1024 * 1024;

pub async fn get_config(data: web::Data<AppState>) -> HttpResponse {
    let studio = data.studio.lock().await;
    HttpResponse::Ok().json(studio.config())
}

pub async fn update_config(
    data: web::Data<AppState>,
    body: web::Json<ConfigPatch>,
) -> HttpResponse {
    let mut studio = data.studio.lock().await;
    let updated = studio.update(body.into_inner());
    HttpResponse::Ok().json(updated)
}

#[derive(Debug, Deserialize)]
pub struct ContentTypeBody {
    pub content_type: ContentType,
}

pub async fn set_content_type(
    data: web::Data<AppState>,
    body: web::Json<ContentTypeBody>,
) -> HttpResponse {
    let mut studio = data.studio.lock().await;
    studio.set_content_type(body.content_type);
    HttpResponse::Ok().json(studio.status(data.suggestion_adapter.is_loading()))
}

pub async fn get_status(data: web::Data<AppState>) -> HttpResponse {
    let studio = data.studio.lock().await;
    HttpResponse::Ok().json(studio.status(data.suggestion_adapter.is_loading()))
}

pub async fn get_render_options(
    data: web::Data<AppState>,
) -> Result<HttpResponse, QrStudioError> {
    let studio = data.studio.lock().await;
    let options = studio
        .render_options()
        .ok_or_else(|| QrStudioError::NotFound("No render options yet".to_string()))?;
    Ok(HttpResponse::Ok().json(options))
}

pub async fn preview(data: web::Data<AppState>) -> Result<HttpResponse, QrStudioError> {
    let studio = data.studio.lock().await;
    let markup = studio.preview()?;
    Ok(HttpResponse::Ok()
        .content_type(ExportFormat::Svg.mime_type())
        .body(markup))
}

pub async fn export_qr(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, QrStudioError> {
    let raw = path.into_inner();
    let format = ExportFormat::parse(&raw)
        .ok_or_else(|| QrStudioError::Validation(format!("Unsupported export format: {}", raw)))?;

    // Rendering runs on the blocking pool.
    let studio = data.studio.clone();
    let exported = web::block(move || studio.blocking_lock().export(format))
        .await
        .map_err(|e| QrStudioError::Render(format!("Export task failed: {}", e)))??;
    let exported = exported.ok_or_else(|| {
        QrStudioError::Validation("Content is not ready to export".to_string())
    })?;

    Ok(HttpResponse::Ok()
        .content_type(exported.format.mime_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", exported.file_name),
        ))
        .body(exported.data))
}

pub async fn upload_logo(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let mut image_data = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        // Collect image data
        while let Some(chunk) = field.try_next().await? {
            if image_data.len() + chunk.len() > MAX_LOGO_BYTES {
                return Err(QrStudioError::Validation(format!(
                    "Logo file exceeds {} bytes",
                    MAX_LOGO_BYTES
                ))
                .into());
            }
            image_data.extend_from_slice(&chunk);
        }
        if !image_data.is_empty() {
            break;
        }
    }

    if image_data.is_empty() {
        return Err(QrStudioError::Validation("No logo file provided".to_string()).into());
    }

    let data_uri = data.logo_processor.to_logo_data_uri(&image_data)?;

    let mut studio = data.studio.lock().await;
    let updated = studio.set_logo(data_uri);
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn remove_logo(data: web::Data<AppState>) -> HttpResponse {
    let mut studio = data.studio.lock().await;
    HttpResponse::Ok().json(studio.clear_logo())
}

pub async fn apply_ai_style(data: web::Data<AppState>) -> HttpResponse {
    let report = data.suggestion_adapter.apply_ai_style(&data.studio).await;
    let studio = data.studio.lock().await;
    HttpResponse::Ok().json(serde_json::json!({
        "applied": report.is_some(),
        "report": report,
        "config": studio.config()
    }))
}

pub async fn get_ai_style(data: web::Data<AppState>) -> HttpResponse {
    let studio = data.studio.lock().await;
    HttpResponse::Ok().json(serde_json::json!({
        "loading": data.suggestion_adapter.is_loading(),
        "report": studio.last_suggestion()
    }))
}

pub async fn list_presets() -> HttpResponse {
    HttpResponse::Ok().json(catalog::STYLE_PRESETS)
}

pub async fn apply_preset(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, QrStudioError> {
    let id = path.into_inner();
    let mut studio = data.studio.lock().await;
    let updated = studio.apply_preset(&id)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn style_catalog() -> HttpResponse {
    HttpResponse::Ok().json(catalog::style_catalog())
}
