// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

mod catalog;
mod errors;
mod handlers;
mod models;
mod render;
mod services;
mod settings;

use crate::handlers::{
    apply_ai_style, apply_preset, export_qr, get_ai_style, get_config, get_render_options,
    get_status, list_presets, preview, remove_logo, set_content_type, style_catalog,
    update_config, upload_logo,
};
use crate::models::QrConfig;
use crate::render::StyledQrEngine;
use crate::services::{LLMService, LogoProcessor, Studio, SuggestionAdapter};
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    studio: Arc<Mutex<Studio>>,
    suggestion_adapter: Arc<SuggestionAdapter>,
    logo_processor: Arc<LogoProcessor>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting QR Studio service...");

    let settings = Settings::from_env()?;
    if settings.ai.api_key.is_none() {
        warn!("No AI API key configured, style suggestions will use the fallback theme");
    }

    // Initialize services
    let engine = Arc::new(StyledQrEngine::new());
    let studio = Arc::new(Mutex::new(Studio::new(QrConfig::default(), engine)));
    let llm_service = Arc::new(LLMService::new(settings.ai.clone())?);
    let suggestion_adapter = Arc::new(SuggestionAdapter::new(llm_service));
    let logo_processor = Arc::new(LogoProcessor::new());

    let app_state = AppState {
        studio,
        suggestion_adapter,
        logo_processor,
    };

    info!(
        "Starting HTTP server on {} (AI provider {:?}, model {})",
        settings.bind_addr, settings.ai.provider, settings.ai.model
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(settings.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/config", web::get().to(get_config))
            .route("/config", web::patch().to(update_config))
            .route("/content-type", web::put().to(set_content_type))
            .route("/status", web::get().to(get_status))
            .route("/render-options", web::get().to(get_render_options))
            .route("/preview", web::get().to(preview))
            .route("/export/{format}", web::get().to(export_qr))
            .route("/logo", web::post().to(upload_logo))
            .route("/logo", web::delete().to(remove_logo))
            .route("/ai-style", web::post().to(apply_ai_style))
            .route("/ai-style", web::get().to(get_ai_style))
            .route("/presets", web::get().to(list_presets))
            .route("/presets/{id}", web::post().to(apply_preset))
            .route("/styles", web::get().to(style_catalog)),
    )
    .route("/health", web::get().to(health_check));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "qrstudio",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
