// src/services/studio.rs
use crate::catalog;
use crate::errors::QrStudioError;
use crate::models::{
    AiStyleReport, ConfigPatch, ContentType, ExportFormat, ExportedImage, QrConfig, RenderOptions,
};
use crate::render::{PreviewSurface, RenderEngine};
use crate::services::config_store::ConfigStore;
use crate::services::render_binding::{BindingState, RenderBinding};
use crate::services::validation::{is_ready_to_export, status_label};
use log::{debug, info};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Serialize)]
pub struct StudioStatus {
    pub ready: bool,
    pub label: Option<&'static str>,
    pub content_type: ContentType,
    pub placeholder: String,
    pub ai_loading: bool,
    pub revision: u64,
    pub redraws: u64,
}

/// One editing session: the configuration, the content-type tag, the engine
/// the configuration is bound to, and the last AI report shown.
pub struct Studio {
    store: ConfigStore,
    content_type: ContentType,
    engine: Arc<dyn RenderEngine>,
    binding: Arc<Mutex<BindingState>>,
    last_suggestion: Option<AiStyleReport>,
}

impl Studio {
    pub fn new(initial: QrConfig, engine: Arc<dyn RenderEngine>) -> Self {
        let binding = RenderBinding::new(engine.clone());
        let binding_state = binding.state();

        let mut store = ConfigStore::new(initial);
        store.subscribe(Box::new(binding));

        Self {
            store,
            content_type: ContentType::default(),
            engine,
            binding: binding_state,
            last_suggestion: None,
        }
    }

    pub fn config(&self) -> &QrConfig {
        self.store.current()
    }

    pub fn update(&mut self, patch: ConfigPatch) -> &QrConfig {
        self.store.update(patch)
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    pub fn is_ready(&self) -> bool {
        is_ready_to_export(&self.config().content, self.content_type)
    }

    pub fn status(&self, ai_loading: bool) -> StudioStatus {
        let ready = self.is_ready();
        StudioStatus {
            ready,
            label: status_label(&self.config().content, ready),
            content_type: self.content_type,
            placeholder: self.content_type.placeholder(),
            ai_loading,
            revision: self.store.revision(),
            redraws: self.redraws(),
        }
    }

    /// The record most recently handed to the engine.
    pub fn render_options(&self) -> Option<RenderOptions> {
        let state = self.binding.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_options.clone()
    }

    pub fn redraws(&self) -> u64 {
        self.binding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .redraws
    }

    pub fn preview(&self) -> Result<String, QrStudioError> {
        let mut surface = PreviewSurface::new();
        self.engine.mount(&mut surface)?;
        surface
            .into_markup()
            .ok_or_else(|| QrStudioError::Render("Engine attached nothing".to_string()))
    }

    /// Serializes the current rendering, or does nothing while the content
    /// is not exportable.
    pub fn export(&self, format: ExportFormat) -> Result<Option<ExportedImage>, QrStudioError> {
        if !self.is_ready() {
            debug!("Export to {} skipped, content not ready", format.extension());
            return Ok(None);
        }

        let name = format!("qr-maker-{}", chrono::Utc::now().timestamp_millis());
        let exported = self.engine.export(format, &name)?;
        info!(
            "Exported {} ({} bytes)",
            exported.file_name,
            exported.data.len()
        );
        Ok(Some(exported))
    }

    pub fn set_logo(&mut self, data_uri: String) -> &QrConfig {
        self.store.update(ConfigPatch {
            logo_image: Some(Some(data_uri)),
            ..ConfigPatch::default()
        })
    }

    pub fn clear_logo(&mut self) -> &QrConfig {
        self.store.update(ConfigPatch {
            logo_image: Some(None),
            ..ConfigPatch::default()
        })
    }

    pub fn apply_preset(&mut self, id: &str) -> Result<&QrConfig, QrStudioError> {
        let preset = catalog::find_preset(id)
            .ok_or_else(|| QrStudioError::NotFound(format!("Preset '{}'", id)))?;
        Ok(self.store.update(ConfigPatch {
            foreground_color: Some(preset.foreground_color.to_string()),
            background_color: Some(preset.background_color.to_string()),
            ..ConfigPatch::default()
        }))
    }

    /// Merges a suggested theme and keeps it for display.
    pub fn apply_suggestion(&mut self, report: AiStyleReport) -> &QrConfig {
        let patch = report.suggestion.to_patch();
        self.last_suggestion = Some(report);
        self.store.update(patch)
    }

    pub fn last_suggestion(&self) -> Option<&AiStyleReport> {
        self.last_suggestion.as_ref()
    }
}
