// src/services/render_binding.rs
use crate::models::{
    BackgroundOptions, CornersDotOptions, CornersSquareOptions, DotsOptions, ImageOptions,
    QrConfig, QrOptions, RenderOptions,
};
use crate::render::RenderEngine;
use crate::services::config_store::ConfigObserver;
use log::debug;
use std::sync::{Arc, Mutex, PoisonError};

const QUIET_MARGIN: u32 = 12;
const LOGO_SIZE_FRACTION: f64 = 0.4;
const LOGO_MARGIN: u32 = 8;

/// Maps a configuration onto the options the engine understands.
pub fn build_render_options(config: &QrConfig) -> RenderOptions {
    let data = if config.content.is_empty() {
        " ".to_string()
    } else {
        config.content.clone()
    };

    RenderOptions {
        width: config.target_size,
        height: config.target_size,
        data,
        margin: if config.include_quiet_margin { QUIET_MARGIN } else { 0 },
        qr_options: QrOptions {
            error_correction_level: config.error_correction_level,
        },
        image: config.logo_image.clone(),
        image_options: ImageOptions {
            margin: LOGO_MARGIN,
            image_size: LOGO_SIZE_FRACTION,
            hide_background_dots: true,
        },
        dots_options: DotsOptions {
            color: config.foreground_color.clone(),
            dot_type: config.dot_shape,
        },
        background_options: BackgroundOptions {
            color: config.background_color.clone(),
        },
        corners_square_options: CornersSquareOptions {
            color: config.corner_square_color.clone(),
            square_type: config.corner_square_shape,
        },
        corners_dot_options: CornersDotOptions {
            color: config.corner_dot_color.clone(),
            dot_type: config.corner_dot_shape,
        },
    }
}

/// What the binding last forwarded, readable from outside the store.
#[derive(Debug, Default)]
pub struct BindingState {
    pub last_options: Option<RenderOptions>,
    pub redraws: u64,
}

/// Keeps the engine in step with the store: one `configure` per distinct
/// configuration, nothing for repeats.
pub struct RenderBinding {
    engine: Arc<dyn RenderEngine>,
    state: Arc<Mutex<BindingState>>,
}

impl RenderBinding {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(BindingState::default())),
        }
    }

    pub fn state(&self) -> Arc<Mutex<BindingState>> {
        self.state.clone()
    }
}

impl ConfigObserver for RenderBinding {
    fn config_changed(&mut self, config: &QrConfig) {
        let options = build_render_options(config);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.last_options.as_ref() == Some(&options) {
            debug!("Render options unchanged, skipping redraw");
            return;
        }

        self.engine.configure(options.clone());
        state.last_options = Some(options);
        state.redraws += 1;
    }
}
