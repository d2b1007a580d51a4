// src/services/suggestion_adapter.rs
use crate::models::{AiStyleReport, AiStyleSuggestion};
use crate::services::llm_service::StyleSuggestionService;
use crate::services::studio::Studio;
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Counts a request as in flight until dropped, whichever way it ends.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Asks the suggestion service for a theme and merges it into a studio.
/// Only the most recently started request is allowed to land.
pub struct SuggestionAdapter {
    service: Arc<dyn StyleSuggestionService>,
    in_flight: AtomicUsize,
    latest_token: AtomicU64,
}

impl SuggestionAdapter {
    pub fn new(service: Arc<dyn StyleSuggestionService>) -> Self {
        Self {
            service,
            in_flight: AtomicUsize::new(0),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Never fails; any service problem yields the neutral fallback.
    /// The flag is true when the fallback was used.
    pub async fn suggest(&self, content: &str) -> (AiStyleSuggestion, bool) {
        match self.service.suggest_style(content).await {
            Ok(suggestion) => (suggestion, false),
            Err(e) => {
                error!("Style suggestion failed: {}", e);
                (AiStyleSuggestion::fallback(), true)
            }
        }
    }

    /// Runs one suggestion round for the studio's current content.
    ///
    /// Returns `None` without calling the service when the content is empty,
    /// and `None` when a newer request started before this one completed.
    pub async fn apply_ai_style(&self, studio: &Mutex<Studio>) -> Option<AiStyleReport> {
        let content = studio.lock().await.config().content.clone();
        if content.is_empty() {
            debug!("No content, skipping style suggestion");
            return None;
        }

        let _loading = LoadingGuard::enter(&self.in_flight);
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;

        let (suggestion, fallback) = self.suggest(&content).await;

        let mut studio = studio.lock().await;
        if self.latest_token.load(Ordering::SeqCst) != token {
            debug!("Discarding stale style suggestion #{}", token);
            return None;
        }

        let report = AiStyleReport {
            id: Uuid::new_v4(),
            suggestion,
            fallback,
            created_at: chrono::Utc::now(),
        };
        info!(
            "Applying {} style suggestion ({})",
            report.suggestion.mood,
            if fallback { "fallback" } else { "model" }
        );
        studio.apply_suggestion(report.clone());
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QrStudioError;
    use crate::models::{CornerDotType, CornerSquareType, DotType, QrConfig};
    use crate::render::StyledQrEngine;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn themed(primary: &str) -> AiStyleSuggestion {
        AiStyleSuggestion {
            primary_color: primary.to_string(),
            secondary_color: "#fdf6e3".to_string(),
            corner_square_color: "#b58900".to_string(),
            corner_dot_color: "#cb4b16".to_string(),
            dot_type: DotType::ExtraRounded,
            corner_square_type: CornerSquareType::Dot,
            corner_dot_type: CornerDotType::Dot,
            mood: "Friendly".to_string(),
            description: "Warm and round".to_string(),
        }
    }

    struct FixedService(AiStyleSuggestion);

    #[async_trait]
    impl StyleSuggestionService for FixedService {
        async fn suggest_style(&self, _content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
            Ok(self.0.clone())
        }
    }

    struct FailingService;

    #[async_trait]
    impl StyleSuggestionService for FailingService {
        async fn suggest_style(&self, _content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
            Err(QrStudioError::LLM("service unavailable".to_string()))
        }
    }

    /// First call waits for `release`; later calls answer immediately.
    struct GatedService {
        calls: AtomicUsize,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl StyleSuggestionService for GatedService {
        async fn suggest_style(&self, _content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.release.notified().await;
                Ok(themed("#111111"))
            } else {
                Ok(themed("#222222"))
            }
        }
    }

    fn studio_with(content: &str) -> Mutex<Studio> {
        Mutex::new(Studio::new(
            QrConfig {
                content: content.to_string(),
                ..QrConfig::default()
            },
            Arc::new(StyledQrEngine::new()),
        ))
    }

    #[tokio::test]
    async fn success_overwrites_the_seven_style_fields() {
        let suggestion = themed("#073642");
        let adapter = SuggestionAdapter::new(Arc::new(FixedService(suggestion.clone())));
        let studio = studio_with("https://cafe.example");

        let report = adapter.apply_ai_style(&studio).await.unwrap();
        assert!(!report.fallback);
        assert!(!adapter.is_loading());

        let studio = studio.lock().await;
        let config = studio.config();
        assert_eq!(config.content, "https://cafe.example");
        assert_eq!(config.foreground_color, suggestion.primary_color);
        assert_eq!(config.background_color, suggestion.secondary_color);
        assert_eq!(config.corner_square_color, suggestion.corner_square_color);
        assert_eq!(config.corner_dot_color, suggestion.corner_dot_color);
        assert_eq!(config.dot_shape, suggestion.dot_type);
        assert_eq!(config.corner_square_shape, suggestion.corner_square_type);
        assert_eq!(config.corner_dot_shape, suggestion.corner_dot_type);
        assert_eq!(
            studio.last_suggestion().map(|r| r.suggestion.mood.as_str()),
            Some("Friendly")
        );
    }

    #[tokio::test]
    async fn failure_merges_the_fallback() {
        let adapter = SuggestionAdapter::new(Arc::new(FailingService));
        let studio = studio_with("anything");

        let report = adapter.apply_ai_style(&studio).await.unwrap();
        assert!(report.fallback);
        assert_eq!(report.suggestion, AiStyleSuggestion::fallback());
        assert!(!adapter.is_loading());

        let studio = studio.lock().await;
        let config = studio.config();
        assert_eq!(config.foreground_color, "#000000");
        assert_eq!(config.background_color, "#FFFFFF");
        assert_eq!(config.corner_square_color, "#000000");
        assert_eq!(config.corner_dot_color, "#000000");
        assert_eq!(config.dot_shape, DotType::Square);
        assert_eq!(config.corner_square_shape, CornerSquareType::Square);
        assert_eq!(config.corner_dot_shape, CornerDotType::Square);
        assert_eq!(
            studio.last_suggestion().map(|r| r.suggestion.mood.as_str()),
            Some("Neutral")
        );
    }

    #[tokio::test]
    async fn empty_content_is_a_no_op() {
        let service = Arc::new(GatedService {
            calls: AtomicUsize::new(0),
            release: Arc::new(Notify::new()),
        });
        let adapter = SuggestionAdapter::new(service.clone());
        let studio = studio_with("");
        let before = studio.lock().await.config().clone();

        assert!(adapter.apply_ai_style(&studio).await.is_none());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(*studio.lock().await.config(), before);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let release = Arc::new(Notify::new());
        let adapter = Arc::new(SuggestionAdapter::new(Arc::new(GatedService {
            calls: AtomicUsize::new(0),
            release: release.clone(),
        })));
        let studio = Arc::new(studio_with("https://example.com"));

        let first = tokio::spawn({
            let adapter = adapter.clone();
            let studio = studio.clone();
            async move { adapter.apply_ai_style(&studio).await }
        });
        while !adapter.is_loading() {
            tokio::task::yield_now().await;
        }

        let second = adapter.apply_ai_style(&studio).await.unwrap();
        assert_eq!(second.suggestion.primary_color, "#222222");

        release.notify_one();
        assert!(first.await.unwrap().is_none());
        assert!(!adapter.is_loading());

        let studio = studio.lock().await;
        assert_eq!(studio.config().foreground_color, "#222222");
        assert_eq!(
            studio.last_suggestion().map(|r| r.id),
            Some(second.id)
        );
    }
}
