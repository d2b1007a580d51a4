// src/services/llm_service.rs
use crate::errors::QrStudioError;
use crate::models::AiStyleSuggestion;
use crate::settings::{AiProvider, AiSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Source of style themes for a piece of QR content.
#[async_trait]
pub trait StyleSuggestionService: Send + Sync {
    async fn suggest_style(&self, content: &str) -> Result<AiStyleSuggestion, QrStudioError>;
}

const SUGGESTION_FIELDS: [&str; 9] = [
    "primaryColor",
    "secondaryColor",
    "cornerSquareColor",
    "cornerDotColor",
    "dotType",
    "cornerSquareType",
    "cornerDotType",
    "mood",
    "description",
];

pub fn style_prompt(content: &str) -> String {
    format!(
        r#"Analyze this content for a QR code: "{}".
Suggest a complete professional design theme. Choose values from these specific allowed sets:
- dotType: ['square', 'dots', 'rounded', 'extra-rounded', 'classy', 'classy-rounded']
- cornerSquareType: ['square', 'dot', 'extra-rounded']
- cornerDotType: ['square', 'dot']

Suggest colors in Hex format. The corner colors can be different from the main pattern color for an accent effect.
Make the selection thematic (e.g., 'classy' for luxury links, 'dots' for tech, 'extra-rounded' for friendly/social).

Return a single JSON object with exactly these fields: primaryColor (main pattern color), secondaryColor (background color), cornerSquareColor (outer corner color), cornerDotColor (inner corner eye color), dotType, cornerSquareType, cornerDotType, mood, description."#,
        content
    )
}

fn response_schema() -> serde_json::Value {
    let string = |description: &str| json!({ "type": "STRING", "description": description });
    json!({
        "type": "OBJECT",
        "properties": {
            "primaryColor": string("Main pattern color"),
            "secondaryColor": string("Background color"),
            "cornerSquareColor": string("Outer corner color"),
            "cornerDotColor": string("Inner corner eye color"),
            "dotType": {
                "type": "STRING",
                "enum": ["square", "dots", "rounded", "extra-rounded", "classy", "classy-rounded"]
            },
            "cornerSquareType": { "type": "STRING", "enum": ["square", "dot", "extra-rounded"] },
            "cornerDotType": { "type": "STRING", "enum": ["square", "dot"] },
            "mood": { "type": "STRING" },
            "description": { "type": "STRING" }
        },
        "required": SUGGESTION_FIELDS
    })
}

/// Parses the model's JSON text into a suggestion.
pub fn parse_suggestion(text: &str) -> Result<AiStyleSuggestion, QrStudioError> {
    serde_json::from_str(text.trim())
        .map_err(|e| QrStudioError::LLM(format!("Failed to parse suggestion JSON: {}", e)))
}

pub struct LLMService {
    settings: AiSettings,
    client: Client,
}

impl LLMService {
    pub fn new(settings: AiSettings) -> Result<Self, QrStudioError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| QrStudioError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { settings, client })
    }

    fn api_key(&self) -> Result<&str, QrStudioError> {
        self.settings
            .api_key
            .as_deref()
            .ok_or_else(|| QrStudioError::LLM("AI API key not configured".to_string()))
    }

    async fn suggest_with_gemini(&self, content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": style_prompt(content) }]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": response_schema()
                }
            }))
            .send()
            .await
            .map_err(|e| QrStudioError::LLM(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(QrStudioError::LLM(format!("Gemini error: {}", error_text)));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QrStudioError::LLM(format!("Failed to parse Gemini response: {}", e)))?;

        let text = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| QrStudioError::LLM("No content in Gemini response".to_string()))?;

        parse_suggestion(text)
    }

    async fn suggest_with_openai(&self, content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": self.settings.model,
                "messages": [{
                    "role": "user",
                    "content": style_prompt(content)
                }],
                "response_format": { "type": "json_object" }
            }))
            .send()
            .await
            .map_err(|e| QrStudioError::LLM(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(QrStudioError::LLM(format!("OpenAI error: {}", error_text)));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QrStudioError::LLM(format!("Failed to parse OpenAI response: {}", e)))?;

        let text = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| QrStudioError::LLM("No content in OpenAI response".to_string()))?;

        parse_suggestion(text)
    }
}

#[async_trait]
impl StyleSuggestionService for LLMService {
    async fn suggest_style(&self, content: &str) -> Result<AiStyleSuggestion, QrStudioError> {
        match self.settings.provider {
            AiProvider::Gemini => self.suggest_with_gemini(content).await,
            AiProvider::OpenAi => self.suggest_with_openai(content).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CornerDotType, DotType};
    use std::time::Duration;
    use tiny_http::{Response, Server};

    const SUGGESTION_JSON: &str = r##"{"primaryColor":"#0a0a0a","secondaryColor":"#fafafa","cornerSquareColor":"#c9a227","cornerDotColor":"#c9a227","dotType":"classy","cornerSquareType":"extra-rounded","cornerDotType":"dot","mood":"Luxury","description":"Gold on black"}"##;

    /// Serves `body` with `status` for a single request and returns the base URL.
    fn one_shot_server(status: u16, body: String) -> String {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let _ = request.respond(Response::from_string(body).with_status_code(status));
            }
        });
        format!("http://127.0.0.1:{}", port)
    }

    fn settings(provider: AiProvider, base_url: String, api_key: Option<&str>) -> AiSettings {
        AiSettings {
            provider,
            api_key: api_key.map(str::to_string),
            model: provider.default_model().to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn prompt_lists_allowed_values() {
        let prompt = style_prompt("https://shop.example");
        assert!(prompt.contains("\"https://shop.example\""));
        assert!(prompt.contains("'classy-rounded'"));
        assert!(prompt.contains("cornerDotType: ['square', 'dot']"));
        assert_eq!(response_schema()["required"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn parses_well_formed_suggestion() {
        let suggestion = parse_suggestion(SUGGESTION_JSON).unwrap();
        assert_eq!(suggestion.dot_type, DotType::Classy);
        assert_eq!(suggestion.corner_dot_type, CornerDotType::Dot);
        assert_eq!(suggestion.mood, "Luxury");
    }

    #[test]
    fn rejects_incomplete_suggestion() {
        assert!(parse_suggestion(r##"{"primaryColor":"#000"}"##).is_err());
        assert!(parse_suggestion("I think blue would be nice").is_err());
    }

    #[tokio::test]
    async fn gemini_success() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": SUGGESTION_JSON }] } }]
        })
        .to_string();
        let base = one_shot_server(200, body);
        let service = LLMService::new(settings(AiProvider::Gemini, base, Some("key"))).unwrap();

        let suggestion = service.suggest_style("https://shop.example").await.unwrap();
        assert_eq!(suggestion.primary_color, "#0a0a0a");
    }

    #[tokio::test]
    async fn openai_success() {
        let body = json!({
            "choices": [{ "message": { "content": SUGGESTION_JSON } }]
        })
        .to_string();
        let base = one_shot_server(200, body);
        let service = LLMService::new(settings(AiProvider::OpenAi, base, Some("key"))).unwrap();

        let suggestion = service.suggest_style("hello").await.unwrap();
        assert_eq!(suggestion.corner_square_color, "#c9a227");
    }

    #[tokio::test]
    async fn service_error_is_reported() {
        let base = one_shot_server(500, r#"{"error":{"message":"overloaded"}}"#.to_string());
        let service = LLMService::new(settings(AiProvider::Gemini, base, Some("key"))).unwrap();

        let err = service.suggest_style("hello").await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn missing_text_part_is_an_error() {
        let base = one_shot_server(200, r#"{"candidates":[]}"#.to_string());
        let service = LLMService::new(settings(AiProvider::Gemini, base, Some("key"))).unwrap();
        assert!(matches!(
            service.suggest_style("hello").await,
            Err(QrStudioError::LLM(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let service = LLMService::new(settings(
            AiProvider::Gemini,
            "http://127.0.0.1:9".to_string(),
            None,
        ))
        .unwrap();
        let err = service.suggest_style("hello").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
