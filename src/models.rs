// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "Q")]
    Quartile,
    #[default]
    #[serde(rename = "H")]
    High,
}

impl ErrorCorrectionLevel {
    /// Share of codewords that can be lost and still be recovered.
    pub fn recovery_ratio(self) -> f64 {
        match self {
            ErrorCorrectionLevel::Low => 0.07,
            ErrorCorrectionLevel::Medium => 0.15,
            ErrorCorrectionLevel::Quartile => 0.25,
            ErrorCorrectionLevel::High => 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    #[default]
    Square,
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    #[default]
    Square,
    Dot,
    ExtraRounded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    #[default]
    Square,
    Dot,
}

/// What the user says the content is. Only drives placeholder text and
/// validation; the payload is encoded verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Url,
    Text,
    Email,
    Phone,
    Vcard,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Url => "url",
            ContentType::Text => "text",
            ContentType::Email => "email",
            ContentType::Phone => "phone",
            ContentType::Vcard => "vcard",
        }
    }

    pub fn placeholder(self) -> String {
        format!("Enter your {} here...", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrConfig {
    pub content: String,
    pub foreground_color: String,
    pub background_color: String,
    pub error_correction_level: ErrorCorrectionLevel,
    pub target_size: u32,
    pub include_quiet_margin: bool,
    pub dot_shape: DotType,
    pub corner_square_shape: CornerSquareType,
    pub corner_dot_shape: CornerDotType,
    pub corner_square_color: String,
    pub corner_dot_color: String,
    pub logo_image: Option<String>,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            content: "https://qrstudiopro.app".to_string(),
            foreground_color: "#1e293b".to_string(),
            background_color: "#ffffff".to_string(),
            error_correction_level: ErrorCorrectionLevel::High,
            target_size: 512,
            include_quiet_margin: true,
            dot_shape: DotType::Square,
            corner_square_shape: CornerSquareType::Square,
            corner_dot_shape: CornerDotType::Square,
            corner_square_color: "#1e293b".to_string(),
            corner_dot_color: "#1e293b".to_string(),
            logo_image: None,
        }
    }
}

/// A partial edit of [`QrConfig`]. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub content: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub error_correction_level: Option<ErrorCorrectionLevel>,
    pub target_size: Option<u32>,
    pub include_quiet_margin: Option<bool>,
    pub dot_shape: Option<DotType>,
    pub corner_square_shape: Option<CornerSquareType>,
    pub corner_dot_shape: Option<CornerDotType>,
    pub corner_square_color: Option<String>,
    pub corner_dot_color: Option<String>,
    /// `None` keeps the logo, `Some(None)` clears it.
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub logo_image: Option<Option<String>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStyleSuggestion {
    pub primary_color: String,
    pub secondary_color: String,
    pub corner_square_color: String,
    pub corner_dot_color: String,
    pub dot_type: DotType,
    pub corner_square_type: CornerSquareType,
    pub corner_dot_type: CornerDotType,
    pub mood: String,
    pub description: String,
}

impl AiStyleSuggestion {
    /// Neutral theme used whenever the suggestion service cannot deliver.
    pub fn fallback() -> Self {
        Self {
            primary_color: "#000000".to_string(),
            secondary_color: "#FFFFFF".to_string(),
            corner_square_color: "#000000".to_string(),
            corner_dot_color: "#000000".to_string(),
            dot_type: DotType::Square,
            corner_square_type: CornerSquareType::Square,
            corner_dot_type: CornerDotType::Square,
            mood: "Neutral".to_string(),
            description: "Default fallback style.".to_string(),
        }
    }

    /// The store edit that carries this theme. Content and layout stay put.
    pub fn to_patch(&self) -> ConfigPatch {
        ConfigPatch {
            foreground_color: Some(self.primary_color.clone()),
            background_color: Some(self.secondary_color.clone()),
            corner_square_color: Some(self.corner_square_color.clone()),
            corner_dot_color: Some(self.corner_dot_color.clone()),
            dot_shape: Some(self.dot_type),
            corner_square_shape: Some(self.corner_square_type),
            corner_dot_shape: Some(self.corner_dot_type),
            ..ConfigPatch::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiStyleReport {
    pub id: Uuid,
    pub suggestion: AiStyleSuggestion,
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub data: String,
    pub margin: u32,
    pub qr_options: QrOptions,
    pub image: Option<String>,
    pub image_options: ImageOptions,
    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    pub corners_square_options: CornersSquareOptions,
    pub corners_dot_options: CornersDotOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrOptions {
    pub error_correction_level: ErrorCorrectionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub margin: u32,
    /// Fraction of the recoverable area the logo may cover.
    pub image_size: f64,
    pub hide_background_dots: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotsOptions {
    pub color: String,
    pub dot_type: DotType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    pub color: String,
    pub square_type: CornerSquareType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersDotOptions {
    pub color: String,
    pub dot_type: CornerDotType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
    Webp,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "svg" => Some(ExportFormat::Svg),
            "webp" => Some(ExportFormat::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub format: ExportFormat,
    pub data: Vec<u8>,
}
