// src/services/validation.rs
use crate::models::ContentType;
use url::Url;

/// Whether `content` may be exported under the given content type.
///
/// URLs get a strict parse first; bare domains such as `example.com` have no
/// scheme and fail it, so anything containing a dot is accepted as well.
pub fn is_ready_to_export(content: &str, content_type: ContentType) -> bool {
    if content.trim().is_empty() {
        return false;
    }

    match content_type {
        ContentType::Url => Url::parse(content).is_ok() || content.contains('.'),
        _ => true,
    }
}

/// Indicator text for the current state, `None` while nothing is typed.
pub fn status_label(content: &str, ready: bool) -> Option<&'static str> {
    if content.is_empty() {
        None
    } else if ready {
        Some("Ready to Scan")
    } else {
        Some("Invalid Format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [ContentType; 5] = [
        ContentType::Url,
        ContentType::Text,
        ContentType::Email,
        ContentType::Phone,
        ContentType::Vcard,
    ];

    #[test]
    fn blank_content_is_never_ready() {
        for content_type in ALL_TYPES {
            assert!(!is_ready_to_export("", content_type));
            assert!(!is_ready_to_export("   \t\n", content_type));
        }
    }

    #[test]
    fn non_url_types_accept_any_text() {
        for content_type in &ALL_TYPES[1..] {
            assert!(is_ready_to_export("not a url", *content_type));
            assert!(is_ready_to_export("+1 555 0100", *content_type));
            assert!(is_ready_to_export("BEGIN:VCARD", *content_type));
        }
    }

    #[test]
    fn url_type_uses_strict_then_permissive_check() {
        assert!(is_ready_to_export("https://example.com", ContentType::Url));
        assert!(is_ready_to_export("example.com", ContentType::Url));
        assert!(!is_ready_to_export("not a url", ContentType::Url));
    }

    #[test]
    fn labels_follow_readiness() {
        assert_eq!(status_label("", false), None);
        assert_eq!(status_label("x", true), Some("Ready to Scan"));
        assert_eq!(status_label("x", false), Some("Invalid Format"));
    }
}
