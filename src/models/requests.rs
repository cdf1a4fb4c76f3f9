use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user message. Required; its absence is the only 400 case.
    pub message: Option<String>,

    /// Optional reply-language hint (e.g. "pt", "en").
    pub language: Option<String>,
}

impl ChatRequest {
    /// The trimmed message, if one was provided and is non-empty.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_messages_are_equivalent() {
        let req = ChatRequest {
            message: None,
            language: None,
        };
        assert!(req.message_text().is_none());

        let req = ChatRequest {
            message: Some("   ".into()),
            language: None,
        };
        assert!(req.message_text().is_none());
    }

    #[test]
    fn message_is_trimmed() {
        let req = ChatRequest {
            message: Some("  Sobre o IPTU  ".into()),
            language: None,
        };
        assert_eq!(req.message_text(), Some("Sobre o IPTU"));
    }

    #[test]
    fn overlong_message_is_still_valid_input() {
        // Length never rejects a request; long messages go through the
        // guardrails like any other and come back as a normal reply.
        let long = "a".repeat(5000);
        let req = ChatRequest {
            message: Some(long.clone()),
            language: None,
        };
        assert_eq!(req.message_text(), Some(long.as_str()));
    }
}
