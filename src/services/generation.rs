use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::Settings;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("generation backend not configured: {0}")]
    NotConfigured(String),
    #[error("{0}")]
    Backend(String),
}

/// Raw output of the generation collaborator: one or more candidate
/// continuations, each carrying a text.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub candidates: Vec<String>,
}

impl GenerationOutput {
    pub fn first_text(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }
}

/// Opaque text-generation capability: given a full prompt, produce candidate
/// continuations or fail.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutput, GenerationError>;
}

/// Gemini via its OpenAI-compatible endpoint.
pub struct GeminiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl GeminiGenerator {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(&settings.gemini_api_key)
            .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai");

        let client = Client::with_config(config).with_http_client(http);

        Self {
            client,
            model: settings.gemini_model.clone(),
            max_tokens: settings.gemini_max_tokens,
            temperature: settings.gemini_temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutput, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                    name: None,
                },
            )])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| GenerationError::Backend(format!("Failed to build request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GenerationError::Backend(format!("AI API error: {e}")))?;

        let candidates = response
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .collect();

        Ok(GenerationOutput { candidates })
    }
}

type SharedGenerator = Arc<dyn TextGenerator>;
type BackendInit = Result<SharedGenerator, GenerationError>;

/// Lazily-initialized handle to the generation backend.
///
/// The first caller performs the initialization while concurrent callers
/// block on the cell; the outcome is recorded exactly once and never
/// re-attempted, so a failed initialization stays failed for the process
/// lifetime.
pub struct GenerationService {
    settings: Settings,
    http: reqwest::Client,
    backend: OnceCell<BackendInit>,
    init_attempts: AtomicU32,
}

impl GenerationService {
    pub fn new(settings: Settings, http: reqwest::Client) -> Self {
        Self {
            settings,
            http,
            backend: OnceCell::new(),
            init_attempts: AtomicU32::new(0),
        }
    }

    /// Build a service around an already-constructed backend, bypassing
    /// lazy initialization. Used for mock backends.
    #[cfg(test)]
    pub fn with_backend(settings: Settings, backend: SharedGenerator) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            backend: OnceCell::new_with(Some(Ok(backend))),
            init_attempts: AtomicU32::new(0),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerationOutput, GenerationError> {
        let init = self
            .backend
            .get_or_init(|| async { self.build_backend() })
            .await;

        match init {
            Ok(generator) => generator.generate(prompt).await,
            Err(err) => Err(err.clone()),
        }
    }

    fn build_backend(&self) -> BackendInit {
        self.init_attempts.fetch_add(1, Ordering::SeqCst);
        match self.settings.generation_backend.as_str() {
            "disabled" => Err(GenerationError::NotConfigured(
                "generation backend is disabled".into(),
            )),
            _ => {
                if self.settings.gemini_api_key.is_empty() {
                    return Err(GenerationError::NotConfigured(
                        "GEMINI_API_KEY is not set".into(),
                    ));
                }
                tracing::info!(model = %self.settings.gemini_model, "Initializing generation backend");
                Ok(Arc::new(GeminiGenerator::new(
                    self.http.clone(),
                    &self.settings,
                )))
            }
        }
    }

    /// Backend state for health reporting.
    pub fn state(&self) -> &'static str {
        match self.backend.get() {
            None => "uninitialized",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "failed",
        }
    }

    /// The recorded initialization error, if initialization ran and failed.
    pub fn init_error(&self) -> Option<String> {
        match self.backend.get() {
            Some(Err(err)) => Some(err.to_string()),
            _ => None,
        }
    }

    #[cfg(test)]
    fn init_attempts(&self) -> u32 {
        self.init_attempts.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;

    #[tokio::test]
    async fn disabled_backend_fails_initialization() {
        let service = GenerationService::new(test_settings(), reqwest::Client::new());
        assert_eq!(service.state(), "uninitialized");

        let err = service.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
        assert_eq!(service.state(), "failed");
    }

    #[tokio::test]
    async fn failed_initialization_reports_its_reason() {
        let service = GenerationService::new(test_settings(), reqwest::Client::new());
        assert!(service.init_error().is_none());

        let _ = service.generate("prompt").await;
        let reason = service.init_error().unwrap();
        assert!(reason.contains("disabled"), "unexpected reason: {reason}");
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_initialization() {
        let service = Arc::new(GenerationService::new(test_settings(), reqwest::Client::new()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.generate("prompt").await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_err());
        }

        // All racing callers observed the single recorded outcome.
        assert_eq!(service.init_attempts(), 1);
        assert_eq!(service.state(), "failed");
    }

    #[tokio::test]
    async fn failed_initialization_is_sticky() {
        let mut settings = test_settings();
        settings.generation_backend = "gemini".into();
        settings.gemini_api_key = String::new();

        let service = GenerationService::new(settings, reqwest::Client::new());
        assert!(service.generate("prompt").await.is_err());
        // The recorded error is observed again without a new attempt.
        assert!(service.generate("prompt").await.is_err());
        assert_eq!(service.init_attempts(), 1);
        assert_eq!(service.state(), "failed");
    }

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GenerationOutput, GenerationError> {
            Ok(GenerationOutput {
                candidates: vec![self.0.to_string()],
            })
        }
    }

    #[tokio::test]
    async fn preset_backend_is_ready_immediately() {
        let service =
            GenerationService::with_backend(test_settings(), Arc::new(StaticGenerator("olá")));
        assert_eq!(service.state(), "ready");

        let output = service.generate("prompt").await.unwrap();
        assert_eq!(output.first_text(), Some("olá"));
    }
}
