use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,

    // Generation backend
    pub generation_backend: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_max_tokens: u32,
    pub gemini_temperature: f32,

    // Response limits
    pub max_response_chars: usize,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            app_name: env::var("APP_NAME").unwrap_or("ConsultAI API".into()),
            app_version: env::var("APP_VERSION").unwrap_or("1.0.0".into()),
            environment: env::var("ENVIRONMENT").unwrap_or("development".into()),
            host: env::var("HOST").unwrap_or("0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or("8000".into())
                .parse()
                .unwrap_or(8000),

            generation_backend: env::var("GENERATION_BACKEND").unwrap_or("gemini".into()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or("gemini-2.5-flash".into()),
            gemini_max_tokens: env::var("GEMINI_MAX_TOKENS")
                .unwrap_or("2048".into())
                .parse()
                .unwrap_or(2048),
            gemini_temperature: env::var("GEMINI_TEMPERATURE")
                .unwrap_or("0.7".into())
                .parse()
                .unwrap_or(0.7),

            max_response_chars: env::var("MAX_RESPONSE_CHARS")
                .unwrap_or("3000".into())
                .parse()
                .unwrap_or(3000),

            cors_origins: env::var("CORS_ORIGINS").unwrap_or("*".into()),

            log_level: env::var("LOG_LEVEL").unwrap_or("info".into()),
            log_format: env::var("LOG_FORMAT").unwrap_or("json".into()),
        }
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        app_name: "ConsultAI API".into(),
        app_version: "1.0.0".into(),
        environment: "test".into(),
        host: "127.0.0.1".into(),
        port: 8000,
        generation_backend: "disabled".into(),
        gemini_api_key: String::new(),
        gemini_model: "gemini-2.5-flash".into(),
        gemini_max_tokens: 2048,
        gemini_temperature: 0.7,
        max_response_chars: 3000,
        cors_origins: "*".into(),
        log_level: "info".into(),
        log_format: "plain".into(),
    }
}
