//! AI writing assistant.
//!
//! The assistant is best-effort: callers always get text back. A missing key
//! or a failing remote yields a fixed message for ideas and the untouched
//! input for rewrites.

mod gemini;

pub use gemini::GeminiClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::AppError;

/// Key value shipped in sample environments; treated as missing.
pub const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

pub const IDEAS_UNAVAILABLE: &str = "Recurso de IA indisponível: sem chave configurada. \
Tente novamente mais tarde ou contate o administrador.";
pub const IDEAS_FAILED: &str = "Erro ao conectar ao assistente de IA.";
pub const IDEAS_EMPTY: &str = "Não foi possível gerar ideias.";

/// Writing help offered to authors. Never fails into callers.
#[async_trait]
pub trait TextAssistant: Send + Sync {
    /// Title and synopsis suggestions for `topic`.
    async fn story_ideas(&self, topic: &str) -> String;

    /// Rewritten version of `text`, or `text` itself when anything goes wrong.
    async fn enhance_text(&self, text: &str) -> String;
}

/// A text generation backend. Errors stay inside [`Assistant`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

pub fn ideas_prompt(topic: &str) -> String {
    format!(
        "Generate 3 creative and unique story titles and a brief 1-sentence synopsis for a \
         story about: {}. Return them as a simple bulleted list in Portuguese.",
        topic
    )
}

pub fn enhance_prompt(text: &str) -> String {
    format!(
        "Improve the following text for a story, making it more evocative and correcting \
         grammar, but keeping the same meaning. Respond ONLY with the improved text in \
         Portuguese:\n\n{}",
        text
    )
}

/// Best-effort front of an optional [`TextGenerator`].
#[derive(Clone)]
pub struct Assistant {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Assistant {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// An assistant that always falls back.
    pub fn disabled() -> Self {
        Self { generator: None }
    }

    /// Gemini-backed assistant when a usable key is configured.
    pub fn from_config(config: &Config) -> Self {
        match config.gemini_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && key != PLACEHOLDER_API_KEY => {
                match GeminiClient::new(key, &config.gemini_model) {
                    Ok(client) => Self::new(Some(Arc::new(client))),
                    Err(e) => {
                        tracing::warn!("AI assistant disabled: {}", e);
                        Self::disabled()
                    }
                }
            }
            _ => {
                tracing::warn!("No Gemini key configured (ATLAS_GEMINI_API_KEY). AI assistant will fall back.");
                Self::disabled()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }
}

#[async_trait]
impl TextAssistant for Assistant {
    async fn story_ideas(&self, topic: &str) -> String {
        let Some(generator) = &self.generator else {
            return IDEAS_UNAVAILABLE.to_string();
        };

        match generator.generate(&ideas_prompt(topic)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => IDEAS_EMPTY.to_string(),
            Err(e) => {
                tracing::error!("Story ideas failed: {}", e);
                IDEAS_FAILED.to_string()
            }
        }
    }

    async fn enhance_text(&self, text: &str) -> String {
        let Some(generator) = &self.generator else {
            return text.to_string();
        };

        match generator.generate(&enhance_prompt(text)).await {
            Ok(improved) if !improved.trim().is_empty() => improved.trim().to_string(),
            Ok(_) => text.to_string(),
            Err(e) => {
                tracing::error!("Text enhancement failed: {}", e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Generator returning a canned answer or failure.
    pub(crate) struct CannedGenerator(pub Result<String, String>);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
            self.0.clone().map_err(AppError::AiUnavailable)
        }
    }

    fn assistant(answer: Result<&str, &str>) -> Assistant {
        let answer = answer.map(str::to_string).map_err(str::to_string);
        Assistant::new(Some(Arc::new(CannedGenerator(answer))))
    }

    #[tokio::test]
    async fn test_disabled_fallbacks() {
        let assistant = Assistant::disabled();
        assert!(!assistant.is_configured());
        assert_eq!(assistant.story_ideas("dragões").await, IDEAS_UNAVAILABLE);
        assert_eq!(assistant.enhance_text("texto cru").await, "texto cru");
    }

    #[tokio::test]
    async fn test_failure_fallbacks() {
        let assistant = assistant(Err("timeout"));
        assert_eq!(assistant.story_ideas("dragões").await, IDEAS_FAILED);
        assert_eq!(assistant.enhance_text("texto cru").await, "texto cru");
    }

    #[tokio::test]
    async fn test_empty_answer_fallbacks() {
        let assistant = assistant(Ok("  "));
        assert_eq!(assistant.story_ideas("dragões").await, IDEAS_EMPTY);
        assert_eq!(assistant.enhance_text("texto cru").await, "texto cru");
    }

    #[tokio::test]
    async fn test_success() {
        let assistant = assistant(Ok(" Texto lapidado \n"));
        assert_eq!(assistant.enhance_text("texto cru").await, "Texto lapidado");
    }

    #[test]
    fn test_placeholder_key_is_unconfigured() {
        let config = Config {
            api_psk: None,
            db_path: "./x.sqlite".into(),
            upload_dir: "./uploads".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            gemini_api_key: Some(PLACEHOLDER_API_KEY.to_string()),
            gemini_model: "gemini-2.5-flash".to_string(),
        };
        assert!(!Assistant::from_config(&config).is_configured());
    }

    #[test]
    fn test_prompts_embed_input() {
        assert!(ideas_prompt("um farol").contains("um farol"));
        assert!(enhance_prompt("era uma vez").ends_with("era uma vez"));
    }
}
