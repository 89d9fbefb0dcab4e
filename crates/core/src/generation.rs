//! Text generation trait — the abstraction over the remote endpoint.
//!
//! A generator takes one plain-text prompt and returns one plain-text reply.
//! There is no conversation history and no streaming: every call stands alone.
//!
//! Implementations: the HTTP client in `chatrelay-providers`, scripted
//! generators in tests.

use crate::error::GenerationError;
use async_trait::async_trait;

/// The core generation trait.
///
/// The agent loop calls `generate()` once or twice per turn without knowing
/// what sits behind it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// A human-readable name for this generator (used in logs).
    fn name(&self) -> &str;

    /// Send `prompt` and return the reply text, trimmed of surrounding whitespace.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            if prompt.is_empty() {
                return Err(GenerationError::InvalidRequest("empty prompt".into()));
            }
            Ok(prompt.trim().to_string())
        }
    }

    #[tokio::test]
    async fn generator_is_object_safe() {
        let generator: Box<dyn TextGenerator> = Box::new(Echo);
        assert_eq!(generator.name(), "echo");
        assert_eq!(generator.generate("  hi  ").await.unwrap(), "hi");
        assert!(generator.generate("").await.is_err());
    }
}
