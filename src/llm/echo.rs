use async_trait::async_trait;
use std::error::Error as StdError;
use std::time::Duration;
use log::debug;
use super::{ GeneratorConfig, GeneratorType, ResponseGenerator };
use crate::models::chat::Conversation;

pub const ECHO_PREFIX: &str = "Echo: ";

/// Placeholder backend: answers with the latest user message after an artificial delay.
#[derive(Debug, Clone)]
pub struct EchoGenerator {
    delay: Duration,
}

impl EchoGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if config.generator_type != GeneratorType::Echo {
            return Err("Invalid config type for EchoGenerator".into());
        }

        Ok(Self::new(config.delay))
    }
}

#[async_trait]
impl ResponseGenerator for EchoGenerator {
    async fn generate(
        &self,
        conversation: &Conversation
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        let last = conversation
            .last_user_message()
            .ok_or_else(|| format!("conversation {} has no user message", conversation.id))?;

        if !self.delay.is_zero() {
            debug!("Simulating {:?} of model latency for {}", self.delay, conversation.id);
            tokio::time::sleep(self.delay).await;
        }

        Ok(format!("{}{}", ECHO_PREFIX, last.content))
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}
