pub mod echo;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use crate::models::chat::Conversation;
use self::echo::EchoGenerator;

/// Produces the assistant's reply for a conversation whose last turn is a user message.
/// Implementations may suspend for as long as the backend needs; the caller holds no locks meanwhile.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(
        &self,
        conversation: &Conversation
    ) -> Result<String, Box<dyn StdError + Send + Sync>>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    Echo,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseGeneratorTypeError {
    message: String,
}

impl fmt::Display for ParseGeneratorTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseGeneratorTypeError {}
impl FromStr for GeneratorType {
    type Err = ParseGeneratorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "echo" => Ok(GeneratorType::Echo),
            _ =>
                Err(ParseGeneratorTypeError {
                    message: format!("Invalid generator type: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub generator_type: GeneratorType,
    pub delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generator_type: GeneratorType::Echo,
            delay: Duration::from_secs(1),
        }
    }
}

pub fn new_generator(
    config: &GeneratorConfig
) -> Result<Arc<dyn ResponseGenerator>, Box<dyn StdError + Send + Sync>> {
    let generator: Arc<dyn ResponseGenerator> = match config.generator_type {
        GeneratorType::Echo => Arc::new(EchoGenerator::from_config(config)?),
    };
    Ok(generator)
}
