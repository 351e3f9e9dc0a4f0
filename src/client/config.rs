use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::client::consts::{BASE_URL, DEFAULT_MODEL, GEMINI_API_KEY, GEMINI_MODEL};
use crate::types::{FunctionDeclaration, GenerationConfig, Setup, Tool};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
}

#[derive(Clone)]
pub struct Config {
    base_url: String,
    api_key: SecretString,
    model: String,
    system_instruction: Option<String>,
    tool_declarations: Vec<FunctionDeclaration>,
    generation_config: Option<GenerationConfig>,
    idle_timeout: Option<Duration>,
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    pub fn with_system_instruction(mut self, instructions: &str) -> Self {
        self.config.system_instruction = Some(instructions.to_string());
        self
    }

    /// Functions to advertise to the model in the setup frame.
    pub fn with_tool_declarations(mut self, declarations: Vec<FunctionDeclaration>) -> Self {
        self.config.tool_declarations = declarations;
        self
    }

    pub fn with_generation_config(mut self, generation_config: GenerationConfig) -> Self {
        self.config.generation_config = Some(generation_config);
        self
    }

    /// Closes the session with a typed error when the server goes silent for
    /// this long. Off by default: the upstream protocol has no heartbeat, so
    /// a half-open connection is otherwise indistinguishable from a quiet one.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.config.idle_timeout = Some(idle_timeout);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Sets the default values, reading the key and model from the
    // environment when present.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: std::env::var(GEMINI_API_KEY)
                .unwrap_or_else(|_| "".to_string())
                .into(),
            model: std::env::var(GEMINI_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            system_instruction: None,
            tool_declarations: vec![],
            generation_config: None,
            idle_timeout: None,
        }
    }

    /// Loads configuration from environment variables, consulting a local
    /// .env file first.
    ///
    // *   `GEMINI_API_KEY`: Your secret key for the Gemini API. Required.
    // *   `GEMINI_MODEL`: (Optional) The model to connect to. Defaults to
    //     "gemini-2.0-flash-exp".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::new();
        if config.api_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingVar(format!(
                "{} must be set",
                GEMINI_API_KEY
            )));
        }
        Ok(config)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Builds the setup frame sent during the handshake.
    pub(crate) fn setup(&self) -> Setup {
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        let mut setup = Setup::new(&model);
        if let Some(ref instructions) = self.system_instruction {
            setup = setup.with_system_instruction(instructions);
        }
        if !self.tool_declarations.is_empty() {
            setup = setup.with_tools(vec![Tool::new(self.tool_declarations.clone())]);
        }
        if let Some(ref generation_config) = self.generation_config {
            setup = setup.with_generation_config(generation_config.clone());
        }
        setup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setup_prefixes_bare_model_name() {
        let config = Config::builder()
            .with_api_key("k")
            .with_model("demo-model")
            .build();
        assert_eq!(config.setup().model(), "models/demo-model");

        let config = Config::builder()
            .with_api_key("k")
            .with_model("models/demo-model")
            .build();
        assert_eq!(config.setup().model(), "models/demo-model");
    }

    #[test]
    fn test_setup_carries_instructions_and_tools() {
        let config = Config::builder()
            .with_api_key("k")
            .with_model("demo-model")
            .with_system_instruction("You pick boxes.")
            .with_tool_declarations(vec![FunctionDeclaration::new(
                "pick_box".to_string(),
                "Picks the box by name".to_string(),
                json!({"type": "OBJECT"}),
            )])
            .build();

        let json = serde_json::to_value(config.setup()).unwrap();
        assert_eq!(json["system_instruction"]["parts"][0]["text"], "You pick boxes.");
        assert_eq!(json["tools"][0]["functionDeclarations"][0]["name"], "pick_box");
    }
}
