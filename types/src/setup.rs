use crate::content::Content;
use crate::tools::Tool;

/// `setup` frame payload. Sent exactly once, before any other traffic.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Setup {
    /// Fully qualified model resource name, e.g. "models/gemini-2.0-flash-exp"
    model: String,

    /// System instructions prepended to the session
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,

    /// Tools(Functions) available to the model
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,

    /// Response modality and voice configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl Setup {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            system_instruction: None,
            tools: vec![],
            generation_config: None,
        }
    }

    pub fn with_system_instruction(mut self, instructions: &str) -> Self {
        self.system_instruction = Some(Content::user(instructions));
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GenerationConfig {
    response_modalities: Vec<ResponseModality>,

    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self {
            response_modalities: vec![ResponseModality::Audio],
            speech_config: None,
        }
    }

    pub fn with_response_modalities(mut self, modalities: Vec<ResponseModality>) -> Self {
        self.response_modalities = modalities;
        self
    }

    /// Selects one of the prebuilt voices, e.g. "Puck".
    pub fn with_voice(mut self, voice_name: &str) -> Self {
        self.speech_config = Some(SpeechConfig {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice_name.to_string(),
                },
            },
        });
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseModality {
    Text,
    Audio,
}

#[derive(Debug, Clone, serde::Serialize)]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Clone, serde::Serialize)]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, serde::Serialize)]
struct PrebuiltVoiceConfig {
    voice_name: String,
}
