pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

pub const BASE_URL: &str = "wss://generativelanguage.googleapis.com/ws";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const BIDI_GENERATE_CONTENT_PATH: &str =
    "google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Input contract: audio chunks must be mono PCM16 at this rate. The session
/// does no resampling or validation.
pub const INPUT_AUDIO_SAMPLE_RATE_HZ: u32 = 16_000;
/// Audio produced by the model arrives at this rate.
pub const OUTPUT_AUDIO_SAMPLE_RATE_HZ: u32 = 24_000;
