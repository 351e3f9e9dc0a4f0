/// MIME type for raw PCM audio chunks (16kHz, mono, 16-bit little endian).
pub const AUDIO_PCM_MIME_TYPE: &str = "audio/pcm";
/// MIME type for JPEG video frames.
pub const IMAGE_JPEG_MIME_TYPE: &str = "image/jpeg";

/// One turn of dialogue content, as sent to the model.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Part {
    text: String,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// `client_content` frame payload: a complete client text turn.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClientContent {
    turn_complete: bool,
    turns: Vec<Content>,
}

impl ClientContent {
    /// A single user turn, marked complete. This system never sends
    /// multi-part or assistant-continuation turns.
    pub fn user_turn(text: &str) -> Self {
        Self {
            turn_complete: true,
            turns: vec![Content::user(text)],
        }
    }

    pub fn turn_complete(&self) -> bool {
        self.turn_complete
    }

    pub fn turns(&self) -> &[Content] {
        &self.turns
    }
}

/// `realtime_input` frame payload: streamed media chunks.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeInput {
    media_chunks: Vec<MediaChunk>,
}

impl RealtimeInput {
    pub fn single(chunk: MediaChunk) -> Self {
        Self {
            media_chunks: vec![chunk],
        }
    }

    pub fn media_chunks(&self) -> &[MediaChunk] {
        &self.media_chunks
    }
}

/// One base64-encoded media payload plus its MIME type.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MediaChunk {
    data: String,
    mime_type: String,
}

impl MediaChunk {
    pub fn audio(base64_data: String) -> Self {
        Self {
            data: base64_data,
            mime_type: AUDIO_PCM_MIME_TYPE.to_string(),
        }
    }

    pub fn jpeg(base64_data: String) -> Self {
        Self {
            data: base64_data,
            mime_type: IMAGE_JPEG_MIME_TYPE.to_string(),
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
