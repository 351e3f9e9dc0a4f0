use crate::content::{ClientContent, RealtimeInput};
use crate::setup::Setup;
use crate::tools::{ToolCall, ToolResponse};

/// Outbound frames. Externally tagged, so each variant serializes to a JSON
/// object with exactly one top-level key, e.g. `{"setup": {...}}`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientEvent {
    Setup(Setup),
    RealtimeInput(RealtimeInput),
    ClientContent(ClientContent),
    ToolResponse(ToolResponse),
}

/// One decoded inbound frame, before classification. The server keys its
/// frames in camelCase and may omit any of these fields.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFrame {
    setup_complete: Option<serde_json::Value>,
    server_content: Option<ServerContent>,
    tool_call: Option<ToolCall>,
}

impl ServerFrame {
    /// Classifies the frame into the closed set of server events, in the
    /// order they must be handled: content before any tool call carried in
    /// the same frame. A frame matching none of the known shapes yields a
    /// single `Unrecognized`.
    pub fn into_events(self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        if self.setup_complete.is_some() {
            events.push(ServerEvent::SetupComplete);
        }
        if let Some(content) = self.server_content {
            events.push(ServerEvent::Content(content));
        }
        if let Some(call) = self.tool_call {
            events.push(ServerEvent::ToolCall(call));
        }
        if events.is_empty() {
            events.push(ServerEvent::Unrecognized);
        }
        events
    }
}

/// The closed set of inbound events the dispatcher operates on.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    SetupComplete,
    Content(ServerContent),
    ToolCall(ToolCall),
    Unrecognized,
}

/// `serverContent` payload: a model turn delta and/or a turn-complete flag.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    model_turn: Option<ModelTurn>,
    turn_complete: Option<bool>,
}

impl ServerContent {
    pub fn model_turn(&self) -> Option<&ModelTurn> {
        self.model_turn.as_ref()
    }

    /// True when the model marks its turn complete. A model that was
    /// interrupted signals this too, making the flag authoritative over any
    /// audio still buffered from the interrupted turn.
    pub fn turn_complete(&self) -> bool {
        self.turn_complete.unwrap_or(false)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ModelTurn {
    #[serde(default)]
    parts: Vec<ServerPart>,
}

impl ModelTurn {
    pub fn parts(&self) -> &[ServerPart] {
        &self.parts
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

impl ServerPart {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn inline_data(&self) -> Option<&InlineData> {
        self.inline_data.as_ref()
    }
}

/// Base64-encoded media delta inside a model turn part.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    data: String,
    mime_type: Option<String>,
}

impl InlineData {
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}
