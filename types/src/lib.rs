pub mod content;
pub mod events;
pub mod setup;
pub mod tools;

pub use content::{ClientContent, Content, MediaChunk, Part, RealtimeInput};
pub use events::{ClientEvent, InlineData, ModelTurn, ServerContent, ServerEvent, ServerFrame, ServerPart};
pub use setup::{GenerationConfig, ResponseModality, Setup};
pub use tools::{FunctionCall, FunctionDeclaration, FunctionResponse, Tool, ToolCall, ToolResponse};
