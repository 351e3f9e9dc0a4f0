mod client;
mod error;
mod registry;
pub mod tools;

pub use gemini_live_types as types;

pub use client::config::{Config, ConfigError};
pub use client::consts::{INPUT_AUDIO_SAMPLE_RATE_HZ, OUTPUT_AUDIO_SAMPLE_RATE_HZ};
pub use client::{connect, connect_with_config, AudioStream, Client, ClientTx};
pub use error::LiveError;
pub use registry::{Session, SessionRegistry};
pub use tools::boxes::BoxPicker;
pub use tools::{ToolDispatcher, ToolHandler};
