//! One live session: transport connection, setup handshake, outbound
//! senders, and the inbound dispatcher feeding the audio queue.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::client::queue::AudioQueue;
use crate::error::LiveError;
use crate::tools::ToolDispatcher;
use crate::types;

pub mod config;
pub(crate) mod consts;
mod queue;
mod utils;

pub type ClientTx = tokio::sync::mpsc::Sender<types::ClientEvent>;
type WsReader = futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Handle to a connected session. Only constructed after the setup
/// handshake has been acknowledged, so a sender can never reach an
/// unconfigured connection.
pub struct Client {
    c_tx: ClientTx,
    audio: Arc<AudioQueue>,
    send_handle: tokio::task::JoinHandle<()>,
    recv_handle: tokio::task::JoinHandle<()>,
}

/// Live, in-order sequence of decoded audio buffers from the model.
///
/// The sequence is finite: it ends with `Ok(None)` when the peer closes or
/// the session is torn down, and with a single error when the transport
/// fails. Intended for one draining consumer.
#[derive(Clone)]
pub struct AudioStream {
    queue: Arc<AudioQueue>,
}

impl AudioStream {
    pub async fn next(&self) -> Result<Option<Vec<u8>>, LiveError> {
        self.queue.pop().await
    }
}

impl Client {
    /// Sends one chunk of raw audio as a realtime media frame. The caller
    /// guarantees mono PCM16 at 16kHz; no resampling or validation happens
    /// here.
    pub async fn send_audio_chunk(&self, pcm: &[u8]) -> Result<(), LiveError> {
        let chunk = types::MediaChunk::audio(general_purpose::STANDARD.encode(pcm));
        self.send_client_event(types::ClientEvent::RealtimeInput(
            types::RealtimeInput::single(chunk),
        ))
        .await
    }

    /// Sends one JPEG-encoded video frame as a realtime media frame.
    pub async fn send_video_frame(&self, jpeg: &[u8]) -> Result<(), LiveError> {
        let chunk = types::MediaChunk::jpeg(general_purpose::STANDARD.encode(jpeg));
        self.send_client_event(types::ClientEvent::RealtimeInput(
            types::RealtimeInput::single(chunk),
        ))
        .await
    }

    /// Sends one complete user text turn.
    pub async fn send_text(&self, text: &str) -> Result<(), LiveError> {
        self.send_client_event(types::ClientEvent::ClientContent(
            types::ClientContent::user_turn(text),
        ))
        .await
    }

    async fn send_client_event(&self, event: types::ClientEvent) -> Result<(), LiveError> {
        self.c_tx
            .send(event)
            .await
            .map_err(|_| LiveError::Send("writer task stopped".to_string()))
    }

    /// Audio produced by the model, in arrival order.
    pub fn audio(&self) -> AudioStream {
        AudioStream {
            queue: self.audio.clone(),
        }
    }

    /// Tears the session down: cancels the dispatcher, stops the writer and
    /// ends the audio stream cleanly. Consumers draining audio observe
    /// end-of-sequence, not an error.
    pub async fn close(self) {
        self.recv_handle.abort();
        self.send_handle.abort();
        self.audio.close().await;
        tracing::info!("session closed");
    }
}

/// Opens the connection, performs the setup handshake, and spawns the
/// writer and dispatcher tasks. No other traffic flows before the
/// acknowledgement has been received.
pub async fn connect_with_config(
    capacity: usize,
    config: config::Config,
    tools: ToolDispatcher,
) -> Result<Client, LiveError> {
    let request = utils::build_request(&config).map_err(LiveError::Connect)?;
    let (ws_stream, _) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(LiveError::Connect)?;
    let (mut write, mut read) = ws_stream.split();

    let setup = types::ClientEvent::Setup(config.setup());
    let text = serde_json::to_string(&setup)
        .map_err(|e| LiveError::Handshake(format!("failed to serialize setup frame: {}", e)))?;
    write
        .send(Message::Text(text))
        .await
        .map_err(LiveError::Connect)?;
    await_setup_ack(&mut read).await?;
    tracing::info!(model = config.model(), "setup acknowledged, session live");

    let (c_tx, mut c_rx) = tokio::sync::mpsc::channel::<types::ClientEvent>(capacity);
    let audio = Arc::new(AudioQueue::new());
    let tools = Arc::new(tools);

    let send_handle = tokio::spawn(async move {
        while let Some(event) = c_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        tracing::error!("failed to send frame: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("failed to serialize frame: {}", e);
                }
            }
        }
    });

    let recv_handle = tokio::spawn(run_dispatcher(
        read,
        audio.clone(),
        tools,
        c_tx.clone(),
        config.idle_timeout(),
    ));

    Ok(Client {
        c_tx,
        audio,
        send_handle,
        recv_handle,
    })
}

/// Connects with defaults taken from the environment and no tools.
pub async fn connect() -> Result<Client, LiveError> {
    connect_with_config(1024, config::Config::new(), ToolDispatcher::new()).await
}

/// Performs the receive half of the handshake: exactly one frame, validated
/// as JSON and otherwise uninterpreted.
async fn await_setup_ack(read: &mut WsReader) -> Result<(), LiveError> {
    loop {
        let message = match read.next().await {
            None => {
                return Err(LiveError::Handshake(
                    "connection closed before acknowledgement".to_string(),
                ))
            }
            Some(Err(e)) => {
                return Err(LiveError::Handshake(format!(
                    "failed to read acknowledgement: {}",
                    e
                )))
            }
            Some(Ok(message)) => message,
        };
        let text = match message {
            Message::Text(text) => text,
            Message::Binary(bin) => match String::from_utf8(bin) {
                Ok(text) => text,
                Err(_) => {
                    return Err(LiveError::Handshake(
                        "acknowledgement was not valid UTF-8".to_string(),
                    ))
                }
            },
            Message::Close(reason) => {
                return Err(LiveError::Handshake(format!(
                    "connection closed during handshake: {:?}",
                    reason
                )))
            }
            _ => continue,
        };
        serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| LiveError::Handshake(format!("unparseable acknowledgement: {}", e)))?;
        return Ok(());
    }
}

/// Reads frames until the connection ends. Runs as its own task, concurrent
/// with the outbound senders.
async fn run_dispatcher(
    mut read: WsReader,
    audio: Arc<AudioQueue>,
    tools: Arc<ToolDispatcher>,
    c_tx: ClientTx,
    idle_timeout: Option<std::time::Duration>,
) {
    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, read.next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!("no frame received within {:?}, closing session", limit);
                    audio.fail(LiveError::IdleTimeout(limit)).await;
                    return;
                }
            },
            None => read.next().await,
        };
        let message = match next {
            None => break,
            Some(Err(e)) => {
                tracing::error!("failed to read frame: {}", e);
                audio.fail(LiveError::Transport(e)).await;
                return;
            }
            Some(Ok(message)) => message,
        };
        match message {
            Message::Text(text) => dispatch_frame(&text, &audio, &tools, &c_tx).await,
            Message::Binary(bin) => match std::str::from_utf8(&bin) {
                Ok(text) => dispatch_frame(text, &audio, &tools, &c_tx).await,
                Err(_) => tracing::warn!("dropping non-UTF-8 binary frame"),
            },
            Message::Close(reason) => {
                tracing::info!("connection closed: {:?}", reason);
                break;
            }
            _ => {}
        }
    }
    audio.close().await;
}

/// Decodes one frame and routes it. Per-frame problems are logged and
/// dropped; one bad frame never ends the session.
async fn dispatch_frame(
    text: &str,
    audio: &AudioQueue,
    tools: &ToolDispatcher,
    c_tx: &ClientTx,
) {
    let frame = match serde_json::from_str::<types::ServerFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("dropping malformed frame: {}", e);
            return;
        }
    };
    for event in frame.into_events() {
        match event {
            types::ServerEvent::Content(content) => {
                if let Some(turn) = content.model_turn() {
                    for part in turn.parts() {
                        if let Some(inline) = part.inline_data() {
                            match general_purpose::STANDARD.decode(inline.data()) {
                                Ok(pcm) => audio.push(pcm).await,
                                Err(e) => {
                                    tracing::warn!("dropping undecodable audio part: {}", e)
                                }
                            }
                        }
                    }
                }
                if content.turn_complete() {
                    // An interrupted model still signals turn-complete, so
                    // buffered-but-unplayed audio from that turn is stale.
                    audio.clear().await;
                }
            }
            types::ServerEvent::ToolCall(call) => {
                let response = tools.dispatch(&call);
                if let Err(e) = c_tx
                    .send(types::ClientEvent::ToolResponse(response))
                    .await
                {
                    tracing::error!("failed to queue tool response: {}", e);
                }
            }
            types::ServerEvent::SetupComplete | types::ServerEvent::Unrecognized => {}
        }
    }
}
