//! Maps session ids to live sessions: one connection, one audio queue and
//! one slice of tool state per id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::client::config::Config;
use crate::client::{self, AudioStream, Client};
use crate::error::LiveError;
use crate::tools::ToolDispatcher;

type ToolFactory = dyn Fn() -> ToolDispatcher + Send + Sync;

/// One registered session. Constructed unconnected; the transport is opened
/// by [`SessionRegistry::connect`] at most once.
pub struct Session {
    id: String,
    client: Mutex<Option<Client>>,
    last_active: Mutex<Instant>,
}

impl Session {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            client: Mutex::new(None),
            last_active: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    pub async fn send_audio(&self, pcm: &[u8]) -> Result<(), LiveError> {
        self.touch().await;
        match self.client.lock().await.as_ref() {
            Some(client) => client.send_audio_chunk(pcm).await,
            None => Err(LiveError::NotConnected),
        }
    }

    pub async fn send_video(&self, jpeg: &[u8]) -> Result<(), LiveError> {
        self.touch().await;
        match self.client.lock().await.as_ref() {
            Some(client) => client.send_video_frame(jpeg).await,
            None => Err(LiveError::NotConnected),
        }
    }

    pub async fn send_text(&self, text: &str) -> Result<(), LiveError> {
        self.touch().await;
        match self.client.lock().await.as_ref() {
            Some(client) => client.send_text(text).await,
            None => Err(LiveError::NotConnected),
        }
    }

    pub async fn audio_stream(&self) -> Result<AudioStream, LiveError> {
        match self.client.lock().await.as_ref() {
            Some(client) => Ok(client.audio()),
            None => Err(LiveError::NotConnected),
        }
    }

    async fn touch(&self) {
        *self.last_active.lock().await = Instant::now();
    }

    async fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_active.lock().await)
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.lock().await.take() {
            client.close().await;
        }
    }
}

/// Owns every session in the process. Sessions are created lazily on first
/// use and live until explicitly removed or swept by [`Self::evict_idle`];
/// there is no automatic reconnect for a session whose connection died.
pub struct SessionRegistry {
    capacity: usize,
    config: Config,
    tools: Arc<ToolFactory>,
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            capacity: 1024,
            config,
            tools: Arc::new(ToolDispatcher::new),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Installs a factory producing each new session's tool dispatcher, so
    /// every session owns its own tool state.
    pub fn with_tools<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> ToolDispatcher + Send + Sync + 'static,
    {
        self.tools = Arc::new(factory);
        self
    }

    pub async fn get_or_create(&self, session_id: &str) -> Arc<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Session::new(session_id)))
            .clone()
    }

    /// Opens the transport for this session, completing the setup handshake
    /// before returning its audio stream. Connecting an already-connected
    /// session is a no-op that returns the existing stream.
    pub async fn connect(&self, session_id: &str) -> Result<AudioStream, LiveError> {
        let session = self.get_or_create(session_id).await;
        session.touch().await;
        let mut client = session.client.lock().await;
        if let Some(existing) = client.as_ref() {
            tracing::debug!(session_id, "connect on a connected session is a no-op");
            return Ok(existing.audio());
        }
        let connected =
            client::connect_with_config(self.capacity, self.config.clone(), (self.tools)())
                .await?;
        let stream = connected.audio();
        *client = Some(connected);
        tracing::info!(session_id, "session connected");
        Ok(stream)
    }

    pub async fn send_audio(&self, session_id: &str, pcm: &[u8]) -> Result<(), LiveError> {
        self.lookup(session_id).await?.send_audio(pcm).await
    }

    pub async fn send_video(&self, session_id: &str, jpeg: &[u8]) -> Result<(), LiveError> {
        self.lookup(session_id).await?.send_video(jpeg).await
    }

    pub async fn send_text(&self, session_id: &str, text: &str) -> Result<(), LiveError> {
        self.lookup(session_id).await?.send_text(text).await
    }

    pub async fn audio_stream(&self, session_id: &str) -> Result<AudioStream, LiveError> {
        self.lookup(session_id).await?.audio_stream().await
    }

    /// Tears one session down. Its audio stream ends cleanly; later sends
    /// for the id fail with `NotConnected`.
    pub async fn remove(&self, session_id: &str) -> bool {
        let session = self.sessions.lock().await.remove(session_id);
        match session {
            Some(session) => {
                session.shutdown().await;
                tracing::info!(session_id, "session removed");
                true
            }
            None => false,
        }
    }

    /// Sweeps sessions that have been idle for at least `max_idle`,
    /// returning how many were torn down.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut expired = Vec::new();
        {
            let mut sessions = self.sessions.lock().await;
            let now = Instant::now();
            let mut ids = Vec::new();
            for (id, session) in sessions.iter() {
                if session.idle_for(now).await >= max_idle {
                    ids.push(id.clone());
                }
            }
            for id in ids {
                if let Some(session) = sessions.remove(&id) {
                    tracing::info!(session_id = %id, "evicting idle session");
                    expired.push(session);
                }
            }
        }
        for session in &expired {
            session.shutdown().await;
        }
        expired.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn lookup(&self, session_id: &str) -> Result<Arc<Session>, LiveError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or(LiveError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::builder()
            .with_base_url("ws://127.0.0.1:1")
            .with_api_key("test-key")
            .with_model("demo-model")
            .build()
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_the_session() {
        let registry = SessionRegistry::new(test_config());

        let first = registry.get_or_create("s1").await;
        let again = registry.get_or_create("s1").await;
        let other = registry.get_or_create("s2").await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_sends_fail_fast_before_connect() {
        let registry = SessionRegistry::new(test_config());
        registry.get_or_create("s1").await;

        assert!(matches!(
            registry.send_text("s1", "hello").await,
            Err(LiveError::NotConnected)
        ));
        assert!(matches!(
            registry.send_audio("s1", &[0, 1]).await,
            Err(LiveError::NotConnected)
        ));
        assert!(matches!(
            registry.audio_stream("s1").await,
            Err(LiveError::NotConnected)
        ));
        // Unknown ids behave the same as unconnected ones.
        assert!(matches!(
            registry.send_text("missing", "hello").await,
            Err(LiveError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_remove_reports_whether_the_session_existed() {
        let registry = SessionRegistry::new(test_config());
        registry.get_or_create("s1").await;

        assert!(registry.remove("s1").await);
        assert!(!registry.remove("s1").await);
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_evict_idle_only_sweeps_stale_sessions() {
        let registry = SessionRegistry::new(test_config());
        registry.get_or_create("s1").await;

        assert_eq!(registry.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(registry.session_count().await, 1);

        assert_eq!(registry.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(registry.session_count().await, 0);
    }
}
