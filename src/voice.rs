//! Voice-logging action: `idle -> recording -> processing -> idle`.

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::CreateLogResponse;
use crate::refresh::RefreshBus;
use crate::session::UserSession;
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tracing::{info, warn};

/// Where log creation goes.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn create_log(&self, prompt: &str, user_id: &str) -> Result<CreateLogResponse, ApiError>;
}

#[async_trait]
impl LogSink for ApiClient {
    async fn create_log(&self, prompt: &str, user_id: &str) -> Result<CreateLogResponse, ApiError> {
        self.create_health_log(prompt, Some(user_id)).await
    }
}

/// Produces the text of one health update. A speech backend would implement
/// this by transcribing between start and stop of capture.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn capture(&self) -> Option<String>;
}

/// Text the user typed or pasted in place of speech.
pub struct TypedTranscript(String);

impl TypedTranscript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

#[async_trait]
impl TranscriptSource for TypedTranscript {
    async fn capture(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    Idle,
    Recording,
    Processing,
}

impl RecordingState {
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Idle => "Tap and speak about your health today",
            Self::Recording => "Listening... Tap again to stop",
            Self::Processing => "Analyzing your voice input...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastLog {
    pub log_id: String,
    pub summary: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Logged(LastLog),
    /// Nothing captured; no request was made.
    Empty,
    /// `submit` was called outside of `recording`.
    NotRecording,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceSnapshot {
    pub state: RecordingState,
    pub transcript: Option<String>,
    pub last_log: Option<LastLog>,
}

struct VoiceInner {
    state: RecordingState,
    transcript: Option<String>,
    last_log: Option<LastLog>,
    generation: u64,
}

pub struct VoiceLogger {
    sink: Arc<dyn LogSink>,
    session: UserSession,
    bus: RefreshBus,
    clear_delay: Duration,
    inner: Arc<Mutex<VoiceInner>>,
}

impl VoiceLogger {
    pub fn new(
        sink: Arc<dyn LogSink>,
        session: UserSession,
        bus: RefreshBus,
        clear_delay: Duration,
    ) -> Self {
        Self {
            sink,
            session,
            bus,
            clear_delay,
            inner: Arc::new(Mutex::new(VoiceInner {
                state: RecordingState::Idle,
                transcript: None,
                last_log: None,
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> RecordingState {
        lock(&self.inner).state
    }

    pub fn transcript(&self) -> Option<String> {
        lock(&self.inner).transcript.clone()
    }

    pub fn last_log(&self) -> Option<LastLog> {
        lock(&self.inner).last_log.clone()
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        let inner = lock(&self.inner);
        VoiceSnapshot {
            state: inner.state,
            transcript: inner.transcript.clone(),
            last_log: inner.last_log.clone(),
        }
    }

    /// `idle -> recording`. Returns false in any other state.
    pub fn start(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state != RecordingState::Idle {
            return false;
        }
        inner.state = RecordingState::Recording;
        true
    }

    /// `recording -> idle` without submitting anything.
    pub fn cancel(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state != RecordingState::Recording {
            return false;
        }
        inner.state = RecordingState::Idle;
        true
    }

    /// Starts capture, takes the source's text and submits it.
    pub async fn record(&self, source: &dyn TranscriptSource) -> Result<SubmitOutcome, ApiError> {
        if !self.start() {
            return Ok(SubmitOutcome::NotRecording);
        }
        let text = source.capture().await.unwrap_or_default();
        self.submit(&text).await
    }

    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, ApiError> {
        let text = text.trim();
        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state != RecordingState::Recording {
                return Ok(SubmitOutcome::NotRecording);
            }
            if text.is_empty() {
                inner.state = RecordingState::Idle;
                return Ok(SubmitOutcome::Empty);
            }
            inner.state = RecordingState::Processing;
            inner.transcript = Some(text.to_string());
            inner.generation += 1;
            inner.generation
        };

        let settle = SettleGuard(&self.inner);
        let user_id = self.session.user_id();
        let result = self.sink.create_log(text, &user_id).await;

        match result {
            Ok(response) => {
                let last = LastLog {
                    log_id: response.log_id,
                    summary: response.summary,
                    timestamp: Local::now().format("%H:%M:%S").to_string(),
                };
                lock(&self.inner).last_log = Some(last.clone());
                drop(settle);

                info!(log_id = %last.log_id, "health log created");
                self.bus.emit();
                self.schedule_transcript_clear(generation);
                Ok(SubmitOutcome::Logged(last))
            }
            Err(err) => {
                lock(&self.inner).transcript = None;
                drop(settle);
                warn!("failed to create health log: {err}");
                Err(err)
            }
        }
    }

    fn schedule_transcript_clear(&self, generation: u64) {
        let inner = self.inner.clone();
        let delay = self.clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = lock(&inner);
            // A newer submission owns the transcript now.
            if inner.generation == generation {
                inner.transcript = None;
            }
        });
    }
}

/// Returns the machine to idle however the request settles, including when
/// the submitting future is dropped mid-flight.
struct SettleGuard<'a>(&'a Mutex<VoiceInner>);

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        lock(self.0).state = RecordingState::Idle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::Subscription;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct FakeSink {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl FakeSink {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
                gate: None,
            })
        }
    }

    #[async_trait]
    impl LogSink for FakeSink {
        async fn create_log(&self, prompt: &str, user_id: &str) -> Result<CreateLogResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            assert!(user_id.starts_with("user_"));
            if self.fail {
                return Err(ApiError::from_status(400, Some("bad input".into()), None));
            }
            Ok(CreateLogResponse {
                message: "Health log created successfully".into(),
                log_id: "log-1".into(),
                summary: format!("summary of {prompt}"),
            })
        }
    }

    fn logger(sink: Arc<FakeSink>) -> (VoiceLogger, Subscription, Arc<AtomicUsize>) {
        let bus = RefreshBus::new();
        let emitted = Arc::new(AtomicUsize::new(0));
        let hits = emitted.clone();
        let sub = bus.subscribe(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        let session = UserSession::new(Arc::new(MemoryStore::new()));
        let logger = VoiceLogger::new(sink, session, bus, Duration::from_secs(3));
        (logger, sub, emitted)
    }

    #[tokio::test]
    async fn empty_input_returns_to_idle_without_a_request() {
        let sink = FakeSink::new(false);
        let (logger, _sub, emitted) = logger(sink.clone());

        assert!(logger.start());
        assert_eq!(logger.state(), RecordingState::Recording);
        let outcome = logger.submit("   ").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Empty);
        assert_eq!(logger.state(), RecordingState::Idle);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
        assert_eq!(emitted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_records_last_log_and_emits_refresh() {
        let sink = FakeSink::new(false);
        let (logger, _sub, emitted) = logger(sink.clone());

        let outcome = logger
            .record(&TypedTranscript::new(" slept badly, took ibuprofen "))
            .await
            .unwrap();

        let SubmitOutcome::Logged(last) = outcome else {
            panic!("expected a logged outcome");
        };
        assert_eq!(last.summary, "summary of slept badly, took ibuprofen");
        assert_eq!(logger.state(), RecordingState::Idle);
        assert_eq!(logger.last_log(), Some(last));
        assert_eq!(logger.transcript().as_deref(), Some("slept badly, took ibuprofen"));
        assert_eq!(emitted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_discards_transcript_and_does_not_emit() {
        let sink = FakeSink::new(true);
        let (logger, _sub, emitted) = logger(sink.clone());

        logger.start();
        let err = logger.submit("headache").await.unwrap_err();

        assert_eq!(err.to_string(), "bad input");
        assert_eq!(logger.state(), RecordingState::Idle);
        assert_eq!(logger.transcript(), None);
        assert_eq!(logger.last_log(), None);
        assert_eq!(emitted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn processing_is_visible_while_request_is_in_flight() {
        let gate = Arc::new(Notify::new());
        let sink = Arc::new(FakeSink {
            calls: AtomicUsize::new(0),
            fail: false,
            gate: Some(gate.clone()),
        });
        let (logger, _sub, _) = logger(sink.clone());
        let logger = Arc::new(logger);

        logger.start();
        let task = tokio::spawn({
            let logger = logger.clone();
            async move { logger.submit("fever").await }
        });
        while sink.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(logger.state(), RecordingState::Processing);
        assert!(!logger.start());
        assert_eq!(logger.submit("again").await.unwrap(), SubmitOutcome::NotRecording);

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(logger.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn cancel_only_from_recording() {
        let (logger, _sub, _) = logger(FakeSink::new(false));
        assert!(!logger.cancel());
        logger.start();
        assert!(logger.cancel());
        assert_eq!(logger.state(), RecordingState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn transcript_clears_after_delay() {
        let (logger, _sub, _) = logger(FakeSink::new(false));
        logger.start();
        logger.submit("cough").await.unwrap();
        assert!(logger.transcript().is_some());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(logger.transcript(), None);
        assert!(logger.last_log().is_some());
    }
}
