//! Progress channel consumer: a cancellable subscription to the backend's
//! per-session WebSocket.
//!
//! ## Design
//! - One channel handle per session; no sharing between consumers
//! - Inbound frames are tagged JSON parsed into [`ChannelEvent`]
//! - Callbacks live in a mutex-held slot; the terminal transition takes the
//!   slot, so at most one of on_complete/on_error ever runs and nothing runs
//!   after `detach()` returns
//! - Malformed frames are logged at warn level and ignored; they never
//!   change state or reach the caller
//! - No timeout: a session that never sends a terminal event stays in
//!   `Processing` until detached
//!
//! Callbacks run under the subscription lock — do not call `detach()` from
//! inside a callback.

use futures_util::StreamExt;
use std::sync::{Arc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

use crate::client::ClientConfig;
use crate::protocol::{AnalysisResult, ChannelEvent};

/// Lifecycle of an attached session, driven only by channel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connecting,
    Connected,
    Processing,
    Completed,
    Failed,
    Disconnected,
}

/// A launched analysis job: the server-assigned id plus where its channel
/// currently stands.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub status: SessionStatus,
}

// ---------------------------------------------------------------------------
// Callback slot
// ---------------------------------------------------------------------------

type ProgressFn = Box<dyn FnMut(f64, &str) + Send>;
type CompleteFn = Box<dyn FnOnce(AnalysisResult) + Send>;
type ErrorFn = Box<dyn FnOnce(String) + Send>;

struct Callbacks {
    on_progress: ProgressFn,
    on_complete: CompleteFn,
    on_error: ErrorFn,
}

type CallbackSlot = Arc<Mutex<Option<Callbacks>>>;

// ---------------------------------------------------------------------------
// Event dispatcher
// ---------------------------------------------------------------------------

/// Translates channel-level happenings into state transitions and callback
/// invocations. Separated from the socket so the protocol behavior is
/// testable without a live backend.
pub struct Dispatcher {
    slot: CallbackSlot,
    status: Arc<Mutex<SessionStatus>>,
    session_id: String,
}

impl Dispatcher {
    fn new(session_id: &str, slot: CallbackSlot, status: Arc<Mutex<SessionStatus>>) -> Self {
        Dispatcher {
            slot,
            status,
            session_id: session_id.to_string(),
        }
    }

    /// Build a dispatcher with fresh state, returning it together with the
    /// shared status cell.
    pub fn with_callbacks<P, C, E>(
        session_id: &str,
        on_progress: P,
        on_complete: C,
        on_error: E,
    ) -> (Self, Arc<Mutex<SessionStatus>>)
    where
        P: FnMut(f64, &str) + Send + 'static,
        C: FnOnce(AnalysisResult) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(Callbacks {
            on_progress: Box::new(on_progress),
            on_complete: Box::new(on_complete),
            on_error: Box::new(on_error),
        })));
        let status = Arc::new(Mutex::new(SessionStatus::Connecting));
        let dispatcher = Dispatcher::new(session_id, slot, Arc::clone(&status));
        (dispatcher, status)
    }

    fn set_status(&self, next: SessionStatus) {
        if let Ok(mut guard) = self.status.lock() {
            *guard = next;
        }
    }

    /// The WebSocket handshake completed.
    pub fn on_open(&self) {
        debug!(session = %self.session_id, "progress channel connected");
        self.set_status(SessionStatus::Connected);
    }

    /// One inbound text frame. Returns `true` when a terminal event was
    /// consumed and the reader should close the channel.
    pub fn on_frame(&self, text: &str) -> bool {
        let event: ChannelEvent = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(err) => {
                // Defined tolerance: unparseable frames are dropped.
                warn!(session = %self.session_id, %err, "ignoring malformed frame");
                return false;
            }
        };

        match event {
            ChannelEvent::Progress { percentage, message } => {
                self.set_status(SessionStatus::Processing);
                if let Ok(mut guard) = self.slot.lock() {
                    if let Some(callbacks) = guard.as_mut() {
                        // Passed through verbatim — no clamping, no
                        // monotonicity check.
                        (callbacks.on_progress)(percentage, &message);
                    }
                }
                false
            }
            ChannelEvent::Completion {
                success: true,
                data,
                ..
            } => {
                self.set_status(SessionStatus::Completed);
                if let Ok(mut guard) = self.slot.lock() {
                    if let Some(callbacks) = guard.take() {
                        (callbacks.on_complete)(data.unwrap_or_default());
                    }
                }
                true
            }
            ChannelEvent::Completion { success: false, error, .. } => {
                self.set_status(SessionStatus::Failed);
                if let Ok(mut guard) = self.slot.lock() {
                    if let Some(callbacks) = guard.take() {
                        let reason =
                            error.unwrap_or_else(|| "El análisis falló en el servidor".to_string());
                        (callbacks.on_error)(reason);
                    }
                }
                true
            }
        }
    }

    /// Transport-level failure on the channel.
    pub fn on_channel_error(&self, detail: &str) {
        if let Ok(mut guard) = self.slot.lock() {
            if let Some(callbacks) = guard.take() {
                self.set_status(SessionStatus::Failed);
                (callbacks.on_error)(format!("Error de conexión WebSocket: {detail}"));
            }
        }
    }

    /// The channel closed without a terminal event. A close before the
    /// handshake ever completed is a failure; after it, the session just
    /// goes quiet.
    pub fn on_closed(&self, handshake_completed: bool) {
        if let Ok(mut guard) = self.slot.lock() {
            if guard.is_none() {
                return; // terminal callback already fired
            }
            if handshake_completed {
                self.set_status(SessionStatus::Disconnected);
            } else if let Some(callbacks) = guard.take() {
                self.set_status(SessionStatus::Failed);
                (callbacks.on_error)("No se pudo conectar al servidor".to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription handle
// ---------------------------------------------------------------------------

/// Handle to an attached progress channel. Dropping it detaches.
pub struct ProgressHandle {
    session_id: String,
    slot: CallbackSlot,
    status: Arc<Mutex<SessionStatus>>,
    reader: Option<tokio::task::JoinHandle<()>>,
}

impl ProgressHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
            .lock()
            .map(|guard| *guard)
            .unwrap_or(SessionStatus::Disconnected)
    }

    /// Close the channel and drop the callbacks. Idempotent; no callback
    /// fires after this returns. This is the only cancellation mechanism —
    /// no abort request is sent to the backend.
    pub fn detach(&mut self) {
        if let Some(task) = self.reader.take() {
            task.abort();
        }
        let had_callbacks = self
            .slot
            .lock()
            .map(|mut guard| guard.take().is_some())
            .unwrap_or(false);
        if had_callbacks {
            if let Ok(mut guard) = self.status.lock() {
                if !matches!(*guard, SessionStatus::Completed | SessionStatus::Failed) {
                    *guard = SessionStatus::Disconnected;
                }
            }
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Derive the progress-channel URL from the HTTP base URL by swapping the
/// scheme to ws/wss.
pub fn ws_url(base_url: &str, session_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let swapped = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{base}")
    };
    format!("{swapped}/ws/{session_id}")
}

/// Open the progress channel for `session_id` and stream events into the
/// supplied callbacks from a background reader task.
///
/// `on_progress` may fire zero or more times; exactly one of `on_complete`
/// or `on_error` fires unless the handle is detached first.
pub fn attach<P, C, E>(
    config: &ClientConfig,
    session_id: &str,
    on_progress: P,
    on_complete: C,
    on_error: E,
) -> ProgressHandle
where
    P: FnMut(f64, &str) + Send + 'static,
    C: FnOnce(AnalysisResult) + Send + 'static,
    E: FnOnce(String) + Send + 'static,
{
    let (dispatcher, status) =
        Dispatcher::with_callbacks(session_id, on_progress, on_complete, on_error);
    let slot = Arc::clone(&dispatcher.slot);
    let url = ws_url(&config.base_url, session_id);

    let reader = tokio::spawn(async move {
        let mut ws = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(err) => {
                debug!(%url, %err, "progress channel handshake failed");
                dispatcher.on_closed(false);
                return;
            }
        };
        dispatcher.on_open();

        loop {
            match ws.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    if dispatcher.on_frame(&text) {
                        // Terminal event consumed; close our side if the
                        // peer hasn't already.
                        let _ = ws.close(None).await;
                        break;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    dispatcher.on_closed(true);
                    break;
                }
                Some(Ok(_)) => {} // Ignore binary / ping / pong frames
                Some(Err(err)) => {
                    dispatcher.on_channel_error(&err.to_string());
                    break;
                }
            }
        }
    });

    ProgressHandle {
        session_id: session_id.to_string(),
        slot,
        status,
        reader: Some(reader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_swaps_http_scheme() {
        assert_eq!(
            ws_url("http://localhost:8000", "abc123"),
            "ws://localhost:8000/ws/abc123"
        );
    }

    #[test]
    fn test_ws_url_swaps_https_scheme() {
        assert_eq!(
            ws_url("https://toxic.example.com", "abc"),
            "wss://toxic.example.com/ws/abc"
        );
    }

    #[test]
    fn test_ws_url_strips_trailing_slash() {
        assert_eq!(
            ws_url("http://localhost:8000/", "s1"),
            "ws://localhost:8000/ws/s1"
        );
    }

    #[test]
    fn test_ws_url_bare_host_defaults_to_ws() {
        assert_eq!(ws_url("localhost:8000", "s1"), "ws://localhost:8000/ws/s1");
    }
}
