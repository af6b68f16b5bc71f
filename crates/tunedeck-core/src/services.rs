// ── Dependent services ──
//
// The subsystems a profile change must reconcile. The core only calls
// into them; actual transport and audio work happens elsewhere and
// observes these handles through `watch` receivers and cancellation tokens.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Gain applied when volume control is handed back to the hardware.
pub const HARDWARE_DEFAULT_GAIN: f32 = 1.0;

// ── Collaborator traits ──────────────────────────────────────────

/// The remote-control session with the server.
pub trait ControlConnection: Send + Sync {
    /// Drop the active session. Safe to call when not connected.
    fn disconnect(&self);
}

/// Local streaming playback.
pub trait StreamingPlayback: Send + Sync {
    /// Stop local playback. Safe to call when already stopped.
    fn stop(&self);
}

/// Process-wide audio output.
pub trait AudioOutput: Send + Sync {
    /// Set the global gain, normalised to `0.0..=1.0`.
    fn set_global_volume(&self, gain: f32);
}

/// The collaborators a reconciliation plan is executed against.
#[derive(Clone)]
pub struct Services {
    pub connection: Arc<dyn ControlConnection>,
    pub playback: Arc<dyn StreamingPlayback>,
    pub audio: Arc<dyn AudioOutput>,
}

impl Services {
    pub fn new(
        connection: Arc<dyn ControlConnection>,
        playback: Arc<dyn StreamingPlayback>,
        audio: Arc<dyn AudioOutput>,
    ) -> Self {
        Self {
            connection,
            playback,
            audio,
        }
    }
}

// ── ConnectionHandle ─────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// In-process handle to the control connection.
///
/// The transport task owns the socket; it receives a session token from
/// [`begin_session`](Self::begin_session) and tears down when the token
/// is cancelled. Reconnection is lazy: nothing reconnects until the next
/// `begin_session`.
pub struct ConnectionHandle {
    state: watch::Sender<ConnectionState>,
    /// Token for the current session, replaced on each `begin_session`.
    session: ArcSwap<CancellationToken>,
}

impl ConnectionHandle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            state,
            session: ArcSwap::from_pointee(CancellationToken::new()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Start a new session, cancelling any previous one.
    pub fn begin_session(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.session.swap(Arc::new(token.clone()));
        previous.cancel();
        self.state.send_replace(ConnectionState::Connecting);
        token
    }

    pub fn mark_connected(&self) {
        self.state.send_replace(ConnectionState::Connected);
    }
}

impl Default for ConnectionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlConnection for ConnectionHandle {
    fn disconnect(&self) {
        self.session.load().cancel();
        let previous = self.state.send_replace(ConnectionState::Disconnected);
        debug!(?previous, "control connection dropped");
    }
}

// ── PlaybackHandle ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// In-process handle to the local streaming player.
pub struct PlaybackHandle {
    state: watch::Sender<PlaybackState>,
}

impl PlaybackHandle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(PlaybackState::Stopped);
        Self { state }
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    pub fn play(&self) {
        self.state.send_replace(PlaybackState::Playing);
    }
}

impl Default for PlaybackHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingPlayback for PlaybackHandle {
    fn stop(&self) {
        let previous = self.state.send_replace(PlaybackState::Stopped);
        debug!(?previous, "streaming playback stopped");
    }
}

// ── GlobalVolume ─────────────────────────────────────────────────

/// Process-wide software gain.
pub struct GlobalVolume {
    gain: watch::Sender<f32>,
}

impl GlobalVolume {
    pub fn new() -> Self {
        let (gain, _) = watch::channel(HARDWARE_DEFAULT_GAIN);
        Self { gain }
    }

    pub fn gain(&self) -> f32 {
        *self.gain.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.gain.subscribe()
    }
}

impl Default for GlobalVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for GlobalVolume {
    fn set_global_volume(&self, gain: f32) {
        let gain = if gain.is_nan() {
            HARDWARE_DEFAULT_GAIN
        } else {
            gain.clamp(0.0, 1.0)
        };
        self.gain.send_replace(gain);
    }
}
