// ── Connection profile ──
//
// The single process-wide set of values describing how the client reaches
// the music server and how it plays audio. Built by the validator or the
// store, never mutated in place: an apply replaces the whole value.

use secrecy::{ExposeSecret, SecretString};
use strum::Display;

pub const DEFAULT_ADDRESS: &str = "192.168.1.100";
pub const DEFAULT_CONTROL_PORT: i32 = 7905;
pub const DEFAULT_HTTP_PORT: i32 = 7906;

/// Port value meaning "not configured".
pub const UNSET_PORT: i32 = 0;

/// Where audio is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackMode {
    /// Server-side playback, the client acts as a remote control.
    #[default]
    Remote,
    /// Audio is streamed over HTTP and played locally.
    Streaming,
}

impl PlaybackMode {
    pub const ALL: [PlaybackMode; 2] = [Self::Remote, Self::Streaming];

    pub fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote playback",
            Self::Streaming => "Streaming playback",
        }
    }

    /// Position in a selector listing [`PlaybackMode::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Remote => 0,
            Self::Streaming => 1,
        }
    }

    /// Inverse of [`index`](Self::index). Unknown positions fall back to remote.
    pub fn from_index(index: usize) -> Self {
        if index == 1 {
            Self::Streaming
        } else {
            Self::Remote
        }
    }

    pub fn is_streaming(self) -> bool {
        self == Self::Streaming
    }
}

impl From<bool> for PlaybackMode {
    fn from(streaming: bool) -> Self {
        if streaming {
            Self::Streaming
        } else {
            Self::Remote
        }
    }
}

/// A fully populated connection profile.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    /// Server host name or IP address. May be empty.
    pub address: String,
    /// Control (WebSocket) port. `0` means unset.
    pub control_port: i32,
    /// HTTP (audio / artwork) port. `0` means unset.
    pub http_port: i32,
    pub password: SecretString,
    pub album_art_enabled: bool,
    pub message_compression_enabled: bool,
    /// Volume is scaled by the client instead of the output device.
    pub software_volume: bool,
    pub ssl_enabled: bool,
    pub playback_mode: PlaybackMode,
}

impl ConnectionProfile {
    pub fn streaming_playback_enabled(&self) -> bool {
        self.playback_mode.is_streaming()
    }
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.into(),
            control_port: DEFAULT_CONTROL_PORT,
            http_port: DEFAULT_HTTP_PORT,
            password: SecretString::from(String::new()),
            album_art_enabled: true,
            message_compression_enabled: true,
            software_volume: false,
            ssl_enabled: false,
            playback_mode: PlaybackMode::Remote,
        }
    }
}

impl PartialEq for ConnectionProfile {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.control_port == other.control_port
            && self.http_port == other.http_port
            && self.password.expose_secret() == other.password.expose_secret()
            && self.album_art_enabled == other.album_art_enabled
            && self.message_compression_enabled == other.message_compression_enabled
            && self.software_volume == other.software_volume
            && self.ssl_enabled == other.ssl_enabled
            && self.playback_mode == other.playback_mode
    }
}

impl Eq for ConnectionProfile {}
