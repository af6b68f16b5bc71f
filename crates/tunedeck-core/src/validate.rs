// ── Profile validation ──
//
// Pure conversion from raw form input into a `ConnectionProfile`.
// Text fields arrive exactly as typed; toggles and the playback
// selector arrive already resolved.

use secrecy::{ExposeSecret, SecretString};
use strum::Display;
use thiserror::Error;
use tracing::warn;

use crate::profile::{ConnectionProfile, PlaybackMode, UNSET_PORT};

const TCP_PORT_RANGE: std::ops::RangeInclusive<i32> = 0..=65_535;

/// Which port field a value belongs to. Displays as its persisted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PortField {
    #[strum(serialize = "port")]
    Control,
    #[strum(serialize = "http_port")]
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field}: '{value}' is not a number")]
    InvalidPort { field: PortField, value: String },
}

impl ValidationError {
    /// Persisted key of the offending field.
    pub fn field(&self) -> String {
        match self {
            Self::InvalidPort { field, .. } => field.to_string(),
        }
    }
}

/// Raw values as edited in a settings form.
#[derive(Debug, Clone)]
pub struct RawProfileFields {
    pub address: String,
    pub control_port: String,
    pub http_port: String,
    pub password: SecretString,
    pub album_art_enabled: bool,
    pub message_compression_enabled: bool,
    pub software_volume: bool,
    pub ssl_enabled: bool,
    pub playback_mode: PlaybackMode,
}

impl RawProfileFields {
    /// Pre-fill a form from a stored profile. Ports render as base-10 text.
    pub fn from_profile(profile: &ConnectionProfile) -> Self {
        Self {
            address: profile.address.clone(),
            control_port: profile.control_port.to_string(),
            http_port: profile.http_port.to_string(),
            password: profile.password.clone(),
            album_art_enabled: profile.album_art_enabled,
            message_compression_enabled: profile.message_compression_enabled,
            software_volume: profile.software_volume,
            ssl_enabled: profile.ssl_enabled,
            playback_mode: profile.playback_mode,
        }
    }
}

/// Parse a port field. Empty input is the unset sentinel `0`.
///
/// Any base-10 `i32` is accepted, including negatives and values above
/// 65535. Only input that is not such a number is rejected.
pub fn parse_port(field: PortField, raw: &str) -> Result<i32, ValidationError> {
    if raw.is_empty() {
        return Ok(UNSET_PORT);
    }

    let port: i32 = raw.parse().map_err(|_| ValidationError::InvalidPort {
        field,
        value: raw.to_owned(),
    })?;

    if !TCP_PORT_RANGE.contains(&port) {
        warn!(%field, port, "port outside the TCP range accepted as-is");
    }
    Ok(port)
}

/// Turn raw form input into a complete profile.
///
/// The control port is checked first, so its error wins when both are bad.
pub fn parse(raw: &RawProfileFields) -> Result<ConnectionProfile, ValidationError> {
    let control_port = parse_port(PortField::Control, &raw.control_port)?;
    let http_port = parse_port(PortField::Http, &raw.http_port)?;

    Ok(ConnectionProfile {
        address: raw.address.clone(),
        control_port,
        http_port,
        password: SecretString::from(raw.password.expose_secret().to_owned()),
        album_art_enabled: raw.album_art_enabled,
        message_compression_enabled: raw.message_compression_enabled,
        software_volume: raw.software_volume,
        ssl_enabled: raw.ssl_enabled,
        playback_mode: raw.playback_mode,
    })
}
