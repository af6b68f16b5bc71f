//! File-backed connection profile store.
//!
//! The profile lives in a flat TOML file whose keys match the persisted
//! layout (`address`, `port`, `http_port`, ...). Loading layers the file
//! over serialized defaults, so missing keys fall back individually.
//! Saving replaces the whole file via a temp file and rename.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use tunedeck_core::{ConnectionProfile, CoreError, PlaybackMode, ProfileStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize profile: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("profile loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── On-disk schema ──────────────────────────────────────────────────

/// The profile as written to disk. Field names are the persisted keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoredProfile {
    pub address: String,
    pub port: i32,
    pub http_port: i32,
    pub password: String,
    pub album_art_enabled: bool,
    pub message_compression_enabled: bool,
    pub software_volume: bool,
    pub ssl_enabled: bool,
    pub streaming_playback: bool,
}

impl Default for StoredProfile {
    fn default() -> Self {
        Self::from(&ConnectionProfile::default())
    }
}

impl From<&ConnectionProfile> for StoredProfile {
    fn from(profile: &ConnectionProfile) -> Self {
        Self {
            address: profile.address.clone(),
            port: profile.control_port,
            http_port: profile.http_port,
            password: profile.password.expose_secret().to_owned(),
            album_art_enabled: profile.album_art_enabled,
            message_compression_enabled: profile.message_compression_enabled,
            software_volume: profile.software_volume,
            ssl_enabled: profile.ssl_enabled,
            streaming_playback: profile.streaming_playback_enabled(),
        }
    }
}

impl From<StoredProfile> for ConnectionProfile {
    fn from(stored: StoredProfile) -> Self {
        Self {
            address: stored.address,
            control_port: stored.port,
            http_port: stored.http_port,
            password: SecretString::from(stored.password),
            album_art_enabled: stored.album_art_enabled,
            message_compression_enabled: stored.message_compression_enabled,
            software_volume: stored.software_volume,
            ssl_enabled: stored.ssl_enabled,
            playback_mode: PlaybackMode::from(stored.streaming_playback),
        }
    }
}

// ── Profile file path ───────────────────────────────────────────────

/// Resolve the profile file path via XDG / platform conventions.
pub fn profile_path() -> PathBuf {
    ProjectDirs::from("com", "tunedeck", "tunedeck").map_or_else(
        || dirs_fallback().join("profile.toml"),
        |dirs| dirs.config_dir().join("profile.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tunedeck");
    p
}

// ── Reading and writing ─────────────────────────────────────────────

/// Read a profile file. A missing file yields the default profile.
pub fn read_profile(path: &Path) -> Result<ConnectionProfile, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let stored: StoredProfile = Figment::new()
        .merge(Serialized::defaults(StoredProfile::default()))
        .merge(Toml::string(&contents))
        .extract()?;
    Ok(stored.into())
}

/// Replace the profile file in one step.
///
/// The new contents go to a temporary file in the same directory, which is
/// then renamed over `path`. Readers see either the old file or the new one.
pub fn write_profile(path: &Path, profile: &ConnectionProfile) -> Result<(), ConfigError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let toml_str = toml::to_string_pretty(&StoredProfile::from(profile))?;

    // Temp files are created owner-only; the rename keeps that mode.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(toml_str.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ConfigError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

// ── FileProfileStore ────────────────────────────────────────────────

/// [`ProfileStore`] backed by a TOML file, with an in-memory snapshot.
pub struct FileProfileStore {
    path: PathBuf,
    current: ArcSwap<ConnectionProfile>,
    /// Orders file replacement and snapshot swap across concurrent saves.
    write_lock: Mutex<()>,
}

impl FileProfileStore {
    /// Open the store at `path`. Unreadable or malformed files load as defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profile = read_profile(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "profile unreadable, using defaults");
            ConnectionProfile::default()
        });
        debug!(path = %path.display(), "profile store opened");

        Self {
            path,
            current: ArcSwap::from_pointee(profile),
            write_lock: Mutex::new(()),
        }
    }

    /// Open the store at the platform default location.
    pub fn open_default() -> Self {
        Self::open(profile_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `profile` to disk, then publish it to readers.
    pub fn persist(&self, profile: &ConnectionProfile) -> Result<(), ConfigError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        write_profile(&self.path, profile)?;
        self.current.store(Arc::new(profile.clone()));
        debug!(path = %self.path.display(), "profile written");
        Ok(())
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> ConnectionProfile {
        ConnectionProfile::clone(&self.current.load())
    }

    fn save(&self, profile: &ConnectionProfile) -> Result<(), CoreError> {
        self.persist(profile).map_err(|e| CoreError::Persist {
            message: e.to_string(),
        })
    }
}
