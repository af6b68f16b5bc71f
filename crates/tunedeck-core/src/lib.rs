//! Connection profile core for the tunedeck remote client.
//!
//! This crate owns the settings logic shared by every front end:
//!
//! - **[`ConnectionProfile`]**: the single process-wide profile (server
//!   address, ports, password, transport flags, volume and playback modes).
//!
//! - **[`validate`]**: pure conversion of raw form input into a profile.
//!   Empty ports become the unset sentinel `0`; non-numeric ports are the
//!   only rejected input.
//!
//! - **[`reconcile`]**: given the old and new profile, the ordered
//!   [`ReconciliationAction`]s to dispatch to the dependent [`Services`]
//!   and whether the SSL warning must be shown first.
//!
//! - **[`SettingsController`]**: one editing session: load, render,
//!   SSL confirmation, validate, reconcile, persist, finish.
//!
//! - **[`ProfileStore`]**: persistence seam. The core never touches disk;
//!   `tunedeck-config` provides the file-backed store.

pub mod confirm;
pub mod controller;
pub mod error;
pub mod profile;
pub mod reconcile;
pub mod services;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use confirm::{DialogResponse, LEARN_MORE_URL, SslConfirmation};
pub use controller::{LinkError, SettingsController, SettingsSurface};
pub use error::CoreError;
pub use profile::{
    ConnectionProfile, DEFAULT_ADDRESS, DEFAULT_CONTROL_PORT, DEFAULT_HTTP_PORT, PlaybackMode,
    UNSET_PORT,
};
pub use reconcile::{ReconciliationAction, ReconciliationPlan};
pub use services::{
    AudioOutput, ConnectionHandle, ConnectionState, ControlConnection, GlobalVolume,
    HARDWARE_DEFAULT_GAIN, PlaybackHandle, PlaybackState, Services, StreamingPlayback,
};
pub use store::{MemoryProfileStore, ProfileStore};
pub use validate::{PortField, RawProfileFields, ValidationError};
